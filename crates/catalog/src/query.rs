//! Read-only queries over a list of games: search, category filter, stats.

use std::collections::HashSet;

use crate::types::GameRecord;

/// Admin list filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
}

impl GameFilter {
    pub fn matches(&self, game: &GameRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                game.title.to_lowercase().contains(&term)
                    || game.description.to_lowercase().contains(&term)
            }
        };
        let matches_category = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => game.category == category,
        };
        matches_search && matches_category
    }
}

/// Games matching `filter`, in catalog order.
pub fn filter_games<'a>(games: &'a [GameRecord], filter: &GameFilter) -> Vec<&'a GameRecord> {
    games.iter().filter(|g| filter.matches(g)).collect()
}

/// Distinct categories in first-seen order.
pub fn categories(games: &[GameRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    games
        .iter()
        .map(|g| g.category.as_str())
        .filter(|c| seen.insert(*c))
        .collect()
}

/// Summary figures for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub categories: usize,
    /// `None` for an empty catalog.
    pub average_price: Option<f64>,
}

pub fn stats(games: &[GameRecord]) -> CatalogStats {
    let average_price = if games.is_empty() {
        None
    } else {
        Some(games.iter().map(|g| g.price).sum::<f64>() / games.len() as f64)
    };
    CatalogStats {
        total: games.len(),
        categories: categories(games).len(),
        average_price,
    }
}
