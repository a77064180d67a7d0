//! Domain types for the game catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ErrorInfo;

/// Session length applied when none is given.
pub const DEFAULT_DURATION: &str = "60 minutes";

/// Player count applied when none is given.
pub const DEFAULT_PLAYERS: &str = "1-4";

/// How demanding a game is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A bookable game, in the shape every consumer of the catalog sees.
///
/// This is also the shape persisted in the local snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub category: String,
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_players")]
    pub players: String,
}

fn default_duration() -> String {
    DEFAULT_DURATION.into()
}

fn default_players() -> String {
    DEFAULT_PLAYERS.into()
}

/// Caller-supplied game fields, as typed into a form.
///
/// Every field is optional: `add` requires the mandatory ones, `update`
/// treats absent fields as "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<String>,
    pub players: Option<String>,
}

impl GameInput {
    /// Overlays the fields present in `partial` on top of `self`.
    pub fn merge(mut self, partial: GameInput) -> GameInput {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if partial.$field.is_some() {
                    self.$field = partial.$field;
                })*
            };
        }
        overlay!(title, description, image, price, category, duration, difficulty, players);
        self
    }
}

impl From<&GameRecord> for GameInput {
    fn from(game: &GameRecord) -> Self {
        Self {
            title: Some(game.title.clone()),
            description: Some(game.description.clone()),
            image: Some(game.image.clone()),
            price: Some(game.price.to_string()),
            category: Some(game.category.clone()),
            duration: Some(game.duration.clone()),
            difficulty: Some(game.difficulty.to_string()),
            players: Some(game.players.clone()),
        }
    }
}

/// Which backend currently owns writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Remote,
    Local,
}

/// Store lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ready,
    /// Backed by the local snapshot because the remote is unavailable.
    Degraded,
}

/// Point-in-time view of the store, published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub games: Vec<GameRecord>,
    pub mode: Mode,
    pub status: Status,
    pub last_error: Option<ErrorInfo>,
    /// Local mutations that a reconnect to the remote would discard.
    pub unsynced_edits: usize,
}

impl CatalogSnapshot {
    pub(crate) fn loading() -> Self {
        Self {
            games: Vec::new(),
            mode: Mode::Remote,
            status: Status::Loading,
            last_error: None,
            unsynced_edits: 0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status == Status::Degraded
    }

    pub fn get(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == id)
    }
}

/// Outcome of [`CatalogStore::retry_remote`](crate::CatalogStore::retry_remote).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryReport {
    pub reconnected: bool,
    /// Local-only edits dropped because the remote catalog replaced them.
    pub discarded_edits: usize,
}

/// Outcome of [`CatalogStore::seed_remote`](crate::CatalogStore::seed_remote).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub added: Vec<String>,
    /// `(title, error)` for each record the remote refused.
    pub failed: Vec<(String, String)>,
}
