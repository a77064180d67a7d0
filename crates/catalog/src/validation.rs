//! Form validation for game input.

use crate::error::ValidationErrors;
use crate::types::{DEFAULT_DURATION, DEFAULT_PLAYERS, Difficulty, GameInput, GameRecord};

/// A validated game that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub category: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub players: String,
}

impl GameDraft {
    pub fn into_record(self, id: String) -> GameRecord {
        GameRecord {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            price: self.price,
            category: self.category,
            duration: self.duration,
            difficulty: self.difficulty,
            players: self.players,
        }
    }
}

impl From<&GameRecord> for GameDraft {
    fn from(game: &GameRecord) -> Self {
        Self {
            title: game.title.clone(),
            description: game.description.clone(),
            image: game.image.clone(),
            price: game.price,
            category: game.category.clone(),
            duration: game.duration.clone(),
            difficulty: game.difficulty,
            players: game.players.clone(),
        }
    }
}

/// Validates form input, applying defaults for the optional fields.
///
/// All failing fields are reported at once.
pub fn validate(input: &GameInput) -> Result<GameDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = required(&input.title, "title", "Title is required", &mut errors);
    let description = required(
        &input.description,
        "description",
        "Description is required",
        &mut errors,
    );
    let category = required(
        &input.category,
        "category",
        "Category is required",
        &mut errors,
    );

    let image = required(&input.image, "image", "Image URL is required", &mut errors);
    if !image.is_empty() && !is_valid_url(&image) {
        errors.add("image", "Please enter a valid URL");
    }

    let price = match input.price.as_deref().map(parse_price) {
        Some(Some(p)) => p,
        _ => {
            errors.add("price", "Please enter a valid price");
            0.0
        }
    };

    let difficulty = match non_blank(&input.difficulty) {
        None => Difficulty::default(),
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            errors.add("difficulty", "Difficulty must be Easy, Medium or Hard");
            Difficulty::default()
        }),
    };

    let duration = non_blank(&input.duration).unwrap_or_else(|| DEFAULT_DURATION.into());
    let players = non_blank(&input.players).unwrap_or_else(|| DEFAULT_PLAYERS.into());

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(GameDraft {
        title,
        description,
        image,
        price,
        category,
        duration,
        difficulty,
        players,
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(
    value: &Option<String>,
    field: &str,
    message: &str,
    errors: &mut ValidationErrors,
) -> String {
    non_blank(value).unwrap_or_else(|| {
        errors.add(field, message);
        String::new()
    })
}

/// Parses a strictly positive, finite price.
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}

fn is_valid_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok()
}
