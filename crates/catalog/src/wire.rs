//! Translation between the catalog shape and the backend wire shape.
//!
//! The backend names the title `name`, may use numeric ids, and may send
//! the price as a number or a numeric string. Nothing outside this module
//! builds or reads that shape.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::error::RemoteError;
use crate::types::{Difficulty, GameInput, GameRecord};
use crate::validation::{GameDraft, validate};

#[derive(Deserialize)]
struct IncomingGame {
    id: WireId,
    #[serde(alias = "title", default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    price: WirePrice,
    #[serde(default)]
    category: String,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    players: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePrice {
    Number(f64),
    Text(String),
}

/// Encodes a validated game as a backend request body.
pub(crate) fn to_wire(game: &GameDraft) -> Value {
    json!({
        "name": game.title,
        "price": game.price,
        "description": game.description,
        "image": game.image,
        "category": game.category,
        "duration": game.duration,
        "difficulty": game.difficulty.as_str(),
        "players": game.players,
    })
}

/// Decodes a single backend game.
pub(crate) fn from_wire(value: Value) -> Result<GameRecord, RemoteError> {
    let incoming: IncomingGame =
        serde_json::from_value(value).map_err(|e| RemoteError::Malformed(e.to_string()))?;
    normalize(incoming)
}

/// Decodes a backend game list.
///
/// Entries that cannot be normalized, and repeated ids, are skipped with a
/// warning. A payload that is not an array, or a non-empty array without a
/// single readable game, is malformed as a whole.
pub(crate) fn from_wire_list(value: Value) -> Result<Vec<GameRecord>, RemoteError> {
    let Value::Array(items) = value else {
        return Err(RemoteError::Malformed("expected a JSON array of games".into()));
    };

    let total = items.len();
    let mut seen = HashSet::new();
    let mut games = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match from_wire(item) {
            Ok(game) => {
                if seen.insert(game.id.clone()) {
                    games.push(game);
                } else {
                    warn!(id = %game.id, "duplicate game id from remote, skipping");
                }
            }
            Err(e) => warn!(index, error = %e, "skipping malformed remote game"),
        }
    }
    if total > 0 && games.is_empty() {
        return Err(RemoteError::Malformed(format!(
            "none of the {total} remote games could be read"
        )));
    }
    Ok(games)
}

/// Backend records must satisfy the same rules as caller input, so every
/// game in the catalog can later be updated field by field.
fn normalize(incoming: IncomingGame) -> Result<GameRecord, RemoteError> {
    let id = match incoming.id {
        WireId::Int(n) => n.to_string(),
        WireId::Text(s) => s,
    };
    if id.is_empty() {
        return Err(RemoteError::Malformed("game without id".into()));
    }

    let price = match incoming.price {
        WirePrice::Number(p) => p.to_string(),
        WirePrice::Text(s) => s,
    };

    let difficulty = match incoming.difficulty.as_deref().map(str::trim) {
        None | Some("") => Difficulty::default(),
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(id = %id, difficulty = raw, "unknown difficulty from remote, using default");
            Difficulty::default()
        }),
    };

    let input = GameInput {
        title: Some(incoming.name),
        description: Some(incoming.description),
        image: Some(incoming.image),
        price: Some(price),
        category: Some(incoming.category),
        duration: incoming.duration,
        difficulty: Some(difficulty.as_str().into()),
        players: incoming.players,
    };
    let draft = validate(&input)
        .map_err(|errors| RemoteError::Malformed(format!("game {id}: {errors}")))?;
    Ok(draft.into_record(id))
}
