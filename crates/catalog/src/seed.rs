//! Built-in seed catalog, used when neither the remote nor a local
//! snapshot can provide games.

use crate::types::{Difficulty, GameRecord};

struct SeedGame {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    image: &'static str,
    price: f64,
    category: &'static str,
    duration: &'static str,
    difficulty: Difficulty,
    players: &'static str,
}

const SEED: &[SeedGame] = &[
    SeedGame {
        id: "1",
        title: "Velocity Rush",
        description: "Full-motion racing simulators with force feedback wheels and triple screens.",
        image: "https://images.unsplash.com/photo-1511512578047-dfb367046420",
        price: 15.99,
        category: "Racing",
        duration: "30 minutes",
        difficulty: Difficulty::Medium,
        players: "1-4",
    },
    SeedGame {
        id: "2",
        title: "Lost Temple VR",
        description: "Explore a collapsing jungle temple in free-roam virtual reality.",
        image: "https://images.unsplash.com/photo-1622979135225-d2ba269cf1ac",
        price: 24.99,
        category: "VR Adventure",
        duration: "45 minutes",
        difficulty: Difficulty::Easy,
        players: "1-2",
    },
    SeedGame {
        id: "3",
        title: "Strike Zone",
        description: "Team-based tactical shooter on competition-grade rigs.",
        image: "https://images.unsplash.com/photo-1542751371-adc38448a05e",
        price: 12.99,
        category: "FPS",
        duration: "60 minutes",
        difficulty: Difficulty::Hard,
        players: "1-8",
    },
    SeedGame {
        id: "4",
        title: "Dragon's Oath",
        description: "Story-driven role-playing campaign with a dedicated game master.",
        image: "https://images.unsplash.com/photo-1538481199705-c710c4e965fc",
        price: 19.99,
        category: "RPG",
        duration: "120 minutes",
        difficulty: Difficulty::Medium,
        players: "1-6",
    },
    SeedGame {
        id: "5",
        title: "Beat Pulse",
        description: "Hit the notes in time across neon dance stages.",
        image: "https://images.unsplash.com/photo-1493711662062-fa541adb3fc8",
        price: 9.99,
        category: "Rhythm",
        duration: "30 minutes",
        difficulty: Difficulty::Easy,
        players: "1-2",
    },
    SeedGame {
        id: "6",
        title: "Last Squad Standing",
        description: "Hundred-player battle royale with reserved LAN seats.",
        image: "https://images.unsplash.com/photo-1552820728-8b83bb6b773f",
        price: 14.99,
        category: "Battle Royale",
        duration: "90 minutes",
        difficulty: Difficulty::Hard,
        players: "100",
    },
    SeedGame {
        id: "7",
        title: "Cipher Room",
        description: "Cooperative escape puzzle with hidden mechanisms and codes.",
        image: "https://images.unsplash.com/photo-1606167668584-78701c57f13d",
        price: 17.49,
        category: "Puzzle",
        duration: "60 minutes",
        difficulty: Difficulty::Medium,
        players: "1-4",
    },
    SeedGame {
        id: "8",
        title: "Midnight Ward",
        description: "Survival horror in an abandoned hospital, played in the dark room.",
        image: "https://images.unsplash.com/photo-1509248961158-e54f6934749c",
        price: 21.99,
        category: "Horror",
        duration: "45 minutes",
        difficulty: Difficulty::Hard,
        players: "1-4",
    },
];

/// Returns the built-in seed games.
pub fn seed_games() -> Vec<GameRecord> {
    SEED.iter()
        .map(|s| GameRecord {
            id: s.id.into(),
            title: s.title.into(),
            description: s.description.into(),
            image: s.image.into(),
            price: s.price,
            category: s.category.into(),
            duration: s.duration.into(),
            difficulty: s.difficulty,
            players: s.players.into(),
        })
        .collect()
}
