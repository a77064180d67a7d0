//! Command handlers. Each one initializes the store, reports degraded
//! mode, then performs its operation.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::bail;
use gaming_hub_catalog::query::{self, GameFilter};
use gaming_hub_catalog::{CatalogError, CatalogSnapshot, CatalogStore, GameRecord, Mode};

use crate::Command;

pub async fn run(store: &CatalogStore, command: Command) -> anyhow::Result<()> {
    let snapshot = store.initialize().await;
    if let Some(banner) = degraded_banner(&snapshot) {
        eprintln!("{banner}");
    }

    match command {
        Command::List { search, category } => {
            let filter = GameFilter { search, category };
            let games = store.games();
            let matching = query::filter_games(&games, &filter);
            if matching.is_empty() {
                println!("No games found.");
            } else {
                print!("{}", render_table(&matching));
            }
        }
        Command::Show { id } => match store.get(&id) {
            Some(game) => print!("{}", render_game(&game)),
            None => bail!("game not found: {id}"),
        },
        Command::Add(fields) => {
            let game = check(store.add(fields.into()).await)?;
            println!("Added {} ({})", game.title, game.id);
        }
        Command::Update { id, fields } => {
            let game = check(store.update(&id, fields.into()).await)?;
            println!("Updated {} ({})", game.title, game.id);
        }
        Command::Remove { id, yes } => {
            let Some(game) = store.get(&id) else {
                bail!("game not found: {id}");
            };
            if !yes && !confirm(&format!("Are you sure you want to delete \"{}\"?", game.title))? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = check(store.remove(&id).await)?;
            println!("Removed {} ({})", removed.title, removed.id);
        }
        Command::Retry => {
            let report = store.retry_remote().await;
            if report.reconnected {
                println!("Connected to backend ({} games).", store.games().len());
                if report.discarded_edits > 0 {
                    eprintln!(
                        "warning: {} offline edit(s) were replaced by the backend catalog",
                        report.discarded_edits
                    );
                }
            } else {
                let reason = store
                    .snapshot()
                    .last_error
                    .map(|e| e.message)
                    .unwrap_or_default();
                bail!("backend still unavailable: {reason}");
            }
        }
        Command::SeedBackend { yes } => {
            if store.mode() != Mode::Remote {
                bail!("backend not available, nothing was seeded");
            }
            if !yes && !confirm("This will add the sample games to the backend. Continue?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let report = check(store.seed_remote().await)?;
            for title in &report.added {
                println!("Added {title}");
            }
            for (title, reason) in &report.failed {
                eprintln!("Failed to add {title}: {reason}");
            }
            println!(
                "Seeding completed: {} added, {} failed.",
                report.added.len(),
                report.failed.len()
            );
        }
        Command::Status => print!("{}", render_status(&store.snapshot())),
    }
    Ok(())
}

/// Prints per-field validation messages before turning the error into
/// the command's failure.
fn check<T>(result: Result<T, CatalogError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(CatalogError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            bail!("game not saved, {} field(s) invalid", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn degraded_banner(snapshot: &CatalogSnapshot) -> Option<String> {
    if !snapshot.is_degraded() {
        return None;
    }
    let mut banner = String::from("Offline mode: changes are saved locally only.");
    if let Some(err) = &snapshot.last_error {
        let _ = write!(banner, " {err}.");
    }
    banner.push_str(" Run `gaming-hub retry` to reconnect.");
    Some(banner)
}

fn render_table(games: &[&GameRecord]) -> String {
    let title_width = games
        .iter()
        .map(|g| g.title.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    let id_width = games.iter().map(|g| g.id.len()).max().unwrap_or(0).max(2);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<title_width$}  {:<14}  {:>8}",
        "ID", "TITLE", "CATEGORY", "PRICE"
    );
    for game in games {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<title_width$}  {:<14}  {:>8.2}",
            game.id, game.title, game.category, game.price
        );
    }
    out
}

fn render_game(game: &GameRecord) -> String {
    format!(
        "ID:          {}\n\
         Title:       {}\n\
         Category:    {}\n\
         Price:       ${:.2}\n\
         Duration:    {}\n\
         Difficulty:  {}\n\
         Players:     {}\n\
         Image:       {}\n\
         Description: {}\n",
        game.id,
        game.title,
        game.category,
        game.price,
        game.duration,
        game.difficulty,
        game.players,
        game.image,
        game.description
    )
}

fn render_status(snapshot: &CatalogSnapshot) -> String {
    let stats = query::stats(&snapshot.games);
    let mut out = String::new();
    let _ = writeln!(out, "Mode:       {:?}", snapshot.mode);
    let _ = writeln!(out, "Status:     {:?}", snapshot.status);
    let _ = writeln!(out, "Games:      {}", stats.total);
    let _ = writeln!(out, "Categories: {}", query::categories(&snapshot.games).join(", "));
    if let Some(avg) = stats.average_price {
        let _ = writeln!(out, "Avg price:  ${avg:.2}");
    }
    if snapshot.unsynced_edits > 0 {
        let _ = writeln!(out, "Unsynced:   {} local edit(s)", snapshot.unsynced_edits);
    }
    if let Some(err) = &snapshot.last_error {
        let _ = writeln!(out, "Last error: {err}");
    }
    out
}
