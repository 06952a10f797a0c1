//! # Inventory Seeder
//!
//! Sets stock levels in a figures database for development.
//!
//! ## Usage
//! ```bash
//! # Default levels: Triangle=100, Square=100, Circle=100
//! cargo run -p figures-db --bin seed
//!
//! # Custom levels (repeatable)
//! cargo run -p figures-db --bin seed -- --kind Circle=25 --kind Square=0
//!
//! # Specify database path
//! cargo run -p figures-db --bin seed -- --db ./data/figures.db
//! ```
//!
//! Levels are overwritten, not added, so running the seeder twice leaves
//! the same stock behind.

use std::env;

use figures_core::{FigureKind, InventoryStore};
use figures_db::{migrations, Database, DbConfig};

/// Level applied to every standard kind when no `--kind` is given.
const DEFAULT_LEVEL: u32 = 100;

fn print_help() {
    println!("Figures Store Inventory Seeder");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -k, --kind <NAME=N>  Set the level for a kind (repeatable)");
    println!("  -d, --db <PATH>      Database file path (default: ./figures_dev.db)");
    println!("  -h, --help           Show this help message");
}

/// Parses `Name=N`.
fn parse_level(raw: &str) -> Result<(FigureKind, u32), String> {
    let (name, count) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=N, got '{raw}'"))?;
    let kind = FigureKind::parse(name).map_err(|e| e.to_string())?;
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad count in '{raw}': {e}"))?;
    Ok((kind, count))
}

/// What to seed and where.
#[derive(Debug, PartialEq)]
struct SeedArgs {
    db_path: String,
    levels: Vec<(FigureKind, u32)>,
}

/// Parses everything after the program name. `Ok(None)` means help was shown.
fn parse_args(args: &[String]) -> Result<Option<SeedArgs>, String> {
    let mut db_path = String::from("./figures_dev.db");
    let mut levels = Vec::new();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--kind" | "-k" => {
                let value = args.next().ok_or("--kind needs NAME=N")?;
                levels.push(parse_level(value)?);
            }
            "--db" | "-d" => {
                db_path = args.next().ok_or("--db needs a path")?.clone();
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok(Some(SeedArgs { db_path, levels }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(SeedArgs { db_path, mut levels }) = parse_args(&args)? else {
        return Ok(());
    };

    if levels.is_empty() {
        levels = [FigureKind::triangle(), FigureKind::square(), FigureKind::circle()]
            .into_iter()
            .map(|kind| (kind, DEFAULT_LEVEL))
            .collect();
    }

    println!("🌱 Figures Store Inventory Seeder");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migrations::migration_status(db.pool()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({applied}/{total})");
    println!();

    let inventory = db.inventory();
    for (kind, count) in &levels {
        inventory.set_level(kind, *count).await?;
        let confirmed = inventory.available(kind).await?;
        println!("  {:<12} {}", kind.as_str(), confirmed);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
