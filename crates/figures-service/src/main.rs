//! # figures-store
//!
//! Places one cart read from a JSON file against the SQLite store.
//!
//! ## Usage
//! ```bash
//! figures-store cart.json
//! figures-store --config ./figures.toml --db ./figures.db cart.json
//! cat cart.json | figures-store -
//! ```
//!
//! ## Startup Sequence
//! 1. Load configuration (defaults → file → environment)
//! 2. Initialize tracing
//! 3. Connect to database & run migrations
//! 4. Apply `[inventory]` levels for kinds with no stored level
//! 5. Build the order service
//! 6. Place the order, print the receipt or the error as JSON
//!
//! Exit status is 0 on success, 1 when the order was refused, 2 on a
//! startup failure.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::info;

use figures_core::{Cart, FigureFactory};
use figures_db::{Database, DbConfig};
use figures_service::telemetry::init_tracing;
use figures_service::{AppConfig, ErrorBody, OrderService};

struct Args {
    config: Option<PathBuf>,
    db: Option<PathBuf>,
    cart: String,
}

fn print_help() {
    println!("Figures Store");
    println!();
    println!("Usage: figures-store [OPTIONS] <CART.json | ->");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -d, --db <PATH>      Database file, overrides the config");
    println!("  -h, --help           Show this help message");
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = None;
    let mut db = None;
    let mut cart = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let value = args.get(i + 1).context("--config needs a path")?;
                config = Some(PathBuf::from(value));
                i += 1;
            }
            "--db" | "-d" => {
                let value = args.get(i + 1).context("--db needs a path")?;
                db = Some(PathBuf::from(value));
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other if cart.is_none() => cart = Some(other.to_string()),
            other => bail!("unexpected argument: {other}"),
        }
        i += 1;
    }

    let cart = cart.context("missing cart file (use - for stdin)")?;
    Ok(Some(Args { config, db, cart }))
}

fn read_cart(source: &str) -> anyhow::Result<Cart> {
    let raw = if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read cart from stdin")?;
        raw
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };

    serde_json::from_str(&raw).context("cart is not valid JSON")
}

async fn build_service(config: &AppConfig) -> anyhow::Result<(Database, OrderService)> {
    let db_config = DbConfig::new(&config.database.path)
        .max_connections(config.database.max_connections);
    let db = Database::new(db_config)
        .await
        .context("failed to open database")?;

    let inventory = db.inventory();
    let stored = inventory.levels().await?;
    for (kind, count) in config.initial_levels() {
        if stored.iter().all(|(existing, _)| *existing != kind) {
            info!(kind = %kind, count, "Applying initial inventory level");
            inventory.set_level(&kind, count).await?;
        }
    }

    let service = OrderService::new(
        FigureFactory::standard(),
        config.pricing_policy(),
        Arc::new(inventory),
        Arc::new(db.orders()),
    )?
    .with_max_cart_lines(config.limits.max_cart_lines);

    Ok((db, service))
}

async fn run() -> anyhow::Result<bool> {
    let Some(args) = parse_args()? else {
        return Ok(true);
    };

    let mut config = AppConfig::load(args.config).context("failed to load configuration")?;
    if let Some(db) = args.db {
        config.database.path = db;
    }

    init_tracing(&config.logging.filter).map_err(|e| anyhow::anyhow!(e))?;

    let cart = read_cart(&args.cart)?;
    let (db, service) = build_service(&config).await?;

    let outcome = service.place_order(&cart).await;
    db.close().await;

    match outcome {
        Ok(receipt) => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(true)
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&ErrorBody::from(&err))?);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
