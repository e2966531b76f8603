//! # Seed Data Generator
//!
//! Populates the database with perishable products for development and
//! reports what the expiry queries see afterwards.
//!
//! ## Usage
//! ```bash
//! # 200 products into ./shelflife_dev.db (default)
//! cargo run -p shelflife-db --bin seed
//!
//! # Custom amount and database
//! cargo run -p shelflife-db --bin seed -- --count 1000 --db sqlite://data/shelflife.db
//! ```
//!
//! Expiration dates are spread from 5 days in the past to 25 days in the
//! future, so every query has something to return.

use chrono::{Duration, Utc};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shelflife_db::{CancellationToken, Database, DbConfig, NewProduct, ProductStore};

/// Product types and sample names.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "FOOD",
        &[
            "Whole Milk",
            "Greek Yogurt",
            "Cheddar Cheese",
            "Eggs Dozen",
            "Chicken Breast",
            "Salmon Fillet",
            "Sourdough Bread",
            "Spinach",
            "Strawberries",
            "Hummus",
        ],
    ),
    (
        "MEDICINE",
        &[
            "Ibuprofen",
            "Paracetamol",
            "Cough Syrup",
            "Antihistamine",
            "Eye Drops",
        ],
    ),
    (
        "COSMETICS",
        &["Sunscreen", "Face Cream", "Mascara", "Lip Balm"],
    ),
];

/// Spread of expirations, in hours relative to now.
const EXPIRY_OFFSETS_HOURS: &[i64] = &[-120, -24, -1, 2, 12, 20, 48, 96, 240, 600];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_url = String::from("sqlite://shelflife_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("shelflife Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <URL>     Database URL (default: sqlite://shelflife_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 shelflife Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_url);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_url)).await?;
    let store = db.products();
    let cancel = CancellationToken::new();

    println!("✓ Connected to database");

    let now = Utc::now();
    let mut generated = 0;
    let mut failed = 0;

    'outer: for round in 0.. {
        for (type_idx, (product_type, names)) in CATALOG.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                if generated + failed >= count {
                    break 'outer;
                }

                let seed = round * 31 + type_idx * 7 + name_idx;
                let offset = EXPIRY_OFFSETS_HOURS[seed % EXPIRY_OFFSETS_HOURS.len()];
                let product = NewProduct::new(
                    (seed % 5) as i64 + 1,
                    *name,
                    *product_type,
                    now + Duration::hours(offset) + Duration::minutes((seed % 60) as i64),
                );

                match store.save(&cancel, &product).await {
                    Ok(()) => generated += 1,
                    Err(e) => {
                        eprintln!("Failed to insert {}: {}", product.name, e);
                        failed += 1;
                    }
                }
            }
        }
    }

    println!("✓ Generated {} products ({} failed)", generated, failed);

    let flipped = store.set_expired(&cancel).await?;
    info!(flipped, "Sweep complete");

    let expired = store.find_all_expired(&cancel).await?;
    let fresh = store.find_all_order_by_exp(&cancel, false).await?;

    println!();
    println!("Expired: {}", expired.len());
    println!("Fresh:   {}", fresh.len());
    println!();
    println!("Expiring within 24h (including already expired):");
    for (product_type, _) in CATALOG {
        let due = store
            .find_by_expired_time(&cancel, Duration::hours(24), product_type)
            .await?;
        println!("  {:<10} {}", product_type, due.len());
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelflife_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
