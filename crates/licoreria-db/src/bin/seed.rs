//! # Seed Data Generator
//!
//! Populates the database with a realistic licorería catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p licoreria-db --bin seed
//!
//! # Specify database path
//! cargo run -p licoreria-db --bin seed -- --db ./data/licoreria.db
//! ```
//!
//! ## Generated Data
//! - The liquor catalog: beers, piscos, rums, whiskies, wines, mixers
//! - A handful of loyalty clients with zero starting points
//!
//! Every product carries both pricing tiers (retail and wholesale) and
//! a points-per-unit value for the loyalty badge.

use std::env;

use licoreria_db::{Database, DbConfig, NewProduct};

/// (description, category, retail céntimos, wholesale céntimos, points, stock)
const CATALOG: &[(&str, &str, i64, i64, i64, i64)] = &[
    ("Cerveza Cusqueña Dorada 620ml", "Cervezas", 750, 650, 1, 120),
    ("Cerveza Cusqueña Trigo 620ml", "Cervezas", 780, 680, 1, 96),
    ("Cerveza Pilsen Callao 630ml", "Cervezas", 700, 600, 1, 144),
    ("Cerveza Cristal 650ml", "Cervezas", 680, 580, 1, 144),
    ("Cerveza Corona 355ml", "Cervezas", 850, 720, 1, 72),
    ("Pisco Quebranta Viejo Tonel 750ml", "Piscos", 4500, 3900, 5, 24),
    ("Pisco Acholado Cuatro Gallos 750ml", "Piscos", 5200, 4600, 5, 18),
    ("Pisco Italia Tabernero 700ml", "Piscos", 4800, 4200, 5, 20),
    ("Ron Cartavio Black 1L", "Rones", 3200, 2800, 3, 36),
    ("Ron Cartavio Solera 12 750ml", "Rones", 8900, 7900, 8, 12),
    ("Ron Flor de Caña 7 750ml", "Rones", 7500, 6800, 7, 15),
    ("Whisky Johnnie Walker Red 750ml", "Whiskies", 6900, 6200, 6, 18),
    ("Whisky Johnnie Walker Black 750ml", "Whiskies", 13500, 12200, 12, 10),
    ("Whisky Ballantine's Finest 750ml", "Whiskies", 6500, 5800, 6, 14),
    ("Vodka Russkaya 1L", "Vodkas", 2800, 2400, 3, 30),
    ("Vodka Absolut 750ml", "Vodkas", 5900, 5300, 5, 16),
    ("Vino Tacama Gran Tinto 750ml", "Vinos", 2900, 2500, 3, 28),
    ("Vino Borgoña Tabernero 750ml", "Vinos", 1800, 1500, 2, 40),
    ("Vino Santiago Queirolo Rosé 750ml", "Vinos", 2100, 1800, 2, 32),
    ("Gaseosa Inca Kola 1.5L", "Mixers", 850, 720, 0, 60),
    ("Gaseosa Coca-Cola 1.5L", "Mixers", 880, 750, 0, 60),
    ("Agua San Luis 625ml", "Mixers", 150, 120, 0, 100),
    ("Hielo en bolsa 3kg", "Mixers", 600, 500, 0, 50),
    ("Ginger Ale Evervess 1.5L", "Mixers", 780, 650, 0, 36),
];

/// (name, phone)
const CLIENTS: &[(&str, Option<&str>)] = &[
    ("María Quispe", Some("987654321")),
    ("Jorge Huamán", Some("912345678")),
    ("Rosa Fernández", None),
    ("Carlos Mamani", Some("955443322")),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./licoreria_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Licorería POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>  Database file path (default: ./licoreria_dev.db)");
                println!("  -h, --help       Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Licorería POS Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let products = db.products();
    for (idx, (description, category, retail, wholesale, points, stock)) in
        CATALOG.iter().enumerate()
    {
        // EAN-13 shaped barcode, not a valid checksum
        let barcode = format!("775{:010}", idx + 1);

        products
            .insert(NewProduct {
                barcode: Some(barcode),
                description: description.to_string(),
                retail_price_cents: *retail,
                wholesale_price_cents: *wholesale,
                points_per_unit: *points,
                stock: *stock,
                category: Some(category.to_string()),
            })
            .await?;
    }

    println!("✓ Seeded {} products", CATALOG.len());

    let clients = db.clients();
    for (name, phone) in CLIENTS {
        clients.insert(name, *phone).await?;
    }

    println!("✓ Seeded {} clients", CLIENTS.len());

    println!();
    println!("Verifying FTS index...");
    let hits = db.products().search("cusque", 10).await?;
    println!("  Search 'cusque': {} results", hits.len());
    let hits = db.products().search("pisco", 10).await?;
    println!("  Search 'pisco': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
