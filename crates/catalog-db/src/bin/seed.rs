//! # Seed Data Generator
//!
//! Populates the database with sample categories and products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! Five categories, each with either a discount, a tax, or neither:
//! - Bebidas (10% desconto)
//! - Mercearia (sem ajuste)
//! - Limpeza (5% taxa)
//! - Hortifruti (12.5% desconto)
//! - Eletrônicos (8.25% taxa)
//!
//! Products go through the same services as the HTTP API, so every rule
//! (required fields, positive price, known category) applies to seeded data.

use std::env;
use std::sync::Arc;

use catalog_core::dto::{RegisterCategoryRequest, RegisterProductRequest};
use catalog_core::{CategoryService, ProductService};
use catalog_db::{Database, DbConfig};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (name, description, tax, discount) in percent
const CATEGORIES: &[(&str, &str, i64, i64)] = &[
    ("Bebidas", "Refrigerantes, sucos e águas", 0, 1000),
    ("Mercearia", "Alimentos não perecíveis", 0, 0),
    ("Limpeza", "Produtos de limpeza doméstica", 500, 0),
    ("Hortifruti", "Frutas, legumes e verduras", 0, 1250),
    ("Eletrônicos", "Pequenos eletrônicos e acessórios", 825, 0),
];

/// Product names per category, same order as [`CATEGORIES`]
const PRODUCTS: &[&[&str]] = &[
    &[
        "Guaraná",
        "Suco de Laranja",
        "Suco de Uva",
        "Água Mineral",
        "Água com Gás",
        "Chá Gelado",
        "Café Torrado",
        "Achocolatado",
    ],
    &[
        "Arroz Branco",
        "Feijão Carioca",
        "Feijão Preto",
        "Macarrão Espaguete",
        "Farinha de Mandioca",
        "Açúcar Refinado",
        "Óleo de Soja",
        "Sal Refinado",
    ],
    &[
        "Detergente Neutro",
        "Sabão em Pó",
        "Água Sanitária",
        "Desinfetante",
        "Esponja Dupla Face",
        "Amaciante",
    ],
    &[
        "Banana Prata",
        "Maçã Fuji",
        "Tomate",
        "Cebola",
        "Batata Inglesa",
        "Alface Crespa",
    ],
    &[
        "Cabo USB-C",
        "Carregador de Parede",
        "Fone de Ouvido",
        "Pilha AA",
        "Lâmpada LED",
    ],
];

/// Package variants appended to product names.
const VARIANTS: &[&str] = &["", " 500g", " 1kg", " 2L", " Pack com 6", " Econômico"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./catalog_dev.db");

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
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
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

    let categories = CategoryService::new(Arc::new(db.categories()));
    let products = ProductService::new(Arc::new(db.products()), Arc::new(db.categories()));

    println!();
    println!("Registering categories...");
    for (name, description, tax, discount) in CATEGORIES {
        let request = RegisterCategoryRequest {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            tax: Some(Decimal::new(*tax, 2)),
            discount: Some(Decimal::new(*discount, 2)),
        };
        match categories.register(request).await {
            Ok(name) => println!("  ✓ {}", name),
            Err(e) => warn!(name, error = %e, "Category not registered"),
        }
    }

    println!();
    println!("Generating products...");
    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for (variant_idx, variant) in VARIANTS.iter().enumerate() {
        for ((category, ..), names) in CATEGORIES.iter().zip(PRODUCTS) {
            for (product_idx, product_name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = variant_idx * 100 + product_idx;
                let request = RegisterProductRequest {
                    name: Some(format!("{}{}", product_name, variant)),
                    description: Some(format!("{} - {}", product_name, category)),
                    base_price: Some(sample_price(seed)),
                    category_name: Some(category.to_string()),
                };

                if let Err(e) = products.register(request).await {
                    eprintln!("Failed to insert {}{}: {}", product_name, variant, e);
                    continue;
                }

                generated += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    info!(generated, "Seed complete");
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Price between R$ 1,99 and R$ 99,99 derived from the seed.
fn sample_price(seed: usize) -> Decimal {
    let cents = 199 + ((seed * 1733) % 9800) as i64;
    Decimal::new(cents, 2)
}
