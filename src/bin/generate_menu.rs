//! Utility to generate meals from the command line
//!
//! Usage: generate_menu <protein> <carbs> <fat> [count]

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use macromenu::catalog::Catalog;
use macromenu::config::AppConfig;
use macromenu::engine::MenuGenerator;
use macromenu::models::{Overrides, Target};

fn parse_grams(args: &[String], index: usize, name: &str) -> Result<f64, String> {
    let raw = args
        .get(index)
        .ok_or_else(|| format!("missing {}", name))?;
    raw.parse::<f64>()
        .map_err(|_| format!("{} must be a number, got {}", name, raw))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("macromenu=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <protein> <carbs> <fat> [count]", args[0]);
        std::process::exit(1);
    }

    let target = Target::new(
        parse_grams(&args, 1, "protein")?,
        parse_grams(&args, 2, "carbs")?,
        parse_grams(&args, 3, "fat")?,
    )?;
    let count: usize = match args.get(4) {
        Some(raw) => raw.parse()?,
        None => 1,
    };

    let config = AppConfig::from_env();
    let catalog = Catalog::load_or_builtin(config.catalog_path())?;
    let generator = MenuGenerator::new(Arc::new(catalog), config.engine);

    let meals = generator.generate_many(count, &target, &Overrides::none())?;
    let fallbacks = meals.iter().filter(|m| m.fallback).count();

    println!("{}", serde_json::to_string_pretty(&meals)?);
    eprintln!(
        "Generated {} meal(s) for {}P / {}C / {}G ({} kcal), {} fallback(s)",
        meals.len(),
        target.protein,
        target.carbohydrate,
        target.fat,
        target.calories,
        fallbacks
    );

    Ok(())
}
