//! MacroMenu
//!
//! An MCP server that generates meals matching macro-nutrient targets.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use macromenu::build_info;
use macromenu::catalog::Catalog;
use macromenu::config::AppConfig;
use macromenu::db::Database;
use macromenu::engine::MenuGenerator;
use macromenu::mcp::MacroMenuService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("macromenu=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = AppConfig::from_env();

    // Load the food catalog
    let catalog = Catalog::load_or_builtin(config.catalog_path())?;
    let catalog_source = config
        .catalog_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "builtin".to_string());
    eprintln!(
        "Catalog: {} ({} foods, {} anchors)",
        catalog_source,
        catalog.nutrients.len(),
        catalog.compatibility.len()
    );

    // Open the saved meal database (creates the directory and runs migrations)
    eprintln!("Database path: {}", config.database_path.display());
    let database = Database::open(&config.database_path)?;

    let generator = MenuGenerator::new(catalog.into(), config.engine.clone());
    tracing::info!(max_attempts = generator.config().max_attempts, "generator ready");

    // Create the MacroMenu service
    let service = MacroMenuService::new(config.database_path.clone(), database, generator, catalog_source);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
