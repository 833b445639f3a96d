use std::sync::Arc;

use bookslot_api::{config::ApiConfig, init_tracing};
use bookslot_core::clock::SystemClock;
use bookslot_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_level)?;

    // Create database connection pool
    info!("Connecting to database...");
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    bookslot_api::start_server(config, db_pool, Arc::new(SystemClock)).await?;

    Ok(())
}
