//! Backend bootstrap: initializes the database schema and seeds reference
//! data (users and approval groups) from config.toml.

use propdesk::{config, errors::Result};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and create tables
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed reference data when a config.toml is present
    match config::seed::load_default_config() {
        Ok(seed_config) => {
            config::seed::seed_reference_data(&db, &seed_config).await?;
            info!("Reference data seeded successfully.");
        }
        Err(e) => {
            warn!("No seed configuration loaded: {e}");
        }
    }

    info!("Bootstrap complete.");
    Ok(())
}
