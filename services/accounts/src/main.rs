use accounts::AccountStore;
use accounts::repositories::{SESSIONS_COLLECTION, USERS_COLLECTION};
use anyhow::Result;
use common::database;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting account store");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Creates the collections and the unique email index when missing
    let _store = AccountStore::postgres(pool).await?;
    info!(
        "Account store initialized successfully ({}, {})",
        USERS_COLLECTION, SESSIONS_COLLECTION
    );

    Ok(())
}
