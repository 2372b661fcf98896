//! festreg
//!
//! Main application entry point

use tracing::info;

use festreg::{
    config::Settings,
    database::{connection::create_pool, run_migrations, DatabaseService},
    gateway::build_gateway,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration, fail fast on missing keys
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting festreg...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Build the configured payment gateway adapter
    let gateway = build_gateway(&settings.gateway)?;
    info!(provider = gateway.provider(), "Payment gateway configured");

    // Initialize services
    info!("Initializing services...");
    let _services = ServiceFactory::new(&settings, &database_service, gateway);

    info!("festreg is ready");

    // Request handling is owned by the embedding server; keep the process
    // alive until asked to stop
    tokio::signal::ctrl_c().await?;

    info!("festreg has been shut down.");

    Ok(())
}
