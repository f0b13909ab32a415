use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use tutorslot_api::{config::ApiConfig, ApiState};
use tutorslot_db::{create_pool, schema::initialize_database, store::PgBookingStore};
use tutorslot_mailer::{config::MailerConfig, smtp::SmtpNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    tutorslot_api::init_tracing(config.log_level)?;
    let mailer_config = MailerConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Wire the store and the mailer into the services
    let store = Arc::new(PgBookingStore::new(db_pool.clone()));
    let notifier = Arc::new(SmtpNotifier::new(&mailer_config)?);
    let state = Arc::new(ApiState::new(store, notifier, mailer_config.templates()));

    // Start API server
    tutorslot_api::start_server(config, state).await?;

    // Release database connections
    db_pool.close().await;
    info!("Database pool closed");

    Ok(())
}
