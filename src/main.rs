use dotenvy::dotenv;
use invoice_desk::{
    api::{self, AppState},
    config::{database, settings},
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application settings
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Serve
    let app = api::router(
        AppState::new(Arc::new(db), &settings),
        settings.server.static_dir.as_deref(),
    );
    let listener = tokio::net::TcpListener::bind(settings.server.bind_address.as_str())
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", settings.server.bind_address, e))?;

    info!(
        "Invoice API listening on http://{}",
        settings.server.bind_address
    );
    axum::serve(listener, app).await?;

    Ok(())
}
