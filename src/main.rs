use resto_pos::{
    api::{self, AppState},
    auth::Authenticator,
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

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let db = database::create_connection(&app_config.database.url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve the API
    let auth = Authenticator::from_config(&app_config.auth);
    if !auth.is_required() {
        info!("Admin routes are open; set auth.require_admin_session to protect them.");
    }
    let state = AppState {
        db,
        auth: Arc::new(auth),
        transition_policy: app_config.orders.transition_policy,
    };

    api::serve(state, &app_config.server.bind_address).await
}
