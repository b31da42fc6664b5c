//! HTTP surface of the point-of-sale service.
//!
//! Routes split into a public set used by the ordering page and an admin set used by
//! the back office. The admin set sits behind [`auth::require_admin`], which only
//! enforces a session when `auth.require_admin_session` is enabled.

mod auth;
mod customers;
mod error;
mod menu;
mod orders;
mod reports;

pub use error::{ApiError, ErrorBody, MessageBody};

use crate::{auth::Authenticator, core::order::TransitionPolicy, errors::Result};
use axum::{
    Json, Router,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Admin login and session checks
    pub auth: Arc<Authenticator>,
    /// How strictly order status changes are checked
    pub transition_policy: TransitionPolicy,
}

async fn health() -> Json<MessageBody> {
    MessageBody::new("ok")
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/menu", get(menu::list))
        .route("/menu/:id", get(menu::get))
        .route("/customers", post(customers::create))
        .route("/orders", post(orders::create))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session));

    let admin = Router::new()
        .route("/menu", post(menu::create))
        .route("/menu/:id", put(menu::update).delete(menu::delete))
        .route("/customers", get(customers::list))
        .route(
            "/customers/:id",
            put(customers::update).delete(customers::delete),
        )
        .route("/orders", get(orders::list))
        .route(
            "/orders/:id",
            get(orders::get)
                .put(orders::update_status)
                .delete(orders::delete),
        )
        .route("/reports/sales", get(reports::sales))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    public
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds `bind_address` and serves until Ctrl-C.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
