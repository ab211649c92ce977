use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{auth, complaints};
use crate::config::Config;
use crate::db::repo::Store;
use crate::service::complaints::ComplaintService;
use crate::service::users::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub complaints: ComplaintService,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let users = UserService::new(store.clone());
        let complaints = ComplaintService::new(store, users.clone());
        Self { users, complaints }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/login", get(auth::login))
        .route("/register", post(auth::register))
        .route("/submitComplaint", post(complaints::submit))
        .route("/getAllComplaintsForUser", get(complaints::list_for_user))
        .route("/getAllComplaintsForAdmin", get(complaints::list_all))
        .route("/viewComplaint", get(complaints::view))
        .route("/resolveComplaint", post(complaints::resolve))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &Config, store: Store) -> Result<()> {
    let state = Arc::new(AppState::new(store.clone()));
    let app = build_router(state);

    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {address}"))?;

    info!("Server running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("Server shutting down, closing database");
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
