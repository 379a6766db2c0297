//! HTTP server: routing, middleware, startup and graceful shutdown.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::{error, info, warn};
use resttodo_core::db::InitOutcome;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handlers::{create_todo, delete_todo, get_todo, list_todos, update_todo};
use crate::storage::Storage;

const INDEX_FILE: &str = "index.html";

/// Shared application state.
pub struct AppState {
    /// Per-request connection factory for the todo database.
    pub storage: Storage,
    /// Server configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Creates app state for `config`, pointing storage at its database file.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            storage: Storage::new(config.db_path.clone()),
            config,
        }
    }
}

/// Builds the full router: JSON API, landing page, static assets, CORS and
/// request logging.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/:id",
            get(get_todo)
                .put(update_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .route_service("/", ServeFile::new(static_dir.join(INDEX_FILE)))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let outcome = if status.is_server_error() { "error" } else { "ok" };
    info!(
        "event=http_request module=server status={} method={} path={} http_status={} duration_ms={}",
        outcome,
        method,
        path,
        status.as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

/// The HTTP server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// Creates the router.
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Initializes storage, then serves until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized or the
    /// listener cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let config = &self.state.config;

        match self.state.storage.init()? {
            InitOutcome::Created => info!(
                "event=server_start module=server status=ok db=created path={}",
                config.db_path.display()
            ),
            InitOutcome::Existing => info!(
                "event=server_start module=server status=ok db=existing path={}",
                config.db_path.display()
            ),
        }

        if !config.static_dir.join(INDEX_FILE).is_file() {
            warn!(
                "event=server_start module=server status=warn reason=missing_index static_dir={}",
                config.static_dir.display()
            );
        }

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(config.addr).await?;
        info!(
            "event=server_listen module=server status=ok addr={}",
            config.addr
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("event=server_stop module=server status=ok");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("event=signal_install module=server status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("event=shutdown module=server status=start signal=ctrl_c"),
        () = terminate => info!("event=shutdown module=server status=start signal=sigterm"),
    }
}
