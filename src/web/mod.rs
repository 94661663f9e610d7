//! Web layer module
//!
//! Serves the generated guide and a few companion endpoints. Handlers are thin:
//! every request reads its own copy of the guide file and runs the pure
//! transformations from [`crate::xmltv`] on it, so nothing is shared mutably
//! between requests.

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::sources::GuideSource;

pub mod handlers;
pub mod responses;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    /// `lineup_source` is only used for `dummy=` requests
    pub fn new(config: Arc<Config>, lineup_source: Arc<dyn GuideSource>) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = create_router(AppState {
            config,
            lineup_source,
        });

        Ok(Self { app, addr })
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Create the router with all routes and middleware.
///
/// GET routes answer HEAD as well, which Plex relies on.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/epg.xml", get(handlers::epg::serve_epg))
        .route("/xmltv.xml", get(handlers::epg::serve_epg))
        .route("/guide.xml", get(handlers::epg::serve_epg))
        .route("/lineup.json", get(handlers::lineup::serve_lineup))
        .route("/status", get(handlers::status::status))
        .route("/health", get(handlers::health::health_check))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lineup_source: Arc<dyn GuideSource>,
}
