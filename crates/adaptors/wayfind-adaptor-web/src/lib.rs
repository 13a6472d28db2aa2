//! Wayfind REST adaptor
//!
//! axum-based HTTP surface over the core: auth, profile and favorites,
//! place creation, and the two search endpoints. Handlers validate
//! request bodies at the boundary and map core errors onto HTTP statuses.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::ApiState;

use tracing::info;
use wayfind_core::Result;

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// The Wayfind API server
pub struct ApiServer {
    config: WebServerConfig,
    state: ApiState,
}

impl ApiServer {
    /// Create a server over the given state
    pub fn new(config: WebServerConfig, state: ApiState) -> Self {
        Self { config, state }
    }

    /// Bind the listener and serve until ctrl-c
    pub async fn start(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Wayfind API listening on {}", addr);

        let router = build_router(self.state.clone());
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

        info!("Wayfind API shut down");
        Ok(())
    }
}
