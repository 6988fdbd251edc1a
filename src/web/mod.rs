//! Web front-end: form page, training trigger and prediction

pub mod api;
pub mod error;
pub mod handlers;
pub mod state;
pub mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

pub use api::create_router;
pub use error::WebError;
pub use state::AppState;

use crate::utils::error::{MlopsError, Result};

/// Bind `host:port` and serve until ctrl+c.
pub async fn run_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse().map_err(|_| {
        MlopsError::InvalidConfigValueError {
            field: "server.host".to_string(),
            value: host.to_string(),
            reason: "Not a valid listen address".to_string(),
        }
    })?;

    let app = create_router(Arc::new(state));
    let start_time = chrono::Utc::now();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        started_at = %start_time.to_rfc3339(),
        "🚀 Server listening"
    );
    info!(url = %format!("http://{}", addr), "Web UI available");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c, shutdown signal disabled");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
