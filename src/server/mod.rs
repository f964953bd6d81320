//! Upload web UI.
//!
//! Startup order in [`serve`]:
//! 1. Choose the metrics recorder (Prometheus or no-op, see
//!    [`ServeConfig::metrics_active`]) and start the `/metrics` thread.
//! 2. Build the axum router.
//! 3. Bind and serve until Ctrl-C / SIGTERM.
//!
//! Each upload is processed start to finish on a blocking worker; requests
//! share nothing except the metrics registry.

pub mod error;
pub mod metrics_endpoint;
pub mod pages;
mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tracing::{info, warn};

use crate::config::{AnalyzerConfig, ServeConfig, mib_to_bytes};
use crate::error::Result;
use crate::metrics::{self, NoopRecorder, SharedRecorder};
use crate::report::Analyzer;

pub use error::ServerError;
pub use metrics_endpoint::{metrics_router, spawn_metrics_endpoint};

/// Shared, read-only request state.
pub struct AppState {
    pub analyzer: Analyzer,
    pub recorder: SharedRecorder,
    pub max_upload_mb: usize,
}

impl AppState {
    pub fn new(analyzer: Analyzer, recorder: SharedRecorder, max_upload_mb: usize) -> Self {
        Self {
            analyzer: analyzer.with_recorder(recorder.clone()),
            recorder,
            max_upload_mb,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analyzer", &self.analyzer)
            .field("max_upload_mb", &self.max_upload_mb)
            .finish_non_exhaustive()
    }
}

/// Builds the complete router for the upload UI.
pub fn build(state: Arc<AppState>) -> Router {
    // multipart framing needs some headroom above the file itself
    let body_limit = mib_to_bytes(state.max_upload_mb).saturating_add(64 * 1024);
    routes::router()
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Picks the recorder for this process and starts its endpoint.
///
/// Metrics failures never stop the UI: the server falls back to
/// [`NoopRecorder`] and logs a warning.
pub fn select_recorder(config: &ServeConfig) -> SharedRecorder {
    if !config.metrics_active() {
        info!(deployment = ?config.deployment, "metrics disabled");
        return Arc::new(NoopRecorder);
    }

    match metrics::global() {
        Ok(recorder) => {
            if let Err(e) = spawn_metrics_endpoint(recorder.clone(), config.metrics_port) {
                warn!(error = %e, "failed to start metrics thread");
            }
            Arc::new(recorder.clone())
        }
        Err(e) => {
            warn!(error = %e, "failed to initialise metrics registry");
            Arc::new(NoopRecorder)
        }
    }
}

/// Runs the upload UI until a shutdown signal arrives.
pub async fn serve(config: ServeConfig, analyzer: AnalyzerConfig) -> Result<()> {
    let analyzer = analyzer.with_max_chat_bytes(config.max_chat_bytes());
    analyzer.validate()?;

    let recorder = select_recorder(&config);
    let state = Arc::new(AppState::new(
        Analyzer::new(analyzer),
        recorder,
        config.max_upload_mb,
    ));

    let app = build(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(addr = %config.bind_address, "upload UI listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
