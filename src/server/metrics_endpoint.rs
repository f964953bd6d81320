//! Prometheus scrape endpoint.
//!
//! Runs on its own OS thread with a current-thread tokio runtime so the
//! endpoint lives for the whole process, independent of the UI server's
//! runtime and shutdown.

use std::io;
use std::net::SocketAddr;
use std::thread::{self, JoinHandle};

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::{info, warn};

use super::error::ServerError;
use crate::metrics::PrometheusRecorder;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Router exposing `GET /metrics`.
pub fn metrics_router(recorder: PrometheusRecorder) -> Router {
    Router::new()
        .route("/metrics", get(scrape))
        .with_state(recorder)
}

async fn scrape(State(recorder): State<PrometheusRecorder>) -> Response {
    match recorder.gather_text() {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => ServerError::from(e).into_response(),
    }
}

/// Starts the endpoint thread on `0.0.0.0:port`.
///
/// Bind failures are logged from inside the thread; the returned error only
/// covers spawning the thread itself.
pub fn spawn_metrics_endpoint(
    recorder: PrometheusRecorder,
    port: u16,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("metrics-endpoint".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    warn!(error = %e, "failed to build metrics runtime");
                    return;
                }
            };

            runtime.block_on(async move {
                let addr = SocketAddr::from(([0, 0, 0, 0], port));
                let listener = match tokio::net::TcpListener::bind(addr).await {
                    Ok(l) => l,
                    Err(e) => {
                        warn!(%addr, error = %e, "metrics port unavailable; endpoint not started");
                        return;
                    }
                };
                info!(%addr, "metrics endpoint listening");
                if let Err(e) = axum::serve(listener, metrics_router(recorder)).await {
                    warn!(error = %e, "metrics endpoint exited");
                }
            });
        })
}
