//! Processing-step instrumentation.
//!
//! Pipeline code reports through the [`StepRecorder`] trait so the analysis
//! itself never depends on a metrics backend. [`NoopRecorder`] discards
//! everything; with the `metrics` feature, [`PrometheusRecorder`] keeps a
//! `prometheus` registry exposing:
//!
//! | metric                                       | type      | labels    |
//! |----------------------------------------------|-----------|-----------|
//! | `whatsapp_processing_duration_seconds`       | histogram | `step`    |
//! | `whatsapp_messages_parsed`                   | gauge     |           |
//! | `whatsapp_uploads_total`                     | counter   | `outcome` |
//!
//! # Example
//!
//! ```rust
//! use zapmetrics::metrics::{NoopRecorder, track};
//!
//! let total = track(&NoopRecorder, "sum", || (1..=10).sum::<u32>());
//! assert_eq!(total, 55);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Step labels used by the analyzer, in execution order.
pub const STEPS: [&str; 8] = [
    "parse_messages",
    "plot_hour_author",
    "plot_day_author",
    "plot_weekday",
    "plot_periods",
    "plot_emojis",
    "plot_wordcloud",
    "generate_bios",
];

/// How an upload ended, for the uploads counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    ArchiveError,
    DecodeError,
    Empty,
    InternalError,
}

impl UploadOutcome {
    pub fn as_label(self) -> &'static str {
        match self {
            UploadOutcome::Success => "success",
            UploadOutcome::ArchiveError => "archive_error",
            UploadOutcome::DecodeError => "decode_error",
            UploadOutcome::Empty => "empty",
            UploadOutcome::InternalError => "internal_error",
        }
    }

    /// Classifies a pipeline result.
    pub fn of<T>(result: &crate::Result<T>) -> Self {
        match result {
            Ok(_) => UploadOutcome::Success,
            Err(e) if e.is_archive_format() => UploadOutcome::ArchiveError,
            Err(e) if e.is_decode() => UploadOutcome::DecodeError,
            Err(e) if e.is_empty_result() => UploadOutcome::Empty,
            Err(_) => UploadOutcome::InternalError,
        }
    }
}

/// Sink for step timings and upload counters.
///
/// Implementations must be cheap and thread-safe; every method is called on
/// the request's worker thread.
pub trait StepRecorder: Send + Sync {
    /// Records how long one named step took.
    fn observe(&self, step: &str, elapsed: Duration);

    /// Records the message count of the latest upload.
    fn set_messages(&self, _count: usize) {}

    /// Counts a finished upload.
    fn record_upload(&self, _outcome: UploadOutcome) {}
}

/// Shared handle passed to analyzers and request handlers.
pub type SharedRecorder = Arc<dyn StepRecorder>;

/// Recorder that drops every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl StepRecorder for NoopRecorder {
    fn observe(&self, _step: &str, _elapsed: Duration) {}
}

/// Runs `f`, reporting its wall-clock time under `step`.
pub fn track<T>(recorder: &dyn StepRecorder, step: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    tracing::debug!(step, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "step finished");
    recorder.observe(step, elapsed);
    out
}

#[cfg(feature = "metrics")]
pub use self::prom::{PrometheusRecorder, global};

#[cfg(feature = "metrics")]
mod prom {
    use std::sync::OnceLock;
    use std::time::Duration;

    use prometheus::{
        Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
        TextEncoder,
    };

    use super::{StepRecorder, UploadOutcome};
    use crate::error::Result;

    /// Recorder backed by a `prometheus` registry.
    ///
    /// Cloning is cheap; clones share the same underlying metrics.
    #[derive(Clone)]
    pub struct PrometheusRecorder {
        registry: Registry,
        durations: HistogramVec,
        messages: IntGauge,
        uploads: IntCounterVec,
    }

    impl std::fmt::Debug for PrometheusRecorder {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("PrometheusRecorder").finish_non_exhaustive()
        }
    }

    impl PrometheusRecorder {
        /// Creates a recorder with its own fresh registry.
        pub fn new() -> Result<Self> {
            let registry = Registry::new();

            let durations = HistogramVec::new(
                HistogramOpts::new(
                    "whatsapp_processing_duration_seconds",
                    "Time spent in each processing step",
                ),
                &["step"],
            )?;
            let messages = IntGauge::new(
                "whatsapp_messages_parsed",
                "Messages parsed from the latest upload",
            )?;
            let uploads = IntCounterVec::new(
                Opts::new("whatsapp_uploads_total", "Uploads processed, by outcome"),
                &["outcome"],
            )?;

            registry.register(Box::new(durations.clone()))?;
            registry.register(Box::new(messages.clone()))?;
            registry.register(Box::new(uploads.clone()))?;

            Ok(Self {
                registry,
                durations,
                messages,
                uploads,
            })
        }

        /// Renders every metric in the Prometheus text exposition format.
        pub fn gather_text(&self) -> Result<String> {
            let encoder = TextEncoder::new();
            let mut buf = Vec::new();
            encoder.encode(&self.registry.gather(), &mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
    }

    impl StepRecorder for PrometheusRecorder {
        fn observe(&self, step: &str, elapsed: Duration) {
            self.durations
                .with_label_values(&[step])
                .observe(elapsed.as_secs_f64());
        }

        fn set_messages(&self, count: usize) {
            self.messages.set(i64::try_from(count).unwrap_or(i64::MAX));
        }

        fn record_upload(&self, outcome: UploadOutcome) {
            self.uploads.with_label_values(&[outcome.as_label()]).inc();
        }
    }

    static GLOBAL: OnceLock<PrometheusRecorder> = OnceLock::new();

    /// The process-wide recorder, created on first use.
    pub fn global() -> Result<&'static PrometheusRecorder> {
        if let Some(existing) = GLOBAL.get() {
            return Ok(existing);
        }
        let recorder = PrometheusRecorder::new()?;
        Ok(GLOBAL.get_or_init(|| recorder))
    }
}
