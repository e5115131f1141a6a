//! Ingestion outcome reporting.

use std::fmt;
use std::sync::Arc;

use crate::error::IngestionError;

use super::unified::FileKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. a rejected file extension).
    Warning,
    /// Error-level event (the upload failed to parse).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// File name or path the upload came from.
    pub source: String,
    /// Detected file kind, if detection got that far.
    pub format: Option<FileKind>,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of parsed rows.
    pub rows: usize,
    /// Number of headers.
    pub columns: usize,
}

/// Receives the outcome of every upload parsed through [`super::unified`].
///
/// All methods default to no-ops, so implementors override only what they need.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans every callback out to the wrapped observers, in insertion order.
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    /// Adds one more observer to the end of the fan-out.
    pub fn with(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl FromIterator<Arc<dyn IngestionObserver>> for CompositeObserver {
    fn from_iter<I: IntoIterator<Item = Arc<dyn IngestionObserver>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Forwards ingestion events to the `log` facade (target `dashboard_data::ingest`).
#[derive(Debug, Default)]
pub struct LogObserver;

const LOG_TARGET: &str = "dashboard_data::ingest";

impl IngestionObserver for LogObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        log::info!(
            target: LOG_TARGET,
            "parsed {} ({:?}): {} rows, {} columns",
            ctx.source,
            ctx.format,
            stats.rows,
            stats.columns
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        let level = match severity {
            IngestionSeverity::Info => log::Level::Info,
            IngestionSeverity::Warning => log::Level::Warn,
            IngestionSeverity::Error | IngestionSeverity::Critical => log::Level::Error,
        };
        log::log!(
            target: LOG_TARGET,
            level,
            "failed to parse {} ({:?}) [{:?}]: {}",
            ctx.source,
            ctx.format,
            severity,
            error
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        log::error!(
            target: LOG_TARGET,
            "ALERT {:?} while parsing {} ({:?}): {}",
            severity,
            ctx.source,
            ctx.format,
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl IngestionObserver for Counter {
        fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn composite_built_incrementally_reaches_every_observer() {
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        let composite = [a.clone() as Arc<dyn IngestionObserver>]
            .into_iter()
            .collect::<CompositeObserver>()
            .with(b.clone())
            .with(Arc::new(LogObserver));
        assert_eq!(composite.len(), 3);

        let ctx = IngestionContext {
            source: "staff.csv".to_string(),
            format: Some(FileKind::Delimited),
        };
        composite.on_success(&ctx, IngestionStats { rows: 2, columns: 1 });

        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }
}
