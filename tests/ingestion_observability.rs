use std::sync::{Arc, Mutex};

use dashboard_data::IngestionError;
use dashboard_data::ingestion::{
    CompositeObserver, FileKind, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    LogObserver, ParseOptions, ingest_from_path, ingest_upload,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Option<FileKind>, IngestionStats)>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push((ctx.format, stats));
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(obs: Arc<RecordingObserver>, alert_at_or_above: IngestionSeverity) -> ParseOptions {
    ParseOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    ingest_upload("staff.csv", b"a,b\n1,2\n3,4\n", &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![(Some(FileKind::Delimited), IngestionStats { rows: 2, columns: 2 })]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
}

#[test]
fn unsupported_format_is_reported_as_warning_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Error);

    let _ = ingest_upload("slides.pptx", b"", &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn parse_error_alerts_at_error_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Error);

    let _ = ingest_upload("broken.csv", b"Name\n\xff\n", &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
}

#[test]
fn composite_fans_out_to_every_observer() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        first.clone() as Arc<dyn IngestionObserver>,
        Arc::new(LogObserver) as Arc<dyn IngestionObserver>,
    ])
    .with(second.clone());
    let opts = ParseOptions {
        observer: Some(Arc::new(composite)),
        alert_at_or_above: IngestionSeverity::Warning,
        ..Default::default()
    };

    ingest_upload("ok.csv", b"a\n1\n", &opts).unwrap();
    let _ = ingest_upload("bad.txt", b"a\n1\n", &opts).unwrap_err();

    for obs in [&first, &second] {
        assert_eq!(
            obs.successes.lock().unwrap().clone(),
            vec![(Some(FileKind::Delimited), IngestionStats { rows: 1, columns: 1 })]
        );
        assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
        assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
    }
}
