use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for observability
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total single predictions served
    pub predictions_total: AtomicU64,
    /// Total batch requests served
    pub batch_requests_total: AtomicU64,
    /// Total worker records processed across batch requests
    pub batch_records_total: AtomicU64,
    /// Requests rejected by payload validation
    pub validation_failures_total: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_predictions(&self) {
        self.predictions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_batch(&self, records: u64) {
        self.batch_requests_total.fetch_add(1, Ordering::Relaxed);
        self.batch_records_total.fetch_add(records, Ordering::Relaxed);
    }

    pub fn inc_validation_failures(&self) {
        self.validation_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format
    pub fn prometheus(&self, model_loaded: bool, uptime_seconds: i64) -> String {
        format!(
            r#"# HELP gigstress_up Whether the model is loaded and serving (1=yes, 0=no)
# TYPE gigstress_up gauge
gigstress_up {}

# HELP gigstress_uptime_seconds Uptime in seconds
# TYPE gigstress_uptime_seconds counter
gigstress_uptime_seconds {}

# HELP gigstress_predictions_total Total single predictions served
# TYPE gigstress_predictions_total counter
gigstress_predictions_total {}

# HELP gigstress_batch_requests_total Total batch prediction requests served
# TYPE gigstress_batch_requests_total counter
gigstress_batch_requests_total {}

# HELP gigstress_batch_records_total Total worker records processed in batches
# TYPE gigstress_batch_records_total counter
gigstress_batch_records_total {}

# HELP gigstress_validation_failures_total Requests rejected by payload validation
# TYPE gigstress_validation_failures_total counter
gigstress_validation_failures_total {}
"#,
            if model_loaded { 1 } else { 0 },
            uptime_seconds,
            self.predictions_total.load(Ordering::Relaxed),
            self.batch_requests_total.load(Ordering::Relaxed),
            self.batch_records_total.load(Ordering::Relaxed),
            self.validation_failures_total.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::new();
        metrics.inc_predictions();
        metrics.inc_predictions();
        metrics.inc_batch(5);
        metrics.inc_validation_failures();

        assert_eq!(metrics.predictions_total.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.batch_requests_total.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.batch_records_total.load(Ordering::Relaxed), 5);
        assert_eq!(metrics.validation_failures_total.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn prometheus_export_names_every_series() {
        let metrics = Metrics::new();
        metrics.inc_predictions();
        let text = metrics.prometheus(true, 42);
        assert!(text.contains("gigstress_up 1"));
        assert!(text.contains("gigstress_uptime_seconds 42"));
        assert!(text.contains("gigstress_predictions_total 1"));
        assert!(text.contains("gigstress_validation_failures_total 0"));
    }
}
