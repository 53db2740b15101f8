use std::sync::Arc;

use prometheus::{
    CounterVec, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use runway_core::{MetricsBackend, ProvisionOutcome};

const NAMESPACE: &str = "runway";

/// Prometheus metrics backend.
///
/// ## Metrics
/// - `runway_provisions_started_total`
/// - `runway_provisions_completed_total{outcome}`
/// - `runway_provision_duration_seconds`
/// - `runway_control_plane_errors_total{resource, error_kind}`
/// - `runway_orphaned_resources_total{resource}`
///
/// Every label is bounded: `resource` is one of three kinds, `outcome` and `error_kind`
/// are fixed enums.
#[derive(Clone)]
pub struct PrometheusMetrics {
    started: IntCounter,
    completed: CounterVec,
    duration: Histogram,
    control_plane_errors: CounterVec,
    orphaned: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let started = IntCounter::with_opts(
            Opts::new("provisions_started_total", "Provisioning requests started")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(started.clone()))?;

        let completed = CounterVec::new(
            Opts::new(
                "provisions_completed_total",
                "Provisioning requests finished, by terminal outcome",
            )
            .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(completed.clone()))?;

        let duration = Histogram::with_opts(
            HistogramOpts::new(
                "provision_duration_seconds",
                "Wall time of one provisioning request",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(duration.clone()))?;

        let control_plane_errors = CounterVec::new(
            Opts::new(
                "control_plane_errors_total",
                "Failed control-plane calls, by resource kind and error kind",
            )
            .namespace(NAMESPACE),
            &["resource", "error_kind"],
        )?;
        registry.register(Box::new(control_plane_errors.clone()))?;

        let orphaned = CounterVec::new(
            Opts::new(
                "orphaned_resources_total",
                "Resources left behind by a failed rollback",
            )
            .namespace(NAMESPACE),
            &["resource"],
        )?;
        registry.register(Box::new(orphaned.clone()))?;

        Ok(Self {
            started,
            completed,
            duration,
            control_plane_errors,
            orphaned,
            registry,
        })
    }

    /// Backend with its own private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render every metric in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.gather())
    }

    /// Content type of [`PrometheusMetrics::encode_text`].
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_provision_started(&self) {
        self.started.inc();
    }

    fn record_provision_completed(&self, outcome: ProvisionOutcome, duration_ms: u64) {
        self.completed.with_label_values(&[outcome.as_label()]).inc();
        self.duration.observe(duration_ms as f64 / 1000.0);
    }

    fn record_control_plane_error(&self, resource: &str, error_kind: &str) {
        self.control_plane_errors
            .with_label_values(&[resource, error_kind])
            .inc();
    }

    fn record_orphaned_resource(&self, resource: &str) {
        self.orphaned.with_label_values(&[resource]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn started_counter_counts() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_provision_started();
        metrics.record_provision_started();

        let families = metrics.gather();
        assert_eq!(family(&families, "runway_provisions_started_total").get_metric().len(), 1);
        assert!(metrics.encode_text().unwrap().contains("runway_provisions_started_total 2"));
    }

    #[test]
    fn completed_is_split_by_outcome() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_provision_completed(ProvisionOutcome::Committed, 120);
        metrics.record_provision_completed(ProvisionOutcome::RolledBack, 40);
        metrics.record_provision_completed(ProvisionOutcome::Committed, 80);

        let families = metrics.gather();
        assert_eq!(family(&families, "runway_provisions_completed_total").get_metric().len(), 2);
        assert_eq!(family(&families, "runway_provision_duration_seconds").get_metric().len(), 1);
        assert!(metrics.encode_text().unwrap().contains("runway_provision_duration_seconds_count 3"));
    }

    #[test]
    fn errors_and_orphans_are_labelled() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_control_plane_error("workload", "already_exists");
        metrics.record_control_plane_error("route", "transport");
        metrics.record_orphaned_resource("route");

        let families = metrics.gather();
        assert_eq!(family(&families, "runway_control_plane_errors_total").get_metric().len(), 2);
        assert_eq!(family(&families, "runway_orphaned_resources_total").get_metric().len(), 1);
    }

    #[test]
    fn text_exposition_contains_metric_names() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_provision_started();
        metrics.record_orphaned_resource("service");

        let body = metrics.encode_text().unwrap();
        assert!(body.contains("runway_provisions_started_total 1"));
        assert!(body.contains(r#"runway_orphaned_resources_total{resource="service"} 1"#));
        assert!(metrics.content_type().starts_with("text/plain"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Arc::new(Registry::new());
        PrometheusMetrics::new_with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
