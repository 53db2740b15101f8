use crate::metrics::backend::{MetricsBackend, ProvisionOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_provision_started(&self) {}

    #[inline(always)]
    fn record_provision_completed(&self, _: ProvisionOutcome, _: u64) {}

    #[inline(always)]
    fn record_control_plane_error(&self, _: &str, _: &str) {}

    #[inline(always)]
    fn record_orphaned_resource(&self, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }

    #[test]
    fn noop_can_be_called_repeatedly() {
        let metrics = NoOpMetrics;
        for _ in 0..1000 {
            metrics.record_provision_started();
            metrics.record_provision_completed(ProvisionOutcome::Committed, 100);
            metrics.record_control_plane_error("route", "transport");
            metrics.record_orphaned_resource("service");
        }
    }
}
