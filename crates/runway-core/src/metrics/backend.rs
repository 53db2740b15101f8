use std::sync::Arc;

/// Terminal outcome of one provisioning request, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// All three members exist.
    Committed,
    /// A create failed and every created member was removed again.
    RolledBack,
    /// A create failed and at least one member could not be removed.
    Orphaned,
    /// No valid identity could be generated; nothing was attempted.
    Exhausted,
}

impl ProvisionOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ProvisionOutcome::Committed => "committed",
            ProvisionOutcome::RolledBack => "rolled_back",
            ProvisionOutcome::Orphaned => "orphaned",
            ProvisionOutcome::Exhausted => "exhausted",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that a provisioning request started.
    fn record_provision_started(&self);
    /// Record the terminal outcome of a provisioning request and its wall time.
    ///
    /// # Arguments
    /// - `outcome`: How the request terminated
    /// - `duration_ms`: Time from start to terminal state in milliseconds
    fn record_provision_completed(&self, outcome: ProvisionOutcome, duration_ms: u64);
    /// Record a failed control-plane call.
    ///
    /// # Arguments
    /// - `resource`: Bundle member kind (`workload`, `service`, `route`)
    /// - `error_kind`: Error category (`already_exists`, `transport`, ...)
    fn record_control_plane_error(&self, resource: &str, error_kind: &str);
    /// Record a member left behind by a failed rollback.
    fn record_orphaned_resource(&self, resource: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
