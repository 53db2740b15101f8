use std::fmt;

use runway_model::RunnerId;
use tracing::debug;

/// Number of members in a runner bundle.
pub const BUNDLE_SIZE: u8 = 3;

/// Lifecycle of one bundle application.
///
/// ```text
/// Pending -> Creating(1..=3) -> Committed
///                            -> RollingBack -> RolledBack
///                                           -> OrphanedPartial
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleState {
    Pending,
    /// Creating member `n` of [`BUNDLE_SIZE`].
    Creating(u8),
    Committed,
    RollingBack,
    RolledBack,
    OrphanedPartial,
}

impl BundleState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BundleState::Committed | BundleState::RolledBack | BundleState::OrphanedPartial
        )
    }

    /// Returns `true` if `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: BundleState) -> bool {
        use BundleState::*;
        match (*self, next) {
            (Pending, Creating(1)) => true,
            (Creating(n), Creating(m)) => m == n + 1 && m <= BUNDLE_SIZE,
            (Creating(BUNDLE_SIZE), Committed) => true,
            (Creating(_), RollingBack) => true,
            (RollingBack, RolledBack | OrphanedPartial) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BundleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleState::Pending => f.write_str("pending"),
            BundleState::Creating(n) => write!(f, "creating({n}/{BUNDLE_SIZE})"),
            BundleState::Committed => f.write_str("committed"),
            BundleState::RollingBack => f.write_str("rolling-back"),
            BundleState::RolledBack => f.write_str("rolled-back"),
            BundleState::OrphanedPartial => f.write_str("orphaned-partial"),
        }
    }
}

/// Current state of one application, logging every transition.
pub(crate) struct StateTracker<'a> {
    runner: &'a RunnerId,
    state: BundleState,
}

impl<'a> StateTracker<'a> {
    pub(crate) fn new(runner: &'a RunnerId) -> Self {
        Self {
            runner,
            state: BundleState::Pending,
        }
    }

    pub(crate) fn state(&self) -> BundleState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: BundleState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal bundle transition {} -> {}",
            self.state,
            next
        );
        debug!(runner = %self.runner, from = %self.state, to = %next, "bundle state transition");
        self.state = next;
    }
}
