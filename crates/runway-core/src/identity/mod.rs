//! Runner identity generation.
//!
//! A [`IdSource`] proposes candidates; [`IdentityGenerator`] validates each one as a DNS label
//! and retries a bounded number of times before giving up.
mod error;
pub use error::IdentityError;

mod source;
pub use source::{AlphaSource, IdSource, UuidSource};

use std::sync::Arc;

use runway_model::{IdentityPolicy, IdentityStrategy, RunnerId};
use tracing::{debug, trace};

/// Validating front of an [`IdSource`].
#[derive(Clone)]
pub struct IdentityGenerator {
    source: Arc<dyn IdSource>,
    max_attempts: u32,
}

impl IdentityGenerator {
    /// Generator using the strategy and attempt bound of the given policy.
    pub fn from_policy(policy: &IdentityPolicy) -> Self {
        let source: Arc<dyn IdSource> = match policy.strategy {
            IdentityStrategy::Alpha => Arc::new(AlphaSource::new(policy.length)),
            IdentityStrategy::Uuid => Arc::new(UuidSource),
        };
        Self::with_source(source, policy.max_attempts)
    }

    /// Generator over a custom candidate source.
    pub fn with_source(source: Arc<dyn IdSource>, max_attempts: u32) -> Self {
        Self {
            source,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Draw candidates until one is a valid runner id.
    ///
    /// Never blocks on I/O. Uniqueness against live runners is probabilistic; the control
    /// plane's create-if-absent semantics catch the rare collision later.
    pub fn generate(&self) -> Result<RunnerId, IdentityError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.candidate();
            match RunnerId::new(candidate) {
                Ok(id) => {
                    trace!(runner = %id, attempt, source = self.source.name(), "generated runner id");
                    return Ok(id);
                }
                Err(e) => debug!(attempt, error = %e, "discarding invalid runner id candidate"),
            }
        }
        Err(IdentityError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::from_policy(&IdentityPolicy::default())
    }
}

impl std::fmt::Debug for IdentityGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityGenerator")
            .field("source", &self.source.name())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use runway_model::{MAX_RUNNER_ID_LEN, is_dns_label};
    use std::collections::{HashSet, VecDeque};

    /// Replays a fixed list of candidates, then repeats the last one.
    struct Scripted(Mutex<VecDeque<String>>);

    impl Scripted {
        fn new(items: &[&str]) -> Arc<Self> {
            Arc::new(Self(Mutex::new(items.iter().map(|s| s.to_string()).collect())))
        }
    }

    impl IdSource for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn candidate(&self) -> String {
            let mut q = self.0.lock();
            if q.len() > 1 {
                q.pop_front().unwrap_or_default()
            } else {
                q.front().cloned().unwrap_or_default()
            }
        }
    }

    #[test]
    fn alpha_ids_are_valid_dns_labels() {
        let generator = IdentityGenerator::default();
        for _ in 0..1_000 {
            let id = generator.generate().unwrap();
            assert_eq!(id.as_str().len(), 10);
            assert!(id.as_str().bytes().all(|b| b.is_ascii_lowercase()));
            assert!(is_dns_label(id.as_str()));
        }
    }

    #[test]
    fn uuid_ids_are_valid_dns_labels() {
        let generator = IdentityGenerator::from_policy(&IdentityPolicy {
            strategy: IdentityStrategy::Uuid,
            ..Default::default()
        });
        for _ in 0..1_000 {
            let id = generator.generate().unwrap();
            assert_eq!(id.as_str().len(), 33);
            assert!(id.as_str().len() <= MAX_RUNNER_ID_LEN);
            assert!(is_dns_label(id.as_str()));
        }
    }

    #[test]
    fn consecutive_ids_differ() {
        let generator = IdentityGenerator::default();
        let ids: HashSet<_> = (0..500).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn invalid_candidates_are_regenerated() {
        let generator = IdentityGenerator::with_source(Scripted::new(&["Bad", "9bad", "good"]), 3);
        assert_eq!(generator.generate().unwrap().as_str(), "good");
    }

    #[test]
    fn exhaustion_after_bounded_attempts() {
        let generator = IdentityGenerator::with_source(Scripted::new(&["NOPE"]), 4);
        match generator.generate() {
            Err(IdentityError::Exhausted { attempts }) => assert_eq!(attempts, 4),
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let generator = IdentityGenerator::with_source(Scripted::new(&["ok"]), 0);
        assert!(generator.generate().is_ok());
    }
}
