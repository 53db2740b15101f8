use rand::Rng;
use uuid::Uuid;

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Source of candidate runner identities.
///
/// Candidates need not be valid; [`super::IdentityGenerator`] validates and retries.
pub trait IdSource: Send + Sync {
    /// Source name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Propose one candidate.
    fn candidate(&self) -> String;
}

/// Fixed-length lowercase-letter identities drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct AlphaSource {
    len: usize,
}

impl AlphaSource {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl IdSource for AlphaSource {
    fn name(&self) -> &'static str {
        "alpha"
    }

    fn candidate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// `r` + UUIDv4 as 32 hex digits; the prefix keeps the label starting with a letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn candidate(&self) -> String {
        format!("r{}", Uuid::new_v4().simple())
    }
}
