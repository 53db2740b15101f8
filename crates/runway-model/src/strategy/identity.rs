use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::{
    MAX_RUNNER_ID_LEN,
    error::{ModelError, ModelResult},
};

/// How candidate runner identities are drawn.
///
/// Strategies:
/// - `Alpha`: fixed-length string over `a..z`. Short, memorable hostnames; with the default
///   length of 10 the space is 26^10 ≈ 1.4e14, so the chance that a new id hits one of `n`
///   live runners is about `n / 1.4e14`.
/// - `Uuid`: a v4 UUID as 32 lowercase hex digits behind an `r` prefix (33 chars, 122 random
///   bits). Collisions are negligible at any realistic scale; hostnames are long.
///
/// Whatever the strategy, every candidate is validated as a DNS label before use.
///
/// Config files may use the aliases accepted by [`FromStr`] (`letters`, `uuid4`).
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityStrategy {
    #[default]
    Alpha,
    Uuid,
}

impl FromStr for IdentityStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha" | "letters" | "" => Ok(IdentityStrategy::Alpha),
            "uuid" | "uuid4" => Ok(IdentityStrategy::Uuid),
            other => Err(ModelError::UnknownIdentityStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdentityStrategy::Alpha => "alpha",
            IdentityStrategy::Uuid => "uuid",
        })
    }
}

impl Serialize for IdentityStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IdentityStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identity generation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityPolicy {
    pub strategy: IdentityStrategy,
    /// Length of `Alpha` identities.
    pub length: usize,
    /// Candidates tried before reporting generation exhaustion.
    pub max_attempts: u32,
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self {
            strategy: IdentityStrategy::Alpha,
            length: 10,
            max_attempts: 8,
        }
    }
}

impl IdentityPolicy {
    pub fn validate(&self) -> ModelResult<()> {
        if self.strategy == IdentityStrategy::Alpha
            && !(1..=MAX_RUNNER_ID_LEN).contains(&self.length)
        {
            return Err(ModelError::InvalidPolicy(format!(
                "identity.length must be within 1..={MAX_RUNNER_ID_LEN}, got {}",
                self.length
            )));
        }
        if self.max_attempts == 0 {
            return Err(ModelError::InvalidPolicy(
                "identity.max_attempts cannot be zero".into(),
            ));
        }
        Ok(())
    }
}
