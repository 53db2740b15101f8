use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Resource ceilings applied to the runner container.
///
/// Every field is optional: a deployment tier without limits leaves them all `None`.
/// Values use the Kubernetes quantity syntax (`100m`, `100Mi`, `10Gi`, `0.5`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral_storage: Option<String>,
}

impl ResourceLimits {
    /// Returns `true` if no limit is configured.
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none() && self.memory.is_none() && self.ephemeral_storage.is_none()
    }

    /// Iterate configured limits as `(resource-name, quantity)` using the cluster's resource names.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("cpu", self.cpu.as_deref()),
            ("memory", self.memory.as_deref()),
            ("ephemeral-storage", self.ephemeral_storage.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    /// Check every configured value is a well-formed quantity.
    pub fn validate(&self) -> ModelResult<()> {
        for (field, value) in self.iter() {
            if !is_quantity(value) {
                return Err(ModelError::InvalidQuantity {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

const SUFFIXES: [&str; 14] = [
    "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "m", "k", "M", "G", "T", "P", "E", "",
];

/// Accepts `<digits>[.<digits>]<suffix>` with a binary or decimal SI suffix.
fn is_quantity(s: &str) -> bool {
    let Some(number) = SUFFIXES.iter().find_map(|sfx| s.strip_suffix(sfx)) else {
        return false;
    };
    let mut parts = number.splitn(2, '.');
    let int = parts.next().unwrap_or_default();
    let frac = parts.next();

    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match frac {
        None => digits(int),
        Some(frac) => digits(int) && digits(frac),
    }
}
