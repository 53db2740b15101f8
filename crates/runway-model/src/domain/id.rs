use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Maximum length of a DNS label, and therefore of a runner id.
pub const MAX_RUNNER_ID_LEN: usize = 63;

/// Identity of one runner.
///
/// The same string names the workload, the service and the route, is the value of the
/// `id` label, and is the leftmost label of the public hostname. It is therefore restricted
/// to the intersection of both grammars: an RFC 1035 label (`[a-z]([-a-z0-9]*[a-z0-9])?`,
/// at most 63 characters). Construction always validates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct RunnerId(String);

impl RunnerId {
    /// Validate and wrap a candidate identity.
    pub fn new(s: impl Into<String>) -> ModelResult<Self> {
        Self::try_from(s.into())
    }

    /// Returns the identity as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `s` is an RFC 1035 label: starts with a lowercase letter,
/// contains only lowercase alphanumerics and `-`, does not end with `-`, 1–63 chars.
///
/// This is the grammar Kubernetes enforces for service names, so it is also the strictest
/// name any bundle member needs.
pub fn is_dns_label(s: &str) -> bool {
    label_violation(s).is_none()
}

/// Returns `true` if `s` is an RFC 1123 label (like [`is_dns_label`] but may start with a digit).
///
/// Namespaces follow this grammar.
pub fn is_resource_name(s: &str) -> bool {
    let bytes = s.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= MAX_RUNNER_ID_LEN
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes[0] != b'-'
        && bytes[bytes.len() - 1] != b'-'
}

fn label_violation(s: &str) -> Option<&'static str> {
    let bytes = s.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return Some("must not be empty");
    };
    if bytes.len() > MAX_RUNNER_ID_LEN {
        return Some("must be at most 63 characters");
    }
    if !first.is_ascii_lowercase() {
        return Some("must start with a lowercase letter");
    }
    if *last == b'-' {
        return Some("must not end with '-'");
    }
    if !bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
    {
        return Some("must contain only lowercase letters, digits and '-'");
    }
    None
}

impl TryFrom<String> for RunnerId {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match label_violation(&s) {
            None => Ok(Self(s)),
            Some(reason) => Err(ModelError::InvalidRunnerId { id: s, reason }),
        }
    }
}

impl FromStr for RunnerId {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<RunnerId> for String {
    fn from(id: RunnerId) -> Self {
        id.0
    }
}

impl AsRef<str> for RunnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
