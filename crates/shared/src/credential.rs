//! Bearer credential for the completion endpoint.

use std::fmt;
use zeroize::Zeroize;

/// API key sent as `Authorization: Bearer <token>`. Wiped on drop and
/// never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank input.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let mut raw = token.into();
        let trimmed = raw.trim().to_string();
        raw.zeroize();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
