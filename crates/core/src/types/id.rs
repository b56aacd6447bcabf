//! Locally generated visitor tracking IDs.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet for the random suffix: lowercase base-36.
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix.
const SUFFIX_LEN: usize = 13;

/// A client-generated visitor tracking identifier.
///
/// Shaped as `client_{unix_millis}_{13 base-36 chars}`. This is a tracking
/// convenience, not an identity: it is not cryptographically unique and the
/// upstream visitor service never authenticates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Generate a fresh tracking ID from the current time and a random
    /// base-36 suffix.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..SUFFIX_ALPHABET.len());
                char::from(SUFFIX_ALPHABET[idx])
            })
            .collect();
        Self(format!("client_{millis}_{suffix}"))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ClientId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
