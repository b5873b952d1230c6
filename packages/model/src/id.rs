use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter; keeps ids unique even when two are minted
/// within the same microsecond.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier of a block, grid image or section.
///
/// Ids are never reused: every constructor mints a fresh one and moves
/// carry the existing id along.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Mint a new id: `{prefix}-{timestamp_micros}-{seq}-{suffix}`
    pub fn generate(prefix: &str) -> Self {
        let micros = Utc::now().timestamp_micros();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
        Self(format!("{}-{}-{}-{:04}", prefix, micros, seq, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for BlockId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BlockId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
