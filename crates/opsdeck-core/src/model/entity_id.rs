// ── Core identity type ──
//
// EntityId is the key every synchronized resource is stored under.
// Server-assigned ids are opaque strings; entities created locally get
// a provisional `tmp-N` id until the server responds with a real one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PROVISIONAL_PREFIX: &str = "tmp-";

/// Canonical identifier for any console entity.
///
/// Wraps the server's opaque string id. Ids minted locally for
/// optimistic creates carry the `tmp-` prefix and are replaced once the
/// server acknowledges the entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a provisional id for an entity the server has not seen yet.
    pub fn provisional(seq: u64) -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{seq}"))
    }

    /// Returns `true` if this id was minted locally and is still
    /// awaiting a server-assigned replacement.
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
