//! Key namespacing for composed joins.
//!
//! Child-derived keys of a joined row are prefixed with `.` per join hop, so a
//! second chained hop produces `..` keys that stay distinguishable from the
//! first hop's. The string prefix is the exchanged format; `NamespacedKey`
//! gives the same information as an explicit depth tag.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Prefix used for the first join hop.
pub const CHILD_NAMESPACE: &str = ".";

/// Prefix used for the second, chained join hop.
pub const GRANDCHILD_NAMESPACE: &str = "..";

const MARKER: char = '.';

///
/// Namespace
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    #[must_use]
    pub fn child() -> Self {
        Self::new(CHILD_NAMESPACE)
    }

    #[must_use]
    pub fn grandchild() -> Self {
        Self::new(GRANDCHILD_NAMESPACE)
    }

    /// Namespace for the given hop depth (`1` → `.`, `2` → `..`).
    #[must_use]
    pub fn depth(depth: usize) -> Self {
        Self(MARKER.to_string().repeat(depth))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn qualify(&self, key: &str) -> String {
        format!("{}{key}", self.0)
    }

    /// Strip this namespace from the front of `key`, if present.
    #[must_use]
    pub fn strip<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.0.as_str())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::child()
    }
}

impl From<&str> for Namespace {
    fn from(prefix: &str) -> Self {
        Self::new(prefix)
    }
}

///
/// NamespacedKey
/// A row key split into its hop depth and its natural column name.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NamespacedKey {
    pub depth: usize,
    pub key: String,
}

impl NamespacedKey {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim_start_matches(MARKER);

        Self {
            depth: raw.len() - key.len(),
            key: key.to_string(),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        Namespace::depth(self.depth).qualify(&self.key)
    }
}
