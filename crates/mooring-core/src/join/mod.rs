//! In-memory relational joins over adapter row sets.
//!
//! Adapters may live on different storage engines, so the integrator cannot
//! push joins down; this module performs them after the fact with a
//! nested-loop scan. Output order is parent order, then child order, and
//! downstream grouping relies on it.

mod outer;
mod partial;

#[cfg(test)]
mod tests;

use crate::{
    namespace::Namespace,
    obs::sink::{self, MetricsEvent},
    row::Row,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

// re-exports
pub use outer::Outer;
pub use partial::try_join;

///
/// JoinError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum JoinError {
    #[error("{role} must be a non-empty column name")]
    EmptyKey { role: KeyRole },

    #[error("right outer joins are not supported")]
    RightJoinUnsupported,
}

///
/// KeyRole
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum KeyRole {
    #[display("parent key")]
    Parent,

    #[display("child key")]
    Child,
}

///
/// JoinRequest
/// Borrowed join input: two row sets plus the key pair to compare.
///

#[derive(Clone, Debug)]
pub struct JoinRequest<'a> {
    pub parent: &'a [Row],
    pub parent_key: &'a str,
    pub child: &'a [Row],
    pub child_key: &'a str,
    pub child_namespace: Namespace,
    pub outer: Outer,
}

impl<'a> JoinRequest<'a> {
    /// Inner join request with the default `.` child namespace.
    #[must_use]
    pub fn new(parent: &'a [Row], parent_key: &'a str, child: &'a [Row], child_key: &'a str) -> Self {
        Self {
            parent,
            parent_key,
            child,
            child_key,
            child_namespace: Namespace::child(),
            outer: Outer::None,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.child_namespace = namespace;
        self
    }

    #[must_use]
    pub const fn with_outer(mut self, outer: Outer) -> Self {
        self.outer = outer;
        self
    }
}

///
/// JoinOptions
///
/// Owned, deserializable form of a join request. Accepts `left`/`right`
/// (and `leftKey`/`rightKey`) as aliases for the parent/child fields.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOptions {
    #[serde(alias = "left")]
    pub parent: Vec<Row>,

    #[serde(alias = "leftKey")]
    pub parent_key: String,

    #[serde(alias = "right")]
    pub child: Vec<Row>,

    #[serde(alias = "rightKey")]
    pub child_key: String,

    #[serde(default)]
    pub child_namespace: Namespace,

    #[serde(default)]
    pub outer: Outer,
}

impl JoinOptions {
    #[must_use]
    pub fn request(&self) -> JoinRequest<'_> {
        JoinRequest {
            parent: &self.parent,
            parent_key: &self.parent_key,
            child: &self.child,
            child_key: &self.child_key,
            child_namespace: self.child_namespace.clone(),
            outer: self.outer,
        }
    }
}

/// Join two row sets according to `request.outer`.
pub fn join(request: &JoinRequest<'_>) -> Result<Vec<Row>, JoinError> {
    // Rejected before any comparison work happens.
    if request.outer == Outer::Right {
        return Err(JoinError::RightJoinUnsupported);
    }
    partial::validate_key(request.parent_key, KeyRole::Parent)?;
    partial::validate_key(request.child_key, KeyRole::Child)?;

    let mut results = Vec::with_capacity(request.parent.len());
    let mut matches = 0u64;
    let mut unmatched = 0u64;

    for parent_row in request.parent {
        let mut found_match = false;

        for child_row in request.child {
            if let Some(row) = partial::merge_on_match(
                parent_row,
                child_row,
                request.parent_key,
                request.child_key,
                &request.child_namespace,
            ) {
                results.push(row);
                matches += 1;
                found_match = true;
            }
        }

        if !found_match {
            unmatched += 1;
            if request.outer == Outer::Left {
                results.push(parent_row.clone());
            }
        }
    }

    tracing::trace!(
        outer = %request.outer,
        parent_key = request.parent_key,
        child_key = request.child_key,
        namespace = %request.child_namespace,
        parents = request.parent.len(),
        children = request.child.len(),
        matches,
        unmatched,
        emitted = results.len(),
        "join finished"
    );
    sink::record(MetricsEvent::Join {
        outer: request.outer,
        parent_rows: request.parent.len() as u64,
        child_rows: request.child.len() as u64,
        matches,
        unmatched_parents: unmatched,
        rows_emitted: results.len() as u64,
    });

    Ok(results)
}

/// Inner join: only parent rows with at least one matching child survive.
pub fn inner_join(request: &JoinRequest<'_>) -> Result<Vec<Row>, JoinError> {
    join(&request.clone().with_outer(Outer::None))
}

/// Left outer join: every parent row is represented at least once.
pub fn left_outer_join(request: &JoinRequest<'_>) -> Result<Vec<Row>, JoinError> {
    join(&request.clone().with_outer(Outer::Left))
}
