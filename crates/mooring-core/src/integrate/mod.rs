//! Integrator driver: turn planner join instructions plus a cache of
//! per-collection adapter rows into nested parent rows.
//!
//! Instructions are grouped by alias. A group of two hops through a junction
//! collection (many-to-many); a group of one is a direct association.


use crate::{
    join::{JoinError, JoinRequest, left_outer_join},
    namespace::Namespace,
    obs::sink::{self, MetricsEvent},
    populate::{PopulateError, PopulateRequest, populate},
    row::Row,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Adapter rows keyed by collection identity.
pub type RowCache = BTreeMap<String, Vec<Row>>;

///
/// IntegrateError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum IntegrateError {
    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("no cached rows for collection '{collection}'")]
    MissingRows { collection: String },

    #[error("integrate requires at least one join instruction")]
    NoInstructions,

    #[error(transparent)]
    Populate(#[from] PopulateError),

    #[error("alias '{alias}' has {count} join instructions, expected 1 or 2")]
    UnsupportedInstructionCount { alias: String, count: usize },
}

///
/// JoinInstruction
///
/// One hop of a populate as produced by the query planner. Collections are
/// named by identity; their rows come from the `RowCache`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInstruction {
    pub parent: String,
    pub parent_key: String,
    pub child: String,
    pub child_key: String,
    pub alias: String,

    /// Drop the raw foreign-key column once the association is attached.
    #[serde(default)]
    pub remove_parent_key: bool,

    /// The child side of this hop is a junction collection.
    #[serde(default)]
    pub junction_table: bool,
}

impl JoinInstruction {
    #[must_use]
    pub fn new(
        parent: impl Into<String>,
        parent_key: impl Into<String>,
        child: impl Into<String>,
        child_key: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            parent_key: parent_key.into(),
            child: child.into(),
            child_key: child_key.into(),
            alias: alias.into(),
            remove_parent_key: false,
            junction_table: false,
        }
    }

    #[must_use]
    pub const fn removing_parent_key(mut self) -> Self {
        self.remove_parent_key = true;
        self
    }

    #[must_use]
    pub const fn through_junction(mut self) -> Self {
        self.junction_table = true;
        self
    }
}

///
/// Integrate cached rows according to `instructions`.
///
/// The result set is a copy of the first instruction's parent rows with one
/// key attached per alias. The cache itself is never modified.
///
pub fn integrate(
    cache: &RowCache,
    instructions: &[JoinInstruction],
    primary_key: &str,
) -> Result<Vec<Row>, IntegrateError> {
    let first = instructions.first().ok_or(IntegrateError::NoInstructions)?;
    let mut results = rows_for(cache, &first.parent)?.to_vec();

    let groups = group_by_alias(instructions);
    for (alias, group) in &groups {
        match group.as_slice() {
            [to_junction, to_child] => {
                integrate_through(cache, &mut results, alias, to_junction, to_child)?;
            }
            [direct] => integrate_direct(cache, &mut results, alias, direct, primary_key)?,
            _ => {
                return Err(IntegrateError::UnsupportedInstructionCount {
                    alias: (*alias).to_string(),
                    count: group.len(),
                });
            }
        }
    }

    tracing::debug!(
        parent = %first.parent,
        aliases = groups.len(),
        rows = results.len(),
        "integrated join instructions"
    );
    sink::record(MetricsEvent::Integrate {
        aliases: groups.len() as u64,
    });

    Ok(results)
}

// Many-to-many: parent → junction → child, two chained left outer joins.
fn integrate_through(
    cache: &RowCache,
    results: &mut [Row],
    alias: &str,
    to_junction: &JoinInstruction,
    to_child: &JoinInstruction,
) -> Result<(), IntegrateError> {
    let parent_pk = to_junction.parent_key.as_str();
    let fk_to_parent = to_junction.child_key.as_str();
    let fk_to_child = Namespace::child().qualify(&to_child.parent_key);
    let child_pk = Namespace::grandchild().qualify(&to_child.child_key);

    let parent_junction = left_outer_join(&JoinRequest::new(
        rows_for(cache, &to_junction.parent)?,
        parent_pk,
        rows_for(cache, &to_junction.child)?,
        fk_to_parent,
    ))?;

    let parent_junction_child = left_outer_join(
        &JoinRequest::new(
            &parent_junction,
            &fk_to_child,
            rows_for(cache, &to_child.child)?,
            &to_child.child_key,
        )
        .with_namespace(Namespace::grandchild()),
    )?;

    populate(
        results,
        &PopulateRequest {
            alias,
            child_rows: &parent_junction_child,
            parent_pk,
            child_pk: &child_pk,
            fk_to_child: &fk_to_child,
            child_namespace: Namespace::grandchild(),
        },
    )?;

    Ok(())
}

// One hop. When the parent key is the parent's primary key this is a has-many
// (children point at the parent); otherwise the parent row holds a foreign key
// and the association is has-one / belongs-to. Joined rows carry the parent's
// columns unprefixed, so both shapes group on the parent primary key; parents
// sharing a foreign key each receive only their own match.
fn integrate_direct(
    cache: &RowCache,
    results: &mut [Row],
    alias: &str,
    instruction: &JoinInstruction,
    primary_key: &str,
) -> Result<(), IntegrateError> {
    let fk_to_child = instruction.parent_key.as_str();
    let child_pk = instruction.child_key.as_str();

    tracing::trace!(
        alias,
        has_many = fk_to_child == primary_key,
        "integrating direct association"
    );

    let parent_child = left_outer_join(&JoinRequest::new(
        rows_for(cache, &instruction.parent)?,
        fk_to_child,
        rows_for(cache, &instruction.child)?,
        child_pk,
    ))?;

    populate(
        results,
        &PopulateRequest {
            alias,
            child_rows: &parent_child,
            parent_pk: primary_key,
            child_pk,
            fk_to_child,
            child_namespace: Namespace::child(),
        },
    )?;

    // the foreign key was turned into an embedded record
    if instruction.remove_parent_key && alias != fk_to_child {
        for row in results.iter_mut() {
            row.remove(fk_to_child);
        }
    }

    Ok(())
}

fn rows_for<'a>(cache: &'a RowCache, collection: &str) -> Result<&'a [Row], IntegrateError> {
    cache
        .get(collection)
        .map(Vec::as_slice)
        .ok_or_else(|| IntegrateError::MissingRows {
            collection: collection.to_string(),
        })
}

// Group by alias, keeping first-seen alias order and instruction order.
fn group_by_alias(instructions: &[JoinInstruction]) -> Vec<(&str, Vec<&JoinInstruction>)> {
    let mut groups: Vec<(&str, Vec<&JoinInstruction>)> = Vec::new();

    for instruction in instructions {
        let alias = instruction.alias.as_str();
        match groups.iter_mut().find(|(existing, _)| *existing == alias) {
            Some((_, group)) => group.push(instruction),
            None => groups.push((alias, vec![instruction])),
        }
    }

    groups
}
