//! Boot-time association schema resolution for Mooring.
//!
//! Raw collection definitions are normalized into typed attributes, validated
//! in stages, and then resolved: `belongsTo` references become concrete
//! foreign keys and symmetric many-to-many pairs gain one synthesized junction
//! collection each. The result is an immutable `SchemaDictionary`.

pub mod build;
pub mod error;
pub mod load;
pub mod node;
pub mod resolve;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

use crate::error::ErrorTree;
use thiserror::Error as ThisError;

/// Maximum length for collection identities.
pub const MAX_IDENTITY_LEN: usize = 64;

/// Maximum length for attribute names and column names.
pub const MAX_ATTRIBUTE_NAME_LEN: usize = 64;

/// Default separator between the two sides of a junction identity.
pub const DEFAULT_JUNCTION_SEPARATOR: &str = "__";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        build::{ResolveOptions, resolve},
        err,
        error::ErrorTree,
        load::{RawAttribute, RawCollection, RawMember},
        node::*,
        types::AttributeType,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// SchemaError
///
/// Configuration errors. All of them are fatal at boot: a dictionary is either
/// fully resolved or not produced at all.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error(
        "collection '{collection}' attribute '{attribute}' has {candidates} inverse candidates on '{target}'; declare 'via'"
    )]
    AmbiguousVia {
        collection: String,
        attribute: String,
        target: String,
        candidates: usize,
    },

    #[error(
        "collection '{collection}' attribute '{attribute}' and its inverse on '{target}' are both dominant"
    )]
    DominantConflict {
        collection: String,
        attribute: String,
        target: String,
    },

    #[error("duplicate collection identity '{identity}'")]
    DuplicateIdentity { identity: String },

    #[error("collection '{collection}' attribute '{attribute}' is invalid: {reason}")]
    InvalidAttribute {
        collection: String,
        attribute: String,
        reason: String,
    },

    #[error("synthesized junction '{identity}' collides with a declared collection")]
    JunctionCollision { identity: String },

    #[error(
        "collection '{collection}' attribute '{attribute}' spans connections with '{target}'; one side must be dominant"
    )]
    MissingDominant {
        collection: String,
        attribute: String,
        target: String,
    },

    #[error("collection definition #{index} has no identity or tableName")]
    MissingIdentity { index: usize },

    #[error("collection '{collection}' has no primary key and cannot be an association target")]
    MissingPrimaryKey { collection: String },

    #[error(
        "collection '{collection}' attribute '{attribute}' goes through '{through}', which lacks foreign keys to both sides"
    )]
    ThroughMismatch {
        collection: String,
        attribute: String,
        through: String,
    },

    #[error("collection '{collection}' attribute '{attribute}' references unknown collection '{target}'")]
    UnknownCollection {
        collection: String,
        attribute: String,
        target: String,
    },

    #[error("collection '{collection}' attribute '{attribute}' is via '{target}.{via}', which does not exist")]
    UnknownVia {
        collection: String,
        attribute: String,
        target: String,
        via: String,
    },

    #[error("validation failed: {0}")]
    Validation(ErrorTree),

    #[error(
        "collection '{collection}' attribute '{attribute}' is via '{target}.{via}', which does not point back"
    )]
    ViaMismatch {
        collection: String,
        attribute: String,
        target: String,
        via: String,
    },
}

impl SchemaError {
    pub(crate) fn invalid_attribute(
        collection: &str,
        attribute: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            collection: collection.to_string(),
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }
}
