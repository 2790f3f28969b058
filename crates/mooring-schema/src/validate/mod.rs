//! Schema validation orchestration and shared helpers.

pub mod column;
pub mod naming;
pub mod primary_key;
pub mod relation;


use crate::{error::ErrorTree, node::SchemaDictionary};

/// Validate a freshly loaded dictionary, before any resolve pass.
pub fn validate_loaded(dictionary: &SchemaDictionary) -> Result<(), ErrorTree> {
    // Phase 1: per-collection structure.
    let mut errs = validate_collections(dictionary);

    // Phase 2: relation declarations.
    for (identity, collection) in dictionary {
        relation::validate_relation_markers(collection, errs.route(identity));
    }

    errs.result()
}

/// Validate a resolved dictionary. Derived foreign-key columns can only clash
/// once they exist, so column checks run again here.
pub fn validate_resolved(dictionary: &SchemaDictionary) -> Result<(), ErrorTree> {
    let mut errs = validate_collections(dictionary);

    for (identity, collection) in dictionary {
        relation::validate_resolved_relations(collection, errs.route(identity));
    }

    errs.result()
}

fn validate_collections(dictionary: &SchemaDictionary) -> ErrorTree {
    let mut errs = ErrorTree::new();

    for (identity, collection) in dictionary {
        let route = errs.route(identity);
        naming::validate_naming(collection, route);
        primary_key::validate_primary_key(collection, route);
        column::validate_unique_columns(collection, route);
    }

    errs
}
