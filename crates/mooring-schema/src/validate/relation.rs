use crate::{
    err,
    error::ErrorTree,
    node::{Attribute, CollectionSchema},
};

// Relation declarations must name their targets.
pub fn validate_relation_markers(collection: &CollectionSchema, errs: &mut ErrorTree) {
    for (name, attribute) in &collection.attributes {
        match attribute {
            Attribute::BelongsTo(belongs_to) if belongs_to.model.is_empty() => {
                err!(errs.route(name), "model target is empty");
            }
            Attribute::HasMany(has_many) => {
                if has_many.collection.is_empty() {
                    err!(errs.route(name), "collection target is empty");
                }
                if has_many.via.as_deref().is_some_and(str::is_empty) {
                    err!(errs.route(name), "via is empty");
                }
                if has_many.through.as_deref() == Some(collection.identity.as_str()) {
                    err!(errs.route(name), "cannot go through its own collection");
                }
            }
            Attribute::ForeignKey(fk) if fk.references.is_empty() || fk.on.is_empty() => {
                err!(errs.route(name), "foreign key needs both references and on");
            }
            _ => {}
        }
    }
}

// Resolved dictionaries carry no belongs-to markers, and every junction holds
// exactly the two foreign keys that bridge its pair.
pub fn validate_resolved_relations(collection: &CollectionSchema, errs: &mut ErrorTree) {
    for (name, attribute) in &collection.attributes {
        if let Attribute::BelongsTo(belongs_to) = attribute {
            err!(
                errs.route(name),
                "unresolved belongs-to reference to '{}'",
                belongs_to.model
            );
        }
    }

    if collection.junction_table {
        let foreign_keys = collection
            .attributes
            .values()
            .filter(|attribute| attribute.as_foreign_key().is_some())
            .count();

        if foreign_keys != 2 || collection.attributes.len() != 2 {
            err!(
                errs,
                "junction must hold exactly two foreign keys, found {foreign_keys} of {}",
                collection.attributes.len()
            );
        }
    }
}
