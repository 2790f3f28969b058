use crate::{
    SchemaError,
    node::{Attribute, BelongsTo, CollectionSchema, ForeignKey, SchemaDictionary},
};
use std::collections::BTreeMap;

///
/// Replace every `BelongsTo` with a concrete `ForeignKey`.
///
/// The referenced collection must exist and have a primary key. The column is
/// the declared `columnName`, else `lower(target)_pk`; the type is copied from
/// the target's primary key. Other attributes pass through unchanged.
///
pub fn resolve_belongs_to(dictionary: &SchemaDictionary) -> Result<SchemaDictionary, SchemaError> {
    let mut resolved = Vec::with_capacity(dictionary.len());
    let mut replaced = 0usize;

    for (identity, collection) in dictionary {
        let mut next = CollectionSchema {
            attributes: BTreeMap::new(),
            ..collection.clone()
        };

        for (name, attribute) in &collection.attributes {
            let attribute = match attribute {
                Attribute::BelongsTo(belongs_to) => {
                    replaced += 1;
                    Attribute::ForeignKey(foreign_key_for(dictionary, identity, name, belongs_to)?)
                }
                other => other.clone(),
            };
            next.attributes.insert(name.clone(), attribute);
        }

        resolved.push(next);
    }

    tracing::debug!(replaced, "belongs-to pass finished");

    Ok(resolved.into_iter().collect())
}

/// Column name for a reference to `identity`'s primary key `pk`.
#[must_use]
pub fn foreign_key_column(identity: &str, pk: &str) -> String {
    format!("{}_{pk}", identity.to_lowercase())
}

fn foreign_key_for(
    dictionary: &SchemaDictionary,
    collection: &str,
    attribute: &str,
    belongs_to: &BelongsTo,
) -> Result<ForeignKey, SchemaError> {
    let target = dictionary.target(collection, attribute, &belongs_to.model)?;
    let (pk_name, pk) = target
        .primary_key()
        .ok_or_else(|| SchemaError::MissingPrimaryKey {
            collection: target.identity.clone(),
        })?;

    Ok(ForeignKey {
        column_name: belongs_to
            .column_name
            .clone()
            .unwrap_or_else(|| foreign_key_column(&target.identity, pk_name)),
        ty: pk.ty,
        references: target.identity.clone(),
        on: pk_name.to_string(),
        via: None,
    })
}
