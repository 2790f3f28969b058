use crate::{
    err,
    error::ErrorTree,
    node::{Attribute, CollectionSchema},
};

/// At most one primary key, and only of a type that can be referenced.
pub fn validate_primary_key(collection: &CollectionSchema, errs: &mut ErrorTree) {
    let keys: Vec<_> = collection
        .attributes
        .iter()
        .filter_map(|(name, attribute)| match attribute {
            Attribute::Scalar(scalar) if scalar.primary_key => Some((name, scalar)),
            _ => None,
        })
        .collect();

    if keys.len() > 1 {
        let names: Vec<_> = keys.iter().map(|(name, _)| name.as_str()).collect();
        err!(errs, "multiple primary keys: {}", names.join(", "));
    }

    for (name, scalar) in keys {
        if !scalar.ty.is_keyable() {
            err!(errs, "primary key '{name}' has non-key type '{}'", scalar.ty);
        }
    }
}
