use crate::{err, error::ErrorTree, node::CollectionSchema};
use std::collections::BTreeMap;

pub fn validate_unique_columns(collection: &CollectionSchema, errs: &mut ErrorTree) {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();

    for (name, attribute) in &collection.attributes {
        let Some(column) = attribute.column_name(name) else {
            continue;
        };

        if let Some(prev) = seen.insert(column, name) {
            err!(
                errs,
                "column '{column}' is used by both '{prev}' and '{name}'"
            );
        }
    }
}
