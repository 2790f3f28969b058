use crate::{SchemaError, node::CollectionSchema};
use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// SchemaDictionary
///
/// identity → collection, ordered by identity. Read-only once built: each
/// resolution pass returns a fresh dictionary instead of editing this one.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, IntoIterator, PartialEq, Serialize)]
#[into_iterator(owned, ref)]
#[serde(transparent)]
pub struct SchemaDictionary(BTreeMap<String, CollectionSchema>);

impl SchemaDictionary {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Look up a collection referenced from `collection.attribute`.
    pub fn target(
        &self,
        collection: &str,
        attribute: &str,
        target: &str,
    ) -> Result<&CollectionSchema, SchemaError> {
        self.0
            .get(target)
            .ok_or_else(|| SchemaError::UnknownCollection {
                collection: collection.to_string(),
                attribute: attribute.to_string(),
                target: target.to_string(),
            })
    }

    /// Synthesized junction collections.
    pub fn junctions(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.0.values().filter(|collection| collection.junction_table)
    }

    /// The junction backing `identity.attribute`, found through the `via` tag
    /// on its foreign-key columns.
    #[must_use]
    pub fn junction_for(&self, identity: &str, attribute: &str) -> Option<&CollectionSchema> {
        self.junctions().find(|junction| {
            junction
                .foreign_keys_to(identity)
                .any(|(_, fk)| fk.via.as_deref() == Some(attribute))
        })
    }

    pub(crate) fn insert(&mut self, collection: CollectionSchema) -> Option<CollectionSchema> {
        self.0.insert(collection.identity.clone(), collection)
    }
}

impl FromIterator<CollectionSchema> for SchemaDictionary {
    fn from_iter<I: IntoIterator<Item = CollectionSchema>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|collection| (collection.identity.clone(), collection))
                .collect(),
        )
    }
}
