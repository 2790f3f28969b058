//! Shared fixtures for schema tests.

use crate::{
    node::{BelongsTo, CollectionSchema, HasMany, Scalar, SchemaDictionary},
    types::AttributeType,
};

/// A collection with an integer `id` primary key.
pub(crate) fn keyed(identity: &str) -> CollectionSchema {
    CollectionSchema::new(identity).with_attribute("id", Scalar::new(AttributeType::Integer).primary())
}

pub(crate) fn dictionary(collections: impl IntoIterator<Item = CollectionSchema>) -> SchemaDictionary {
    collections.into_iter().collect()
}

/// `foo.bars` and `bar.foos`, each pointing at the other.
pub(crate) fn foo_bar() -> SchemaDictionary {
    dictionary([
        keyed("foo").with_attribute("bars", HasMany::new("bar").via("foos")),
        keyed("bar").with_attribute("foos", HasMany::new("foo").via("bars")),
    ])
}

/// `bar.foo` belongs to `foo`, keyed by a uuid column.
pub(crate) fn bar_belongs_to_foo() -> SchemaDictionary {
    dictionary([
        CollectionSchema::new("foo")
            .with_attribute("uuid", Scalar::new(AttributeType::Uuid).primary())
            .with_attribute("name", Scalar::new(AttributeType::String)),
        keyed("bar").with_attribute("foo", BelongsTo::new("foo")),
    ])
}
