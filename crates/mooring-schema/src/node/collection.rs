use crate::node::{Attribute, ForeignKey, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// CollectionSchema
///
/// One registered collection. Attributes are keyed by name, which makes names
/// unique per collection. `junction_table` is only set on synthesized entries.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    pub identity: String,
    pub attributes: BTreeMap<String, Attribute>,

    #[serde(default)]
    pub junction_table: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

impl CollectionSchema {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: impl Into<Attribute>) -> Self {
        self.attributes.insert(name.into(), attribute.into());
        self
    }

    #[must_use]
    pub fn on_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Return the first primary key attribute, by name.
    #[must_use]
    pub fn primary_key(&self) -> Option<(&str, &Scalar)> {
        self.attributes.iter().find_map(|(name, attribute)| match attribute {
            Attribute::Scalar(scalar) if scalar.primary_key => Some((name.as_str(), scalar)),
            _ => None,
        })
    }

    /// Physical column of the primary key.
    #[must_use]
    pub fn primary_key_column(&self) -> Option<&str> {
        self.primary_key()
            .map(|(name, scalar)| scalar.column_name.as_deref().unwrap_or(name))
    }

    /// Foreign keys pointing at `identity`, in attribute-name order.
    pub fn foreign_keys_to<'a>(
        &'a self,
        identity: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a ForeignKey)> + 'a {
        self.attributes.iter().filter_map(move |(name, attribute)| {
            attribute
                .as_foreign_key()
                .filter(|fk| fk.references == identity)
                .map(|fk| (name.as_str(), fk))
        })
    }
}
