//! Raw definition loading: the boundary where loosely shaped collection
//! definitions (shorthand types, method members, `tableName` aliases) become
//! the strict `Attribute` sum type.

#[cfg(test)]
mod tests;

use crate::{
    SchemaError,
    build::ResolveOptions,
    node::{Attribute, BelongsTo, CollectionSchema, ForeignKey, HasMany, Scalar, SchemaDictionary},
    types::AttributeType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// RawCollection
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, RawMember>,
}

impl RawCollection {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: Some(identity.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, member: impl Into<RawMember>) -> Self {
        self.attributes.insert(name.into(), member.into());
        self
    }

    #[must_use]
    pub fn on_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    // `identity` wins over the `tableName` alias; blank strings count as absent
    fn declared_identity(&self) -> Option<&str> {
        [self.identity.as_deref(), self.table_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|identity| !identity.is_empty())
    }
}

///
/// RawMember
///
/// One member of a raw definition. Untagged: a bare string is a type
/// shorthand, `{ "method": .. }` is an instance method that gets stripped,
/// and anything else is a full descriptor.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawMember {
    Shorthand(String),
    Method(RawMethod),
    Descriptor(RawAttribute),
}

impl From<&str> for RawMember {
    fn from(shorthand: &str) -> Self {
        Self::Shorthand(shorthand.to_string())
    }
}

impl From<RawAttribute> for RawMember {
    fn from(attribute: RawAttribute) -> Self {
        Self::Descriptor(attribute)
    }
}

///
/// RawMethod
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawMethod {
    pub method: String,
}

///
/// RawAttribute
/// Every descriptor key a definition may carry, all optional.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAttribute {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    pub primary_key: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    pub required: bool,
    pub auto_increment: bool,

    pub foreign_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    pub dominant: bool,
}

///
/// Build the initial dictionary from raw definitions.
///
/// Fails fast on the first definition without an identity, on a repeated
/// identity, and on a member that cannot be normalized. Cross-collection
/// checks happen later, in `validate` and the resolve passes.
///
pub fn load_collections(
    raw: &[RawCollection],
    options: &ResolveOptions,
) -> Result<SchemaDictionary, SchemaError> {
    let mut collections: BTreeMap<String, CollectionSchema> = BTreeMap::new();

    for (index, definition) in raw.iter().enumerate() {
        let identity = definition
            .declared_identity()
            .map(|identity| options.normalize_identity(identity))
            .ok_or(SchemaError::MissingIdentity { index })?;

        if collections.contains_key(&identity) {
            return Err(SchemaError::DuplicateIdentity { identity });
        }

        let mut attributes = BTreeMap::new();
        let mut stripped = 0usize;
        for (name, member) in &definition.attributes {
            match normalize_member(&identity, name, member, options)? {
                Some(attribute) => {
                    attributes.insert(name.clone(), attribute);
                }
                None => stripped += 1,
            }
        }

        tracing::trace!(
            identity = %identity,
            attributes = attributes.len(),
            stripped,
            "loaded collection definition"
        );

        collections.insert(
            identity.clone(),
            CollectionSchema {
                identity,
                attributes,
                junction_table: false,
                connection: definition.connection.clone(),
            },
        );
    }

    Ok(collections.into_values().collect())
}

// None for method members, which never reach the dictionary.
fn normalize_member(
    collection: &str,
    name: &str,
    member: &RawMember,
    options: &ResolveOptions,
) -> Result<Option<Attribute>, SchemaError> {
    match member {
        RawMember::Method(_) => Ok(None),
        RawMember::Shorthand(shorthand) => {
            let ty = parse_type(collection, name, shorthand)?;
            Ok(Some(Attribute::Scalar(Scalar::new(ty))))
        }
        RawMember::Descriptor(raw) => normalize_descriptor(collection, name, raw, options).map(Some),
    }
}

fn normalize_descriptor(
    collection: &str,
    name: &str,
    raw: &RawAttribute,
    options: &ResolveOptions,
) -> Result<Attribute, SchemaError> {
    let invalid = |reason: &str| SchemaError::invalid_attribute(collection, name, reason);

    let markers = [raw.model.is_some(), raw.collection.is_some(), raw.foreign_key]
        .into_iter()
        .filter(|set| *set)
        .count();
    if markers > 1 {
        return Err(invalid(
            "model, collection and foreignKey are mutually exclusive",
        ));
    }
    if raw.primary_key && markers > 0 {
        return Err(invalid("a relation cannot be the primary key"));
    }

    if let Some(model) = &raw.model {
        return Ok(Attribute::BelongsTo(BelongsTo {
            model: options.normalize_identity(model),
            column_name: raw.column_name.clone(),
        }));
    }

    if let Some(target) = &raw.collection {
        return Ok(Attribute::HasMany(HasMany {
            collection: options.normalize_identity(target),
            via: raw.via.clone(),
            through: raw.through.as_deref().map(|t| options.normalize_identity(t)),
            dominant: raw.dominant,
        }));
    }

    if raw.via.is_some() || raw.through.is_some() || raw.dominant {
        return Err(invalid("via, through and dominant require a collection"));
    }

    let Some(ty) = raw.ty.as_deref() else {
        return Err(invalid("attribute has no type and no relation marker"));
    };
    let ty = parse_type(collection, name, ty)?;

    if raw.foreign_key {
        let (Some(references), Some(on)) = (&raw.references, &raw.on) else {
            return Err(invalid("foreignKey requires references and on"));
        };

        return Ok(Attribute::ForeignKey(ForeignKey {
            column_name: raw.column_name.clone().unwrap_or_else(|| name.to_string()),
            ty,
            references: options.normalize_identity(references),
            on: on.clone(),
            via: None,
        }));
    }

    Ok(Attribute::Scalar(Scalar {
        ty,
        primary_key: raw.primary_key,
        unique: raw.unique || raw.primary_key,
        column_name: raw.column_name.clone(),
        required: raw.required || raw.primary_key,
        auto_increment: raw.auto_increment,
    }))
}

fn parse_type(collection: &str, name: &str, raw: &str) -> Result<AttributeType, SchemaError> {
    raw.parse()
        .map_err(|reason: String| SchemaError::invalid_attribute(collection, name, reason))
}
