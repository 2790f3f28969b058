use crate::types::AttributeType;
use derive_more::From;
use serde::{Deserialize, Serialize};

///
/// Attribute
///
/// Normalized attribute descriptor. `BelongsTo` only exists before the
/// belongs-to pass; every finalized dictionary carries `ForeignKey` instead.
///

#[derive(Clone, Debug, Deserialize, Eq, From, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attribute {
    Scalar(Scalar),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
    ForeignKey(ForeignKey),
}

impl Attribute {
    /// Physical column backing this attribute, if it has one yet.
    #[must_use]
    pub fn column_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        match self {
            Self::Scalar(scalar) => Some(scalar.column_name.as_deref().unwrap_or(name)),
            Self::ForeignKey(fk) => Some(&fk.column_name),
            Self::BelongsTo(belongs_to) => belongs_to.column_name.as_deref(),
            Self::HasMany(_) => None,
        }
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        matches!(self, Self::Scalar(Scalar { primary_key: true, .. }))
    }

    #[must_use]
    pub const fn as_foreign_key(&self) -> Option<&ForeignKey> {
        match self {
            Self::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_has_many(&self) -> Option<&HasMany> {
        match self {
            Self::HasMany(has_many) => Some(has_many),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::BelongsTo(_) => "belongs_to",
            Self::HasMany(_) => "has_many",
            Self::ForeignKey(_) => "foreign_key",
        }
    }
}

///
/// Scalar
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scalar {
    #[serde(rename = "type")]
    pub ty: AttributeType,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub auto_increment: bool,
}

impl Scalar {
    #[must_use]
    pub const fn new(ty: AttributeType) -> Self {
        Self {
            ty,
            primary_key: false,
            unique: false,
            column_name: None,
            required: false,
            auto_increment: false,
        }
    }

    /// Primary keys are implicitly unique and required.
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.primary_key = true;
        self.unique = true;
        self.required = true;
        self
    }

    #[must_use]
    pub fn column(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }
}

///
/// BelongsTo
/// `{ model: "user" }` before resolution.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BelongsTo {
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

impl BelongsTo {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            column_name: None,
        }
    }
}

///
/// HasMany
///
/// A set-valued relation. With an inverse `HasMany` it is a many-to-many,
/// with an inverse foreign key a one-to-many, and with `through` it routes
/// over an explicitly declared junction collection.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HasMany {
    pub collection: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,

    #[serde(default)]
    pub dominant: bool,
}

impl HasMany {
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            via: None,
            through: None,
            dominant: false,
        }
    }

    #[must_use]
    pub fn via(mut self, via: impl Into<String>) -> Self {
        self.via = Some(via.into());
        self
    }

    #[must_use]
    pub fn through(mut self, through: impl Into<String>) -> Self {
        self.through = Some(through.into());
        self
    }

    #[must_use]
    pub const fn dominant(mut self) -> Self {
        self.dominant = true;
        self
    }
}

///
/// ForeignKey
///
/// A concrete reference column. `via` is only set on junction columns and
/// names the attribute on `references` that the column backs.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub column_name: String,

    #[serde(rename = "type")]
    pub ty: AttributeType,

    pub references: String,
    pub on: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}
