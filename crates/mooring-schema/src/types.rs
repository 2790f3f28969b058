use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// AttributeType
///
/// Primitive column types. Lower-case on the wire; shorthand definitions such
/// as `"String"` are accepted case-insensitively through `FromStr`.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Array,
    Binary,
    Boolean,
    Date,
    Datetime,
    Email,
    Float,
    Integer,
    Json,
    String,
    Text,
    Uuid,
}

impl AttributeType {
    pub const ALL: [Self; 12] = [
        Self::Array,
        Self::Binary,
        Self::Boolean,
        Self::Date,
        Self::Datetime,
        Self::Email,
        Self::Float,
        Self::Integer,
        Self::Json,
        Self::String,
        Self::Text,
        Self::Uuid,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Email => "email",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Json => "json",
            Self::String => "string",
            Self::Text => "text",
            Self::Uuid => "uuid",
        }
    }

    /// Types that may back a primary key (and therefore a foreign key).
    #[must_use]
    pub const fn is_keyable(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::String | Self::Text | Self::Uuid | Self::Email
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == lowered)
            .ok_or_else(|| format!("unknown attribute type '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("String".parse::<AttributeType>(), Ok(AttributeType::String));
        assert_eq!(" UUID ".parse::<AttributeType>(), Ok(AttributeType::Uuid));
        assert!("money".parse::<AttributeType>().is_err());
    }

    #[test]
    fn wire_form_is_lowercase() {
        for ty in AttributeType::ALL {
            let json = serde_json::to_string(&ty).expect("serializes");
            assert_eq!(json, format!("\"{ty}\""));
        }
    }
}
