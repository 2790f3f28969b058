use derive_more::Display;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use std::fmt;

///
/// Outer
///
/// Which side of a join keeps unmatched rows.
/// On the wire this is `false`, `"left"` or `"right"`; `"right"` parses so
/// it can be rejected with a proper error at join time instead of silently
/// degrading into some other join.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum Outer {
    #[default]
    #[display("inner")]
    None,

    #[display("left")]
    Left,

    #[display("right")]
    Right,
}

impl Serialize for Outer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_bool(false),
            Self::Left => serializer.serialize_str("left"),
            Self::Right => serializer.serialize_str("right"),
        }
    }
}

impl<'de> Deserialize<'de> for Outer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OuterVisitor)
    }
}

struct OuterVisitor;

impl Visitor<'_> for OuterVisitor {
    type Value = Outer;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"false, null, "left" or "right""#)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Outer, E> {
        if v {
            Err(E::invalid_value(de::Unexpected::Bool(true), &self))
        } else {
            Ok(Outer::None)
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Outer, E> {
        Ok(Outer::None)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Outer, E> {
        match v {
            "left" => Ok(Outer::Left),
            "right" => Ok(Outer::Right),
            other => Err(E::unknown_variant(other, &["left", "right"])),
        }
    }
}
