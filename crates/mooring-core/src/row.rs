use crate::value::Value;
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Row
///
/// One physical record as returned by an adapter: column name → value.
/// Join and populate always build new rows; inputs are never written to,
/// apart from the alias key `populate` attaches to its parent rows.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, Deserialize, IntoIterator, PartialEq, Serialize,
)]
#[into_iterator(owned, ref)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert, mostly for fixtures.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Return the value under `key` unless it is absent or null.
    #[must_use]
    pub fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Value>> for Row {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Row> for Value {
    fn from(row: Row) -> Self {
        Self::Map(row.0)
    }
}

/// Build a [`Row`] from `key => value` pairs.
#[macro_export]
macro_rules! row {
    () => {
        $crate::row::Row::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut row = $crate::row::Row::new();
        $(
            row.insert(
                ::std::string::String::from($key),
                $crate::value::Value::from($value),
            );
        )+
        row
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_kept_in_canonical_order() {
        let row: Row = serde_json::from_str(r#"{ "subject": "hi", "id": 10, "from": 1 }"#)
            .expect("row should deserialize");

        let columns: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["from", "id", "subject"]);
        assert_eq!(
            serde_json::to_string(&row).expect("row should serialize"),
            r#"{"from":1,"id":10,"subject":"hi"}"#
        );
    }
}
