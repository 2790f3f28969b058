use crate::{
    join::{JoinError, KeyRole},
    namespace::Namespace,
    row::Row,
};

///
/// Compare one parent row and one child row on a key pair.
///
/// Returns `Ok(None)` on mismatch. On a match the merged row holds every child
/// key prefixed by `namespace`, then every parent key unprefixed; parent
/// values win on any collision. Neither input is touched.
///
pub fn try_join(
    parent_row: &Row,
    child_row: &Row,
    parent_key: &str,
    child_key: &str,
    namespace: &Namespace,
) -> Result<Option<Row>, JoinError> {
    validate_key(parent_key, KeyRole::Parent)?;
    validate_key(child_key, KeyRole::Child)?;

    Ok(merge_on_match(
        parent_row, child_row, parent_key, child_key, namespace,
    ))
}

pub(super) fn validate_key(key: &str, role: KeyRole) -> Result<(), JoinError> {
    if key.is_empty() {
        return Err(JoinError::EmptyKey { role });
    }

    Ok(())
}

// Key validation is the caller's job; the engine checks once per join.
pub(super) fn merge_on_match(
    parent_row: &Row,
    child_row: &Row,
    parent_key: &str,
    child_key: &str,
    namespace: &Namespace,
) -> Option<Row> {
    // an absent key is not a value and never matches
    let child_value = child_row.get(child_key)?;
    let parent_value = parent_row.get(parent_key)?;
    if !child_value.strict_eq(parent_value) {
        return None;
    }

    // start from the namespaced child fields
    let mut merged: Row = child_row
        .iter()
        .map(|(key, value)| (namespace.qualify(key), value.clone()))
        .collect();

    // then overwrite with the unprefixed parent fields
    for (key, value) in parent_row {
        merged.insert(key.clone(), value.clone());
    }

    Some(merged)
}
