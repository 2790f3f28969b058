//! Fold joined, namespaced rows back into per-parent arrays.


use crate::{
    namespace::{GRANDCHILD_NAMESPACE, Namespace, NamespacedKey},
    obs::sink::{self, MetricsEvent},
    row::Row,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// PopulateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PopulateError {
    #[error("populate {field} must be non-empty")]
    EmptyKey { field: &'static str },
}

///
/// PopulateRequest
///
/// `child_rows` is an already-joined row set (see `join`). Rows are grouped
/// onto a parent when their `parent_pk` column equals the parent's.
/// `fk_to_child` names the joined column that holds the child's key, and
/// `child_pk` the child's natural primary key (a namespaced spelling such as
/// `..id` is accepted and reduced to `id`).
///

#[derive(Clone, Debug)]
pub struct PopulateRequest<'a> {
    pub alias: &'a str,
    pub child_rows: &'a [Row],
    pub parent_pk: &'a str,
    pub child_pk: &'a str,
    pub fk_to_child: &'a str,
    pub child_namespace: Namespace,
}

///
/// Attach `request.alias` to every parent row.
///
/// This is the one operation that writes to its input: `parent_rows` is
/// owned by the caller for the duration of one query. `child_rows` is only
/// read; every attached child is a fresh copy. A parent without children gets
/// an empty list, never a missing key.
///
pub fn populate(parent_rows: &mut [Row], request: &PopulateRequest<'_>) -> Result<(), PopulateError> {
    validate(request)?;

    let natural_pk = NamespacedKey::parse(request.child_pk).key;
    let pk_probe = request.child_namespace.qualify(&natural_pk);

    let mut attached = 0u64;
    let mut dropped = 0u64;

    for parent_row in parent_rows.iter_mut() {
        let mut children = Vec::new();

        if let Some(group_key) = parent_row.get(request.parent_pk) {
            let associated = request.child_rows.iter().filter(|row| {
                row.get(request.parent_pk)
                    .is_some_and(|value| value.strict_eq(group_key))
            });

            for row in associated {
                match shape_child(row, request.fk_to_child, &natural_pk, &pk_probe) {
                    Some(child) => children.push(Value::from(child)),
                    None => dropped += 1,
                }
            }
        }

        attached += children.len() as u64;
        parent_row.insert(request.alias.to_string(), Value::List(children));
    }

    tracing::trace!(
        alias = request.alias,
        parents = parent_rows.len(),
        attached,
        dropped,
        "populate finished"
    );
    sink::record(MetricsEvent::Populate {
        alias: request.alias,
        parent_rows: parent_rows.len() as u64,
        attached_children: attached,
        placeholders_dropped: dropped,
    });

    Ok(())
}

fn validate(request: &PopulateRequest<'_>) -> Result<(), PopulateError> {
    let fields = [
        ("alias", request.alias),
        ("parent_pk", request.parent_pk),
        ("child_pk", request.child_pk),
        ("fk_to_child", request.fk_to_child),
    ];

    for (field, value) in fields {
        if value.is_empty() {
            return Err(PopulateError::EmptyKey { field });
        }
    }

    Ok(())
}

// Turn one joined row into a child record, or None for a left-outer
// placeholder (a row without a non-null namespaced child primary key).
fn shape_child(row: &Row, fk_to_child: &str, natural_pk: &str, pk_probe: &str) -> Option<Row> {
    row.present(pk_probe)?;

    // rows that passed through two chained joins carry `..` keys; keep only
    // the deepest hop so the junction's own columns do not leak through
    let depth = if row.keys().any(|key| key.starts_with(GRANDCHILD_NAMESPACE)) {
        Namespace::grandchild()
    } else {
        Namespace::child()
    };

    let mut child: Row = row
        .iter()
        .filter_map(|(key, value)| {
            depth
                .strip(key)
                .map(|natural| (natural.to_string(), value.clone()))
        })
        .collect();

    if let Some(pk_value) = row.present(fk_to_child) {
        child.insert(natural_pk.to_string(), pk_value.clone());
    }

    Some(child)
}
