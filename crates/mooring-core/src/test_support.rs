//! Shared fixtures for integrator tests.

use crate::{row, row::Row, value::Value};

/// Messages, one of which (`id: 30`) has no sender.
pub(crate) fn messages() -> Vec<Row> {
    vec![
        row! { "id" => 10, "from" => 1, "subject" => "hello" },
        row! { "id" => 20, "from" => 1, "subject" => "again" },
        row! { "id" => 30, "from" => Value::Null, "subject" => "anonymous" },
    ]
}

/// Junction rows linking message 10 to users 2 and 3.
pub(crate) fn message_recipients() -> Vec<Row> {
    vec![
        row! { "message_id" => 10, "user_id" => 2 },
        row! { "message_id" => 10, "user_id" => 3 },
    ]
}

pub(crate) fn users() -> Vec<Row> {
    vec![
        row! { "id" => 1, "name" => "ada" },
        row! { "id" => 2, "name" => "brendan" },
        row! { "id" => 3, "name" => "grace" },
    ]
}

/// Extract the list attached under `alias`, panicking with context otherwise.
pub(crate) fn attached<'a>(row: &'a Row, alias: &str) -> &'a [Value] {
    row.get(alias)
        .and_then(Value::as_list)
        .unwrap_or_else(|| panic!("row should carry a list under '{alias}': {row:?}"))
}
