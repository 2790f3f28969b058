use crate::{
    join::{
        JoinError, JoinOptions, JoinRequest, KeyRole, Outer, inner_join, join, left_outer_join,
        try_join,
    },
    namespace::Namespace,
    obs::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink},
    row,
    row::Row,
    test_support::{message_recipients, messages, users},
    value::Value,
};
use proptest::prelude::*;
use std::{cell::RefCell, rc::Rc};

// ---- message recipients --------------------------------------------------

#[test]
fn inner_join_keeps_only_matching_parents() {
    let parents = messages();
    let children = message_recipients();

    let rows = inner_join(&JoinRequest::new(&parents, "id", &children, "message_id"))
        .expect("inner join should succeed");

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.get("id"), Some(&Value::Int(10)));
    }
    assert_eq!(rows[0].get(".user_id"), Some(&Value::Int(2)));
    assert_eq!(rows[1].get(".user_id"), Some(&Value::Int(3)));
}

#[test]
fn left_outer_join_represents_every_parent() {
    let parents = messages();
    let children = message_recipients();

    let rows = left_outer_join(&JoinRequest::new(&parents, "id", &children, "message_id"))
        .expect("left outer join should succeed");

    let ids: Vec<_> = rows.iter().map(|row| row.get("id").cloned()).collect();
    assert_eq!(
        ids,
        vec![
            Some(Value::Int(10)),
            Some(Value::Int(10)),
            Some(Value::Int(20)),
            Some(Value::Int(30)),
        ]
    );

    // unmatched parents come through unchanged, with no child-derived keys
    assert_eq!(rows[2], parents[1]);
    assert_eq!(rows[3], parents[2]);
}

// ---- matcher -------------------------------------------------------------

#[test]
fn try_join_namespaces_child_keys_and_parent_wins() {
    let parent = row! { "id" => 10, "name" => "parent" };
    let child = row! { "message_id" => 10, "name" => "child" };

    let merged = try_join(&parent, &child, "id", "message_id", &Namespace::child())
        .expect("keys are valid")
        .expect("rows should match");

    assert_eq!(merged.get("name"), Some(&Value::from("parent")));
    assert_eq!(merged.get(".name"), Some(&Value::from("child")));
    assert_eq!(merged.get(".message_id"), Some(&Value::Int(10)));
    assert!(merged.get("message_id").is_none());
}

#[test]
fn try_join_mismatch_returns_none() {
    let parent = row! { "id" => 10 };
    let child = row! { "message_id" => "10" };

    let merged = try_join(&parent, &child, "id", "message_id", &Namespace::child())
        .expect("keys are valid");

    assert!(merged.is_none(), "text and int keys must not match");
}

#[test]
fn try_join_absent_keys_never_match() {
    let parent = row! { "other" => 1 };
    let child = row! { "unrelated" => 1 };

    let merged =
        try_join(&parent, &child, "id", "id", &Namespace::child()).expect("keys are valid");

    assert!(merged.is_none());
}

#[test]
fn try_join_rejects_empty_keys() {
    let row = row! { "id" => 1 };

    let err = try_join(&row, &row, "", "id", &Namespace::child()).unwrap_err();
    assert_eq!(
        err,
        JoinError::EmptyKey {
            role: KeyRole::Parent
        }
    );

    let err = try_join(&row, &row, "id", "", &Namespace::child()).unwrap_err();
    assert_eq!(
        err,
        JoinError::EmptyKey {
            role: KeyRole::Child
        }
    );
}

#[test]
fn try_join_leaves_inputs_untouched() {
    let parent = row! { "id" => 1, "nested" => vec![Value::Int(1)] };
    let child = row! { "pid" => 1 };
    let (parent_before, child_before) = (parent.clone(), child.clone());

    let _ = try_join(&parent, &child, "id", "pid", &Namespace::child());

    assert_eq!(parent, parent_before);
    assert_eq!(child, child_before);
}

// ---- engine --------------------------------------------------------------

#[test]
fn right_join_is_rejected() {
    let parents = messages();
    let children = message_recipients();

    let request =
        JoinRequest::new(&parents, "id", &children, "message_id").with_outer(Outer::Right);

    assert_eq!(join(&request), Err(JoinError::RightJoinUnsupported));
}

#[test]
fn right_join_is_rejected_before_comparing() {
    metrics_reset_all();
    let request = JoinRequest::new(&[], "", &[], "").with_outer(Outer::Right);

    // empty keys would fail too; right-join rejection comes first
    assert_eq!(join(&request), Err(JoinError::RightJoinUnsupported));
    assert_eq!(metrics_report().ops.rows_compared, 0);
}

#[test]
fn chained_joins_keep_hops_distinguishable() {
    let messages = messages();
    let junction = message_recipients();
    let users = users();

    let first = left_outer_join(&JoinRequest::new(&messages, "id", &junction, "message_id"))
        .expect("first hop should succeed");
    let second = left_outer_join(
        &JoinRequest::new(&first, ".user_id", &users, "id").with_namespace(Namespace::grandchild()),
    )
    .expect("second hop should succeed");

    assert_eq!(second.len(), 4);
    let brendan = &second[0];
    assert_eq!(brendan.get("..name"), Some(&Value::from("brendan")));
    assert_eq!(brendan.get("..id"), Some(&Value::Int(2)));
    assert_eq!(brendan.get(".user_id"), Some(&Value::Int(2)));
    assert_eq!(brendan.get("id"), Some(&Value::Int(10)));
}

#[test]
fn join_options_accept_left_right_aliases() {
    let options: JoinOptions = serde_json::from_str(
        r#"{
            "left": [{"id": 1}],
            "right": [{"pid": 1}, {"pid": 2}],
            "leftKey": "id",
            "rightKey": "pid",
            "outer": "left"
        }"#,
    )
    .expect("aliases should deserialize");

    assert_eq!(options.outer, Outer::Left);
    assert_eq!(options.child_namespace, Namespace::child());

    let rows = join(&options.request()).expect("join should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(".pid"), Some(&Value::Int(1)));
}

#[test]
fn outer_wire_values() {
    let parse = |raw: &str| serde_json::from_str::<Outer>(raw);

    assert_eq!(parse("false").expect("false is inner"), Outer::None);
    assert_eq!(parse("null").expect("null is inner"), Outer::None);
    assert_eq!(parse(r#""left""#).expect("left parses"), Outer::Left);
    assert_eq!(parse(r#""right""#).expect("right parses"), Outer::Right);
    assert!(parse("true").is_err());
    assert!(parse(r#""full""#).is_err());

    assert_eq!(
        serde_json::to_string(&Outer::None).expect("serializes"),
        "false"
    );
}

// ---- metrics -------------------------------------------------------------

#[derive(Default)]
struct CapturingSink {
    joins: RefCell<Vec<(Outer, u64, u64)>>,
}

impl MetricsSink for CapturingSink {
    fn record(&self, event: MetricsEvent<'_>) {
        if let MetricsEvent::Join {
            outer,
            matches,
            rows_emitted,
            ..
        } = event
        {
            self.joins.borrow_mut().push((outer, matches, rows_emitted));
        }
    }
}

#[test]
fn join_reports_to_scoped_sink() {
    let sink = Rc::new(CapturingSink::default());
    let parents = messages();
    let children = message_recipients();

    with_metrics_sink(sink.clone(), || {
        left_outer_join(&JoinRequest::new(&parents, "id", &children, "message_id"))
            .expect("join should succeed");
    });

    assert_eq!(*sink.joins.borrow(), vec![(Outer::Left, 2, 4)]);
}

#[test]
fn join_updates_global_counters() {
    metrics_reset_all();
    let parents = messages();
    let children = message_recipients();

    inner_join(&JoinRequest::new(&parents, "id", &children, "message_id"))
        .expect("join should succeed");

    let report = metrics_report();
    assert_eq!(report.ops.inner_joins, 1);
    assert_eq!(report.ops.rows_compared, 6);
    assert_eq!(report.ops.join_matches, 2);
    assert_eq!(report.ops.unmatched_parents, 2);
}

// ---- properties ----------------------------------------------------------

fn arb_rows(key: &'static str) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (0i64..5, "[a-z]{0,3}").prop_map(move |(k, tag)| row! { key => k, "tag" => tag }),
        0..8,
    )
}

fn matching_children(parent: &Row, children: &[Row]) -> usize {
    let key = parent.get("pk").expect("fixture rows carry pk");
    children
        .iter()
        .filter(|child| child.get("fk").is_some_and(|fk| fk.strict_eq(key)))
        .count()
}

proptest! {
    #[test]
    fn inner_join_cardinality(parents in arb_rows("pk"), children in arb_rows("fk")) {
        let rows = inner_join(&JoinRequest::new(&parents, "pk", &children, "fk")).unwrap();
        let expected: usize = parents.iter().map(|p| matching_children(p, &children)).sum();

        prop_assert_eq!(rows.len(), expected);
    }

    #[test]
    fn left_outer_join_cardinality_and_completeness(
        parents in arb_rows("pk"),
        children in arb_rows("fk"),
    ) {
        let rows = left_outer_join(&JoinRequest::new(&parents, "pk", &children, "fk")).unwrap();
        let expected: usize = parents
            .iter()
            .map(|p| matching_children(p, &children).max(1))
            .sum();
        prop_assert_eq!(rows.len(), expected);

        // every parent shows up with its own fields intact
        for parent in &parents {
            let represented = rows.iter().any(|row| {
                parent.iter().all(|(key, value)| row.get(key) == Some(value))
            });
            prop_assert!(represented);
        }
    }

    #[test]
    fn single_hop_prefixes_every_child_key_once(
        parents in arb_rows("pk"),
        children in arb_rows("fk"),
    ) {
        let rows = inner_join(&JoinRequest::new(&parents, "pk", &children, "fk")).unwrap();

        for row in &rows {
            prop_assert!(row.contains_key(".fk"));
            prop_assert!(row.contains_key(".tag"));
            prop_assert!(!row.keys().any(|key| key.starts_with("..")));
        }
    }
}
