//! Metrics sink boundary.
//!
//! This module is the only allowed bridge between integrator logic
//! and the thread-local metrics state.

use crate::{join::Outer, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    Join {
        outer: Outer,
        parent_rows: u64,
        child_rows: u64,
        matches: u64,
        unmatched_parents: u64,
        rows_emitted: u64,
    },
    Populate {
        alias: &'a str,
        parent_rows: u64,
        attached_children: u64,
        placeholders_dropped: u64,
    },
    Integrate {
        aliases: u64,
    },
    SchemaResolve {
        collections: u64,
        junctions: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::Join {
                outer,
                parent_rows,
                child_rows,
                matches,
                unmatched_parents,
                rows_emitted,
            } => {
                metrics::with_state_mut(|m| {
                    match outer {
                        Outer::Left => m.ops.left_joins = m.ops.left_joins.saturating_add(1),
                        Outer::None | Outer::Right => {
                            m.ops.inner_joins = m.ops.inner_joins.saturating_add(1);
                        }
                    }
                    m.ops.rows_compared = m
                        .ops
                        .rows_compared
                        .saturating_add(parent_rows.saturating_mul(child_rows));
                    m.ops.join_matches = m.ops.join_matches.saturating_add(matches);
                    m.ops.unmatched_parents =
                        m.ops.unmatched_parents.saturating_add(unmatched_parents);
                    m.ops.join_rows_emitted = m.ops.join_rows_emitted.saturating_add(rows_emitted);
                });
            }

            MetricsEvent::Populate {
                alias,
                parent_rows,
                attached_children,
                placeholders_dropped,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.populate_calls = m.ops.populate_calls.saturating_add(1);
                    m.ops.populated_parents = m.ops.populated_parents.saturating_add(parent_rows);
                    m.ops.attached_children =
                        m.ops.attached_children.saturating_add(attached_children);
                    m.ops.placeholders_dropped =
                        m.ops.placeholders_dropped.saturating_add(placeholders_dropped);

                    let entry = m.aliases.entry(alias.to_string()).or_default();
                    entry.populate_calls = entry.populate_calls.saturating_add(1);
                    entry.attached_children =
                        entry.attached_children.saturating_add(attached_children);
                    entry.placeholders_dropped =
                        entry.placeholders_dropped.saturating_add(placeholders_dropped);
                });
            }

            MetricsEvent::Integrate { aliases } => {
                metrics::with_state_mut(|m| {
                    m.ops.integrate_calls = m.ops.integrate_calls.saturating_add(1);
                    m.ops.integrated_aliases = m.ops.integrated_aliases.saturating_add(aliases);
                });
            }

            MetricsEvent::SchemaResolve {
                collections,
                junctions,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.schema_resolves = m.ops.schema_resolves.saturating_add(1);
                    m.ops.resolved_collections =
                        m.ops.resolved_collections.saturating_add(collections);
                    m.ops.junctions_synthesized =
                        m.ops.junctions_synthesized.saturating_add(junctions);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the scoped sink override, or to the thread-local state.
pub fn record(event: MetricsEvent<'_>) {
    // clone out of the slot so a sink may itself record without re-borrowing
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
