use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for integrator operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub aliases: BTreeMap<String, AliasCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Join engine
    pub inner_joins: u64,
    pub left_joins: u64,
    pub rows_compared: u64,
    pub join_matches: u64,
    pub unmatched_parents: u64,
    pub join_rows_emitted: u64,

    // Populate
    pub populate_calls: u64,
    pub populated_parents: u64,
    pub attached_children: u64,
    pub placeholders_dropped: u64,

    // Integrate
    pub integrate_calls: u64,
    pub integrated_aliases: u64,

    // Schema
    pub schema_resolves: u64,
    pub resolved_collections: u64,
    pub junctions_synthesized: u64,
}

///
/// AliasCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AliasCounters {
    pub populate_calls: u64,
    pub attached_children: u64,
    pub placeholders_dropped: u64,
}

///
/// EventReport
/// Point-in-time copy of the current thread's counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub aliases: BTreeMap<String, AliasCounters>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        aliases: m.aliases.clone(),
    })
}
