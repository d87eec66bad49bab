use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for resolver calls.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Entrypoints
    pub resolve_calls: u64,
    pub empty_resolves: u64,
    pub rejected_resolves: u64,

    // Graph shape
    pub nodes_resolved: u64,
    pub edges_linked: u64,
    pub unknown_types_skipped: u64,

    // Ordering
    pub cycles_broken: u64,
    pub grouping_fallbacks: u64,
    pub batches_emitted: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub nodes_resolved: u64,
    pub batches_emitted: u64,
    pub cycles_rejected: u64,
}

///
/// EventReport
/// Point-in-time snapshot of `EventState`.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
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

/// Build a report; `None` counters means nothing has been recorded yet.
#[must_use]
pub(crate) fn report() -> EventReport {
    let counters = with_state(|m| {
        if m.ops.resolve_calls == 0 {
            None
        } else {
            Some(m.clone())
        }
    });

    EventReport { counters }
}
