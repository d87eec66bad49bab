//! Resolver tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect ordering.

///
/// ResolveTraceSink
///

pub trait ResolveTraceSink {
    fn on_event(&self, event: ResolveTraceEvent);
}

///
/// TracePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TracePhase {
    Build,
    Sort,
    Group,
}

///
/// ResolveTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveTraceEvent {
    Start { roots: u64 },
    Phase { phase: TracePhase, nodes: u64 },
    Finish { nodes: u64, batches: u64 },
    Error { phase: TracePhase },
}
