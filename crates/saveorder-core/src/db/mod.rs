//! Resolver surface: session, configuration, and the write-order pipeline.

pub mod config;
pub mod order;
pub mod session;

// re-exports
pub use config::{CyclePolicy, ResolveConfig};
pub use order::{
    DependencyEdge, DependencyRecord, Grouping, ResolveError, ResolveStats, ResolvedNode,
    TypeBatch, WritePlan,
    trace::{ResolveTraceEvent, ResolveTraceSink, TracePhase},
};
pub use session::ResolveSession;
