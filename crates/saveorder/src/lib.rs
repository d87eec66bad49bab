//! ## Crate layout
//! - `core`: runtime entity models, the metadata interface, the write-order
//!   resolver, and observability.
//! - `error`: public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module carries what a host needs to describe its models,
//! implement a metadata provider, and resolve a write plan.

pub use saveorder_core as core;

pub mod error;

pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        db::{CyclePolicy, Grouping, ResolvedNode, TypeBatch},
        prelude::*,
    };
    pub use crate::error::Error;
    pub use serde::{Deserialize, Serialize};
}
