use serde::{Deserialize, Serialize};

///
/// CyclePolicy
///
/// What the sorter does when a dependency edge closes a cycle.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Drop the closing edge and keep going.
    #[default]
    Break,
    /// Abort the whole resolve with a cyclic-dependency error.
    Reject,
}

///
/// ResolveConfig
///
/// Per-session ordering options. Missing keys take their defaults so hosts
/// can embed this in their own config files.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Regroup the topological order into per-type runs.
    pub group_by_type: bool,
    pub cycle_policy: CyclePolicy,
}

impl ResolveConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group_by_type: true,
            cycle_policy: CyclePolicy::Break,
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self::new()
    }
}

///
/// TESTS
///
