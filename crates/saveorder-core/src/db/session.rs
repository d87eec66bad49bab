use crate::{
    db::{
        config::{CyclePolicy, ResolveConfig},
        order::{
            self, WritePlan,
            trace::{ResolveTraceEvent, ResolveTraceSink},
        },
    },
    error::InternalError,
    obs::sink::{MetricsSink, with_metrics_sink},
    traits::MetadataProvider,
};

///
/// ResolveSession
///
/// Session-scoped resolver handle with policy (config, debug, metrics, trace).
/// Holds no state between calls; every `resolve` builds its own graph.
///

pub struct ResolveSession<'a, M: MetadataProvider> {
    metadata: &'a M,
    config: ResolveConfig,
    debug: bool,
    metrics: Option<&'static dyn MetricsSink>,
    trace: Option<&'a dyn ResolveTraceSink>,
}

impl<'a, M: MetadataProvider> ResolveSession<'a, M> {
    #[must_use]
    pub const fn new(metadata: &'a M) -> Self {
        Self {
            metadata,
            config: ResolveConfig::new(),
            debug: false,
            metrics: None,
            trace: None,
        }
    }

    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn config(mut self, config: ResolveConfig) -> Self {
        self.config = config;
        self
    }

    /// Abort on the first dependency cycle instead of breaking it.
    #[must_use]
    pub const fn strict_cycles(mut self) -> Self {
        self.config.cycle_policy = CyclePolicy::Reject;
        self
    }

    /// Return the raw topological order without type regrouping.
    #[must_use]
    pub const fn topological_only(mut self) -> Self {
        self.config.group_by_type = false;
        self
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn trace_sink(mut self, sink: &'a dyn ResolveTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn metadata(&self) -> &'a M {
        self.metadata
    }

    #[must_use]
    pub const fn resolve_config(&self) -> ResolveConfig {
        self.config
    }

    /// Resolve a write order for `roots`.
    ///
    /// Returns `Ok(None)` when `roots` is empty: there is nothing to write.
    pub fn resolve(
        &self,
        roots: impl IntoIterator<Item = M::Entity>,
    ) -> Result<Option<WritePlan<M::Entity>>, InternalError> {
        let roots: Vec<M::Entity> = roots.into_iter().collect();

        self.with_metrics(|| order::resolve(self, &roots))
    }

    fn with_metrics<T>(&self, f: impl FnOnce() -> T) -> T {
        if let Some(sink) = self.metrics {
            with_metrics_sink(sink, f)
        } else {
            f()
        }
    }

    pub(crate) fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            println!("[debug] {}", s.into());
        }
    }

    pub(crate) fn trace(&self, event: ResolveTraceEvent) {
        if let Some(sink) = self.trace {
            sink.on_event(event);
        }
    }
}
