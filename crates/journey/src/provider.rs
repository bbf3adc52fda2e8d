//! The seam between the navigator and the host application: live step
//! instances that can say whether they should be shown.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use wayfinder_core::StepId;

/// A step whose presence in the journey depends on run-time state.
///
/// `will_render` receives the same arguments that will be used to render the
/// step's URL. It may perform I/O and it may fail; a failure aborts the whole
/// resolution.
pub trait ConditionalStep: Send + Sync {
    fn will_render(&self, args: &[String]) -> anyhow::Result<bool>;
}

impl<F> ConditionalStep for F
where
    F: Fn(&[String]) -> anyhow::Result<bool> + Send + Sync,
{
    fn will_render(&self, args: &[String]) -> anyhow::Result<bool> {
        self(args)
    }
}

/// Hands out live instances of conditional steps. Owned by the host; the
/// navigator may look the same step up many times.
pub trait StepProvider: Send + Sync {
    fn conditional_step(&self, id: &StepId) -> Option<Arc<dyn ConditionalStep>>;
}

/// Map-backed provider.
#[derive(Default, Clone)]
pub struct GuardTable {
    guards: HashMap<StepId, Arc<dyn ConditionalStep>>,
}

impl GuardTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, id: impl Into<StepId>, guard: Arc<dyn ConditionalStep>) -> Self {
        self.guards.insert(id.into(), guard);
        self
    }

    pub fn register_fn<F>(self, id: impl Into<StepId>, guard: F) -> Self
    where
        F: Fn(&[String]) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.register(id, Arc::new(guard))
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl fmt::Debug for GuardTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.guards.keys().map(StepId::as_str).collect();
        ids.sort();
        f.debug_struct("GuardTable").field("steps", &ids).finish()
    }
}

impl StepProvider for GuardTable {
    fn conditional_step(&self, id: &StepId) -> Option<Arc<dyn ConditionalStep>> {
        self.guards.get(id).cloned()
    }
}
