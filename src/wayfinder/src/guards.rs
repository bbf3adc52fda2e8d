//! Guards backed by feature flags from configuration.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::debug;
use wayfinder_journey::{ConditionalStep, GuardTable, JourneyDefinition};

/// Shows its step when the named flag is on. A flag that is not configured
/// at all is an error, not an implicit "off".
#[derive(Debug, Clone)]
pub struct FlagGuard {
    flag: String,
    flags: Arc<HashMap<String, bool>>,
}

impl FlagGuard {
    pub fn new(flag: impl Into<String>, flags: Arc<HashMap<String, bool>>) -> Self {
        Self {
            flag: flag.into(),
            flags,
        }
    }
}

impl ConditionalStep for FlagGuard {
    fn will_render(&self, _args: &[String]) -> anyhow::Result<bool> {
        let enabled = self
            .flags
            .get(&self.flag)
            .copied()
            .ok_or_else(|| anyhow!("feature flag `{}` is not configured", self.flag))?;
        debug!(flag = %self.flag, enabled, "Checked feature flag");
        Ok(enabled)
    }
}

/// One `FlagGuard` per guarded step in `definition`.
pub fn flag_guards(definition: &JourneyDefinition, flags: HashMap<String, bool>) -> GuardTable {
    let flags = Arc::new(flags);
    definition
        .guarded_steps()
        .fold(GuardTable::new(), |table, (step, flag)| {
            table.register(step.clone(), Arc::new(FlagGuard::new(flag, flags.clone())))
        })
}
