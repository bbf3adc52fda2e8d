use std::sync::Arc;

use tracing::debug;
use wayfinder_core::{ConfigurationError, NavigationError, ResolveError};

use crate::provider::StepProvider;
use crate::types::StepDescriptor;

/// Decides whether a step takes part in the journey for the given arguments.
#[derive(Clone)]
pub struct GuardEvaluator {
    provider: Arc<dyn StepProvider>,
}

impl std::fmt::Debug for GuardEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardEvaluator").finish_non_exhaustive()
    }
}

impl GuardEvaluator {
    pub fn new(provider: Arc<dyn StepProvider>) -> Self {
        Self { provider }
    }

    /// Unconditional steps are always included and never touch the provider.
    /// A conditional step's guard is invoked with `args`; if it fails the
    /// error is surfaced rather than guessed.
    pub fn is_included(
        &self,
        step: &StepDescriptor,
        args: &[String],
    ) -> Result<bool, ResolveError> {
        if !step.conditional {
            return Ok(true);
        }

        let guard = self
            .provider
            .conditional_step(&step.id)
            .ok_or_else(|| ConfigurationError::MissingGuard(step.id.clone()))?;

        let included = guard
            .will_render(args)
            .map_err(|source| NavigationError::Guard {
                step: step.id.clone(),
                source,
            })?;

        debug!(step = %step.id, included, "Evaluated step guard");
        Ok(included)
    }
}
