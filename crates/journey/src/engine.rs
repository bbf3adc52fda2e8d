use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use wayfinder_core::config::NavigationConfig;
use wayfinder_core::{ConfigurationError, Direction, ResolveError, StepId};

use crate::evaluator::GuardEvaluator;
use crate::provider::StepProvider;
use crate::registry::StepRegistry;
use crate::template::render_any;
use crate::types::Resolution;

/// Works out where a journey goes next (or back to), skipping conditional
/// steps whose guard declines.
///
/// Holds no per-request state: clones share the registry and provider, and a
/// single navigator may be used from many threads at once.
#[derive(Clone)]
pub struct JourneyNavigator {
    registry: Arc<StepRegistry>,
    evaluator: GuardEvaluator,
    max_hops: Option<usize>,
    redirect_prefix: String,
}

impl std::fmt::Debug for JourneyNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyNavigator")
            .field("steps", &self.registry.len())
            .field("max_hops", &self.hop_limit())
            .finish()
    }
}

impl JourneyNavigator {
    pub fn new(registry: Arc<StepRegistry>, provider: Arc<dyn StepProvider>) -> Self {
        let defaults = NavigationConfig::default();
        Self {
            registry,
            evaluator: GuardEvaluator::new(provider),
            max_hops: defaults.max_hops,
            redirect_prefix: defaults.redirect_prefix,
        }
    }

    /// Applies navigation settings. A hop limit below 1 is raised to 1 so a
    /// direct successor can always be reached.
    pub fn with_config(mut self, config: &NavigationConfig) -> Self {
        self.max_hops = config.max_hops.map(|limit| limit.max(1));
        self.redirect_prefix = config.redirect_prefix.clone();
        self
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    fn hop_limit(&self) -> usize {
        self.max_hops.unwrap_or_else(|| self.registry.len())
    }

    /// Path of the first included step after `start`.
    pub fn resolve_next(&self, start: &StepId, args: &[String]) -> Result<String, ResolveError> {
        self.resolve(start, Direction::Next, args).map(|r| r.path)
    }

    /// Path of the first included step before `start`, typically for a back
    /// link.
    pub fn resolve_previous(
        &self,
        start: &StepId,
        args: &[String],
    ) -> Result<String, ResolveError> {
        self.resolve(start, Direction::Previous, args).map(|r| r.path)
    }

    /// `resolve_next` with the configured redirect prefix applied.
    pub fn next_redirect(&self, start: &StepId, args: &[String]) -> Result<String, ResolveError> {
        let path = self.resolve_next(start, args)?;
        Ok(self.redirect_to(&path))
    }

    /// Prefixes `path` with the configured redirect marker.
    pub fn redirect_to(&self, path: &str) -> String {
        format!("{}{}", self.redirect_prefix, path)
    }

    /// Walks links from `start` in `direction` until a step is included, then
    /// renders its URL with `args`.
    ///
    /// Any guard failure along the way aborts the walk, including failures on
    /// steps that would have been skipped.
    pub fn resolve(
        &self,
        start: &StepId,
        direction: Direction,
        args: &[String],
    ) -> Result<Resolution, ResolveError> {
        let limit = self.hop_limit();
        let mut visited: HashSet<&StepId> = HashSet::new();
        visited.insert(&self.registry.get(start)?.id);

        let mut current = self.registry.neighbour(start, direction)?;
        let mut skipped = Vec::new();
        let mut hops = 0;

        loop {
            hops += 1;
            if hops > limit {
                return Err(ConfigurationError::TraversalLimitExceeded {
                    start: start.clone(),
                    direction,
                    limit,
                }
                .into());
            }
            if !visited.insert(&current.id) {
                return Err(ConfigurationError::Cycle {
                    start: start.clone(),
                    step: current.id.clone(),
                    direction,
                }
                .into());
            }

            if self.evaluator.is_included(current, args)? {
                let path = render_any(&current.templates, &current.id, args)?;
                info!(
                    start = %start,
                    %direction,
                    step = %current.id,
                    skipped = skipped.len(),
                    "Resolved journey step"
                );
                return Ok(Resolution {
                    step: current.id.clone(),
                    direction,
                    path,
                    skipped,
                });
            }

            debug!(step = %current.id, %direction, "Skipping step");
            skipped.push(current.id.clone());
            current = self.registry.neighbour(&current.id, direction)?;
        }
    }
}
