use std::collections::BTreeMap;

use tracing::debug;
use wayfinder_core::{ConfigurationError, Direction, StepId};

use crate::types::{JourneyDefinition, StepDescriptor};

/// Immutable table of step metadata. Built once, then shared behind an `Arc`
/// by every navigator; nothing here is mutated after `build`.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    steps: BTreeMap<StepId, StepDescriptor>,
}

#[derive(Debug, Default)]
pub struct StepRegistryBuilder {
    steps: Vec<StepDescriptor>,
}

impl StepRegistryBuilder {
    pub fn step(mut self, descriptor: StepDescriptor) -> Self {
        self.steps.push(descriptor);
        self
    }

    pub fn steps(mut self, descriptors: impl IntoIterator<Item = StepDescriptor>) -> Self {
        self.steps.extend(descriptors);
        self
    }

    pub fn build(self) -> Result<StepRegistry, ConfigurationError> {
        let mut steps = BTreeMap::new();
        for descriptor in self.steps {
            let id = descriptor.id.clone();
            if steps.insert(id.clone(), descriptor).is_some() {
                return Err(ConfigurationError::DuplicateStep(id));
            }
        }
        debug!(steps = steps.len(), "Built step registry");
        Ok(StepRegistry { steps })
    }
}

impl StepRegistry {
    pub fn builder() -> StepRegistryBuilder {
        StepRegistryBuilder::default()
    }

    pub fn from_definition(definition: &JourneyDefinition) -> Result<Self, ConfigurationError> {
        let descriptors = definition
            .steps
            .iter()
            .map(|s| s.to_descriptor())
            .collect::<Result<Vec<_>, _>>()?;
        Self::builder().steps(descriptors).build()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.steps.contains_key(id)
    }

    /// All steps in id order.
    pub fn steps(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.values()
    }

    pub fn get(&self, id: &StepId) -> Result<&StepDescriptor, ConfigurationError> {
        self.steps
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownStep(id.clone()))
    }

    pub fn successor_of(&self, id: &StepId) -> Result<&StepDescriptor, ConfigurationError> {
        self.neighbour(id, Direction::Next)
    }

    pub fn predecessor_of(&self, id: &StepId) -> Result<&StepDescriptor, ConfigurationError> {
        self.neighbour(id, Direction::Previous)
    }

    /// The step linked from `id` in `direction`. The target must carry at
    /// least one non-blank URL template.
    pub fn neighbour(
        &self,
        id: &StepId,
        direction: Direction,
    ) -> Result<&StepDescriptor, ConfigurationError> {
        let step = self.get(id)?;
        let target = step
            .link(direction)
            .ok_or_else(|| ConfigurationError::MissingLink {
                step: id.clone(),
                direction,
            })?;
        let target = self.get(target)?;
        Self::check_templates(target)?;
        Ok(target)
    }

    fn check_templates(step: &StepDescriptor) -> Result<(), ConfigurationError> {
        if step.templates.is_empty() {
            return Err(ConfigurationError::MissingTemplate(step.id.clone()));
        }
        if step.templates.iter().any(|t| t.is_blank()) {
            return Err(ConfigurationError::EmptyTemplate(step.id.clone()));
        }
        Ok(())
    }

    /// Every defect a startup check can find: dangling links and steps
    /// without usable templates.
    pub fn problems(&self) -> Vec<ConfigurationError> {
        let mut problems = Vec::new();
        for step in self.steps.values() {
            if let Err(e) = Self::check_templates(step) {
                problems.push(e);
            }
            for direction in [Direction::Next, Direction::Previous] {
                if let Some(target) = step.link(direction) {
                    if !self.contains(target) {
                        problems.push(ConfigurationError::UnknownStep(target.clone()));
                    }
                }
            }
        }
        problems
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.problems().into_iter().next() {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }
}
