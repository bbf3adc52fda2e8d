//! Journey navigation: resolves the next (or previous) page of a multi-step
//! web journey, skipping conditional steps whose guard says they should not
//! be shown.

pub mod engine;
pub mod evaluator;
pub mod provider;
pub mod registry;
pub mod template;
pub mod types;

pub use engine::JourneyNavigator;
pub use evaluator::GuardEvaluator;
pub use provider::{ConditionalStep, GuardTable, StepProvider};
pub use registry::StepRegistry;
pub use template::UrlTemplate;
pub use types::{JourneyDefinition, Resolution, StepDefinition, StepDescriptor};
pub use wayfinder_core::{ConfigurationError, Direction, NavigationError, ResolveError, StepId};
