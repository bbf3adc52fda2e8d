use thiserror::Error;

use crate::types::{Direction, StepId};

pub type WayfinderResult<T> = Result<T, WayfinderError>;

/// The journey graph is malformed. Never retried: these point at a broken
/// deployment rather than bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown step `{0}`")]
    UnknownStep(StepId),

    #[error("Step `{0}` is registered more than once")]
    DuplicateStep(StepId),

    #[error("Missing {direction} link on step `{step}`")]
    MissingLink { step: StepId, direction: Direction },

    #[error("Missing URL template on step `{0}`")]
    MissingTemplate(StepId),

    #[error("Missing URL template value on step `{0}`")]
    EmptyTemplate(StepId),

    #[error("Malformed URL template `{template}`: {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("Conditional step `{0}` has no guard registered with the step provider")]
    MissingGuard(StepId),

    #[error("Step `{step}` revisited while resolving {direction} from `{start}`")]
    Cycle {
        start: StepId,
        step: StepId,
        direction: Direction,
    },

    #[error("Resolving {direction} from `{start}` exceeded {limit} hops")]
    TraversalLimitExceeded {
        start: StepId,
        direction: Direction,
        limit: usize,
    },
}

/// A resolution failed for this request: wrong argument count or a guard
/// that could not be evaluated.
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("No mapping found that matches the number of path variables provided")]
    NoMatchingMapping { step: StepId, provided: usize },

    #[error("Guard on step `{step}` failed: {source}")]
    Guard {
        step: StepId,
        #[source]
        source: anyhow::Error,
    },
}

/// Everything the navigator can fail with.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

impl ResolveError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Navigation(NavigationError::NoMatchingMapping { .. }) => "arity",
            Self::Navigation(NavigationError::Guard { .. }) => "guard",
        }
    }
}

#[derive(Error, Debug)]
pub enum WayfinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Journey error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigurationError> for WayfinderError {
    fn from(err: ConfigurationError) -> Self {
        Self::Resolve(err.into())
    }
}

impl From<NavigationError> for WayfinderError {
    fn from(err: NavigationError) -> Self {
        Self::Resolve(err.into())
    }
}
