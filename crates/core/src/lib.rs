pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{
    ConfigurationError, NavigationError, ResolveError, WayfinderError, WayfinderResult,
};
pub use types::{Direction, StepId};
