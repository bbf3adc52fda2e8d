use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfinder_core::{ConfigurationError, Direction, StepId};

use crate::template::UrlTemplate;

/// Static metadata for one journey step: where it lives and what it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: StepId,
    pub templates: Vec<UrlTemplate>,
    pub next: Option<StepId>,
    pub previous: Option<StepId>,
    /// Conditional steps are only shown when their guard says so.
    pub conditional: bool,
}

impl StepDescriptor {
    pub fn new(id: impl Into<StepId>) -> Self {
        Self {
            id: id.into(),
            templates: Vec::new(),
            next: None,
            previous: None,
            conditional: false,
        }
    }

    /// Adds a URL template. May be called more than once; rendering picks the
    /// template whose arity matches the supplied arguments.
    pub fn template(mut self, raw: &str) -> Result<Self, ConfigurationError> {
        self.templates.push(UrlTemplate::parse(raw)?);
        Ok(self)
    }

    pub fn next(mut self, id: impl Into<StepId>) -> Self {
        self.next = Some(id.into());
        self
    }

    pub fn previous(mut self, id: impl Into<StepId>) -> Self {
        self.previous = Some(id.into());
        self
    }

    pub fn conditional(mut self) -> Self {
        self.conditional = true;
        self
    }

    pub fn link(&self, direction: Direction) -> Option<&StepId> {
        match direction {
            Direction::Next => self.next.as_ref(),
            Direction::Previous => self.previous.as_ref(),
        }
    }
}

/// Outcome of a successful traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub step: StepId,
    pub direction: Direction,
    pub path: String,
    /// Conditional steps passed over because their guard declined.
    pub skipped: Vec<StepId>,
}

/// Declarative journey, as written in a TOML/JSON/YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: StepId,
    #[serde(default, alias = "template", deserialize_with = "one_or_many")]
    pub templates: Vec<String>,
    #[serde(default)]
    pub next: Option<StepId>,
    #[serde(default)]
    pub previous: Option<StepId>,
    /// Name of the guard deciding whether this step is shown. Absent means
    /// the step is always included.
    #[serde(default)]
    pub guard: Option<String>,
}

impl StepDefinition {
    pub fn to_descriptor(&self) -> Result<StepDescriptor, ConfigurationError> {
        let templates = self
            .templates
            .iter()
            .map(|raw| UrlTemplate::parse(raw.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StepDescriptor {
            id: self.id.clone(),
            templates,
            next: self.next.clone(),
            previous: self.previous.clone(),
            conditional: self.guard.is_some(),
        })
    }
}

impl JourneyDefinition {
    /// Reads a journey file; the format follows the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(raw: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Steps that declare a guard, with the guard's name.
    pub fn guarded_steps(&self) -> impl Iterator<Item = (&StepId, &str)> {
        self.steps
            .iter()
            .filter_map(|s| s.guard.as_deref().map(|g| (&s.id, g)))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(raw) => vec![raw],
        OneOrMany::Many(raw) => raw,
    })
}
