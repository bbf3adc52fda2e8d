//! URL templates with positional path variables, e.g.
//! `/pay-penalty/company/{companyNumber}/penalty/{penaltyRef}/view-penalties`.

use std::fmt;

use serde::{Deserialize, Serialize};
use wayfinder_core::{ConfigurationError, NavigationError, StepId};

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed URL template. Parsing happens once at registration; rendering is
/// a straight walk over the segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ConfigurationError> {
        let raw = raw.into();
        let malformed = |reason: &str| ConfigurationError::MalformedTemplate {
            template: raw.clone(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut variable: Option<String> = None;

        for c in raw.chars() {
            match c {
                '{' => {
                    if variable.is_some() {
                        return Err(malformed("nested `{`"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    variable = Some(String::new());
                }
                '}' => {
                    let name = variable
                        .take()
                        .ok_or_else(|| malformed("unmatched `}`"))?;
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(malformed("empty path variable"));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                }
                c => match variable.as_mut() {
                    Some(name) => name.push(c),
                    None => literal.push(c),
                },
            }
        }

        if variable.is_some() {
            return Err(malformed("unclosed `{`"));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { raw, segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the template was declared with no usable value.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of positional path variables.
    pub fn arity(&self) -> usize {
        self.variables().count()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes `args` positionally, encoding each as a path segment.
    pub fn render(&self, step: &StepId, args: &[String]) -> Result<String, NavigationError> {
        if args.len() != self.arity() {
            return Err(NavigationError::NoMatchingMapping {
                step: step.clone(),
                provided: args.len(),
            });
        }

        let mut values = args.iter();
        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Variable(_) => {
                    if let Some(value) = values.next() {
                        path.push_str(&urlencoding::encode(value));
                    }
                }
            }
        }
        Ok(path)
    }
}

/// Renders the first of `templates` whose arity matches `args`.
pub fn render_any(
    templates: &[UrlTemplate],
    step: &StepId,
    args: &[String],
) -> Result<String, NavigationError> {
    templates
        .iter()
        .find(|t| t.arity() == args.len())
        .ok_or_else(|| NavigationError::NoMatchingMapping {
            step: step.clone(),
            provided: args.len(),
        })?
        .render(step, args)
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for UrlTemplate {
    type Error = ConfigurationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<UrlTemplate> for String {
    fn from(template: UrlTemplate) -> Self {
        template.raw
    }
}
