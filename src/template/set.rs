use super::bundled::{TemplateSpec, DYNAMIC_TEMPLATES};
use super::token::{validate_tokens, PlaceholderToken};
use crate::error::{RegistryError, Result};
use crate::resource::{ResourceSource, SchemaResource};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::{debug, info};

/// What `render` does with a substitution the template never declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubstitutionPolicy {
    /// Fail with `UnusedSubstitution`
    #[default]
    Strict,
    /// Drop the entry
    IgnoreUnused,
}

impl FromStr for SubstitutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" | "strict" => Ok(SubstitutionPolicy::Strict),
            "ignore" => Ok(SubstitutionPolicy::IgnoreUnused),
            other => Err(format!(
                "Invalid substitution policy '{}': expected 'error' or 'ignore'",
                other
            )),
        }
    }
}

/// Caller supplied placeholder values, keyed by token name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn insert(&mut self, token: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.values.insert(token.as_ref().to_string(), value.into())
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut substitutions = Substitutions::new();
        for (token, value) in iter {
            substitutions.insert(token, value);
        }
        substitutions
    }
}

/// SQL template plus the closed set of placeholders it declares
#[derive(Debug, Clone)]
pub struct DynamicTemplate {
    name: String,
    resource: SchemaResource,
    tokens: Vec<PlaceholderToken>,
    matcher: Option<Regex>,
}

impl DynamicTemplate {
    pub fn new(name: &str, resource: SchemaResource, tokens: &[PlaceholderToken]) -> Result<Self> {
        validate_tokens(name, resource.text(), tokens)?;

        // Longest first, so the alternation never prefers a shorter marker
        let mut ordered: Vec<&str> = tokens.iter().map(PlaceholderToken::as_str).collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let matcher = if ordered.is_empty() {
            None
        } else {
            let pattern = ordered
                .iter()
                .map(|token| regex::escape(token))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&pattern)?)
        };

        Ok(Self {
            name: name.to_string(),
            resource,
            tokens: tokens.to_vec(),
            matcher,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        self.resource.text()
    }

    pub fn resource(&self) -> &SchemaResource {
        &self.resource
    }

    pub fn tokens(&self) -> &[PlaceholderToken] {
        &self.tokens
    }

    pub fn declares(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.as_str() == token)
    }

    /// Render with the strict policy
    pub fn render(&self, substitutions: &Substitutions) -> Result<String> {
        self.render_with(substitutions, SubstitutionPolicy::Strict)
    }

    /// Replace every occurrence of every declared token in a single pass.
    ///
    /// Values are inserted literally and never expanded. A value that contains a
    /// declared token, or forms one with the surrounding text, is rejected, so a
    /// successful render never leaves a declared token in its output.
    pub fn render_with(
        &self,
        substitutions: &Substitutions,
        policy: SubstitutionPolicy,
    ) -> Result<String> {
        for token in &self.tokens {
            if substitutions.get(token.as_str()).is_none() {
                return Err(RegistryError::MissingSubstitution {
                    template: self.name.clone(),
                    token: token.to_string(),
                });
            }
        }

        for supplied in substitutions.tokens() {
            if self.declares(supplied) {
                continue;
            }
            match policy {
                SubstitutionPolicy::Strict => {
                    return Err(RegistryError::UnusedSubstitution {
                        template: self.name.clone(),
                        token: supplied.to_string(),
                    });
                }
                SubstitutionPolicy::IgnoreUnused => {
                    debug!("Ignoring substitution {} not declared by {}", supplied, self.name);
                }
            }
        }

        for token in &self.tokens {
            let value = substitutions.get(token.as_str()).unwrap_or_default();
            if let Some(nested) = self.tokens.iter().find(|t| value.contains(t.as_str())) {
                return Err(RegistryError::NestedPlaceholder {
                    template: self.name.clone(),
                    token: token.to_string(),
                    nested: nested.to_string(),
                });
            }
        }

        let matcher = match &self.matcher {
            Some(matcher) => matcher,
            None => return Ok(self.text().to_string()),
        };

        // Output byte range of each inserted value, with the token it replaced
        let mut inserted: Vec<(usize, usize, &str)> = Vec::with_capacity(self.tokens.len());
        let mut rendered = String::with_capacity(self.text().len());
        let mut last = 0;

        for found in matcher.find_iter(self.text()) {
            rendered.push_str(&self.text()[last..found.start()]);
            let value = substitutions.get(found.as_str()).unwrap_or_default();
            let start = rendered.len();
            rendered.push_str(value);
            inserted.push((start, rendered.len(), found.as_str()));
            last = found.end();
        }
        rendered.push_str(&self.text()[last..]);

        // A value can still complete a token together with the text around it
        if let Some(formed) = matcher.find(&rendered) {
            let token = inserted
                .iter()
                .find(|(start, end, _)| {
                    (*start < formed.end() && formed.start() < *end)
                        || (formed.start() <= *start && *end <= formed.end())
                })
                .map(|(_, _, token)| *token)
                .unwrap_or(formed.as_str());

            return Err(RegistryError::NestedPlaceholder {
                template: self.name.clone(),
                token: token.to_string(),
                nested: formed.as_str().to_string(),
            });
        }

        Ok(rendered)
    }
}

/// Every dynamic template, keyed by name
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: BTreeMap<String, DynamicTemplate>,
    policy: SubstitutionPolicy,
}

impl TemplateSet {
    /// Load the bundled template declarations from a source
    pub fn load(source: &dyn ResourceSource, policy: SubstitutionPolicy) -> Result<Self> {
        let set = Self::from_specs(source, DYNAMIC_TEMPLATES, policy)?;
        info!("Loaded {} dynamic templates from {}", set.len(), source.describe());
        Ok(set)
    }

    pub fn from_specs(
        source: &dyn ResourceSource,
        specs: &[TemplateSpec],
        policy: SubstitutionPolicy,
    ) -> Result<Self> {
        let mut templates = BTreeMap::new();

        for spec in specs {
            if templates.contains_key(spec.name) {
                return Err(RegistryError::InvalidTemplate {
                    template: spec.name.to_string(),
                    cause: "template is declared twice".to_string(),
                });
            }

            let resource = SchemaResource::load(source, spec.path)?;
            let template = DynamicTemplate::new(spec.name, resource, spec.tokens)?;
            debug!(
                "Registered template {} with placeholders {:?}",
                spec.name,
                spec.tokens.iter().map(PlaceholderToken::as_str).collect::<Vec<_>>()
            );
            templates.insert(spec.name.to_string(), template);
        }

        Ok(Self { templates, policy })
    }

    pub fn get(&self, name: &str) -> Result<&DynamicTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    /// Template text and its declared placeholders
    pub fn template_for(&self, name: &str) -> Result<(&str, &[PlaceholderToken])> {
        self.get(name).map(|template| (template.text(), template.tokens()))
    }

    /// Render a template by name using the set's policy
    pub fn render(&self, name: &str, substitutions: &Substitutions) -> Result<String> {
        self.get(name)?.render_with(substitutions, self.policy)
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicTemplate> {
        self.templates.values()
    }

    pub fn policy(&self) -> SubstitutionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
