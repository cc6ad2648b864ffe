use super::ids::{is_valid_identifier, FIXED_SCHEMAS, SENTINEL};
use crate::error::{RegistryError, Result};
use crate::resource::{ResourceSource, SchemaResource};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Immutable identifier -> schema mapping for the fixed test databases
#[derive(Debug, Clone)]
pub struct StaticCatalogue {
    schemas: BTreeMap<String, SchemaResource>,
}

impl StaticCatalogue {
    /// Load every fixed schema from a source
    pub fn load(source: &dyn ResourceSource) -> Result<Self> {
        let catalogue = Self::from_entries(source, FIXED_SCHEMAS)?;

        // The provisioning harness relies on the sentinel being present
        catalogue.sentinel()?;

        info!(
            "Loaded {} fixed schemas from {}",
            catalogue.len(),
            source.describe()
        );
        Ok(catalogue)
    }

    /// Build a catalogue from explicit `(identifier, resource path)` pairs
    pub fn from_entries(source: &dyn ResourceSource, entries: &[(&str, &str)]) -> Result<Self> {
        let mut schemas = BTreeMap::new();

        for (identifier, path) in entries {
            if !is_valid_identifier(identifier) {
                return Err(RegistryError::Internal(format!(
                    "Invalid database identifier: {}. Must be lowercase alphanumeric with underscores.",
                    identifier
                )));
            }

            if schemas.contains_key(*identifier) {
                return Err(RegistryError::DuplicateIdentifier {
                    identifier: identifier.to_string(),
                });
            }

            let resource = SchemaResource::load(source, path)?;
            debug!(
                "Registered schema {} from {} ({} bytes)",
                identifier,
                path,
                resource.text().len()
            );
            schemas.insert(identifier.to_string(), resource);
        }

        Ok(Self { schemas })
    }

    /// Schema text for a known identifier
    pub fn lookup(&self, identifier: &str) -> Result<&str> {
        self.resource(identifier).map(SchemaResource::text)
    }

    pub fn resource(&self, identifier: &str) -> Result<&SchemaResource> {
        self.schemas
            .get(identifier)
            .ok_or_else(|| RegistryError::UnknownIdentifier {
                identifier: identifier.to_string(),
            })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.schemas.contains_key(identifier)
    }

    /// Every registered identifier, sentinel included
    pub fn all_identifiers(&self) -> BTreeSet<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn sentinel(&self) -> Result<&SchemaResource> {
        self.resource(SENTINEL)
    }

    /// Entries other than the sentinel. The iteration order carries no dependency meaning.
    pub fn non_sentinel(&self) -> impl Iterator<Item = (&str, &SchemaResource)> {
        self.schemas
            .iter()
            .filter(|(identifier, _)| identifier.as_str() != SENTINEL)
            .map(|(identifier, resource)| (identifier.as_str(), resource))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
