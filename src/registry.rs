//! Test Database Registry
//!
//! One value holding everything a test run can provision:
//! - the fixed schemas of the static catalogue
//! - the dynamic templates
//! - the dynamic databases, which are templates rendered with fixed values

use crate::catalogue::{
    StaticCatalogue, BENCHMARK, DB012, DB014, DB015, DB016, DB017, DB018, SENTINEL,
};
use crate::error::{RegistryError, Result};
use crate::resource::{BundledResources, ResourceSource, SchemaResource};
use crate::template::{
    benchmark, textual_columns, PlaceholderToken, SubstitutionPolicy, Substitutions, TemplateSet,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use tracing::{debug, info};

/// A database created by rendering a template with fixed values
#[derive(Debug, Clone, Copy)]
pub struct DynamicDatabaseSpec {
    pub identifier: &'static str,
    pub template: &'static str,
    pub values: &'static [(PlaceholderToken, &'static str)],
}

pub const DYNAMIC_DATABASES: &[DynamicDatabaseSpec] = &[
    DynamicDatabaseSpec {
        identifier: BENCHMARK,
        template: benchmark::NAME,
        values: &[(benchmark::COLUMN_LENGTH, "100")],
    },
    DynamicDatabaseSpec {
        identifier: DB012,
        template: textual_columns::NAME,
        values: &[
            (textual_columns::DATABASE_NAME, DB012),
            (textual_columns::COLUMN_TYPE, "CHAR"),
            (textual_columns::COLUMN_LENGTH, "100"),
        ],
    },
    DynamicDatabaseSpec {
        identifier: DB014,
        template: textual_columns::NAME,
        values: &[
            (textual_columns::DATABASE_NAME, DB014),
            (textual_columns::COLUMN_TYPE, "VARCHAR"),
            (textual_columns::COLUMN_LENGTH, "50"),
        ],
    },
    DynamicDatabaseSpec {
        identifier: DB015,
        template: textual_columns::NAME,
        values: &[
            (textual_columns::DATABASE_NAME, DB015),
            (textual_columns::COLUMN_TYPE, "VARCHAR"),
            (textual_columns::COLUMN_LENGTH, "256"),
        ],
    },
    DynamicDatabaseSpec {
        identifier: DB016,
        template: textual_columns::NAME,
        values: &[
            (textual_columns::DATABASE_NAME, DB016),
            (textual_columns::COLUMN_TYPE, "BINARY"),
            (textual_columns::COLUMN_LENGTH, "100"),
        ],
    },
    DynamicDatabaseSpec {
        identifier: DB017,
        template: textual_columns::NAME,
        values: &[
            (textual_columns::DATABASE_NAME, DB017),
            (textual_columns::COLUMN_TYPE, "VARBINARY"),
            (textual_columns::COLUMN_LENGTH, "50"),
        ],
    },
    DynamicDatabaseSpec {
        identifier: DB018,
        template: textual_columns::NAME,
        values: &[
            (textual_columns::DATABASE_NAME, DB018),
            (textual_columns::COLUMN_TYPE, "VARBINARY"),
            (textual_columns::COLUMN_LENGTH, "256"),
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseKind {
    Fixed,
    Dynamic,
    Sentinel,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    pub identifier: String,
    pub kind: DatabaseKind,
    pub resource: String,
    pub checksum: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub resource: String,
    pub placeholders: Vec<String>,
    pub checksum: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub databases: Vec<DatabaseSummary>,
    pub templates: Vec<TemplateSummary>,
}

/// Catalogue, templates and rendered dynamic databases, built once
#[derive(Debug, Clone)]
pub struct TestDbRegistry {
    catalogue: StaticCatalogue,
    templates: TemplateSet,
    dynamic: BTreeMap<String, SchemaResource>,
}

static BUNDLED_REGISTRY: OnceLock<Result<TestDbRegistry>> = OnceLock::new();

impl TestDbRegistry {
    pub fn load(source: &dyn ResourceSource, policy: SubstitutionPolicy) -> Result<Self> {
        let catalogue = StaticCatalogue::load(source)?;
        let templates = TemplateSet::load(source, policy)?;
        Self::from_parts(catalogue, templates, DYNAMIC_DATABASES)
    }

    /// Process-wide registry over the bundled resources, built on first use
    pub fn bundled() -> Result<&'static TestDbRegistry> {
        BUNDLED_REGISTRY
            .get_or_init(|| TestDbRegistry::load(&BundledResources, SubstitutionPolicy::Strict))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn from_parts(
        catalogue: StaticCatalogue,
        templates: TemplateSet,
        dynamic_specs: &[DynamicDatabaseSpec],
    ) -> Result<Self> {
        let mut dynamic = BTreeMap::new();

        for spec in dynamic_specs {
            if catalogue.contains(spec.identifier) || dynamic.contains_key(spec.identifier) {
                return Err(RegistryError::DuplicateIdentifier {
                    identifier: spec.identifier.to_string(),
                });
            }

            let template = templates.get(spec.template)?;
            let substitutions: Substitutions = spec.values.iter().copied().collect();
            let sql = template.render(&substitutions)?;

            debug!("Rendered dynamic database {} from {}", spec.identifier, spec.template);
            dynamic.insert(
                spec.identifier.to_string(),
                SchemaResource::new(template.resource().path(), sql),
            );
        }

        info!(
            "Test database registry ready: {} fixed, {} dynamic, {} templates",
            catalogue.len(),
            dynamic.len(),
            templates.len()
        );

        Ok(Self {
            catalogue,
            templates,
            dynamic,
        })
    }

    pub fn catalogue(&self) -> &StaticCatalogue {
        &self.catalogue
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Fixed schema text.
    ///
    /// Covers the static catalogue only. The dynamic databases (`db012`,
    /// `db014`..`db018`, `rdrs_bench`) fail here with `UnknownIdentifier`; use
    /// `schema_for` to reach any database.
    pub fn lookup(&self, identifier: &str) -> Result<&str> {
        self.catalogue.lookup(identifier)
    }

    /// Fixed schema identifiers only, see `database_identifiers` for the full set
    pub fn all_identifiers(&self) -> BTreeSet<&str> {
        self.catalogue.all_identifiers()
    }

    pub fn template_for(&self, name: &str) -> Result<(&str, &[PlaceholderToken])> {
        self.templates.template_for(name)
    }

    pub fn render(&self, name: &str, substitutions: &Substitutions) -> Result<String> {
        self.templates.render(name, substitutions)
    }

    pub fn dynamic_identifiers(&self) -> BTreeSet<&str> {
        self.dynamic.keys().map(String::as_str).collect()
    }

    /// Fixed and dynamic database identifiers
    pub fn database_identifiers(&self) -> BTreeSet<&str> {
        let mut identifiers = self.all_identifiers();
        identifiers.extend(self.dynamic_identifiers());
        identifiers
    }

    /// Executable SQL for any database, fixed or dynamic
    pub fn schema_for(&self, identifier: &str) -> Result<&SchemaResource> {
        match self.dynamic.get(identifier) {
            Some(resource) => Ok(resource),
            None => self.catalogue.resource(identifier),
        }
    }

    pub fn kind_of(&self, identifier: &str) -> Result<DatabaseKind> {
        if identifier == SENTINEL && self.catalogue.contains(SENTINEL) {
            Ok(DatabaseKind::Sentinel)
        } else if self.dynamic.contains_key(identifier) {
            Ok(DatabaseKind::Dynamic)
        } else if self.catalogue.contains(identifier) {
            Ok(DatabaseKind::Fixed)
        } else {
            Err(RegistryError::UnknownIdentifier {
                identifier: identifier.to_string(),
            })
        }
    }

    pub fn summary(&self) -> Result<RegistrySummary> {
        let mut databases = Vec::new();
        for identifier in self.database_identifiers() {
            let resource = self.schema_for(identifier)?;
            databases.push(DatabaseSummary {
                identifier: identifier.to_string(),
                kind: self.kind_of(identifier)?,
                resource: resource.path().to_string(),
                checksum: resource.checksum().to_string(),
                bytes: resource.text().len(),
            });
        }

        let templates = self
            .templates
            .iter()
            .map(|template| TemplateSummary {
                name: template.name().to_string(),
                resource: template.resource().path().to_string(),
                placeholders: template.tokens().iter().map(|t| t.to_string()).collect(),
                checksum: template.resource().checksum().to_string(),
            })
            .collect();

        Ok(RegistrySummary {
            databases,
            templates,
        })
    }
}
