//! RDRS Test Database Library
//!
//! This library provides the schema registry used to provision the disposable
//! databases of the REST API server test suite: the fixed schema catalogue,
//! the dynamic SQL templates with their placeholders, and a provisioning
//! runner that applies the sentinel database last.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod provision;
pub mod registry;
pub mod resource;
pub mod template;

pub use catalogue::StaticCatalogue;
pub use error::{RegistryError, Result};
pub use provision::{ProvisionPlan, ProvisionReport, Provisioner, SqlExecutor};
pub use registry::TestDbRegistry;
pub use template::{DynamicTemplate, PlaceholderToken, SubstitutionPolicy, Substitutions, TemplateSet};
