//! Dynamic Template Set
//!
//! Named SQL templates, each carrying the explicit set of placeholder tokens a
//! caller has to substitute before the text is valid SQL.

mod bundled;
mod set;
mod token;

pub use bundled::{
    benchmark, benchmark_add_row, hopsworks_add_project, textual_columns, TemplateSpec,
    DYNAMIC_TEMPLATES,
};
pub use set::{DynamicTemplate, SubstitutionPolicy, Substitutions, TemplateSet};
pub use token::{validate_tokens, PlaceholderToken};
