//! Bundled dynamic templates and the placeholders each one declares.
//! Tokens are scoped to their template; the same marker text in two templates
//! means two unrelated placeholders.

use super::token::PlaceholderToken;

/// Declaration of a dynamic template: name, resource path, placeholder set
#[derive(Debug, Clone, Copy)]
pub struct TemplateSpec {
    pub name: &'static str,
    pub path: &'static str,
    pub tokens: &'static [PlaceholderToken],
}

/// Creates the `rdrs_bench` database with variable-length key columns
pub mod benchmark {
    use super::PlaceholderToken;

    pub const NAME: &str = "benchmark";
    pub const COLUMN_LENGTH: PlaceholderToken = PlaceholderToken::new("COLUMN_LENGTH");
}

/// Inserts one row into `rdrs_bench.table_1`
pub mod benchmark_add_row {
    use super::PlaceholderToken;

    pub const NAME: &str = "benchmark_add_row";
    pub const VALUE_COLUMN_1: PlaceholderToken = PlaceholderToken::new("VALUE_COLUMN_1");
    pub const VALUE_COLUMN_2: PlaceholderToken = PlaceholderToken::new("VALUE_COLUMN_2");
}

/// Adds a project owned by the test user to the `hopsworks` database
pub mod hopsworks_add_project {
    use super::PlaceholderToken;

    pub const NAME: &str = "hopsworks_add_project";
    pub const PROJECT_NAME: PlaceholderToken = PlaceholderToken::new("PROJECT_NAME");
    pub const PROJECT_NUMBER: PlaceholderToken = PlaceholderToken::new("PROJECT_NUMBER");
}

/// Creates a database whose key and value columns share one textual type
pub mod textual_columns {
    use super::PlaceholderToken;

    pub const NAME: &str = "textual_columns";
    pub const DATABASE_NAME: PlaceholderToken = PlaceholderToken::new("DATABASE_NAME");
    pub const COLUMN_TYPE: PlaceholderToken = PlaceholderToken::new("COLUMN_TYPE");
    pub const COLUMN_LENGTH: PlaceholderToken = PlaceholderToken::new("COLUMN_LENGTH");
}

pub const DYNAMIC_TEMPLATES: &[TemplateSpec] = &[
    TemplateSpec {
        name: benchmark::NAME,
        path: "dynamic/benchmark.sql",
        tokens: &[benchmark::COLUMN_LENGTH],
    },
    TemplateSpec {
        name: benchmark_add_row::NAME,
        path: "dynamic/benchmark_add_row.sql",
        tokens: &[
            benchmark_add_row::VALUE_COLUMN_1,
            benchmark_add_row::VALUE_COLUMN_2,
        ],
    },
    TemplateSpec {
        name: hopsworks_add_project::NAME,
        path: "dynamic/hopsworks_add_project.sql",
        tokens: &[
            hopsworks_add_project::PROJECT_NAME,
            hopsworks_add_project::PROJECT_NUMBER,
        ],
    },
    TemplateSpec {
        name: textual_columns::NAME,
        path: "dynamic/textual_columns.sql",
        tokens: &[
            textual_columns::DATABASE_NAME,
            textual_columns::COLUMN_TYPE,
            textual_columns::COLUMN_LENGTH,
        ],
    },
];
