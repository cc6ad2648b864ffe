//! Resource Sources
//!
//! Supplies the raw SQL text of every schema and template exactly once, while a
//! registry is being built. Paths are relative to the resource root:
//! ```text
//! resources/testdbs/
//!   ├── fixed/
//!   │   ├── DB000.sql ... DB024.sql
//!   │   ├── hopsworks.sql
//!   │   └── sentinel.sql
//!   └── dynamic/
//!       ├── benchmark.sql
//!       ├── benchmark_add_row.sql
//!       ├── hopsworks_add_project.sql
//!       └── textual_columns.sql
//! ```

use crate::error::{RegistryError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can hand out SQL text by relative resource path
pub trait ResourceSource {
    /// Human readable origin, used in log lines
    fn describe(&self) -> String;

    fn read(&self, path: &str) -> Result<String>;
}

/// Resources compiled into the binary
const BUNDLED: &[(&str, &str)] = &[
    ("fixed/DB000.sql", include_str!("../resources/testdbs/fixed/DB000.sql")),
    ("fixed/DB001.sql", include_str!("../resources/testdbs/fixed/DB001.sql")),
    ("fixed/DB002.sql", include_str!("../resources/testdbs/fixed/DB002.sql")),
    ("fixed/DB003.sql", include_str!("../resources/testdbs/fixed/DB003.sql")),
    ("fixed/DB004.sql", include_str!("../resources/testdbs/fixed/DB004.sql")),
    ("fixed/DB005.sql", include_str!("../resources/testdbs/fixed/DB005.sql")),
    ("fixed/DB006.sql", include_str!("../resources/testdbs/fixed/DB006.sql")),
    ("fixed/DB007.sql", include_str!("../resources/testdbs/fixed/DB007.sql")),
    ("fixed/DB008.sql", include_str!("../resources/testdbs/fixed/DB008.sql")),
    ("fixed/DB009.sql", include_str!("../resources/testdbs/fixed/DB009.sql")),
    ("fixed/DB010.sql", include_str!("../resources/testdbs/fixed/DB010.sql")),
    ("fixed/DB011.sql", include_str!("../resources/testdbs/fixed/DB011.sql")),
    ("fixed/DB013.sql", include_str!("../resources/testdbs/fixed/DB013.sql")),
    ("fixed/DB019.sql", include_str!("../resources/testdbs/fixed/DB019.sql")),
    ("fixed/DB020.sql", include_str!("../resources/testdbs/fixed/DB020.sql")),
    ("fixed/DB021.sql", include_str!("../resources/testdbs/fixed/DB021.sql")),
    ("fixed/DB022.sql", include_str!("../resources/testdbs/fixed/DB022.sql")),
    ("fixed/DB023.sql", include_str!("../resources/testdbs/fixed/DB023.sql")),
    ("fixed/DB024.sql", include_str!("../resources/testdbs/fixed/DB024.sql")),
    ("fixed/hopsworks.sql", include_str!("../resources/testdbs/fixed/hopsworks.sql")),
    ("fixed/sentinel.sql", include_str!("../resources/testdbs/fixed/sentinel.sql")),
    ("dynamic/benchmark.sql", include_str!("../resources/testdbs/dynamic/benchmark.sql")),
    ("dynamic/benchmark_add_row.sql", include_str!("../resources/testdbs/dynamic/benchmark_add_row.sql")),
    ("dynamic/hopsworks_add_project.sql", include_str!("../resources/testdbs/dynamic/hopsworks_add_project.sql")),
    ("dynamic/textual_columns.sql", include_str!("../resources/testdbs/dynamic/textual_columns.sql")),
];

/// SQL files embedded at build time
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResources;

impl ResourceSource for BundledResources {
    fn describe(&self) -> String {
        "bundled resources".to_string()
    }

    fn read(&self, path: &str) -> Result<String> {
        BUNDLED
            .iter()
            .find(|(bundled_path, _)| *bundled_path == path)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| RegistryError::ResourceLoad {
                path: path.to_string(),
                cause: "not bundled".to_string(),
            })
    }
}

/// SQL files read from a directory laid out like `resources/testdbs`
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl ResourceSource for DirectoryResources {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn read(&self, path: &str) -> Result<String> {
        let full_path = self.root.join(path);
        debug!("Reading schema resource {:?}", full_path);

        fs::read_to_string(&full_path).map_err(|e| RegistryError::ResourceLoad {
            path: path.to_string(),
            cause: e.to_string(),
        })
    }
}

/// Immutable SQL text together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaResource {
    path: String,
    text: String,
    checksum: String,
}

impl SchemaResource {
    pub fn new(path: &str, text: String) -> Self {
        let checksum = compute_checksum(&text);
        Self {
            path: path.to_string(),
            text,
            checksum,
        }
    }

    /// Read a resource from a source
    pub fn load(source: &dyn ResourceSource, path: &str) -> Result<Self> {
        let text = source.read(path)?;
        if text.trim().is_empty() {
            return Err(RegistryError::ResourceLoad {
                path: path.to_string(),
                cause: "resource is empty".to_string(),
            });
        }
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// SHA256 of the text, hex encoded
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

/// Compute SHA256 checksum of SQL text
pub(crate) fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_read() {
        let text = BundledResources.read("fixed/DB000.sql").unwrap();
        assert!(text.contains("CREATE DATABASE db000"));

        let err = BundledResources.read("fixed/DB999.sql").unwrap_err();
        assert_eq!(err.error_code(), "resource_load_failed");
    }

    #[test]
    fn test_bundled_paths_are_unique() {
        for (i, (path, _)) in BUNDLED.iter().enumerate() {
            assert!(
                BUNDLED[i + 1..].iter().all(|(other, _)| other != path),
                "{} bundled twice",
                path
            );
        }
    }

    #[test]
    fn test_directory_read() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("fixed")).unwrap();
        fs::write(temp_dir.path().join("fixed/DB000.sql"), "CREATE DATABASE db000;").unwrap();

        let source = DirectoryResources::new(temp_dir.path());
        assert_eq!(source.read("fixed/DB000.sql").unwrap(), "CREATE DATABASE db000;");

        let err = source.read("fixed/DB001.sql").unwrap_err();
        assert!(matches!(err, RegistryError::ResourceLoad { ref path, .. } if path == "fixed/DB001.sql"));
    }

    #[test]
    fn test_empty_resource_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("blank.sql"), "  \n").unwrap();

        let source = DirectoryResources::new(temp_dir.path());
        assert!(SchemaResource::load(&source, "blank.sql").is_err());
    }

    #[test]
    fn test_checksum_is_stable() {
        let a = SchemaResource::new("a.sql", "SELECT 1;".to_string());
        let b = SchemaResource::new("b.sql", "SELECT 1;".to_string());
        let c = SchemaResource::new("c.sql", "SELECT 2;".to_string());

        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());
        assert_eq!(a.checksum().len(), 64);
    }
}
