use crate::error::Result;
use crate::registry::TestDbRegistry;
use crate::resource::{BundledResources, DirectoryResources};
use crate::template::SubstitutionPolicy;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Read schemas from this directory instead of the bundled copies
    pub resource_dir: Option<PathBuf>,
    pub substitution_policy: SubstitutionPolicy,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup, `from_env` passes the process environment
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resource_dir = var("TESTDBS_RESOURCE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let substitution_policy = var("TESTDBS_UNUSED_SUBSTITUTIONS")
            .unwrap_or_else(|| "error".to_string())
            .parse::<SubstitutionPolicy>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let log_dir = var("LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            resource_dir,
            substitution_policy,
            log_dir,
        })
    }

    /// Build a registry from the configured source
    pub fn load_registry(&self) -> Result<TestDbRegistry> {
        match &self.resource_dir {
            Some(dir) => TestDbRegistry::load(&DirectoryResources::new(dir), self.substitution_policy),
            None => TestDbRegistry::load(&BundledResources, self.substitution_policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(&[])).unwrap();

        assert!(config.resource_dir.is_none());
        assert!(config.log_dir.is_none());
        assert_eq!(config.substitution_policy, SubstitutionPolicy::Strict);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(lookup(&[
            ("TESTDBS_RESOURCE_DIR", "/opt/testdbs"),
            ("TESTDBS_UNUSED_SUBSTITUTIONS", "ignore"),
            ("LOG_DIR", ""),
        ]))
        .unwrap();

        assert_eq!(config.resource_dir, Some(PathBuf::from("/opt/testdbs")));
        assert_eq!(config.substitution_policy, SubstitutionPolicy::IgnoreUnused);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_invalid_policy() {
        let result = Config::from_vars(lookup(&[("TESTDBS_UNUSED_SUBSTITUTIONS", "warn")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_bundled_registry() {
        let registry = Config::default().load_registry().unwrap();
        assert_eq!(registry.templates().policy(), SubstitutionPolicy::Strict);
        assert!(!registry.all_identifiers().is_empty());
    }

    #[test]
    fn test_load_from_missing_directory() {
        let config = Config {
            resource_dir: Some(PathBuf::from("/nonexistent/testdbs")),
            ..Default::default()
        };
        assert_eq!(
            config.load_registry().unwrap_err().error_code(),
            "resource_load_failed"
        );
    }
}
