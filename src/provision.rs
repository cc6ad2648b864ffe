//! Provisioning runner
//!
//! Rules:
//! - If the sentinel database exists, the whole catalogue is already in place and
//!   nothing is applied
//! - Otherwise every database is applied, stopping at the first failure
//! - The sentinel is applied last, and only after everything else succeeded
//!
//! The order among non-sentinel databases is identifier order. It carries no
//! dependency meaning.

use crate::catalogue::SENTINEL;
use crate::error::{RegistryError, Result};
use crate::registry::TestDbRegistry;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Connection to the database server the schemas are applied to
pub trait SqlExecutor {
    type Error: Display;

    fn database_exists(&mut self, database: &str) -> std::result::Result<bool, Self::Error>;

    /// Run a multi-statement SQL script on behalf of `database`
    fn execute(&mut self, database: &str, sql: &str) -> std::result::Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionStep<'a> {
    pub identifier: &'a str,
    pub sql: &'a str,
}

/// Ordered list of schemas to apply
#[derive(Debug, Clone)]
pub struct ProvisionPlan<'a> {
    steps: Vec<ProvisionStep<'a>>,
}

impl<'a> ProvisionPlan<'a> {
    /// Every fixed and dynamic database, sentinel last
    pub fn full(registry: &'a TestDbRegistry) -> Result<Self> {
        let identifiers: Vec<&str> = registry.database_identifiers().into_iter().collect();
        Self::for_identifiers(registry, &identifiers)
    }

    /// A subset of databases. The sentinel is included only when asked for, and then last.
    pub fn for_identifiers(registry: &'a TestDbRegistry, identifiers: &[&'a str]) -> Result<Self> {
        let mut steps = Vec::with_capacity(identifiers.len());
        let mut sentinel = None;

        for &identifier in identifiers {
            let resource = registry.schema_for(identifier)?;
            let step = ProvisionStep {
                identifier,
                sql: resource.text(),
            };

            if identifier == SENTINEL {
                sentinel = Some(step);
            } else if !steps.iter().any(|s: &ProvisionStep| s.identifier == identifier) {
                steps.push(step);
            }
        }

        steps.extend(sentinel);
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ProvisionStep<'a>] {
        &self.steps
    }

    pub fn identifiers(&self) -> Vec<&'a str> {
        self.steps.iter().map(|step| step.identifier).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Outcome of a provisioning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub applied: Vec<String>,
    /// True when the sentinel already existed and nothing was applied
    pub already_provisioned: bool,
}

pub struct Provisioner<'a> {
    registry: &'a TestDbRegistry,
}

impl<'a> Provisioner<'a> {
    pub fn new(registry: &'a TestDbRegistry) -> Self {
        Self { registry }
    }

    /// Create every test database unless the sentinel says they already exist
    pub fn provision<E: SqlExecutor>(&self, executor: &mut E) -> Result<ProvisionReport> {
        let exists = executor
            .database_exists(SENTINEL)
            .map_err(|e| RegistryError::ProvisionFailed {
                identifier: SENTINEL.to_string(),
                cause: format!("Failed to check for sentinel database: {}", e),
            })?;

        if exists {
            info!("Sentinel database present, test databases already provisioned");
            return Ok(ProvisionReport {
                applied: Vec::new(),
                already_provisioned: true,
            });
        }

        let plan = ProvisionPlan::full(self.registry)?;
        self.apply(&plan, executor)
    }

    /// Apply only the given databases, regardless of the sentinel
    pub fn provision_only<E: SqlExecutor>(
        &self,
        executor: &mut E,
        identifiers: &[&str],
    ) -> Result<ProvisionReport> {
        let plan = ProvisionPlan::for_identifiers(self.registry, identifiers)?;
        self.apply(&plan, executor)
    }

    fn apply<E: SqlExecutor>(
        &self,
        plan: &ProvisionPlan<'_>,
        executor: &mut E,
    ) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();

        for step in plan.steps() {
            debug!("Applying schema for {}", step.identifier);

            if let Err(e) = executor.execute(step.identifier, step.sql) {
                warn!(
                    "Failed to apply schema for {} after {} successful: {}",
                    step.identifier,
                    report.applied.len(),
                    e
                );
                return Err(RegistryError::ProvisionFailed {
                    identifier: step.identifier.to_string(),
                    cause: e.to_string(),
                });
            }

            report.applied.push(step.identifier.to_string());
        }

        info!("Provisioned {} test databases", report.applied.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{DB000, DB001, DB012, HOPSWORKS};
    use std::collections::HashSet;

    /// Records what was executed, optionally failing on one database
    #[derive(Default)]
    struct RecordingExecutor {
        existing: HashSet<String>,
        executed: Vec<(String, String)>,
        fail_on: Option<String>,
    }

    impl SqlExecutor for RecordingExecutor {
        type Error = String;

        fn database_exists(&mut self, database: &str) -> std::result::Result<bool, String> {
            Ok(self.existing.contains(database))
        }

        fn execute(&mut self, database: &str, sql: &str) -> std::result::Result<(), String> {
            if self.fail_on.as_deref() == Some(database) {
                return Err(format!("syntax error in {}", database));
            }
            self.executed.push((database.to_string(), sql.to_string()));
            self.existing.insert(database.to_string());
            Ok(())
        }
    }

    fn registry() -> &'static TestDbRegistry {
        TestDbRegistry::bundled().unwrap()
    }

    #[test]
    fn test_full_plan_puts_sentinel_last() {
        let plan = ProvisionPlan::full(registry()).unwrap();
        let identifiers = plan.identifiers();

        assert_eq!(identifiers.len(), registry().database_identifiers().len());
        assert_eq!(identifiers.last(), Some(&SENTINEL));
        assert_eq!(identifiers.iter().filter(|id| **id == SENTINEL).count(), 1);
        assert!(identifiers.contains(&DB012));
    }

    #[test]
    fn test_provision_applies_everything_then_sentinel() {
        let mut executor = RecordingExecutor::default();
        let report = Provisioner::new(registry()).provision(&mut executor).unwrap();

        assert!(!report.already_provisioned);
        assert_eq!(report.applied.len(), registry().database_identifiers().len());
        assert_eq!(report.applied.last().map(String::as_str), Some(SENTINEL));

        let (db, sql) = executor
            .executed
            .iter()
            .find(|(db, _)| db == DB000)
            .unwrap();
        assert_eq!(db, DB000);
        assert_eq!(sql, registry().lookup(DB000).unwrap());
    }

    #[test]
    fn test_failure_stops_before_sentinel() {
        let mut executor = RecordingExecutor {
            fail_on: Some(DB001.to_string()),
            ..Default::default()
        };

        let err = Provisioner::new(registry()).provision(&mut executor).unwrap_err();
        assert_eq!(
            err,
            RegistryError::ProvisionFailed {
                identifier: DB001.to_string(),
                cause: "syntax error in db001".to_string(),
            }
        );
        assert!(!executor.existing.contains(SENTINEL));
        assert!(executor.executed.iter().all(|(db, _)| db != SENTINEL));
    }

    #[test]
    fn test_existing_sentinel_skips_provisioning() {
        let mut executor = RecordingExecutor::default();
        executor.existing.insert(SENTINEL.to_string());

        let report = Provisioner::new(registry()).provision(&mut executor).unwrap();
        assert!(report.already_provisioned);
        assert!(report.applied.is_empty());
        assert!(executor.executed.is_empty());
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let mut executor = RecordingExecutor::default();
        let provisioner = Provisioner::new(registry());

        provisioner.provision(&mut executor).unwrap();
        let executed = executor.executed.len();

        let report = provisioner.provision(&mut executor).unwrap();
        assert!(report.already_provisioned);
        assert_eq!(executor.executed.len(), executed);
    }

    #[test]
    fn test_provision_only_subset() {
        let mut executor = RecordingExecutor::default();
        let report = Provisioner::new(registry())
            .provision_only(&mut executor, &[SENTINEL, HOPSWORKS, DB012, HOPSWORKS])
            .unwrap();

        assert_eq!(report.applied, vec![HOPSWORKS, DB012, SENTINEL]);

        let report = Provisioner::new(registry())
            .provision_only(&mut executor, &[DB000])
            .unwrap();
        assert_eq!(report.applied, vec![DB000]);
    }

    #[test]
    fn test_provision_only_unknown_identifier() {
        let mut executor = RecordingExecutor::default();
        let err = Provisioner::new(registry())
            .provision_only(&mut executor, &[DB000, "db999"])
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::UnknownIdentifier {
                identifier: "db999".to_string()
            }
        );
        assert!(executor.executed.is_empty());
    }
}
