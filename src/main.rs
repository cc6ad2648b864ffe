//! CLI for inspecting the test database registry
//!
//! Usage:
//!   testdbs list
//!   testdbs show db000
//!   testdbs template hopsworks_add_project
//!   testdbs render benchmark_add_row VALUE_COLUMN_1=1 "VALUE_COLUMN_2='abc'"
//!   testdbs plan
//!   testdbs summary

use rdrs_testdbs::config::Config;
use rdrs_testdbs::{ProvisionPlan, RegistryError, Substitutions, TestDbRegistry};
use std::env;
use std::process;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "warn,rdrs_testdbs=info";

fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _guard = init_logging(&config);

    if let Err(e) = dotenv {
        debug!("No .env file found or error loading it: {}", e);
    }

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);
    if args.len() < 2 {
        print_usage(program);
        process::exit(1);
    }

    let registry = match config.load_registry() {
        Ok(registry) => registry,
        Err(e) => exit_with(&e),
    };

    let result = match (args[1].as_str(), &args[2..]) {
        ("list", []) => {
            for identifier in registry.database_identifiers() {
                let kind = registry.kind_of(identifier)?;
                println!("{:<12} {:?}", identifier, kind);
            }
            Ok(())
        }
        ("show", [identifier]) => registry.schema_for(identifier).map(|resource| {
            print!("{}", resource.text());
        }),
        ("template", [name]) => registry.template_for(name).map(|(text, tokens)| {
            let names: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
            println!("-- placeholders: {}", names.join(", "));
            print!("{}", text);
        }),
        ("render", [name, pairs @ ..]) => render(&registry, name, pairs),
        ("plan", []) => ProvisionPlan::full(&registry).map(|plan| {
            for (i, identifier) in plan.identifiers().iter().enumerate() {
                println!("{:>3}. {}", i + 1, identifier);
            }
        }),
        ("summary", []) => {
            let summary = registry.summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        _ => {
            print_usage(program);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}

fn render(registry: &TestDbRegistry, name: &str, pairs: &[String]) -> rdrs_testdbs::Result<()> {
    let mut substitutions = Substitutions::new();

    for pair in pairs {
        match pair.split_once('=') {
            Some((token, value)) => {
                if substitutions.insert(token, value).is_some() {
                    warn!("Placeholder {} given more than once, using the last value", token);
                }
            }
            None => {
                return Err(RegistryError::Internal(format!(
                    "Expected TOKEN=value, got '{}'",
                    pair
                )));
            }
        }
    }

    let sql = registry.render(name, &substitutions)?;
    print!("{}", sql);
    Ok(())
}

fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("testdbs")
}

fn exit_with(err: &RegistryError) -> ! {
    match serde_json::to_string(&err.to_response()) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("Error: {}", err),
    }
    process::exit(2);
}

fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => {
            // Create log directory if it doesn't exist
            std::fs::create_dir_all(log_dir).unwrap_or_else(|e| {
                eprintln!("Warning: Could not create log directory {}: {}", log_dir.display(), e);
            });

            let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "testdbs.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        // Console output goes to stderr, stdout carries SQL
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {} list                             - List every test database", program);
    eprintln!("  {} show <identifier>                - Print a database schema", program);
    eprintln!("  {} template <name>                  - Print a template and its placeholders", program);
    eprintln!("  {} render <name> TOKEN=value ...    - Render a template", program);
    eprintln!("  {} plan                             - Print the provisioning order", program);
    eprintln!("  {} summary                          - Print identifiers and checksums as JSON", program);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TESTDBS_RESOURCE_DIR            Load schemas from a directory");
    eprintln!("  TESTDBS_UNUSED_SUBSTITUTIONS    error (default) | ignore");
    eprintln!("  LOG_DIR                         Also write JSON logs to this directory");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_without_argv() {
        assert_eq!(program_name(&[]), "testdbs");
        assert_eq!(program_name(&["/usr/bin/testdbs".to_string()]), "/usr/bin/testdbs");
    }

    #[test]
    fn test_default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
