//! CLI tool to check that a schema catalogue loads cleanly
//!
//! Usage:
//!   cargo run --bin check-catalogue
//!   cargo run --bin check-catalogue -- /path/to/resources/testdbs

use std::env;
use std::path::Path;

use rdrs_testdbs::resource::{BundledResources, DirectoryResources, ResourceSource};
use rdrs_testdbs::{ProvisionPlan, SubstitutionPolicy, TestDbRegistry};

fn main() {
    let args: Vec<String> = env::args().collect();

    let directory;
    let source: &dyn ResourceSource = match args.get(1) {
        Some(dir) => {
            let path = Path::new(dir);
            if !path.is_dir() {
                eprintln!("Error: Path is not a directory: {}", path.display());
                std::process::exit(1);
            }
            directory = DirectoryResources::new(path);
            &directory
        }
        None => &BundledResources,
    };

    println!("Checking test database catalogue from {}", source.describe());
    println!();

    let registry = match TestDbRegistry::load(source, SubstitutionPolicy::Strict) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            std::process::exit(1);
        }
    };

    for identifier in registry.database_identifiers() {
        match registry.schema_for(identifier) {
            Ok(resource) => {
                println!("  {:<12} {}  {}", identifier, &resource.checksum()[..12], resource.path());
            }
            Err(e) => {
                eprintln!("Error [{}]: {}", e.error_code(), e);
                std::process::exit(1);
            }
        }
    }
    println!();

    for template in registry.templates().iter() {
        let tokens: Vec<&str> = template.tokens().iter().map(|t| t.as_str()).collect();
        println!("  {:<24} {}", template.name(), tokens.join(", "));
    }
    println!();

    match ProvisionPlan::full(&registry) {
        Ok(plan) => {
            println!(
                "OK: {} databases, {} templates, sentinel applied last",
                plan.len(),
                registry.templates().len()
            );
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            std::process::exit(1);
        }
    }
}
