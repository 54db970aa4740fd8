//! Env-var requirement validation for catalog packages.
//!
//! Reads the package's catalog manifest, reports its declared env vars
//! as JSON, and exits 2 when the manifest is missing or 1 when required
//! variables are not set.

pub mod availability;
pub mod requirements;

pub use availability::{EnvReport, check_availability};
pub use requirements::{EnvRequirements, EnvVarSpec, candidate_manifests, load_requirements};

use std::path::Path;

use crate::error::Result;

/// How an env check ended, for exit-code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvCheckOutcome {
    Ok,
    MissingVars,
    NotFound,
}

/// Run the check for one package and print the JSON report
pub fn run(catalog_root: &Path, package: &str) -> Result<EnvCheckOutcome> {
    let requirements = load_requirements(catalog_root, package);
    let report = check_availability(requirements, |key| std::env::var(key).ok());

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.requirements.found {
        Ok(EnvCheckOutcome::NotFound)
    } else if !report.can_validate {
        Ok(EnvCheckOutcome::MissingVars)
    } else {
        Ok(EnvCheckOutcome::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    #[test]
    fn test_run_not_found() {
        let dir = TempDir::new().unwrap();
        let outcome = run(dir.path(), "absent").unwrap();
        assert_eq!(outcome, EnvCheckOutcome::NotFound);
    }

    #[test]
    fn test_run_missing_vars() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("pkg.yaml")).unwrap();
        file.write_all(b"env:\n  - key: MCPOPS_TEST_SURELY_UNSET\n    required: true\n")
            .unwrap();

        let outcome = run(dir.path(), "pkg").unwrap();
        assert_eq!(outcome, EnvCheckOutcome::MissingVars);
    }

    #[test]
    fn test_run_ok_without_requirements() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("pkg.yaml")).unwrap();
        file.write_all(b"env:\n  - key: OPTIONAL_VAR\n    required: false\n").unwrap();

        let outcome = run(dir.path(), "pkg").unwrap();
        assert_eq!(outcome, EnvCheckOutcome::Ok);
    }
}
