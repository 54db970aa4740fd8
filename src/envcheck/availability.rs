//! Checking declared requirements against the live environment.

use serde::Serialize;

use super::requirements::EnvRequirements;

/// Requirements plus what the current environment actually provides
#[derive(Debug, Clone, Serialize)]
pub struct EnvReport {
    #[serde(flatten)]
    pub requirements: EnvRequirements,
    pub missing_env_vars: Vec<String>,
    pub present_env_vars: Vec<String>,
    pub can_validate: bool,
}

/// Split the required variables into present and missing. An empty value
/// counts as missing.
pub fn check_availability(
    requirements: EnvRequirements,
    lookup: impl Fn(&str) -> Option<String>,
) -> EnvReport {
    let mut missing = Vec::new();
    let mut present = Vec::new();

    for key in &requirements.required_env_vars {
        match lookup(key) {
            Some(value) if !value.is_empty() => present.push(key.clone()),
            _ => missing.push(key.clone()),
        }
    }

    EnvReport {
        can_validate: missing.is_empty(),
        requirements,
        missing_env_vars: missing,
        present_env_vars: present,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn requirements(required: &[&str]) -> EnvRequirements {
        EnvRequirements {
            package: "pkg".to_string(),
            found: true,
            yaml_file: Some("pkg.yaml".to_string()),
            env_vars: Vec::new(),
            required_env_vars: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_all_present() {
        let vars = env(&[("A", "1"), ("B", "2")]);
        let report = check_availability(requirements(&["A", "B"]), |k| vars.get(k).cloned());

        assert!(report.can_validate);
        assert_eq!(report.present_env_vars, vec!["A".to_string(), "B".to_string()]);
        assert!(report.missing_env_vars.is_empty());
    }

    #[test]
    fn test_missing_vars() {
        let vars = env(&[("A", "1")]);
        let report = check_availability(requirements(&["A", "B"]), |k| vars.get(k).cloned());

        assert!(!report.can_validate);
        assert_eq!(report.missing_env_vars, vec!["B".to_string()]);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let vars = env(&[("A", "")]);
        let report = check_availability(requirements(&["A"]), |k| vars.get(k).cloned());

        assert!(!report.can_validate);
        assert_eq!(report.missing_env_vars, vec!["A".to_string()]);
    }

    #[test]
    fn test_no_requirements_validates() {
        let report = check_availability(requirements(&[]), |_| None);
        assert!(report.can_validate);
    }

    #[test]
    fn test_report_json_is_flat() {
        let report = check_availability(requirements(&[]), |_| None);
        let value = serde_json::to_value(&report).unwrap();

        // Requirements fields sit at the top level next to availability
        assert_eq!(value["package"], "pkg");
        assert_eq!(value["found"], true);
        assert_eq!(value["can_validate"], true);
        assert!(value["missing_env_vars"].as_array().unwrap().is_empty());
    }
}
