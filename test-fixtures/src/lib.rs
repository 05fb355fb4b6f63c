//! Fixture loader for Vantage scenario files and rule sets.
//!
//! Scenarios are JSON documents describing one or more projects (snapshots plus an
//! optional workload), the evaluation time, and the values a test should observe.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use vantage_core::models::{ProjectSnapshot, Workload};

/// Root directory of the test-fixtures folder.
pub fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // Walk up from whichever crate is running the tests.
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as text, e.g. a TOML rule set.
pub fn load_text(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// All JSON files in a fixture subdirectory, sorted.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension()
                .is_some_and(|ext| ext == "json")
                .then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// One project inside a [`Scenario`].
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioProject {
    pub project_id: String,
    pub snapshots: Vec<ProjectSnapshot>,
    #[serde(default)]
    pub workload: Option<Workload>,
}

/// A complete evaluation scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub as_of: DateTime<Utc>,
    /// Rule set under `rules/`, if the scenario needs one.
    #[serde(default)]
    pub rules: Option<String>,
    pub projects: Vec<ScenarioProject>,
    /// Free-form expectations checked by the test that loads the scenario.
    #[serde(default)]
    pub expected: serde_json::Value,
}

impl Scenario {
    /// Load `scenarios/<name>.json`.
    pub fn load(name: &str) -> Self {
        load_fixture(&format!("scenarios/{name}.json"))
    }

    /// The scenario's rule set as TOML, or an empty document.
    pub fn rules_toml(&self) -> String {
        self.rules
            .as_deref()
            .map(|file| load_text(&format!("rules/{file}")))
            .unwrap_or_default()
    }

    pub fn project(&self, project_id: &str) -> Option<&ScenarioProject> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }
}
