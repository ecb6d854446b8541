//! Trigger properties handed to the recipe by the CI scheduler.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category value marking a commit-queue (code review) run.
pub const CQ_CATEGORY: &str = "cq";

/// Refspec used when none is supplied.
pub const DEFAULT_REFSPEC: &str = "master";

fn default_refspec() -> Option<String> {
    Some(DEFAULT_REFSPEC.to_string())
}

/// Raw build properties, keyed the way the scheduler names them.
///
/// Unknown keys are ignored; the scheduler sends many properties this
/// recipe does not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProperties {
    /// Gerrit host, e.g. `https://fuchsia-review.googlesource.com`.
    #[serde(rename = "gerrit", default)]
    pub gerrit_host: Option<String>,

    /// Gerrit project the change belongs to.
    #[serde(rename = "patch_project", default)]
    pub gerrit_project: Option<String>,

    /// Gerrit patch set ref, e.g. `refs/changes/0/1/2`.
    #[serde(rename = "event.patchSet.ref", default)]
    pub gerrit_patch_ref: Option<String>,

    /// Full URL of the git repository.
    #[serde(rename = "repository", default)]
    pub repo_url: Option<String>,

    #[serde(default = "default_refspec")]
    pub refspec: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// jiri manifest to import.
    #[serde(default)]
    pub manifest: Option<String>,

    /// Remote manifest repository.
    #[serde(default)]
    pub remote: Option<String>,

    /// Target platform, `<os>-<arch>`.
    #[serde(default)]
    pub target: Option<String>,
}

impl Default for BuildProperties {
    fn default() -> Self {
        Self {
            gerrit_host: None,
            gerrit_project: None,
            gerrit_patch_ref: None,
            repo_url: None,
            refspec: default_refspec(),
            category: None,
            manifest: None,
            remote: None,
            target: None,
        }
    }
}

impl BuildProperties {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load properties from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Whether this run was triggered by code review.
    pub fn is_code_review(&self) -> bool {
        self.category.as_deref() == Some(CQ_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeError;

    #[test]
    fn test_defaults() {
        let props = BuildProperties::default();
        assert_eq!(props.refspec.as_deref(), Some("master"));
        assert!(props.repo_url.is_none());
        assert!(!props.is_code_review());
    }

    #[test]
    fn test_scheduler_keys() {
        let json = r#"{
            "category": "cq",
            "gerrit": "https://fuchsia-review.googlesource.com",
            "patch_project": "jiri",
            "event.patchSet.ref": "refs/changes/0/1/2",
            "manifest": "jiri",
            "remote": "https://fuchsia.googlesource.com/manifest",
            "target": "linux-amd64",
            "buildername": "jiri-linux-amd64"
        }"#;
        let props = BuildProperties::from_json_str(json).unwrap();
        assert!(props.is_code_review());
        assert_eq!(props.gerrit_patch_ref.as_deref(), Some("refs/changes/0/1/2"));
        assert_eq!(props.gerrit_project.as_deref(), Some("jiri"));
        assert_eq!(props.refspec.as_deref(), Some("master"));
    }

    #[test]
    fn test_explicit_null_refspec_is_kept() {
        let props = BuildProperties::from_json_str(r#"{"refspec": null}"#).unwrap();
        assert!(props.refspec.is_none());
    }

    #[test]
    fn test_malformed_json() {
        let err = BuildProperties::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, RecipeError::InvalidProperties(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("properties.json");
        std::fs::write(&path, r#"{"repository": "https://fuchsia.googlesource.com/jiri"}"#)
            .unwrap();
        let props = BuildProperties::from_path(&path).unwrap();
        assert_eq!(
            props.repo_url.as_deref(),
            Some("https://fuchsia.googlesource.com/jiri")
        );
    }
}
