//! Trigger sources and their resolution to a checkout.
//!
//! A run is either a direct branch build or a code-review verification.
//! Both resolve to one canonical [`Checkout`] before anything touches the
//! workspace.

use crate::error::{RecipeError, Result};
use crate::properties::BuildProperties;
use serde::{Deserialize, Serialize};

/// The only transport scheme accepted for repositories and review hosts.
pub const SECURE_SCHEME: &str = "https://";

/// What triggered the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSource {
    /// Scheduler or manual build of an explicit repository and refspec.
    Direct {
        repo_url: Option<String>,
        refspec: Option<String>,
    },

    /// Commit-queue verification of a Gerrit change.
    CodeReview {
        host: String,
        project: String,
        patch_ref: String,
    },
}

/// Validated repository URL and refspec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub repo_url: String,
    pub refspec: String,
}

impl Checkout {
    /// Both values must be non-empty and the URL must be https.
    pub fn new(repo_url: Option<&str>, refspec: Option<&str>) -> Result<Self> {
        let repo_url = non_empty(repo_url).ok_or(RecipeError::MissingProperty("repository"))?;
        let refspec = non_empty(refspec).ok_or(RecipeError::MissingProperty("refspec"))?;
        require_secure("repository", repo_url)?;

        Ok(Checkout {
            repo_url: repo_url.to_string(),
            refspec: refspec.to_string(),
        })
    }
}

impl TriggerSource {
    /// Classify the properties.
    ///
    /// Code-review runs need the Gerrit host, project and patch ref; direct
    /// runs take the explicit repository and refspec untouched.
    pub fn from_properties(props: &BuildProperties) -> Result<Self> {
        if !props.is_code_review() {
            return Ok(TriggerSource::Direct {
                repo_url: props.repo_url.clone(),
                refspec: props.refspec.clone(),
            });
        }

        let host = non_empty(props.gerrit_host.as_deref())
            .ok_or(RecipeError::MissingProperty("gerrit"))?;
        let project = non_empty(props.gerrit_project.as_deref())
            .ok_or(RecipeError::MissingProperty("patch_project"))?;
        let patch_ref = non_empty(props.gerrit_patch_ref.as_deref())
            .ok_or(RecipeError::MissingProperty("event.patchSet.ref"))?;

        Ok(TriggerSource::CodeReview {
            host: host.to_string(),
            project: project.to_string(),
            patch_ref: patch_ref.to_string(),
        })
    }

    /// Resolve to the repository and refspec to check out.
    pub fn resolve(&self) -> Result<Checkout> {
        match self {
            TriggerSource::Direct { repo_url, refspec } => {
                Checkout::new(repo_url.as_deref(), refspec.as_deref())
            }
            TriggerSource::CodeReview {
                host,
                project,
                patch_ref,
            } => {
                require_secure("gerrit", host)?;
                let repo_url = format!("{}/{}", host.trim_end_matches('/'), project);
                Checkout::new(Some(repo_url.as_str()), Some(patch_ref.as_str()))
            }
        }
    }

    /// Gerrit host and patch ref to apply after sync, for code-review runs.
    pub fn patch(&self) -> Option<(&str, &str)> {
        match self {
            TriggerSource::CodeReview {
                host, patch_ref, ..
            } => Some((host.as_str(), patch_ref.as_str())),
            TriggerSource::Direct { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TriggerSource::Direct { .. } => "direct",
            TriggerSource::CodeReview { .. } => "code_review",
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn require_secure(property: &'static str, url: &str) -> Result<()> {
    if url.starts_with(SECURE_SCHEME) {
        Ok(())
    } else {
        Err(RecipeError::InsecureUrl {
            property,
            url: url.to_string(),
        })
    }
}
