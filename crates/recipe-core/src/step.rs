//! Recipe step definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of the recipe, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipeStep {
    /// jiri version
    EnsureJiri,

    /// select the jiri profile (init the root if needed)
    SetProfile,

    /// jiri project -clean-all
    CleanProject,

    /// jiri import -overwrite <manifest> <remote>
    ImportManifest,

    /// jiri update -gc
    Update,

    /// jiri patch -host <host> -delete -force <ref> (code review only)
    Patch,

    /// go version
    InstallGo,

    /// git rev-parse HEAD in the source checkout
    RevParse,

    /// go build -a -ldflags <flags> <package>
    Build,

    /// go test <package>
    Test,
}

impl RecipeStep {
    /// Get the step name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            RecipeStep::EnsureJiri => "ensure_jiri",
            RecipeStep::SetProfile => "set_profile",
            RecipeStep::CleanProject => "clean_project",
            RecipeStep::ImportManifest => "import_manifest",
            RecipeStep::Update => "update",
            RecipeStep::Patch => "patch",
            RecipeStep::InstallGo => "install_go",
            RecipeStep::RevParse => "rev_parse",
            RecipeStep::Build => "build",
            RecipeStep::Test => "test",
        }
    }

    /// Full step sequence for a run, with or without the patch step.
    pub fn sequence(with_patch: bool) -> Vec<RecipeStep> {
        use RecipeStep::*;
        let mut steps = vec![EnsureJiri, SetProfile, CleanProject, ImportManifest, Update];
        if with_patch {
            steps.push(Patch);
        }
        steps.extend([InstallGo, RevParse, Build, Test]);
        steps
    }
}

impl fmt::Display for RecipeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing of a completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: RecipeStep,
    pub duration_ms: u64,
}
