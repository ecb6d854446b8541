//! Build metadata embedded into the binary at link time.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Go package holding the injected version variables.
pub const VERSION_PACKAGE: &str = "fuchsia.googlesource.com/jiri/version";

/// Variable receiving the commit hash.
pub const GIT_COMMIT_VAR: &str = "GitCommit";

/// Variable receiving the build timestamp.
pub const BUILD_TIME_VAR: &str = "BuildTime";

/// ISO-8601 local time, microsecond precision, no offset.
const BUILD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Commit hash and timestamp for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStamp {
    pub git_commit: String,
    pub build_time: NaiveDateTime,
}

impl BuildStamp {
    pub fn new(git_commit: impl Into<String>, build_time: NaiveDateTime) -> Self {
        Self {
            git_commit: git_commit.into(),
            build_time,
        }
    }

    /// Stamp `git_commit` with the current local time.
    pub fn now(git_commit: impl Into<String>) -> Self {
        Self::new(git_commit, Local::now().naive_local())
    }

    pub fn build_time_iso(&self) -> String {
        self.build_time.format(BUILD_TIME_FORMAT).to_string()
    }

    /// Linker flags setting both version variables.
    pub fn ldflags(&self) -> String {
        format!(
            "-X \"{pkg}.{commit_var}={commit}\" -X \"{pkg}.{time_var}={time}\"",
            pkg = VERSION_PACKAGE,
            commit_var = GIT_COMMIT_VAR,
            commit = self.git_commit,
            time_var = BUILD_TIME_VAR,
            time = self.build_time_iso(),
        )
    }
}
