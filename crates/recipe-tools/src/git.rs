//! Git queries against a checked-out project.

use crate::collaborators::VersionControl;
use crate::command::{CommandRunner, CommandSpec, ProcessRunner};
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use std::path::Path;

/// `VersionControl` backed by the git command line.
pub struct GitCli<R = ProcessRunner> {
    binary: String,
    runner: R,
}

impl GitCli<ProcessRunner> {
    pub fn new(binary: impl Into<String>) -> Self {
        Self::with_runner(binary, ProcessRunner)
    }
}

impl<R: CommandRunner> GitCli<R> {
    pub fn with_runner(binary: impl Into<String>, runner: R) -> Self {
        GitCli {
            binary: binary.into(),
            runner,
        }
    }
}

impl Default for GitCli<ProcessRunner> {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl<R: CommandRunner> VersionControl for GitCli<R> {
    /// Runs `git rev-parse HEAD` in `dir`.
    async fn rev_parse(&self, dir: &Path) -> Result<String> {
        let spec = CommandSpec::new(&self.binary)
            .args(["rev-parse", "HEAD"])
            .current_dir(dir);
        let output = self.runner.run(&spec).await?;

        let sha = output.stdout.trim().to_string();
        if sha.is_empty() {
            return Err(ToolError::EmptyOutput {
                command: spec.display(),
            });
        }
        Ok(sha)
    }
}
