//! Go toolchain driver.

use crate::collaborators::Toolchain;
use crate::command::{CommandRunner, CommandSpec, ProcessRunner, ScopedEnv};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// `Toolchain` backed by the `go` command.
///
/// Commands run in `workdir` when one is set, so `go build` writes its
/// output binary there.
pub struct GoToolchain<R = ProcessRunner> {
    binary: String,
    workdir: Option<PathBuf>,
    timeout_secs: u64,
    runner: R,
}

impl GoToolchain<ProcessRunner> {
    pub fn new(binary: impl Into<String>) -> Self {
        Self::with_runner(binary, ProcessRunner)
    }
}

impl<R: CommandRunner> GoToolchain<R> {
    pub fn with_runner(binary: impl Into<String>, runner: R) -> Self {
        GoToolchain {
            binary: binary.into(),
            workdir: None,
            timeout_secs: 0,
            runner,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    fn command(&self) -> CommandSpec {
        let spec = CommandSpec::new(&self.binary).timeout_secs(self.timeout_secs);
        match &self.workdir {
            Some(dir) => spec.current_dir(dir),
            None => spec,
        }
    }
}

#[async_trait]
impl<R: CommandRunner> Toolchain for GoToolchain<R> {
    async fn install(&self) -> Result<()> {
        let output = self.runner.run(&self.command().arg("version")).await?;
        debug!(version = %output.stdout.trim(), "go is available");
        Ok(())
    }

    async fn build(
        &self,
        package: &str,
        ldflags: &str,
        env: &ScopedEnv,
        force: bool,
    ) -> Result<()> {
        let mut spec = self.command().arg("build");
        if force {
            spec = spec.arg("-a");
        }
        let spec = spec.args(["-ldflags", ldflags, package]).envs(env);
        info!(command = %spec.display(), env = ?env, "Building");
        self.runner.run(&spec).await?;
        Ok(())
    }

    async fn test(&self, package: &str, env: &ScopedEnv) -> Result<()> {
        let spec = self.command().args(["test", package]).envs(env);
        info!(command = %spec.display(), env = ?env, "Testing");
        self.runner.run(&spec).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedRunner;

    #[tokio::test]
    async fn test_forced_build_command() {
        let runner = ScriptedRunner::new();
        let go = GoToolchain::with_runner("go", runner.clone());
        let mut env = ScopedEnv::new();
        env.insert("GOOS".to_string(), "linux".to_string());
        env.insert("GOARCH".to_string(), "amd64".to_string());

        go.build("example.com/cmd/tool", "-X main.v=1", &env, true)
            .await
            .unwrap();

        let commands = runner.commands();
        assert_eq!(
            commands[0].args,
            vec!["build", "-a", "-ldflags", "-X main.v=1", "example.com/cmd/tool"]
        );
        assert_eq!(commands[0].env, env);
        assert_eq!(commands[0].cwd, None);
    }

    #[tokio::test]
    async fn test_commands_run_in_workdir() {
        let runner = ScriptedRunner::new();
        let go = GoToolchain::with_runner("go", runner.clone()).with_workdir("/b/build");
        let env = ScopedEnv::new();

        go.install().await.unwrap();
        go.build("p", "", &env, true).await.unwrap();
        go.test("p", &env).await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 3);
        for command in commands {
            assert_eq!(command.cwd, Some(PathBuf::from("/b/build")));
        }
    }

    #[tokio::test]
    async fn test_unforced_build_omits_flag() {
        let runner = ScriptedRunner::new();
        let go = GoToolchain::with_runner("go", runner.clone());
        go.build("p", "", &ScopedEnv::new(), false).await.unwrap();
        assert!(!runner.commands()[0].args.contains(&"-a".to_string()));
    }

    #[tokio::test]
    async fn test_test_command_uses_only_given_env() {
        let runner = ScriptedRunner::new();
        let go = GoToolchain::with_runner("go", runner.clone()).with_timeout(600);
        let mut env = ScopedEnv::new();
        env.insert("GOPATH".to_string(), "/b/go".to_string());

        go.test("example.com/cmd/tool", &env).await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands[0].args, vec!["test", "example.com/cmd/tool"]);
        assert_eq!(commands[0].env.len(), 1);
        assert_eq!(commands[0].timeout_secs, 600);
    }
}
