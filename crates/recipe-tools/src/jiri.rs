//! jiri manifest tool client
//!
//! Drives the `jiri` binary to prepare a multi-repository checkout:
//! profile selection, cleanup, manifest import, sync and patching.

use crate::collaborators::ManifestTool;
use crate::command::{CommandRunner, CommandSpec, ProcessRunner};
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

/// Profile used by the jiri build recipe.
pub const DEFAULT_PROFILE: &str = "jiri";

/// Marker directory jiri creates at the root of a checkout.
pub const JIRI_ROOT_MARKER: &str = ".jiri_root";

/// jiri client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiriConfig {
    /// jiri executable name or path
    pub binary: String,
    /// Directory owned by this run; profiles resolve their root below it
    pub workspace_root: PathBuf,
    /// Per-command timeout in seconds (0 = none)
    pub timeout_secs: u64,
}

impl JiriConfig {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        JiriConfig {
            binary: "jiri".to_string(),
            workspace_root: workspace_root.into(),
            timeout_secs: 0,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// A named jiri configuration: where the checkout root lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiriProfile {
    pub name: String,
    pub root: PathBuf,
}

impl JiriProfile {
    /// Resolve a profile name against the workspace root.
    pub fn resolve(name: &str, workspace_root: &Path) -> Result<Self> {
        match name {
            DEFAULT_PROFILE => Ok(JiriProfile {
                name: name.to_string(),
                root: workspace_root.to_path_buf(),
            }),
            other => Err(ToolError::UnknownProfile(other.to_string())),
        }
    }
}

/// `ManifestTool` backed by the jiri command line.
pub struct JiriTool<R = ProcessRunner> {
    config: JiriConfig,
    runner: R,
    profile: RwLock<Option<JiriProfile>>,
}

impl JiriTool<ProcessRunner> {
    pub fn new(config: JiriConfig) -> Self {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<R: CommandRunner> JiriTool<R> {
    pub fn with_runner(config: JiriConfig, runner: R) -> Self {
        JiriTool {
            config,
            runner,
            profile: RwLock::new(None),
        }
    }

    /// Currently selected profile, if any.
    pub fn profile(&self) -> Option<JiriProfile> {
        self.profile
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn root(&self) -> Result<PathBuf> {
        self.profile()
            .map(|p| p.root)
            .ok_or(ToolError::ProfileNotSelected)
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.config.binary).timeout_secs(self.config.timeout_secs)
    }

    async fn run_in_root(&self, args: Vec<String>) -> Result<()> {
        let spec = self.command().args(args).current_dir(self.root()?);
        info!(command = %spec.display(), "Running jiri");
        self.runner.run(&spec).await?;
        Ok(())
    }
}

#[async_trait]
impl<R: CommandRunner> ManifestTool for JiriTool<R> {
    async fn ensure_tool(&self) -> Result<()> {
        let output = self.runner.run(&self.command().arg("version")).await?;
        debug!(version = %output.stdout.trim(), "jiri is available");
        Ok(())
    }

    async fn set_profile(&self, name: &str) -> Result<()> {
        let profile = JiriProfile::resolve(name, &self.config.workspace_root)?;
        tokio::fs::create_dir_all(&profile.root).await?;

        if !profile.root.join(JIRI_ROOT_MARKER).exists() {
            info!(root = ?profile.root, "Initializing jiri root");
            let spec = self
                .command()
                .arg("init")
                .arg(profile.root.to_string_lossy())
                .current_dir(&profile.root);
            self.runner.run(&spec).await?;
        }

        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = Some(profile);
        Ok(())
    }

    async fn clean(&self) -> Result<()> {
        self.run_in_root(vec!["project".into(), "-clean-all".into()])
            .await
    }

    async fn import_manifest(&self, manifest: &str, remote: &str, overwrite: bool) -> Result<()> {
        let mut args = vec!["import".to_string()];
        if overwrite {
            args.push("-overwrite".to_string());
        }
        args.push(manifest.to_string());
        args.push(remote.to_string());
        self.run_in_root(args).await
    }

    async fn update(&self, gc: bool) -> Result<()> {
        let mut args = vec!["update".to_string()];
        if gc {
            args.push("-gc".to_string());
        }
        self.run_in_root(args).await
    }

    async fn patch(&self, patch_ref: &str, host: &str, delete: bool, force: bool) -> Result<()> {
        let mut args = vec!["patch".to_string(), "-host".to_string(), host.to_string()];
        if delete {
            args.push("-delete".to_string());
        }
        if force {
            args.push("-force".to_string());
        }
        args.push(patch_ref.to_string());
        self.run_in_root(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedRunner;

    fn tool(root: &Path) -> (JiriTool<ScriptedRunner>, ScriptedRunner) {
        let runner = ScriptedRunner::new();
        let tool = JiriTool::with_runner(JiriConfig::new(root), runner.clone());
        (tool, runner)
    }

    #[test]
    fn test_resolve_default_profile() {
        let profile = JiriProfile::resolve("jiri", Path::new("/b")).unwrap();
        assert_eq!(profile.root, PathBuf::from("/b"));
    }

    #[test]
    fn test_resolve_unknown_profile() {
        let err = JiriProfile::resolve("chromium", Path::new("/b")).unwrap_err();
        assert!(matches!(err, ToolError::UnknownProfile(name) if name == "chromium"));
    }

    #[tokio::test]
    async fn test_commands_require_profile() {
        let dir = tempfile::tempdir().unwrap();
        let (tool, runner) = tool(dir.path());
        let err = tool.update(true).await.unwrap_err();
        assert!(matches!(err, ToolError::ProfileNotSelected));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_set_profile_initializes_root() {
        let dir = tempfile::tempdir().unwrap();
        let (tool, runner) = tool(dir.path());
        tool.set_profile("jiri").await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].args[0], "init");
        assert_eq!(tool.profile().unwrap().root, dir.path());
    }

    #[tokio::test]
    async fn test_set_profile_skips_init_for_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(JIRI_ROOT_MARKER)).unwrap();
        let (tool, runner) = tool(dir.path());
        tool.set_profile("jiri").await.unwrap();
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_command_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(JIRI_ROOT_MARKER)).unwrap();
        let (tool, runner) = tool(dir.path());

        tool.ensure_tool().await.unwrap();
        tool.set_profile("jiri").await.unwrap();
        tool.clean().await.unwrap();
        tool.import_manifest("jiri", "https://fuchsia.googlesource.com/manifest", true)
            .await
            .unwrap();
        tool.update(true).await.unwrap();
        tool.patch(
            "refs/changes/0/1/2",
            "https://fuchsia-review.googlesource.com",
            true,
            true,
        )
        .await
        .unwrap();

        let lines: Vec<String> = runner.commands().iter().map(|c| c.display()).collect();
        assert_eq!(
            lines,
            vec![
                "jiri version",
                "jiri project -clean-all",
                "jiri import -overwrite jiri https://fuchsia.googlesource.com/manifest",
                "jiri update -gc",
                "jiri patch -host https://fuchsia-review.googlesource.com -delete -force refs/changes/0/1/2",
            ]
        );
        assert!(runner.commands()[1..]
            .iter()
            .all(|c| c.cwd.as_deref() == Some(dir.path())));
    }
}
