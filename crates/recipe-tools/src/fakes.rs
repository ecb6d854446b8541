//! In-memory fakes for the collaborator traits (testing and plan mode)
//!
//! Provides `ScriptedRunner`, a `CommandRunner` that records command specs
//! instead of spawning them, and `RecordingTools`, which implements every
//! collaborator trait by appending a `ToolCall` to an ordered log.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::collaborators::{ManifestTool, Toolchain, VersionControl};
use crate::command::{CommandOutput, CommandRunner, CommandSpec, ScopedEnv};
use crate::error::{Result, ToolError};

/// Revision reported by `RecordingTools` unless overridden.
pub const FAKE_REVISION: &str = "c22471f4e3f842ae18dd9adec82ed9eb78ed1127";

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Script {
    commands: Vec<CommandSpec>,
    responses: HashMap<String, String>,
    failures: HashMap<String, (i32, String)>,
}

/// Command runner that records specs and answers from a script.
///
/// Commands are matched by their `display()` line. Unscripted commands
/// succeed with empty output. Clones share the same script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    script: Arc<Mutex<Script>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command_line` with `stdout`.
    pub fn respond(&self, command_line: &str, stdout: &str) {
        let mut script = self.script.lock().unwrap();
        script
            .responses
            .insert(command_line.to_string(), stdout.to_string());
    }

    /// Make `command_line` exit with `exit_code`.
    pub fn fail(&self, command_line: &str, exit_code: i32, output: &str) {
        let mut script = self.script.lock().unwrap();
        script
            .failures
            .insert(command_line.to_string(), (exit_code, output.to_string()));
    }

    /// Every command run so far, in order.
    pub fn commands(&self) -> Vec<CommandSpec> {
        self.script.lock().unwrap().commands.clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let line = spec.display();
        let mut script = self.script.lock().unwrap();
        script.commands.push(spec.clone());

        if let Some((exit_code, output)) = script.failures.get(&line) {
            return Err(ToolError::failed(line, *exit_code, output.clone()));
        }

        Ok(CommandOutput {
            exit_code: 0,
            stdout: script.responses.get(&line).cloned().unwrap_or_default(),
            stderr: String::new(),
            duration_ms: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// RecordingTools
// ---------------------------------------------------------------------------

/// One collaborator call, as seen by `RecordingTools`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ToolCall {
    EnsureTool,
    SetProfile {
        name: String,
    },
    Clean,
    ImportManifest {
        manifest: String,
        remote: String,
        overwrite: bool,
    },
    Update {
        gc: bool,
    },
    Patch {
        patch_ref: String,
        host: String,
        delete: bool,
        force: bool,
    },
    RevParse {
        dir: PathBuf,
    },
    Install,
    Build {
        package: String,
        ldflags: String,
        env: ScopedEnv,
        force: bool,
    },
    Test {
        package: String,
        env: ScopedEnv,
    },
}

impl ToolCall {
    /// Operation name, matching the trait method.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::EnsureTool => "ensure_tool",
            ToolCall::SetProfile { .. } => "set_profile",
            ToolCall::Clean => "clean",
            ToolCall::ImportManifest { .. } => "import_manifest",
            ToolCall::Update { .. } => "update",
            ToolCall::Patch { .. } => "patch",
            ToolCall::RevParse { .. } => "rev_parse",
            ToolCall::Install => "install",
            ToolCall::Build { .. } => "build",
            ToolCall::Test { .. } => "test",
        }
    }
}

/// Implements every collaborator trait by recording calls in order.
#[derive(Debug)]
pub struct RecordingTools {
    calls: Mutex<Vec<ToolCall>>,
    revision: String,
    fail_on: Option<&'static str>,
}

impl Default for RecordingTools {
    fn default() -> Self {
        RecordingTools {
            calls: Mutex::new(Vec::new()),
            revision: FAKE_REVISION.to_string(),
            fail_on: None,
        }
    }
}

impl RecordingTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `revision` from `rev_parse`.
    pub fn with_revision(mut self, revision: &str) -> Self {
        self.revision = revision.to_string();
        self
    }

    /// Fail the first call whose `ToolCall::name` equals `name`.
    pub fn failing_on(mut self, name: &'static str) -> Self {
        self.fail_on = Some(name);
        self
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Names of the calls recorded so far.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(ToolCall::name).collect()
    }

    fn record(&self, call: ToolCall) -> Result<()> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(name) {
            return Err(ToolError::failed(name, 1, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ManifestTool for RecordingTools {
    async fn ensure_tool(&self) -> Result<()> {
        self.record(ToolCall::EnsureTool)
    }

    async fn set_profile(&self, name: &str) -> Result<()> {
        self.record(ToolCall::SetProfile {
            name: name.to_string(),
        })
    }

    async fn clean(&self) -> Result<()> {
        self.record(ToolCall::Clean)
    }

    async fn import_manifest(&self, manifest: &str, remote: &str, overwrite: bool) -> Result<()> {
        self.record(ToolCall::ImportManifest {
            manifest: manifest.to_string(),
            remote: remote.to_string(),
            overwrite,
        })
    }

    async fn update(&self, gc: bool) -> Result<()> {
        self.record(ToolCall::Update { gc })
    }

    async fn patch(&self, patch_ref: &str, host: &str, delete: bool, force: bool) -> Result<()> {
        self.record(ToolCall::Patch {
            patch_ref: patch_ref.to_string(),
            host: host.to_string(),
            delete,
            force,
        })
    }
}

#[async_trait]
impl VersionControl for RecordingTools {
    async fn rev_parse(&self, dir: &Path) -> Result<String> {
        self.record(ToolCall::RevParse {
            dir: dir.to_path_buf(),
        })?;
        Ok(self.revision.clone())
    }
}

#[async_trait]
impl Toolchain for RecordingTools {
    async fn install(&self) -> Result<()> {
        self.record(ToolCall::Install)
    }

    async fn build(
        &self,
        package: &str,
        ldflags: &str,
        env: &ScopedEnv,
        force: bool,
    ) -> Result<()> {
        self.record(ToolCall::Build {
            package: package.to_string(),
            ldflags: ldflags.to_string(),
            env: env.clone(),
            force,
        })
    }

    async fn test(&self, package: &str, env: &ScopedEnv) -> Result<()> {
        self.record(ToolCall::Test {
            package: package.to_string(),
            env: env.clone(),
        })
    }
}
