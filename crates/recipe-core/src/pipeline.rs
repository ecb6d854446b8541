//! Recipe orchestration.

use crate::error::{RecipeError, Result};
use crate::obs;
use crate::platform::TargetPlatform;
use crate::properties::BuildProperties;
use crate::request::BuildRequest;
use crate::stamp::BuildStamp;
use crate::step::{RecipeStep, StepRecord};
use crate::trigger::Checkout;
use crate::workspace::{Workspace, JIRI_PACKAGE};
use recipe_tools::{ManifestTool, Toolchain, VersionControl, DEFAULT_PROFILE};
use serde::Serialize;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// The external tools a run drives.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub manifest: &'a dyn ManifestTool,
    pub vcs: &'a dyn VersionControl,
    pub toolchain: &'a dyn Toolchain,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        manifest: &'a dyn ManifestTool,
        vcs: &'a dyn VersionControl,
        toolchain: &'a dyn Toolchain,
    ) -> Self {
        Self {
            manifest,
            vcs,
            toolchain,
        }
    }

    /// Use one value for every role (fakes implement all three traits).
    pub fn from_one<T>(tools: &'a T) -> Self
    where
        T: ManifestTool + VersionControl + Toolchain,
    {
        Self::new(tools, tools, tools)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeReport {
    /// Run ID attached to every log line of the run.
    pub run_id: String,

    /// `direct` or `code_review`.
    pub trigger: &'static str,

    pub checkout: Checkout,

    pub target: TargetPlatform,

    /// Whether a code-review patch was applied after sync.
    pub patched: bool,

    pub stamp: BuildStamp,

    /// Linker flags passed to the build.
    pub ldflags: String,

    /// Completed steps, in order.
    pub steps: Vec<StepRecord>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// The jiri build recipe.
///
/// Steps run strictly in sequence; the first failure ends the run and is
/// reported as `RecipeError::StepFailed` naming the step. Nothing is retried.
pub struct Recipe<'a> {
    workspace: Workspace,
    tools: Collaborators<'a>,
}

impl<'a> Recipe<'a> {
    pub fn new(workspace: Workspace, tools: Collaborators<'a>) -> Self {
        Self { workspace, tools }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Validate `props` and run the recipe.
    ///
    /// Invalid properties fail before any collaborator is called.
    pub async fn run(&self, props: &BuildProperties) -> Result<RecipeReport> {
        let request = BuildRequest::from_properties(props)?;
        self.execute(&request).await
    }

    /// Run the recipe for an already validated request.
    pub async fn execute(&self, request: &BuildRequest) -> Result<RecipeReport> {
        let run_id = Uuid::new_v4().to_string();
        let span = obs::run_span(&run_id);
        self.execute_in_span(run_id, request).instrument(span).await
    }

    async fn execute_in_span(&self, run_id: String, request: &BuildRequest) -> Result<RecipeReport> {
        let start = Instant::now();
        obs::emit_run_started(
            &run_id,
            request.trigger.kind(),
            &request.checkout.repo_url,
            &request.checkout.refspec,
            &request.target.to_string(),
        );

        let mut steps = Vec::new();
        let result = self.run_steps(request, &mut steps).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        obs::emit_run_finished(&run_id, duration_ms, steps.len(), result.is_ok());
        let stamp = result?;

        Ok(RecipeReport {
            run_id,
            trigger: request.trigger.kind(),
            checkout: request.checkout.clone(),
            target: request.target.clone(),
            patched: request.trigger.patch().is_some(),
            ldflags: stamp.ldflags(),
            stamp,
            steps,
            duration_ms,
        })
    }

    async fn run_steps(
        &self,
        request: &BuildRequest,
        log: &mut Vec<StepRecord>,
    ) -> Result<BuildStamp> {
        let jiri = self.tools.manifest;
        let toolchain = self.tools.toolchain;

        // Workspace preparation
        run_step(log, RecipeStep::EnsureJiri, jiri.ensure_tool()).await?;
        run_step(log, RecipeStep::SetProfile, jiri.set_profile(DEFAULT_PROFILE)).await?;
        run_step(log, RecipeStep::CleanProject, jiri.clean()).await?;
        run_step(
            log,
            RecipeStep::ImportManifest,
            jiri.import_manifest(&request.manifest, &request.remote, true),
        )
        .await?;
        run_step(log, RecipeStep::Update, jiri.update(true)).await?;

        if let Some((host, patch_ref)) = request.trigger.patch() {
            run_step(log, RecipeStep::Patch, jiri.patch(patch_ref, host, true, true)).await?;
        }

        run_step(log, RecipeStep::InstallGo, toolchain.install()).await?;

        let source_dir = self.workspace.source_dir();
        let commit = run_step(log, RecipeStep::RevParse, self.tools.vcs.rev_parse(&source_dir))
            .await?;
        let stamp = BuildStamp::now(commit);
        let ldflags = stamp.ldflags();

        // The test step runs natively, so only the build sees GOOS/GOARCH.
        let test_env = self.workspace.toolchain_env();
        let mut build_env = test_env.clone();
        build_env.extend(request.target.env_vars());

        run_step(
            log,
            RecipeStep::Build,
            toolchain.build(JIRI_PACKAGE, &ldflags, &build_env, true),
        )
        .await?;
        run_step(log, RecipeStep::Test, toolchain.test(JIRI_PACKAGE, &test_env)).await?;

        Ok(stamp)
    }
}

/// Await one collaborator call, timing it and tagging failures with `step`.
async fn run_step<T, F>(log: &mut Vec<StepRecord>, step: RecipeStep, call: F) -> Result<T>
where
    F: Future<Output = recipe_tools::Result<T>>,
{
    obs::emit_step_started(step);
    let start = Instant::now();
    let result = call.await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => {
            obs::emit_step_finished(step, duration_ms);
            log.push(StepRecord { step, duration_ms });
            Ok(value)
        }
        Err(source) => {
            obs::emit_step_failed(step, duration_ms, &source);
            Err(RecipeError::StepFailed { step, source })
        }
    }
}
