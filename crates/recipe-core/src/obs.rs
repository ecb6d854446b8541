//! Structured events for the recipe run lifecycle.
//!
//! Every event carries an `event` field (`run.started`, `step.finished`, ...)
//! so log pipelines can filter on it. Events are emitted at `info!` level,
//! failures at `error!`.

use crate::step::RecipeStep;
use tracing::{error, info};

/// Span tagging everything inside a run with its `run_id`.
///
/// Attach with `tracing::Instrument::instrument` so the span follows the
/// future across await points.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("recipe.run", run_id = %run_id)
}

/// Emit event: run started for a resolved checkout.
pub fn emit_run_started(run_id: &str, trigger: &str, repo_url: &str, refspec: &str, target: &str) {
    info!(
        event = "run.started",
        run_id = %run_id,
        trigger = %trigger,
        repo_url = %repo_url,
        refspec = %refspec,
        target = %target,
    );
}

/// Emit event: step started.
pub fn emit_step_started(step: RecipeStep) {
    info!(event = "step.started", step = %step);
}

/// Emit event: step finished with its duration.
pub fn emit_step_finished(step: RecipeStep, duration_ms: u64) {
    info!(event = "step.finished", step = %step, duration_ms = duration_ms);
}

/// Emit event: step failed, ending the run.
pub fn emit_step_failed(step: RecipeStep, duration_ms: u64, error: &dyn std::fmt::Display) {
    error!(
        event = "step.failed",
        step = %step,
        duration_ms = duration_ms,
        error = %error,
    );
}

/// Emit event: run finished.
pub fn emit_run_finished(run_id: &str, duration_ms: u64, steps: usize, success: bool) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        steps = steps,
        success = success,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let span = run_span("test-run-id");
        let _entered = span.enter();
        emit_step_started(RecipeStep::EnsureJiri);
    }
}
