//! UI asset build stage

use crate::context::BuildContext;
use crate::error::{PipelineError, PipelineResult};
use crate::process::{CommandSpec, ProcessRunner};
use tracing::info;

const TOOL: &str = "UI bundler";

/// Run the configured UI bundler in the project root.
///
/// The bundler is expected to write the compiled component into the UI
/// output directory; whether it did is checked later by the packager.
pub fn build_assets(ctx: &BuildContext, runner: &dyn ProcessRunner) -> PipelineResult<()> {
    let command = CommandSpec::from_argv(&ctx.config().bundler)
        .ok_or_else(|| PipelineError::Config("bundler command is empty".to_string()))?;

    info!(command = %command, "building UI component");

    run_tool(TOOL, &command, ctx, runner)?;

    info!("UI component built");
    Ok(())
}

/// Run a build tool to completion, mapping launch errors and nonzero exits
/// to [`PipelineError::SubprocessFailure`].
pub(crate) fn run_tool(
    tool: &str,
    command: &CommandSpec,
    ctx: &BuildContext,
    runner: &dyn ProcessRunner,
) -> PipelineResult<()> {
    let output = runner
        .run(command, &ctx.layout().root)
        .map_err(|e| PipelineError::SubprocessFailure {
            tool: tool.to_string(),
            command: command.to_string(),
            detail: format!("could not be started: {e}"),
        })?;

    if !output.success {
        return Err(PipelineError::SubprocessFailure {
            tool: tool.to_string(),
            command: command.to_string(),
            detail: output.describe_failure(),
        });
    }

    Ok(())
}
