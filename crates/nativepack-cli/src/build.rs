//! Native library build stage

use crate::assets::run_tool;
use crate::context::BuildContext;
use crate::error::{PipelineError, PipelineResult};
use crate::process::{CommandSpec, ProcessRunner};
use nativepack_bundle::{Target, TargetRegistry};
use std::path::PathBuf;
use tracing::{info, warn};

const TOOL: &str = "native compiler";

/// What the native build claims to have produced
#[derive(Debug, Clone)]
pub struct NativeBuild<'r> {
    pub target: &'r Target,
    /// Where the compiler is expected to have written the library. Not
    /// checked here; the packager decides what to do if it is missing.
    pub expected_artifact: PathBuf,
}

/// Compiler invocation for the context's mode
pub fn compiler_command(ctx: &BuildContext) -> PipelineResult<CommandSpec> {
    let command = CommandSpec::from_argv(&ctx.config().compiler)
        .ok_or_else(|| PipelineError::Config("compiler command is empty".to_string()))?;

    Ok(if ctx.mode().is_release() {
        command.arg("--release")
    } else {
        command
    })
}

/// Build the plugin library for the host target.
pub fn build_native<'r>(
    ctx: &BuildContext,
    registry: &'r TargetRegistry,
    runner: &dyn ProcessRunner,
) -> PipelineResult<NativeBuild<'r>> {
    let target = registry
        .lookup(ctx.host_target_key())
        .map_err(|_| PipelineError::UnsupportedPlatform(ctx.host_target_key().to_string()))?;

    let command = compiler_command(ctx)?;

    info!(
        platform = %target.platform_key(),
        triple = %target.native_triple(),
        mode = %ctx.mode(),
        command = %command,
        "building native library"
    );

    if let Err(e) = run_tool(TOOL, &command, ctx, runner) {
        warn!(platform = %target.platform_key(), "native build failed");
        return Err(e);
    }

    let expected_artifact = ctx.profile_dir().join(target.library_file_name());
    info!(
        platform = %target.platform_key(),
        output = %expected_artifact.display(),
        "native library built"
    );

    Ok(NativeBuild {
        target,
        expected_artifact,
    })
}
