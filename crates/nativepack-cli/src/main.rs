//! nativepack CLI - build and package a native plugin
//!
//! ```text
//! nativepack                      debug build of UI and native library
//! nativepack --release            release build
//! nativepack --release --package  release build, staged output and archive
//! ```

use anyhow::Context;
use clap::{ArgAction, Parser};
use nativepack_bundle::TargetRegistry;
use nativepack_cli::logging::init_logging;
use nativepack_cli::{
    BuildContext, BuildMode, PackConfig, Pipeline, PipelineError, SystemProcessRunner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nativepack")]
#[command(author, version, about = "Build and package native plugins", long_about = None)]
struct Cli {
    /// Build in release mode (default: debug)
    #[arg(long)]
    release: bool,

    /// Stage the build output and create the release archive
    #[arg(long)]
    package: bool,

    /// Path to the plugin project
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Path to the pipeline configuration (default: <project>/nativepack.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            let code = e
                .downcast_ref::<PipelineError>()
                .map_or(1, PipelineError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = PackConfig::load(&cli.project, cli.config.as_deref()).with_context(|| {
        format!(
            "failed to load configuration for {}",
            cli.project.display()
        )
    })?;

    let registry = TargetRegistry::new(&config.library_name);
    let ctx = BuildContext::new(
        BuildMode::from_release_flag(cli.release),
        cli.package,
        &cli.project,
        config,
    );
    let runner = SystemProcessRunner;

    let outcome = Pipeline::new(&ctx, &registry, &runner).run().await?;

    match outcome.archive {
        Some(archive) => info!(archive = %archive.path.display(), "build complete"),
        None => info!(
            library = %outcome.expected_artifact.display(),
            "build complete; use --package to package"
        ),
    }

    Ok(())
}
