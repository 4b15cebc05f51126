//! Pipeline orchestration
//!
//! Runs the stages strictly in order and stops at the first failure:
//!
//! ```text
//! Cleaning → BuildingAssets → BuildingNative ─┬─→ Done            (no --package)
//!                                             └─→ Packaging → Archiving → Done
//!    any stage ─→ Failed
//! ```

use crate::archive::create_archive;
use crate::assets::build_assets;
use crate::build::build_native;
use crate::context::BuildContext;
use crate::error::{PipelineError, PipelineResult};
use crate::package::{PackageReport, package};
use crate::process::ProcessRunner;
use nativepack_bundle::{ArchiveSummary, Manifest, Platform, TargetRegistry};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Removing outputs of previous runs
    #[default]
    Cleaning,
    BuildingAssets,
    BuildingNative,
    Packaging,
    Archiving,
    Done,
    Failed,
}

impl PipelineState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, target),
            (Cleaning, BuildingAssets)
                | (BuildingAssets, BuildingNative)
                | (BuildingNative, Packaging)
                | (BuildingNative, Done)
                | (Packaging, Archiving)
                | (Archiving, Done)
                // Every running state can fail
                | (Cleaning, Failed)
                | (BuildingAssets, Failed)
                | (BuildingNative, Failed)
                | (Packaging, Failed)
                | (Archiving, Failed)
        )
    }

    /// Check if the pipeline has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Cleaning => write!(f, "Cleaning"),
            PipelineState::BuildingAssets => write!(f, "BuildingAssets"),
            PipelineState::BuildingNative => write!(f, "BuildingNative"),
            PipelineState::Packaging => write!(f, "Packaging"),
            PipelineState::Archiving => write!(f, "Archiving"),
            PipelineState::Done => write!(f, "Done"),
            PipelineState::Failed => write!(f, "Failed"),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Host platform that was compiled
    pub platform: Platform,
    /// Where the compiler was expected to write the library
    pub expected_artifact: PathBuf,
    /// Present when packaging was requested
    pub package: Option<PackageReport>,
    pub archive: Option<ArchiveSummary>,
}

/// One pipeline run over a fixed context
pub struct Pipeline<'a> {
    ctx: &'a BuildContext,
    registry: &'a TargetRegistry,
    runner: &'a dyn ProcessRunner,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        registry: &'a TargetRegistry,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            ctx,
            registry,
            runner,
            state: PipelineState::Cleaning,
            history: vec![PipelineState::Cleaning],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state entered so far, in order
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run every stage. Returns the first error; the pipeline is then `Failed`.
    ///
    /// A pipeline runs once; calling `run` after it stopped returns an error
    /// without touching the project.
    pub async fn run(&mut self) -> PipelineResult<PipelineOutcome> {
        if self.state.is_terminal() {
            return Err(PipelineError::Config(format!(
                "pipeline already finished in state {}",
                self.state
            )));
        }

        match self.run_stages().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                debug!(stage = %self.state, "pipeline failed");
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self) -> PipelineResult<PipelineOutcome> {
        info!(
            mode = %self.ctx.mode(),
            package = self.ctx.should_package(),
            host = %self.ctx.host_target_key(),
            "starting plugin build"
        );

        clean_outputs(self.ctx)?;

        self.transition(PipelineState::BuildingAssets);
        build_assets(self.ctx, self.runner)?;

        self.transition(PipelineState::BuildingNative);
        let native = build_native(self.ctx, self.registry, self.runner)?;
        let platform = native.target.platform();
        let expected_artifact = native.expected_artifact;

        if !self.ctx.should_package() {
            self.transition(PipelineState::Done);
            return Ok(PipelineOutcome {
                platform,
                expected_artifact,
                package: None,
                archive: None,
            });
        }

        self.transition(PipelineState::Packaging);
        let report = package(self.ctx, self.registry)?;

        self.transition(PipelineState::Archiving);
        let archive = create_archive(self.ctx, &report.manifest).await?;

        self.transition(PipelineState::Done);
        Ok(PipelineOutcome {
            platform,
            expected_artifact,
            package: Some(report),
            archive: Some(archive),
        })
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid pipeline transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
        self.history.push(next);
    }
}

/// Remove outputs of previous runs.
///
/// The staging directory is emptied and recreated, the UI output directory is
/// removed and the archive the current manifest would produce is deleted. An
/// unreadable manifest only skips the archive removal; packaging reports it.
/// Nothing is deleted if either directory would take project inputs with it.
pub fn clean_outputs(ctx: &BuildContext) -> PipelineResult<()> {
    let layout = ctx.layout();
    layout.ensure_clearable(&layout.staging_dir)?;
    layout.ensure_clearable(&layout.ui_out_dir)?;

    remove_dir(&layout.staging_dir)?;
    fs::create_dir_all(&layout.staging_dir).map_err(|e| {
        PipelineError::io(
            format!("failed to create {}", layout.staging_dir.display()),
            e,
        )
    })?;
    remove_dir(&layout.ui_out_dir)?;

    match Manifest::from_file(&layout.manifest) {
        Ok(manifest) => {
            let archive = layout.archive_path(&manifest, &ctx.config().archive_extension);
            match fs::remove_file(&archive) {
                Ok(()) => info!(archive = %archive.display(), "removed previous archive"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PipelineError::io(
                        format!("failed to remove {}", archive.display()),
                        e,
                    ));
                }
            }
        }
        Err(e) => debug!(error = %e, "manifest unreadable, skipping archive cleanup"),
    }

    debug!(output = %layout.staging_dir.display(), "previous outputs cleared");
    Ok(())
}

fn remove_dir(path: &Path) -> PipelineResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::io(
            format!("failed to remove {}", path.display()),
            e,
        )),
    }
}
