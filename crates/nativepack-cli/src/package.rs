//! Packaging stage
//!
//! Stages compiled libraries for every known target, rewrites the
//! development manifest into its production form and copies the compiled UI
//! component and documentation next to it.

use crate::context::BuildContext;
use crate::error::{PipelineError, PipelineResult};
use nativepack_bundle::{LIB_DIR, MANIFEST_FILE, Manifest, Platform, TargetRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A library copied into the staged `lib/` directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedLibrary {
    pub platform: Platform,
    pub source: PathBuf,
    /// Path relative to the staged root, e.g. `lib/native_example-linux-x64.so`
    pub relative_path: String,
}

/// Outcome of the packaging stage
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Staged output root
    pub staging_dir: PathBuf,
    /// Production manifest as written to `{staging_dir}/manifest.json`
    pub manifest: Manifest,
    pub libraries: Vec<StagedLibrary>,
    /// Registry platforms without a compiled library
    pub missing_platforms: Vec<Platform>,
    /// Compiled UI script copied into the staged root
    pub ui_script: Option<String>,
    pub readme_copied: bool,
}

/// Assemble the staged output directory.
pub fn package(ctx: &BuildContext, registry: &TargetRegistry) -> PipelineResult<PackageReport> {
    let layout = ctx.layout();
    let prefix = &ctx.config().artifact_prefix;

    info!(output = %layout.staging_dir.display(), "packaging plugin");

    fs::create_dir_all(&layout.staged_lib_dir).map_err(|e| {
        PipelineError::io(
            format!("failed to create {}", layout.staged_lib_dir.display()),
            e,
        )
    })?;

    let libraries = stage_libraries(ctx, registry)?;
    let missing_platforms: Vec<Platform> = registry
        .iter()
        .map(|t| t.platform())
        .filter(|p| !libraries.iter().any(|l| l.platform == *p))
        .collect();

    if libraries.is_empty() {
        if ctx.mode().is_release() {
            return Err(PipelineError::MissingRequiredArtifact(format!(
                "no compiled libraries found in {}",
                ctx.profile_dir().display()
            )));
        }
        warn!(
            dir = %ctx.profile_dir().display(),
            "no compiled libraries found in debug mode; make sure the current platform was built"
        );
    } else if !missing_platforms.is_empty() {
        let keys: Vec<&str> = missing_platforms.iter().map(|p| p.as_str()).collect();
        warn!(missing = %keys.join(", "), "packaging without libraries for some platforms");
    }

    let mut manifest = Manifest::from_file(&layout.manifest).map_err(PipelineError::Manifest)?;

    let ui_script = stage_ui_component(ctx, &mut manifest)?;

    // Only libraries that actually landed in lib/ may be referenced.
    manifest.clear_libraries();
    for target in registry.iter() {
        let file_name = target.staged_file_name(prefix);
        if layout.staged_lib_dir.join(&file_name).is_file() {
            manifest.add_library(target, &format!("{LIB_DIR}/{file_name}"));
        }
    }

    let manifest_path = layout.staging_dir.join(MANIFEST_FILE);
    manifest
        .write_to(&manifest_path)
        .map_err(PipelineError::Manifest)?;
    info!("wrote production {MANIFEST_FILE}");

    let readme_copied = copy_readme(ctx)?;

    info!(output = %layout.staging_dir.display(), "plugin packaged");

    Ok(PackageReport {
        staging_dir: layout.staging_dir.clone(),
        manifest,
        libraries,
        missing_platforms,
        ui_script,
        readme_copied,
    })
}

/// Copy every compiled library present in the profile directory into
/// `lib/` under its staged name.
fn stage_libraries(
    ctx: &BuildContext,
    registry: &TargetRegistry,
) -> PipelineResult<Vec<StagedLibrary>> {
    let profile_dir = ctx.profile_dir();
    let lib_dir = &ctx.layout().staged_lib_dir;
    let prefix = &ctx.config().artifact_prefix;

    let mut staged = Vec::new();
    for target in registry.iter() {
        let source = profile_dir.join(target.library_file_name());
        if !source.is_file() {
            continue;
        }

        let file_name = target.staged_file_name(prefix);
        copy_file(&source, &lib_dir.join(&file_name))?;
        info!(platform = %target.platform_key(), "copied {LIB_DIR}/{file_name}");

        staged.push(StagedLibrary {
            platform: target.platform(),
            source,
            relative_path: format!("{LIB_DIR}/{file_name}"),
        });
    }

    Ok(staged)
}

/// Verify the compiled UI component exists, copy it into the staged root and
/// point the manifest at it.
fn stage_ui_component(
    ctx: &BuildContext,
    manifest: &mut Manifest,
) -> PipelineResult<Option<String>> {
    let Some(compiled) = manifest.compiled_ui_component() else {
        return Ok(None);
    };

    let layout = ctx.layout();
    let source = layout.ui_out_dir.join(&compiled);
    if !source.is_file() {
        return Err(PipelineError::MissingRequiredArtifact(format!(
            "compiled UI component {} not found",
            source.display()
        )));
    }

    copy_file(&source, &layout.staging_dir.join(&compiled))?;
    info!("found {compiled}");

    manifest.set_ui_component(&compiled);
    Ok(Some(compiled))
}

fn copy_readme(ctx: &BuildContext) -> PipelineResult<bool> {
    let layout = ctx.layout();
    if !layout.readme.is_file() {
        return Ok(false);
    }

    let Some(file_name) = layout.readme.file_name() else {
        return Ok(false);
    };
    copy_file(&layout.readme, &layout.staging_dir.join(file_name))?;
    info!("copied {}", Path::new(file_name).display());
    Ok(true)
}

fn copy_file(from: &Path, to: &Path) -> PipelineResult<()> {
    fs::copy(from, to).map(|_| ()).map_err(|e| {
        PipelineError::io(
            format!("failed to copy {} to {}", from.display(), to.display()),
            e,
        )
    })
}
