//! Archive stage
//!
//! Compression runs on tokio's blocking pool; the pipeline awaits the task
//! and resumes on exactly one of completion or error.

use crate::context::BuildContext;
use crate::error::{PipelineError, PipelineResult};
use nativepack_bundle::{ArchiveOptions, ArchiveSummary, BundleError, Manifest, archive_directory};
use std::io;
use tracing::info;

/// Compress the staged output into `{id}-v{version}.{ext}` at the project root.
pub async fn create_archive(
    ctx: &BuildContext,
    manifest: &Manifest,
) -> PipelineResult<ArchiveSummary> {
    let layout = ctx.layout();
    let config = ctx.config();
    let source = layout.staging_dir.clone();
    let destination = layout.archive_path(manifest, &config.archive_extension);
    let options = ArchiveOptions {
        compression_level: config.compression_level,
    };

    info!(archive = %destination.display(), "creating release archive");

    let summary = tokio::task::spawn_blocking(move || {
        archive_directory(&source, &destination, &options)
    })
    .await
    .map_err(|e| {
        PipelineError::ArchiveStream(BundleError::Io(io::Error::other(format!(
            "archive task did not complete: {e}"
        ))))
    })?
    .map_err(PipelineError::ArchiveStream)?;

    if summary.replaced_existing {
        info!("removed previous archive");
    }
    info!(
        archive = %summary.path.display(),
        size_mb = %format!("{:.2}", summary.size_mb()),
        entries = summary.entries.len(),
        "release archive created"
    );
    info!(sha256 = %summary.sha256, "archive checksum");

    Ok(summary)
}
