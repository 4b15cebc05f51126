//! Release archive creation.
//!
//! [`archive_directory`] compresses a staged directory into a single zip file
//! whose entries mirror the directory's relative layout, with no wrapping
//! top-level folder.

use crate::{BundleError, BundleResult};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Options controlling archive compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Deflate level, 0 (store-like) to 9 (smallest).
    pub compression_level: i64,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: 9,
        }
    }
}

/// What [`archive_directory`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Path of the written archive.
    pub path: PathBuf,
    /// Entry names in write order (directories end with `/`).
    pub entries: Vec<String>,
    /// Archive size in bytes.
    pub size_bytes: u64,
    /// Hex SHA-256 of the archive file.
    pub sha256: String,
    /// Whether an archive with the same name was removed first.
    pub replaced_existing: bool,
}

impl ArchiveSummary {
    /// Size in mebibytes, for display.
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Compress `source_dir` into `output_path`.
///
/// Any existing file at `output_path` is deleted before writing, so repeated
/// runs replace the archive instead of merging into it. Entries are written
/// in file-name order so identical input produces an identical entry list.
pub fn archive_directory<S: AsRef<Path>, O: AsRef<Path>>(
    source_dir: S,
    output_path: O,
    options: &ArchiveOptions,
) -> BundleResult<ArchiveSummary> {
    let source_dir = source_dir.as_ref();
    let output_path = output_path.as_ref();

    if !source_dir.is_dir() {
        return Err(BundleError::MissingFile(source_dir.display().to_string()));
    }

    let replaced_existing = match fs::remove_file(output_path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    let entries = match write_archive(source_dir, output_path, options) {
        Ok(entries) => entries,
        Err(e) => {
            // A partial file must not pass for a finished archive.
            let _ = fs::remove_file(output_path);
            return Err(e);
        }
    };

    let contents = fs::read(output_path)?;

    Ok(ArchiveSummary {
        path: output_path.to_path_buf(),
        entries,
        size_bytes: contents.len() as u64,
        sha256: compute_sha256(&contents),
        replaced_existing,
    })
}

/// Write every entry of `source_dir` into a new archive at `output_path`.
fn write_archive(
    source_dir: &Path,
    output_path: &Path,
    options: &ArchiveOptions,
) -> BundleResult<Vec<String>> {
    let file = File::create(output_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let file_options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(options.compression_level));

    let mut entries = Vec::new();
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();

        // The archive may be written inside the directory being archived.
        if path == output_path {
            continue;
        }

        let name = entry_name(source_dir, path);
        if entry.file_type().is_dir() {
            let dir_name = format!("{name}/");
            zip.add_directory(dir_name.as_str(), file_options)?;
            entries.push(dir_name);
        } else {
            zip.start_file(name.as_str(), file_options)?;
            let mut source = File::open(path)?;
            io::copy(&mut source, &mut zip)?;
            entries.push(name);
        }
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(entries)
}

/// Archive entry name for `path`: relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}
