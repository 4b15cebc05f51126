//! Project configuration (`nativepack.toml`)

use crate::error::{PipelineError, PipelineResult};
use nativepack_bundle::{ARCHIVE_EXTENSION, LIB_DIR, MANIFEST_FILE, Manifest};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Default configuration file name, looked up in the project root
pub const CONFIG_FILE: &str = "nativepack.toml";

/// Project configuration
///
/// Every key is optional; the defaults describe the stock plugin layout.
/// Relative paths are resolved against the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Development manifest
    pub manifest: PathBuf,

    /// Documentation file copied into the package when present
    pub readme: PathBuf,

    /// Staged output directory, recreated on every run
    pub staging_dir: PathBuf,

    /// Directory the UI bundler writes the compiled component into
    pub ui_out_dir: PathBuf,

    /// Compiler output root (`{build_root}/{debug|release}/...`)
    pub build_root: PathBuf,

    /// `[lib] name` of the plugin crate, used to derive compiler output names
    pub library_name: String,

    /// Prefix for staged library names (`{prefix}-{platform}.{ext}`)
    pub artifact_prefix: String,

    /// UI bundler command line
    pub bundler: Vec<String>,

    /// Native compiler command line; `--release` is appended in release mode
    pub compiler: Vec<String>,

    /// Release archive extension
    pub archive_extension: String,

    /// Deflate level for archive entries (0-9)
    pub compression_level: i64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(MANIFEST_FILE),
            readme: PathBuf::from("README.md"),
            staging_dir: PathBuf::from("dist"),
            ui_out_dir: PathBuf::from("dist-ui"),
            build_root: PathBuf::from("target"),
            library_name: "native_example".to_string(),
            artifact_prefix: "native_example".to_string(),
            bundler: vec!["npx".to_string(), "vite".to_string(), "build".to_string()],
            compiler: vec!["cargo".to_string(), "build".to_string()],
            archive_extension: ARCHIVE_EXTENSION.to_string(),
            compression_level: 9,
        }
    }
}

impl PackConfig {
    /// Parse configuration from TOML
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("failed to parse {CONFIG_FILE}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io(format!("failed to read {}", path.display()), e))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the configuration for a project
    ///
    /// An explicit path must exist. Without one, `nativepack.toml` in the
    /// project root is used if present and defaults apply otherwise.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> PipelineResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = project_root.join(CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> PipelineResult<()> {
        if self.bundler.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(PipelineError::Config("bundler command is empty".to_string()));
        }

        if self.compiler.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(PipelineError::Config(
                "compiler command is empty".to_string(),
            ));
        }

        if self.library_name.trim().is_empty() {
            return Err(PipelineError::Config(
                "library_name cannot be empty".to_string(),
            ));
        }

        if self.artifact_prefix.trim().is_empty() {
            return Err(PipelineError::Config(
                "artifact_prefix cannot be empty".to_string(),
            ));
        }

        if self.archive_extension.trim().is_empty() || self.archive_extension.starts_with('.') {
            return Err(PipelineError::Config(format!(
                "archive_extension must be a bare extension, got '{}'",
                self.archive_extension
            )));
        }

        check_output_dir("staging_dir", &self.staging_dir)?;
        check_output_dir("ui_out_dir", &self.ui_out_dir)?;

        if !(0..=9).contains(&self.compression_level) {
            return Err(PipelineError::Config(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }

        Ok(())
    }

    /// Resolve every configured path against the project root
    pub fn layout(&self, project_root: &Path) -> ProjectLayout {
        let staging_dir = project_root.join(&self.staging_dir);
        ProjectLayout {
            root: project_root.to_path_buf(),
            manifest: project_root.join(&self.manifest),
            readme: project_root.join(&self.readme),
            staged_lib_dir: staging_dir.join(LIB_DIR),
            staging_dir,
            ui_out_dir: project_root.join(&self.ui_out_dir),
            build_root: project_root.join(&self.build_root),
        }
    }
}

/// Directories the pipeline deletes must name a subdirectory of the project
/// root: relative, non-empty, and free of `..`.
fn check_output_dir(key: &str, path: &Path) -> PipelineResult<()> {
    let inside_root = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)));

    if !inside_root {
        return Err(PipelineError::Config(format!(
            "{key} must be a subdirectory of the project root, got '{}'",
            path.display()
        )));
    }
    Ok(())
}

/// Absolute locations the pipeline reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub readme: PathBuf,
    pub staging_dir: PathBuf,
    pub staged_lib_dir: PathBuf,
    pub ui_out_dir: PathBuf,
    pub build_root: PathBuf,
}

impl ProjectLayout {
    /// Check that deleting `dir` cannot take project inputs with it.
    ///
    /// `dir` must not be, or contain, the project root, the manifest, the
    /// documentation file or the build root.
    pub fn ensure_clearable(&self, dir: &Path) -> PipelineResult<()> {
        let escapes = dir.components().any(|c| c == Component::ParentDir);
        let protected = [&self.root, &self.manifest, &self.readme, &self.build_root];

        if escapes || protected.iter().any(|p| p.starts_with(dir)) {
            return Err(PipelineError::Config(format!(
                "refusing to clear {}: it contains project inputs",
                dir.display()
            )));
        }
        Ok(())
    }

    /// Release archive location for a manifest: `{root}/{id}-v{version}.{ext}`
    pub fn archive_path(&self, manifest: &Manifest, extension: &str) -> PathBuf {
        self.root.join(manifest.archive_file_name(extension))
    }
}
