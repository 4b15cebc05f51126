//! Immutable per-run build context

use crate::config::{PackConfig, ProjectLayout};
use nativepack_bundle::Platform;
use std::fmt;
use std::path::PathBuf;

/// Compiler build profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl BuildMode {
    /// Mode selected by the `--release` flag
    pub fn from_release_flag(release: bool) -> Self {
        if release {
            BuildMode::Release
        } else {
            BuildMode::Debug
        }
    }

    /// Profile output directory name under the build root
    pub fn profile_dir(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, BuildMode::Release)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_dir())
    }
}

/// Configuration for one pipeline run
///
/// Built once from CLI flags and the project configuration, then passed by
/// reference to every stage. There are no setters; tests build synthetic
/// contexts with [`BuildContext::with_host_target_key`] before the run starts.
#[derive(Debug, Clone)]
pub struct BuildContext {
    mode: BuildMode,
    should_package: bool,
    host_target_key: String,
    config: PackConfig,
    layout: ProjectLayout,
}

impl BuildContext {
    /// Create a context for the running host
    pub fn new(
        mode: BuildMode,
        should_package: bool,
        project_root: impl Into<PathBuf>,
        config: PackConfig,
    ) -> Self {
        let layout = config.layout(&project_root.into());
        Self {
            mode,
            should_package,
            host_target_key: Platform::host_key(),
            config,
            layout,
        }
    }

    /// Replace the detected host key
    pub fn with_host_target_key(mut self, key: impl Into<String>) -> Self {
        self.host_target_key = key.into();
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn should_package(&self) -> bool {
        self.should_package
    }

    pub fn host_target_key(&self) -> &str {
        &self.host_target_key
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Compiler output directory for the current mode: `{build_root}/{mode}`
    pub fn profile_dir(&self) -> PathBuf {
        self.layout.build_root.join(self.mode.profile_dir())
    }
}
