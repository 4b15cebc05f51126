//! Platform identification and the target registry.

use crate::{BundleError, BundleResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform/architecture combinations a plugin can be packaged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Windows on x86_64.
    WindowsX64,
    /// macOS on ARM64 (Apple Silicon).
    MacosArm64,
    /// Linux on x86_64.
    LinuxX64,
}

impl Platform {
    /// Platform key of the running host, whether or not it is supported.
    ///
    /// Unknown operating systems and architectures are passed through verbatim
    /// so that diagnostics name the real host (e.g. "freebsd-riscv64").
    #[must_use]
    pub fn host_key() -> String {
        Self::key_for(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build a platform key from Rust's `OS`/`ARCH` constant spellings.
    #[must_use]
    pub fn key_for(os: &str, arch: &str) -> String {
        let arch = match arch {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            other => other,
        };
        format!("{os}-{arch}")
    }

    /// Get the platform key string (e.g., "windows-x64").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WindowsX64 => "windows-x64",
            Self::MacosArm64 => "macos-arm64",
            Self::LinuxX64 => "linux-x64",
        }
    }

    /// Parse a platform from its key.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "windows-x64" => Some(Self::WindowsX64),
            "macos-arm64" => Some(Self::MacosArm64),
            "linux-x64" => Some(Self::LinuxX64),
            _ => None,
        }
    }

    /// Key used for this platform in the production manifest.
    ///
    /// These follow the plugin host's naming (`win32`, `darwin`) rather than
    /// the platform keys.
    #[must_use]
    pub fn manifest_key(&self) -> &'static str {
        match self {
            Self::WindowsX64 => "win32-x64",
            Self::MacosArm64 => "darwin-arm64",
            Self::LinuxX64 => "linux-x64",
        }
    }

    /// Get the Rust target triple for this platform.
    #[must_use]
    pub fn native_triple(&self) -> &'static str {
        match self {
            Self::WindowsX64 => "x86_64-pc-windows-msvc",
            Self::MacosArm64 => "aarch64-apple-darwin",
            Self::LinuxX64 => "x86_64-unknown-linux-gnu",
        }
    }

    /// Get the expected library file extension for this platform.
    #[must_use]
    pub fn library_extension(&self) -> &'static str {
        match self {
            Self::WindowsX64 => "dll",
            Self::MacosArm64 => "dylib",
            Self::LinuxX64 => "so",
        }
    }

    /// Get the library filename prefix for this platform.
    #[must_use]
    pub fn library_prefix(&self) -> &'static str {
        match self {
            Self::WindowsX64 => "",
            Self::MacosArm64 | Self::LinuxX64 => "lib",
        }
    }

    /// Format the compiler's default library name for this platform.
    ///
    /// # Example
    ///
    /// ```
    /// use nativepack_bundle::Platform;
    ///
    /// assert_eq!(Platform::LinuxX64.library_name("native_example"), "libnative_example.so");
    /// assert_eq!(Platform::WindowsX64.library_name("native_example"), "native_example.dll");
    /// ```
    #[must_use]
    pub fn library_name(&self, base_name: &str) -> String {
        format!(
            "{}{}.{}",
            self.library_prefix(),
            base_name,
            self.library_extension()
        )
    }

    /// Get all supported platforms.
    #[must_use]
    pub fn all() -> &'static [Platform] {
        &[Self::WindowsX64, Self::MacosArm64, Self::LinuxX64]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One packageable platform together with the library the compiler emits for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    platform: Platform,
    library_file_name: String,
}

impl Target {
    fn new(platform: Platform, library_base: &str) -> Self {
        Self {
            platform,
            library_file_name: platform.library_name(library_base),
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn platform_key(&self) -> &'static str {
        self.platform.as_str()
    }

    #[must_use]
    pub fn native_triple(&self) -> &'static str {
        self.platform.native_triple()
    }

    #[must_use]
    pub fn manifest_key(&self) -> &'static str {
        self.platform.manifest_key()
    }

    /// File name the compiler writes into the profile output directory.
    #[must_use]
    pub fn library_file_name(&self) -> &str {
        &self.library_file_name
    }

    /// File name of this target's library once staged: `{prefix}-{platform_key}.{ext}`.
    #[must_use]
    pub fn staged_file_name(&self, artifact_prefix: &str) -> String {
        format!(
            "{artifact_prefix}-{}.{}",
            self.platform_key(),
            self.platform.library_extension()
        )
    }
}

/// Immutable set of targets known to the pipeline.
///
/// The registry lists every platform the pipeline can package for, which is
/// independent of the single platform the current host can compile. Compiler
/// output names carry no architecture, so each target must own a distinct
/// library file name.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    /// Build the registry for a library crate named `library_base`
    /// (the `[lib] name` the compiler uses for output files).
    #[must_use]
    pub fn new(library_base: &str) -> Self {
        Self {
            targets: Platform::all()
                .iter()
                .map(|p| Target::new(*p, library_base))
                .collect(),
        }
    }

    /// Resolve a platform key to its target.
    pub fn lookup(&self, platform_key: &str) -> BundleResult<&Target> {
        self.targets
            .iter()
            .find(|t| t.platform_key() == platform_key)
            .ok_or_else(|| BundleError::UnsupportedPlatform(platform_key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }
}

#[cfg(test)]
#[path = "platform/platform_tests.rs"]
mod platform_tests;
