//! Target registry, production manifest and release archive for nativepack
//!
//! This crate holds the data side of the plugin pipeline: which platforms a
//! plugin can be packaged for, how their compiled libraries are named, the
//! manifest document that describes a packaged plugin, and the archiver that
//! turns a staged directory into a release file.
//!
//! # Staged Layout
//!
//! ```text
//! dist/
//! ├── manifest.json                       # production manifest
//! ├── index.js                            # compiled UI component (optional)
//! ├── README.md                           # copied documentation (optional)
//! └── lib/
//!     ├── native_example-linux-x64.so
//!     ├── native_example-macos-arm64.dylib
//!     └── native_example-windows-x64.dll
//! ```
//!
//! # Example
//!
//! ```no_run
//! use nativepack_bundle::{ArchiveOptions, Manifest, TargetRegistry, archive_directory};
//!
//! let registry = TargetRegistry::new("native_example");
//! let target = registry.lookup("linux-x64")?;
//! assert_eq!(target.library_file_name(), "libnative_example.so");
//!
//! let manifest = Manifest::from_file("dist/manifest.json")?;
//! let archive = manifest.archive_file_name("zip");
//! archive_directory("dist", &archive, &ArchiveOptions::default())?;
//! # Ok::<(), nativepack_bundle::BundleError>(())
//! ```

mod error;
mod manifest;
mod platform;

pub mod archive;

pub use archive::{ArchiveOptions, ArchiveSummary, archive_directory, compute_sha256};
pub use error::BundleError;
pub use manifest::{Manifest, NativeSection, UiSection, compiled_script_name};
pub use platform::{Platform, Target, TargetRegistry};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Manifest file name, both in the project root and in the staged output.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Subdirectory of the staged output holding renamed libraries.
pub const LIB_DIR: &str = "lib";

/// Default release archive extension.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Extension of the script the UI bundler emits.
pub const COMPILED_SCRIPT_EXTENSION: &str = "js";
