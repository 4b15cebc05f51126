//! nativepack - plugin build pipeline
//!
//! Builds a plugin's UI component and native library and, on request,
//! packages both into a versioned release archive.
//!
//! The stages run strictly in sequence and the first failure aborts the run:
//!
//! 1. [`pipeline::clean_outputs`] clears the staged output, the UI build
//!    output and the archive of the current version
//! 2. [`assets::build_assets`] runs the UI bundler
//! 3. [`build::build_native`] compiles the library for the host platform
//! 4. [`package::package`] stages libraries and writes the production manifest
//! 5. [`archive::create_archive`] compresses the staged output
//!
//! [`Pipeline`] drives the stages and tracks the [`PipelineState`].
//! External tools are launched through a [`ProcessRunner`] so tests can
//! substitute scripted results.

pub mod archive;
pub mod assets;
pub mod build;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod package;
pub mod pipeline;
pub mod process;

pub use config::{CONFIG_FILE, PackConfig, ProjectLayout};
pub use context::{BuildContext, BuildMode};
pub use error::{PipelineError, PipelineResult};
pub use package::{PackageReport, StagedLibrary};
pub use pipeline::{Pipeline, PipelineOutcome, PipelineState};
pub use process::{CommandSpec, ProcessOutput, ProcessRunner, SystemProcessRunner};
