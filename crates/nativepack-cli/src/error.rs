//! Pipeline error taxonomy

use nativepack_bundle::BundleError;
use thiserror::Error;

/// Result type alias for pipeline stages
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal pipeline errors. Every variant aborts the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Host platform is not in the target registry
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// External bundler or compiler failed or could not be started
    #[error("{tool} failed: `{command}` {detail}")]
    SubprocessFailure {
        tool: String,
        command: String,
        detail: String,
    },

    /// An artifact the package must contain is absent
    #[error("missing required artifact: {0}")]
    MissingRequiredArtifact(String),

    /// Archive writing failed
    #[error("archive creation failed: {0}")]
    ArchiveStream(#[source] BundleError),

    /// Manifest could not be read, parsed or written
    #[error("manifest error: {0}")]
    Manifest(#[source] BundleError),

    /// Invalid project configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error outside of archive and manifest handling
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::UnsupportedPlatform(_) => 2,
            PipelineError::SubprocessFailure { .. } => 3,
            PipelineError::MissingRequiredArtifact(_) => 4,
            PipelineError::ArchiveStream(_) => 5,
            PipelineError::Manifest(_) => 6,
            PipelineError::Config(_) => 7,
            PipelineError::Io { .. } => 8,
        }
    }

    /// Wrap an I/O error with a description of what was being done
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case(PipelineError::UnsupportedPlatform("plan9-mips".into()), 2)]
    #[test_case(PipelineError::MissingRequiredArtifact("lib".into()), 4)]
    #[test_case(PipelineError::Config("bad".into()), 7)]
    fn PipelineError___exit_code___is_distinct_and_nonzero(err: PipelineError, expected: u8) {
        assert_eq!(err.exit_code(), expected);
    }

    #[test]
    fn PipelineError___subprocess_failure___names_tool_and_command() {
        let err = PipelineError::SubprocessFailure {
            tool: "UI bundler".to_string(),
            command: "npx vite build".to_string(),
            detail: "exited with code 1".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "UI bundler failed: `npx vite build` exited with code 1"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn PipelineError___archive_stream___wraps_bundle_error() {
        let err = PipelineError::ArchiveStream(BundleError::Io(std::io::Error::other("disk full")));

        assert!(err.to_string().contains("disk full"));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn PipelineError___io___keeps_context() {
        let err = PipelineError::io(
            "failed to clear dist",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(err.to_string(), "failed to clear dist: denied");
        assert_eq!(err.exit_code(), 8);
    }
}
