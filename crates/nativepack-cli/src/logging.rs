//! Log output for the command-line tool
//!
//! Events go to stderr so stdout stays with the bundler and compiler output.
//! `RUST_LOG` takes precedence over the verbosity flags.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Default level for the given `-v` count and `-q` flag
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::WARN;
    }
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbose, quiet).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
#[path = "logging/logging_tests.rs"]
mod logging_tests;
