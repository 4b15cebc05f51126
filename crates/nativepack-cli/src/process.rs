//! External process invocation
//!
//! Stages never spawn processes directly. They describe a [`CommandSpec`] and
//! hand it to a [`ProcessRunner`], whose exit status is the only success
//! signal the pipeline looks at.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from an argv-style list; `None` if the list is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(args.iter().fold(Self::new(program), |spec, arg| spec.arg(arg)))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Output captured by the runner. [`SystemProcessRunner`] passes stdout
    /// and stderr through to the terminal, so it is always empty there.
    pub output: String,
}

impl ProcessOutput {
    /// Human-readable description of a failed exit, with any captured output
    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exited with code {code}"),
            None => "was terminated by a signal".to_string(),
        };
        match self.output.trim() {
            "" => status,
            output => format!("{status}: {output}"),
        }
    }
}

/// Capability to run an external command to completion
pub trait ProcessRunner {
    /// Run `command` in `cwd` and block until it exits.
    ///
    /// `Err` means the process could not be started at all.
    fn run(&self, command: &CommandSpec, cwd: &Path) -> io::Result<ProcessOutput>;
}

/// Runs commands on the host, passing stdout/stderr through to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> io::Result<ProcessOutput> {
        let mut cmd = host_command(command);
        cmd.current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = cmd.status()?;

        Ok(ProcessOutput {
            success: status.success(),
            code: status.code(),
            output: String::new(),
        })
    }
}

// Node tooling ships as `.cmd` shims on Windows, which only resolve through the shell.
#[cfg(windows)]
fn host_command(command: &CommandSpec) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command.program()).args(command.args());
    cmd
}

#[cfg(not(windows))]
fn host_command(command: &CommandSpec) -> Command {
    let mut cmd = Command::new(command.program());
    cmd.args(command.args());
    cmd
}
