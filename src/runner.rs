//! External command execution.
//!
//! The lint module never spawns processes directly; it goes through a
//! [`CommandRunner`] so tests can substitute a double that records calls
//! instead of starting the real linter.

use crate::modules::{ModuleError, ModuleResult};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Raw bytes written to standard output.
    pub stdout: Vec<u8>,
    /// Raw bytes written to standard error.
    pub stderr: Vec<u8>,
}

impl CommandResult {
    /// Create a result for a process that exited with status 0
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Create a result for a process that exited with a non-zero status
    pub fn failure(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Capability to run an external program to completion.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits and both output
    /// streams are drained.
    fn run(&self, program: &str, args: &[String]) -> ModuleResult<CommandResult>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[String]) -> ModuleResult<CommandResult> {
        (**self).run(program, args)
    }
}

/// Runs programs as local child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> ModuleResult<CommandResult> {
        let resolved = which::which(program)
            .map_err(|_| ModuleError::ExecutableNotFound(program.to_string()))?;
        debug!("Running {} {:?}", resolved.display(), args);

        let output = Command::new(&resolved)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        trace!(
            "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
            program,
            output.status.code(),
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(CommandResult {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_result_constructors() {
        let ok = CommandResult::success("out");
        assert_eq!(ok.exit_code, Some(0));
        assert!(ok.stderr.is_empty());

        let failed = CommandResult::failure(1, "", "boom");
        assert_eq!(failed.exit_code, Some(1));
        assert_eq!(failed.stderr, b"boom");
    }

    #[test]
    fn test_process_runner_missing_executable() {
        let result = ProcessRunner.run("definitely-not-a-real-linter-binary", &[]);
        assert!(matches!(result, Err(ModuleError::ExecutableNotFound(name))
            if name == "definitely-not-a-real-linter-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_streams_separately() {
        let args = vec![
            "-c".to_string(),
            "echo out; echo err >&2; exit 3".to_string(),
        ];
        let result = ProcessRunner.run("sh", &args).unwrap();

        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout, b"out\n");
        assert_eq!(result.stderr, b"err\n");
    }

    #[test]
    fn test_reference_forwards_to_runner() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(|program, args| program == "mdl" && args == ["README.md".to_string()])
            .times(1)
            .returning(|_, _| Ok(CommandResult::success("README.md:1: MD041")));

        let by_ref = &mock;
        let result = by_ref.run("mdl", &["README.md".to_string()]).unwrap();
        assert_eq!(result.stdout, b"README.md:1: MD041");
    }
}
