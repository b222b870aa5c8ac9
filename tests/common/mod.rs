//! Shared test utilities for the custom_markdown_lint test suite.
//!
//! This module provides:
//! - A spy [`CommandRunner`] that records calls instead of spawning processes
//! - Helpers for building module parameters and argument files
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use parking_lot::RwLock;
use tempfile::NamedTempFile;

use custom_markdown_lint::modules::{ModuleError, ModuleParams, ModuleResult};
use custom_markdown_lint::runner::{CommandResult, CommandRunner};

// ============================================================================
// Spy Runner
// ============================================================================

/// What the spy should do when it is called.
#[derive(Debug, Clone)]
enum Behavior {
    Return(CommandResult),
    NotFound,
}

/// A command runner that records every call and returns a canned result.
///
/// # Example
///
/// ```rust,ignore
/// let spy = SpyRunner::with_stdout("README.md:1: MD041\n");
/// let module = MarkdownLintModule::with_runner(&spy);
/// module.run(&LintRequest::new("README.md", "problems"), false).unwrap();
/// assert_eq!(spy.call_count(), 1);
/// ```
#[derive(Debug)]
pub struct SpyRunner {
    calls: RwLock<Vec<(String, Vec<String>)>>,
    behavior: Behavior,
}

impl SpyRunner {
    /// Return `result` for every call.
    pub fn new(result: CommandResult) -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            behavior: Behavior::Return(result),
        }
    }

    /// Exit 0 with the given stdout.
    pub fn with_stdout(stdout: &str) -> Self {
        Self::new(CommandResult::success(stdout))
    }

    /// Behave as if the executable is not installed.
    pub fn not_found() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            behavior: Behavior::NotFound,
        }
    }

    /// Every `(program, args)` pair seen so far.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }
}

impl CommandRunner for SpyRunner {
    fn run(&self, program: &str, args: &[String]) -> ModuleResult<CommandResult> {
        self.calls.write().push((program.to_string(), args.to_vec()));
        match &self.behavior {
            Behavior::Return(result) => Ok(result.clone()),
            Behavior::NotFound => Err(ModuleError::ExecutableNotFound(program.to_string())),
        }
    }
}

// ============================================================================
// Parameter helpers
// ============================================================================

/// Build module parameters from a JSON object literal.
pub fn params(value: serde_json::Value) -> ModuleParams {
    serde_json::from_value(value).expect("params must be a JSON object")
}

/// Write an Ansible arguments file and keep it alive for the test.
pub fn args_file(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create args file");
    write!(file, "{}", value).expect("write args file");
    file
}

/// Write an executable shell script standing in for the linter.
#[cfg(unix)]
pub fn fake_linter(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("mdl");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write fake linter");
    let mut perms = std::fs::metadata(&path).expect("stat fake linter").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake linter");
    path
}
