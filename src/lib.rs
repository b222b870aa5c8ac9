//! # custom_markdown_lint
//!
//! An Ansible module that reports markdown lint problems for a file or
//! directory. The linting itself is done by the external `mdl` tool; this
//! crate only adapts Ansible's module protocol to that command line.
//!
//! ## Architecture Overview
//!
//! ```text
//! Ansible ──args file──▶ protocol ──LintRequest──▶ MarkdownLintModule
//!                                                        │
//!                                                  CommandRunner
//!                                                        │
//!                                                   mdl <name>
//!                                                        │
//! Ansible ◀──JSON────── protocol ◀──stdout lines────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use custom_markdown_lint::modules::markdown_lint::{LintRequest, MarkdownLintModule};
//!
//! let module = MarkdownLintModule::new();
//! let result = module.run(&LintRequest::new("README.md", "problems"), false)?;
//! for line in result.markdown_lint_problems.lines() {
//!     println!("{}", line);
//! }
//! # Ok::<(), custom_markdown_lint::modules::ModuleError>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::error::{Error, Result};
    pub use crate::modules::markdown_lint::{
        LintProblems, LintRequest, LintResult, MarkdownLintModule,
    };
    pub use crate::modules::{Module, ModuleContext, ModuleError, ModuleOutput, ModuleParams};
    pub use crate::protocol::{dispatch, ModuleInvocation, ModuleResponse};
    pub use crate::runner::{CommandResult, CommandRunner, ProcessRunner};
}

/// Error types for the module binary.
pub mod error;

/// Module trait, parameter handling and the markdown lint module.
pub mod modules;

/// Running the external linter.
pub mod runner;

/// Ansible binary module protocol: arguments file in, JSON result out.
pub mod protocol;

/// Documentation sidecar for `ansible-doc`.
pub mod metadata;

/// Configuration loading.
pub mod config;
