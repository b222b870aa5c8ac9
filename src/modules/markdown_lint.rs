//! Markdown lint module - Report markdown lint problems for a file or directory
//!
//! The module runs the external `mdl` linter against `name` and hands back the
//! linter's standard output, one entry per line. It never interprets the
//! output: a lint violation is data, not a failure, and the linter's exit
//! status and standard error are ignored.

use super::{
    Module, ModuleContext, ModuleError, ModuleOutput, ModuleParams, ModuleResult, ParamExt,
    ParamSpec,
};
use crate::runner::{CommandRunner, ProcessRunner};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

/// Name the host framework knows this module by
pub const MODULE_NAME: &str = "custom_markdown_lint";

/// Linter executable used when nothing else is configured
pub const DEFAULT_LINTER: &str = "mdl";

/// Key of the single return value
pub const RESULT_KEY: &str = "markdown_lint_problems";

/// Value reported before the linter has run
pub const NO_PROBLEMS: &str = "No problems";

/// Parameters accepted by the module
pub static ARGUMENT_SPEC: &[ParamSpec] = &[
    ParamSpec::required_str("name", "Path to the markdown file or directory to lint."),
    ParamSpec::required_str("action", "Operation to perform. Currently only reporting problems."),
];

/// Validated parameters of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintRequest {
    /// File or directory handed verbatim to the linter
    pub name: String,
    /// Operation identifier; accepted but not used to select behavior
    pub action: String,
}

impl LintRequest {
    pub fn new(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: action.into(),
        }
    }

    /// Build a request from parameters that already passed the argument spec.
    ///
    /// Both values must be non-empty strings (numbers and booleans are
    /// converted).
    pub fn from_params(params: &ModuleParams) -> ModuleResult<Self> {
        let name = non_empty(params, "name")?;
        let action = non_empty(params, "action")?;
        Ok(Self { name, action })
    }
}

fn non_empty(params: &ModuleParams, key: &str) -> ModuleResult<String> {
    let value = params.get_string_required(key)?;
    if value.is_empty() {
        return Err(ModuleError::InvalidParameter(format!(
            "{} must not be empty",
            key
        )));
    }
    Ok(value)
}

/// Lint problems as reported back to the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LintProblems {
    /// The linter has not run (check mode); serialised as `"No problems"`
    #[default]
    NoProblems,
    /// Linter output lines, possibly empty
    Reported(Vec<String>),
}

impl LintProblems {
    /// Reported lines, empty for the sentinel
    pub fn lines(&self) -> &[String] {
        match self {
            LintProblems::NoProblems => &[],
            LintProblems::Reported(lines) => lines,
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        match self {
            LintProblems::NoProblems => serde_json::Value::String(NO_PROBLEMS.to_string()),
            LintProblems::Reported(lines) => serde_json::Value::from(lines.clone()),
        }
    }
}

impl Serialize for LintProblems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LintProblems::NoProblems => serializer.serialize_str(NO_PROBLEMS),
            LintProblems::Reported(lines) => lines.serialize(serializer),
        }
    }
}

/// Result of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintResult {
    pub markdown_lint_problems: LintProblems,
}

/// Module that shells out to a markdown linter
#[derive(Debug, Clone)]
pub struct MarkdownLintModule<R = ProcessRunner> {
    runner: R,
    linter: String,
}

impl MarkdownLintModule<ProcessRunner> {
    /// Module that runs `mdl` as a local child process
    pub fn new() -> Self {
        Self::with_runner(ProcessRunner)
    }
}

impl Default for MarkdownLintModule<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> MarkdownLintModule<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            linter: DEFAULT_LINTER.to_string(),
        }
    }

    /// Use a different linter executable
    pub fn with_linter(mut self, linter: impl Into<String>) -> Self {
        self.linter = linter.into();
        self
    }

    pub fn linter(&self) -> &str {
        &self.linter
    }

    /// Lint `request.name`, or return the default result in check mode.
    ///
    /// Errors only when the linter cannot be started or its output is not
    /// UTF-8. A non-zero exit from the linter is still a success.
    pub fn run(&self, request: &LintRequest, check_mode: bool) -> ModuleResult<LintResult> {
        let mut result = LintResult::default();

        if check_mode {
            debug!("Check mode, not running {} on {}", self.linter, request.name);
            return Ok(result);
        }

        let args = [request.name.clone()];
        let output = self.runner.run(&self.linter, &args)?;

        let stdout = String::from_utf8(output.stdout).map_err(|source| ModuleError::Decode {
            program: self.linter.clone(),
            source,
        })?;
        let lines = split_lines(&stdout);

        info!(
            "{} reported {} line(s) for {} (exit code {:?})",
            self.linter,
            lines.len(),
            request.name,
            output.exit_code
        );

        result.markdown_lint_problems = LintProblems::Reported(lines);
        Ok(result)
    }
}

impl<R: CommandRunner + Send + Sync> Module for MarkdownLintModule<R> {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn argument_spec(&self) -> &'static [ParamSpec] {
        ARGUMENT_SPEC
    }

    fn execute(
        &self,
        params: &ModuleParams,
        context: &ModuleContext,
    ) -> ModuleResult<ModuleOutput> {
        let request = LintRequest::from_params(params)?;
        let result = self.run(&request, context.check_mode)?;

        Ok(ModuleOutput::ok().with_data(RESULT_KEY, result.markdown_lint_problems.to_value()))
    }
}

/// Split text into lines on the same boundaries as Python's `str.splitlines`.
///
/// `\r\n` counts as one boundary and a trailing boundary does not produce an
/// empty final entry.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let is_boundary = matches!(
            c,
            '\n' | '\r'
                | '\u{0b}'
                | '\u{0c}'
                | '\u{1c}'
                | '\u{1d}'
                | '\u{1e}'
                | '\u{85}'
                | '\u{2028}'
                | '\u{2029}'
        );
        if !is_boundary {
            continue;
        }

        lines.push(text[start..idx].to_string());
        start = idx + c.len_utf8();

        if c == '\r' {
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                start = next_idx + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(text[start..].to_string());
    }
    lines
}
