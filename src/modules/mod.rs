//! Module system for custom_markdown_lint
//!
//! This module provides the core trait, parameter handling and error types
//! shared by the module implementation and the binary-module protocol layer.

pub mod markdown_lint;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during module execution
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("missing required arguments: {}", .0.join(", "))]
    MissingParameter(Vec<String>),

    #[error("{0}")]
    InvalidParameter(String),

    #[error(
        "Unsupported parameters for ({module}) module: {}. Supported parameters include: {}.",
        .unsupported.join(", "),
        .supported.join(", ")
    )]
    UnsupportedParameters {
        module: String,
        unsupported: Vec<String>,
        supported: Vec<String>,
    },

    #[error("Failed to find required executable \"{0}\" in PATH")]
    ExecutableNotFound(String),

    #[error("Failed to decode output of '{program}' as UTF-8: {source}")]
    Decode {
        program: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for module operations
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Parameters passed to a module, in the order the host supplied them
pub type ModuleParams = IndexMap<String, serde_json::Value>;

/// Declared type of a module parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Str,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Str => "str",
        }
    }
}

/// One entry of a module's argument spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    /// A required string parameter
    pub const fn required_str(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamType::Str,
            required: true,
            description,
        }
    }
}

/// Reject undeclared keys and required keys that are absent.
///
/// A key present with a `null` value counts as absent. Both error lists are
/// sorted so messages are stable regardless of the host's key order.
pub fn check_argument_spec(
    module: &str,
    spec: &[ParamSpec],
    params: &ModuleParams,
) -> ModuleResult<()> {
    let mut unsupported: Vec<String> = params
        .keys()
        .filter(|key| !spec.iter().any(|p| p.name == key.as_str()))
        .cloned()
        .collect();

    if !unsupported.is_empty() {
        unsupported.sort();
        let mut supported: Vec<String> = spec.iter().map(|p| p.name.to_string()).collect();
        supported.sort();
        return Err(ModuleError::UnsupportedParameters {
            module: module.to_string(),
            unsupported,
            supported,
        });
    }

    let mut missing: Vec<String> = spec
        .iter()
        .filter(|p| p.required)
        .filter(|p| matches!(params.get(p.name), None | Some(serde_json::Value::Null)))
        .map(|p| p.name.to_string())
        .collect();

    if !missing.is_empty() {
        missing.sort();
        return Err(ModuleError::MissingParameter(missing));
    }

    Ok(())
}

/// Result of a module execution, before the protocol layer wraps it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleOutput {
    /// Whether the module changed anything
    pub changed: bool,
    /// Human-readable message about what happened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Return values, emitted as top-level keys of the result
    #[serde(flatten)]
    pub data: IndexMap<String, serde_json::Value>,
}

impl ModuleOutput {
    /// Create a new successful output with no changes
    pub fn ok() -> Self {
        Self::default()
    }

    /// Add data to the output
    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// Context for module execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleContext {
    /// Whether to run in check mode (dry run)
    pub check_mode: bool,
    /// Host-side verbosity (`-v` count), raises the module's log level
    pub verbosity: u8,
}

impl ModuleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Trait that all modules must implement
pub trait Module: Send + Sync {
    /// Returns the name of the module
    fn name(&self) -> &'static str;

    /// Returns the declared parameters of this module
    fn argument_spec(&self) -> &'static [ParamSpec];

    /// Execute the module with the given parameters
    fn execute(&self, params: &ModuleParams, context: &ModuleContext)
        -> ModuleResult<ModuleOutput>;

    /// Validate the parameters before execution
    fn validate_params(&self, params: &ModuleParams) -> ModuleResult<()> {
        check_argument_spec(self.name(), self.argument_spec(), params)
    }

    /// Returns the names of the required parameters
    fn required_params(&self) -> Vec<&'static str> {
        self.argument_spec()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }
}

/// Helper trait for extracting parameters
pub trait ParamExt {
    fn get_string(&self, key: &str) -> ModuleResult<Option<String>>;
    fn get_string_required(&self, key: &str) -> ModuleResult<String>;
    fn get_bool(&self, key: &str) -> ModuleResult<Option<bool>>;
    fn get_u8(&self, key: &str) -> ModuleResult<Option<u8>>;
}

impl ParamExt for ModuleParams {
    fn get_string(&self, key: &str) -> ModuleResult<Option<String>> {
        match self.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
            Some(serde_json::Value::Bool(b)) => Ok(Some(if *b { "True" } else { "False" }.into())),
            Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
            Some(v) => Err(ModuleError::InvalidParameter(format!(
                "argument '{}' is of type {} and we were unable to convert to str",
                key,
                json_type_name(v)
            ))),
        }
    }

    fn get_string_required(&self, key: &str) -> ModuleResult<String> {
        self.get_string(key)?
            .ok_or_else(|| ModuleError::MissingParameter(vec![key.to_string()]))
    }

    fn get_bool(&self, key: &str) -> ModuleResult<Option<bool>> {
        match self.get(key) {
            Some(serde_json::Value::Bool(b)) => Ok(Some(*b)),
            Some(serde_json::Value::String(s)) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(Some(true)),
                "false" | "no" | "0" | "off" => Ok(Some(false)),
                _ => Err(ModuleError::InvalidParameter(format!(
                    "{} must be a boolean",
                    key
                ))),
            },
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(_) => Err(ModuleError::InvalidParameter(format!(
                "{} must be a boolean",
                key
            ))),
        }
    }

    fn get_u8(&self, key: &str) -> ModuleResult<Option<u8>> {
        match self.get(key) {
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| {
                    ModuleError::InvalidParameter(format!("{} must be a small positive integer", key))
                }),
            Some(serde_json::Value::String(s)) => s.parse().map(Some).map_err(|_| {
                ModuleError::InvalidParameter(format!("{} must be a small positive integer", key))
            }),
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(_) => Err(ModuleError::InvalidParameter(format!(
                "{} must be a small positive integer",
                key
            ))),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "str",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "dict",
    }
}
