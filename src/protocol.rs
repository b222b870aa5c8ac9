//! Ansible binary module protocol
//!
//! Ansible runs a binary module with a single argument, the path of a file
//! holding the task's parameters as a JSON object, and reads one JSON object
//! back from standard output. Keys prefixed with `_ansible_` carry host
//! settings such as check mode and are not module parameters.

use crate::error::{Error, Result};
use crate::modules::{Module, ModuleContext, ModuleOutput, ModuleParams, ParamExt};
use indexmap::IndexMap;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Prefix of host-internal keys in the arguments file
pub const INTERNAL_PREFIX: &str = "_ansible_";

/// Wrapper key some callers put around the parameters
pub const ARGS_WRAPPER: &str = "ANSIBLE_MODULE_ARGS";

/// Parameters and host settings of one module run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleInvocation {
    /// Module parameters with internal keys removed
    pub params: ModuleParams,
    /// Host settings taken from the internal keys
    pub context: ModuleContext,
}

impl ModuleInvocation {
    /// Read an invocation from the arguments file the host wrote
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::args_file(path, e))?;
        Self::from_json(&content)
    }

    /// Parse an invocation from the JSON text of an arguments file
    pub fn from_json(content: &str) -> Result<Self> {
        let mut raw: ModuleParams =
            serde_json::from_str(content).map_err(|e| Error::ArgsParse(e.to_string()))?;

        let wrapped = match raw.get(ARGS_WRAPPER) {
            Some(serde_json::Value::Object(inner)) if raw.len() == 1 => Some(inner.clone()),
            _ => None,
        };
        if let Some(inner) = wrapped {
            raw = inner.into_iter().collect();
        }

        let context = ModuleContext::new()
            .with_check_mode(raw.get_bool("_ansible_check_mode")?.unwrap_or(false))
            .with_verbosity(raw.get_u8("_ansible_verbosity")?.unwrap_or(0));

        raw.retain(|key, _| !key.starts_with(INTERNAL_PREFIX));
        debug!(
            "Parsed {} module parameter(s), check_mode={}",
            raw.len(),
            context.check_mode
        );

        Ok(Self {
            params: raw,
            context,
        })
    }
}

/// Arguments echoed back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub module_args: ModuleParams,
}

/// The JSON document a module prints for the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResponse {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(flatten)]
    pub data: IndexMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<Invocation>,
}

impl ModuleResponse {
    /// Successful response carrying the module's output
    pub fn exit_json(output: ModuleOutput) -> Self {
        Self {
            changed: output.changed,
            failed: false,
            msg: output.msg,
            data: output.data,
            invocation: None,
        }
    }

    /// Failed response with a message
    pub fn fail_json(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: Some(msg.into()),
            data: IndexMap::new(),
            invocation: None,
        }
    }

    /// Echo the module arguments back under `invocation.module_args`
    pub fn with_invocation(mut self, params: &ModuleParams) -> Self {
        self.invocation = Some(Invocation {
            module_args: params.clone(),
        });
        self
    }

    /// Process exit status the host expects for this response
    pub fn exit_code(&self) -> i32 {
        i32::from(self.failed)
    }

    /// Write the response as a single line of JSON
    pub fn emit<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Validate and run `module` for one invocation.
///
/// Every module error becomes a `fail_json` response; nothing escapes as a
/// panic or a bare error.
pub fn dispatch(module: &dyn Module, invocation: &ModuleInvocation) -> ModuleResponse {
    let outcome = module
        .validate_params(&invocation.params)
        .and_then(|()| module.execute(&invocation.params, &invocation.context));

    match outcome {
        Ok(output) => ModuleResponse::exit_json(output).with_invocation(&invocation.params),
        Err(e) => {
            warn!("Module {} failed: {}", module.name(), e);
            ModuleResponse::fail_json(e.to_string()).with_invocation(&invocation.params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_keys_become_context() {
        let invocation = ModuleInvocation::from_json(
            r#"{
                "name": "test.md",
                "action": "problems",
                "_ansible_check_mode": true,
                "_ansible_diff": "yes",
                "_ansible_verbosity": 2,
                "_ansible_module_name": "custom_markdown_lint"
            }"#,
        )
        .unwrap();

        assert_eq!(
            invocation.context,
            ModuleContext::new()
                .with_check_mode(true)
                .with_verbosity(2)
        );
        assert_eq!(
            invocation.params.keys().collect::<Vec<_>>(),
            vec!["name", "action"]
        );
    }

    #[test]
    fn test_wrapper_is_unwrapped() {
        let invocation = ModuleInvocation::from_json(
            r#"{"ANSIBLE_MODULE_ARGS": {"name": "a.md", "action": "problems"}}"#,
        )
        .unwrap();
        assert_eq!(invocation.params.get_string("name").unwrap().as_deref(), Some("a.md"));
        assert!(!invocation.context.check_mode);
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = ModuleInvocation::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::ArgsParse(_)));
    }

    #[test]
    fn test_bad_check_mode_flag_is_rejected() {
        let err = ModuleInvocation::from_json(r#"{"_ansible_check_mode": "maybe"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Module(_)));
    }

    #[test]
    fn test_fail_json_shape() {
        let response = ModuleResponse::fail_json("Failed.");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "changed": false,
                "failed": true,
                "msg": "Failed."
            })
        );
        assert_eq!(response.exit_code(), 1);
    }

    #[test]
    fn test_emit_writes_one_line() {
        let mut buffer = Vec::new();
        ModuleResponse::exit_json(ModuleOutput::ok())
            .emit(&mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"changed\":false}\n");
    }
}
