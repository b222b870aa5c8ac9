//! Module documentation.
//!
//! Binary modules cannot carry Ansible's docstring blocks, so `ansible-doc`
//! looks for a YAML sidecar next to the executable instead. This module builds
//! that sidecar from the same argument spec the validator uses.

use crate::error::Result;
use crate::modules::markdown_lint::{ARGUMENT_SPEC, MODULE_NAME, RESULT_KEY};
use crate::modules::ParamSpec;
use indexmap::IndexMap;
use serde::Serialize;

const EXAMPLES: &str = r#"# List all the markdown problems for test.md
- name: List all the mark down problems for test.md
  custom_markdown_lint:
    name: test.md
    action: problems
"#;

/// The `DOCUMENTATION` block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDocumentation {
    pub module: String,
    pub short_description: String,
    pub version_added: String,
    pub description: Vec<String>,
    pub author: Vec<String>,
    pub options: IndexMap<String, OptionDoc>,
}

/// Documentation for one module option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDoc {
    pub description: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
}

impl From<&ParamSpec> for OptionDoc {
    fn from(spec: &ParamSpec) -> Self {
        Self {
            description: vec![spec.description.to_string()],
            kind: spec.kind.as_str().to_string(),
            required: spec.required,
        }
    }
}

/// Documentation for one return value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnDoc {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub returned: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<serde_json::Value>,
}

/// The full sidecar document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Sidecar {
    pub documentation: ModuleDocumentation,
    pub examples: String,
    #[serde(rename = "RETURN")]
    pub return_values: IndexMap<String, ReturnDoc>,
}

/// Documentation of the markdown lint module
pub fn documentation() -> ModuleDocumentation {
    ModuleDocumentation {
        module: MODULE_NAME.to_string(),
        short_description: "Gets the list of Markdown Lint problems.".to_string(),
        version_added: "2.9".to_string(),
        description: vec![
            "The module can report all the markdown lint problems for a file or folder."
                .to_string(),
        ],
        author: vec!["Bret Mullinix".to_string()],
        options: ARGUMENT_SPEC
            .iter()
            .map(|spec| (spec.name.to_string(), OptionDoc::from(spec)))
            .collect(),
    }
}

/// Sidecar with documentation, examples and return values
pub fn sidecar() -> Sidecar {
    let mut return_values = IndexMap::new();
    return_values.insert(
        RESULT_KEY.to_string(),
        ReturnDoc {
            description: "All the markdown lint problems".to_string(),
            kind: "list".to_string(),
            returned: "always".to_string(),
            sample: Some(serde_json::json!(["test.md:3: MD013 Line too long"])),
        },
    );

    Sidecar {
        documentation: documentation(),
        examples: EXAMPLES.to_string(),
        return_values,
    }
}

/// Render the sidecar as YAML
pub fn render_sidecar() -> Result<String> {
    Ok(serde_yaml::to_string(&sidecar())?)
}
