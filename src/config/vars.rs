use std::collections::BTreeMap;
use std::path::Path;

use tera::Value;
use tracing::debug;

use crate::error::{Result, SiteError};
use crate::layout::SiteLayout;

/// Variables exposed to every template at the top level.
pub type VariableSet = BTreeMap<String, Value>;

/// Load the site variables from `vars.yml` (or `vars.yaml`).
///
/// A missing file yields an empty set. A file that exists but does not parse aborts the run;
/// no partial set is ever returned.
pub fn load_variables(layout: &SiteLayout) -> Result<VariableSet> {
    let Some(path) = layout.vars_file() else {
        debug!(source = %layout.source_root.display(), "no vars file, using empty variable set");
        return Ok(VariableSet::new());
    };

    let content = std::fs::read_to_string(&path).map_err(|e| SiteError::Io {
        context: format!("reading variables file {}", path.display()),
        source: e,
    })?;

    let variables = parse_variables(&path, &content)?;
    debug!(path = %path.display(), count = variables.len(), "loaded variables");
    Ok(variables)
}

/// Parse the contents of a vars file. `path` is only used for error reporting.
pub fn parse_variables(path: &Path, content: &str) -> Result<VariableSet> {
    if is_blank_document(content) {
        return Ok(VariableSet::new());
    }

    let mut document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| SiteError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
    // `<<` merge keys
    document
        .apply_merge()
        .map_err(|e| SiteError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mapping = match document {
        serde_yaml::Value::Null => return Ok(VariableSet::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        other => {
            return Err(SiteError::ConfigShape {
                path: path.to_path_buf(),
                reason: format!("expected a mapping at the top level, found {}", kind(&other)),
            })
        }
    };

    let mut variables = VariableSet::new();
    for (key, value) in mapping {
        let name = match key {
            serde_yaml::Value::String(name) => name,
            other => {
                return Err(SiteError::ConfigShape {
                    path: path.to_path_buf(),
                    reason: format!("variable names must be strings, found {}", kind(&other)),
                })
            }
        };
        let value = serde_json::to_value(&value).map_err(|e| SiteError::ConfigShape {
            path: path.to_path_buf(),
            reason: format!("variable '{name}' cannot be used in templates: {e}"),
        })?;
        variables.insert(name, value);
    }

    Ok(variables)
}

/// Whitespace and comments only.
fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
