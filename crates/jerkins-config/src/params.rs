//! Job parameter declarations.
//!
//! The default format is KDL with one node per parameter:
//!
//! ```kdl
//! branch ""
//! tag ""
//! env "prod"
//! retries 3
//! ```
//!
//! A node without an argument declares an empty value. Files ending in
//! `.json` are read as a flat object instead.

use crate::{ConfigError, ConfigResult};
use jerkins_core::ParameterSet;
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::path::Path;
use tracing::debug;

/// Load a parameter declaration from disk, picking the format by extension.
pub fn load_parameters(path: &Path) -> ConfigResult<ParameterSet> {
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let params = if is_json {
        parse_json_parameters(&content)?
    } else {
        parse_kdl_parameters(&content)?
    };

    debug!(path = %path.display(), count = params.len(), "Loaded job parameters");
    Ok(params)
}

/// Parse a parameter declaration from KDL text.
pub fn parse_kdl_parameters(kdl: &str) -> ConfigResult<ParameterSet> {
    let doc: KdlDocument = kdl.parse()?;
    let mut params = ParameterSet::new();

    for node in doc.nodes() {
        let name = node.name().value().to_string();
        let value = get_first_arg(node)
            .map(scalar_to_string)
            .unwrap_or_default();
        insert_unique(&mut params, name, value)?;
    }

    Ok(params)
}

/// Parse a parameter declaration from a flat JSON object.
pub fn parse_json_parameters(json: &str) -> ConfigResult<ParameterSet> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or_else(|| ConfigError::InvalidValue {
        field: "job parameters".to_string(),
        message: "expected a JSON object".to_string(),
    })?;

    let mut params = ParameterSet::new();
    for (name, value) in object {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: name.clone(),
                    message: "expected a string, number or boolean".to_string(),
                });
            }
        };
        insert_unique(&mut params, name.clone(), value)?;
    }

    Ok(params)
}

fn insert_unique(params: &mut ParameterSet, name: String, value: String) -> ConfigResult<()> {
    if params.iter().any(|p| p.name.eq_ignore_ascii_case(&name)) {
        return Err(ConfigError::Duplicate(format!("parameter '{}'", name)));
    }
    params.insert(name, value);
    Ok(())
}

fn get_first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
}

fn scalar_to_string(value: &KdlValue) -> String {
    if let Some(s) = value.as_string() {
        s.to_string()
    } else if let Some(i) = value.as_integer() {
        i.to_string()
    } else if let Some(f) = value.as_float() {
        f.to_string()
    } else if let Some(b) = value.as_bool() {
        b.to_string()
    } else {
        String::new()
    }
}
