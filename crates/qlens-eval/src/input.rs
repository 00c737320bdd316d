//! Input Module: loading circuit descriptions from disk.

use std::path::Path;

use qlens_ir::{Circuit, CircuitDescription};

use crate::error::{EvalError, EvalResult};

/// Description encodings recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Detect the format from a path's extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(InputFormat::Json),
            "yaml" | "yml" => Some(InputFormat::Yaml),
            _ => None,
        }
    }
}

/// Parse a circuit description in the given format.
pub fn parse_description(source: &str, format: InputFormat) -> EvalResult<CircuitDescription> {
    let description = match format {
        InputFormat::Json => CircuitDescription::from_json(source)?,
        InputFormat::Yaml => CircuitDescription::from_yaml(source)?,
    };
    Ok(description)
}

/// Read and validate a circuit from a JSON or YAML description file.
///
/// Circuits without a name take the file stem.
pub fn load_circuit(path: &Path) -> EvalResult<Circuit> {
    let format = InputFormat::from_path(path).ok_or_else(|| {
        EvalError::Parse(format!(
            "Unsupported circuit file '{}': expected .json, .yaml or .yml",
            path.display()
        ))
    })?;
    let source = std::fs::read_to_string(path)
        .map_err(|e| EvalError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut description = parse_description(&source, format)?;
    if description.name.is_none() {
        description.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(ToString::to_string);
    }
    Ok(description.into_circuit()?)
}
