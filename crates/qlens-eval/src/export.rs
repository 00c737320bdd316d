//! Export Module: JSON output for reports and graph hand-off.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EvalError, EvalResult};

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Export any report to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(report: &T, config: &ExportConfig) -> EvalResult<String> {
    if config.pretty {
        serde_json::to_string_pretty(report).map_err(EvalError::from)
    } else {
        serde_json::to_string(report).map_err(EvalError::from)
    }
}

/// Export any report to a JSON file.
pub fn to_file<T: Serialize + ?Sized>(
    report: &T,
    path: &Path,
    config: &ExportConfig,
) -> EvalResult<()> {
    let json = to_json(report, config)?;
    std::fs::write(path, json)
        .map_err(|e| EvalError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;

    #[test]
    fn test_export_config_default() {
        let config = ExportConfig::default();
        assert!(config.pretty);
    }

    #[test]
    fn test_compact_and_pretty() {
        let fv = FeatureVector::from_pairs([("depth", 3.0)]);
        let compact = to_json(&fv, &ExportConfig { pretty: false }).unwrap();
        assert_eq!(compact, r#"{"depth":3.0}"#);
        let pretty = to_json(&fv, &ExportConfig::default()).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        let fv = FeatureVector::from_pairs([("depth", 3.0)]);
        to_file(&fv, &path, &ExportConfig::default()).unwrap();
        let back: FeatureVector =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, fv);

        let bad = dir.path().join("missing").join("out.json");
        assert!(matches!(
            to_file(&fv, &bad, &ExportConfig::default()),
            Err(EvalError::Io(_))
        ));
    }
}
