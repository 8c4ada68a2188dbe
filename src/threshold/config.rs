//! Declarative threshold rules and their JSON configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors raised while loading threshold configuration.
///
/// Any of these stops the report before a single threshold is evaluated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read threshold config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid threshold config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid threshold config {}: {reason}", path.display())]
    Shape { path: PathBuf, reason: String },
}

/// How a series is reduced before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonUnit {
    /// Compare item by item.
    #[serde(alias = "each")]
    Each,
    /// Compare the arithmetic means.
    #[serde(alias = "average")]
    Average,
    /// Compare the sums.
    #[serde(alias = "sum")]
    Sum,
    /// Compare the item counts.
    #[serde(alias = "count")]
    Count,
}

impl fmt::Display for ComparisonUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonUnit::Each => "EACH",
            ComparisonUnit::Average => "AVERAGE",
            ComparisonUnit::Sum => "SUM",
            ComparisonUnit::Count => "COUNT",
        })
    }
}

/// The relational operator applied to each before/after pair.
///
/// Wire names follow the threshold files (`eq`, `ratioGt`, ...); the
/// upper-case enum names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMethod {
    #[serde(rename = "eq", alias = "EQ")]
    Eq,
    #[serde(rename = "ne", alias = "NE")]
    Ne,
    #[serde(rename = "gt", alias = "GT")]
    Gt,
    #[serde(rename = "lt", alias = "LT")]
    Lt,
    #[serde(rename = "ge", alias = "GE")]
    Ge,
    #[serde(rename = "le", alias = "LE")]
    Le,
    #[serde(rename = "ratioGt", alias = "RATIO_GT")]
    RatioGt,
    #[serde(rename = "ratioLt", alias = "RATIO_LT")]
    RatioLt,
    #[serde(rename = "ratioGe", alias = "RATIO_GE")]
    RatioGe,
    #[serde(rename = "ratioLe", alias = "RATIO_LE")]
    RatioLe,
}

impl ComparisonMethod {
    /// Ratio methods compare `after / before` against the threshold value.
    pub fn is_ratio(&self) -> bool {
        matches!(
            self,
            ComparisonMethod::RatioGt
                | ComparisonMethod::RatioLt
                | ComparisonMethod::RatioGe
                | ComparisonMethod::RatioLe
        )
    }

    /// Methods that only need equality, valid for string and bool series.
    pub fn is_equality(&self) -> bool {
        matches!(self, ComparisonMethod::Eq | ComparisonMethod::Ne)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComparisonMethod::Eq => "EQ",
            ComparisonMethod::Ne => "NE",
            ComparisonMethod::Gt => "GT",
            ComparisonMethod::Lt => "LT",
            ComparisonMethod::Ge => "GE",
            ComparisonMethod::Le => "LE",
            ComparisonMethod::RatioGt => "RATIO_GT",
            ComparisonMethod::RatioLt => "RATIO_LT",
            ComparisonMethod::RatioGe => "RATIO_GE",
            ComparisonMethod::RatioLe => "RATIO_LE",
        }
    }
}

impl fmt::Display for ComparisonMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the after-data is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonObject {
    #[serde(alias = "before")]
    Before,
    #[serde(alias = "threshold")]
    Threshold,
}

impl fmt::Display for ComparisonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonObject::Before => "BEFORE",
            ComparisonObject::Threshold => "THRESHOLD",
        })
    }
}

/// A declarative pass/fail rule for one metric.
///
/// # Example JSON
///
/// ```json
/// {
///   "id": 1,
///   "threshold_name": "cpu_total_ratio",
///   "threshold_desc": "average CPU may grow by at most 10%",
///   "comparison_unit": "AVERAGE",
///   "comparison_method": "ratioGe",
///   "comparison_object": "BEFORE",
///   "metric_name": "cpu_total",
///   "threshold": 1.1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Threshold {
    pub id: i64,
    #[serde(rename = "threshold_name")]
    pub name: String,
    #[serde(rename = "threshold_desc", default)]
    pub description: String,
    pub comparison_unit: ComparisonUnit,
    pub comparison_method: ComparisonMethod,
    pub comparison_object: ComparisonObject,
    pub metric_name: String,
    pub threshold: f64,
    /// Items must carry at least one of these labels (empty: no constraint).
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "BTreeSet::is_empty")]
    pub include_labels: BTreeSet<String>,
    /// Items must carry none of these labels (empty: no constraint).
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_labels: BTreeSet<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a threshold document.
///
/// Accepts a bare array of threshold records or an object wrapping the array
/// under `"thresholds"`. `origin` is only used in error messages.
pub fn parse_thresholds(content: &str, origin: &Path) -> Result<Vec<Threshold>, ConfigError> {
    let parse_err = |source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    };

    let document: serde_json::Value = serde_json::from_str(content).map_err(parse_err)?;
    let records = match document {
        serde_json::Value::Array(_) => document,
        serde_json::Value::Object(mut map) => map.remove("thresholds").ok_or_else(|| {
            ConfigError::Shape {
                path: origin.to_path_buf(),
                reason: "expected a \"thresholds\" array".to_string(),
            }
        })?,
        other => {
            return Err(ConfigError::Shape {
                path: origin.to_path_buf(),
                reason: format!("expected an array or object, found {}", json_type(&other)),
            })
        }
    };

    serde_json::from_value(records).map_err(parse_err)
}

/// Read and parse a threshold file.
pub fn load_thresholds(path: &Path) -> Result<Vec<Threshold>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let thresholds = parse_thresholds(&content, path)?;
    tracing::debug!("loaded {} thresholds from {}", thresholds.len(), path.display());
    Ok(thresholds)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn origin() -> &'static Path {
        Path::new("test.threshold.json")
    }

    const RECORD: &str = r#"{
        "id": 7,
        "threshold_name": "failed_cases",
        "threshold_desc": "no new failing cases",
        "comparison_unit": "COUNT",
        "comparison_method": "ge",
        "comparison_object": "BEFORE",
        "metric_name": "failed",
        "threshold": 0,
        "include_labels": ["920100-1"],
        "exclude_labels": null
    }"#;

    #[test]
    fn test_parse_wrapped_document() {
        let json = format!(r#"{{"thresholds": [{}]}}"#, RECORD);
        let thresholds = parse_thresholds(&json, origin()).unwrap();
        assert_eq!(thresholds.len(), 1);

        let t = &thresholds[0];
        assert_eq!(t.id, 7);
        assert_eq!(t.name, "failed_cases");
        assert_eq!(t.description, "no new failing cases");
        assert_eq!(t.comparison_unit, ComparisonUnit::Count);
        assert_eq!(t.comparison_method, ComparisonMethod::Ge);
        assert_eq!(t.comparison_object, ComparisonObject::Before);
        assert_eq!(t.metric_name, "failed");
        assert_eq!(t.threshold, 0.0);
        assert!(t.include_labels.contains("920100-1"));
        assert!(t.exclude_labels.is_empty());
    }

    #[test]
    fn test_parse_bare_array() {
        let json = format!("[{}]", RECORD);
        assert_eq!(parse_thresholds(&json, origin()).unwrap().len(), 1);
    }

    #[test]
    fn test_method_spellings() {
        for (raw, expected) in [
            ("\"ratioGt\"", ComparisonMethod::RatioGt),
            ("\"RATIO_GT\"", ComparisonMethod::RatioGt),
            ("\"ratioLe\"", ComparisonMethod::RatioLe),
            ("\"lt\"", ComparisonMethod::Lt),
            ("\"LE\"", ComparisonMethod::Le),
        ] {
            let parsed: ComparisonMethod = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expected);
        }
        assert!(ComparisonMethod::RatioGe.is_ratio());
        assert!(!ComparisonMethod::Ge.is_ratio());
        assert!(ComparisonMethod::Ne.is_equality());
    }

    #[test]
    fn test_unknown_enum_is_config_error() {
        let json = RECORD.replace("\"COUNT\"", "\"MEDIAN\"");
        let err = parse_thresholds(&format!("[{}]", json), origin()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.threshold.json"));

        let json = RECORD.replace("\"ge\"", "\"approx\"");
        assert!(parse_thresholds(&format!("[{}]", json), origin()).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = RECORD.replace("\"id\": 7,", "\"id\": 7, \"severity\": \"high\",");
        assert!(parse_thresholds(&format!("[{}]", json), origin()).is_err());
    }

    #[test]
    fn test_wrong_shape() {
        let err = parse_thresholds("42", origin()).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));

        let err = parse_thresholds(r#"{"rules": []}"#, origin()).unwrap_err();
        assert!(err.to_string().contains("thresholds"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[{}]", RECORD).unwrap();
        let thresholds = load_thresholds(file.path()).unwrap();
        assert_eq!(thresholds[0].id, 7);

        let err = load_thresholds(Path::new("/nonexistent/ftw.threshold.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
