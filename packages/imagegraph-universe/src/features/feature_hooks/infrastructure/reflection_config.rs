//! Reflection configuration parsing
//!
//! JSON files list the program elements that must stay available for
//! reflective access:
//!
//! ```json
//! [
//!   { "name": "app.Plugin", "allDeclaredMethods": true },
//!   { "name": "app.Config",
//!     "methods": [{ "name": "<init>", "parameterTypes": [] }],
//!     "fields": [{ "name": "path" }] }
//! ]
//! ```
//!
//! Type annotations carry the same information:
//! `ContainReflection` registers the annotated type with all declared
//! fields, `ContainReflection(a.b.C)` registers `a.b.C`, and
//! `ContainReflection(a.b.C, allDeclaredFields)` adds its fields.

use crate::features::feature_hooks::ports::FeatureError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionEntry {
    pub name: String,
    #[serde(default)]
    pub all_declared_methods: bool,
    #[serde(default)]
    pub all_declared_fields: bool,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

impl ReflectionEntry {
    pub fn for_type(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            all_declared_methods: false,
            all_declared_fields: false,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEntry {
    pub name: String,
    /// Qualified parameter type names; absent matches every overload
    #[serde(default)]
    pub parameter_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
}

pub struct ReflectionConfigurationParser;

impl ReflectionConfigurationParser {
    pub fn parse_str(json: &str) -> Result<Vec<ReflectionEntry>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse every file in order. Errors name the feature and the file.
    pub fn parse_files(feature: &str, files: &[PathBuf]) -> Result<Vec<ReflectionEntry>, FeatureError> {
        let mut entries = Vec::new();
        for path in files {
            entries.extend(Self::parse_file(feature, path)?);
        }
        Ok(entries)
    }

    fn parse_file(feature: &str, path: &Path) -> Result<Vec<ReflectionEntry>, FeatureError> {
        let config_error = |message: String| FeatureError::Configuration {
            feature: feature.to_string(),
            path: path.to_path_buf(),
            message,
        };

        if !path.exists() {
            return Err(config_error(format!(
                "The {} configuration file \"{}\" does not exist.",
                feature,
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("Could not open {}: {}", path.display(), e)))?;
        Self::parse_str(&content).map_err(|e| {
            config_error(format!(
                "Error parsing {} configuration in {}:\n{}\nVerify that the configuration matches the expected schema.",
                feature,
                path.display(),
                e
            ))
        })
    }

    /// Entry described by `annotation` on the type `annotated_type`, if the
    /// annotation is `annotation_name` (bare or with arguments)
    pub fn parse_annotation(
        annotation_name: &str,
        annotated_type: &str,
        annotation: &str,
    ) -> Option<ReflectionEntry> {
        let rest = annotation.strip_prefix(annotation_name)?;
        if rest.is_empty() {
            let mut entry = ReflectionEntry::for_type(annotated_type);
            entry.all_declared_fields = true;
            return Some(entry);
        }

        let args = rest.strip_prefix('(')?.strip_suffix(')')?;
        let mut parts = args.split(',').map(str::trim);
        let target = parts.next().filter(|t| !t.is_empty())?;
        let mut entry = ReflectionEntry::for_type(target);
        entry.all_declared_fields = parts.any(|p| p == "allDeclaredFields");
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_entry() {
        let entries = ReflectionConfigurationParser::parse_str(
            r#"[
                {"name": "app.Plugin", "allDeclaredMethods": true},
                {"name": "app.Config",
                 "methods": [{"name": "load", "parameterTypes": ["java.lang.String"]}],
                 "fields": [{"name": "path"}],
                 "allPublicConstructors": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].all_declared_methods);
        assert!(!entries[0].all_declared_fields);
        assert_eq!(entries[1].methods[0].name, "load");
        assert_eq!(
            entries[1].methods[0].parameter_types.as_deref(),
            Some(&["java.lang.String".to_string()][..])
        );
        assert_eq!(entries[1].fields[0].name, "path");
    }

    #[test]
    fn test_missing_file_names_feature_and_path() {
        let err = ReflectionConfigurationParser::parse_files(
            "reflection",
            &[PathBuf::from("/nonexistent/reflect-config.json")],
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("reflection"));
        assert!(msg.contains("reflect-config.json"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"name": 42}]"#).unwrap();

        let err = ReflectionConfigurationParser::parse_files("reflection", &[file.path().to_path_buf()])
            .unwrap_err();
        match err {
            FeatureError::Configuration { feature, message, .. } => {
                assert_eq!(feature, "reflection");
                assert!(message.starts_with("Error parsing reflection configuration"));
                assert!(message.contains("Verify that the configuration"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_annotation_forms() {
        let bare = ReflectionConfigurationParser::parse_annotation("ContainReflection", "app.A", "ContainReflection")
            .unwrap();
        assert_eq!(bare.name, "app.A");
        assert!(bare.all_declared_fields);

        let target = ReflectionConfigurationParser::parse_annotation(
            "ContainReflection",
            "app.A",
            "ContainReflection(app.B)",
        )
        .unwrap();
        assert_eq!(target.name, "app.B");
        assert!(!target.all_declared_fields);

        let with_fields = ReflectionConfigurationParser::parse_annotation(
            "ContainReflection",
            "app.A",
            "ContainReflection(app.B, allDeclaredFields)",
        )
        .unwrap();
        assert!(with_fields.all_declared_fields);

        assert!(ReflectionConfigurationParser::parse_annotation("ContainReflection", "app.A", "Fold").is_none());
        assert!(ReflectionConfigurationParser::parse_annotation(
            "ContainReflection",
            "app.A",
            "ContainReflectionX"
        )
        .is_none());
    }
}
