//! Configuration I/O (YAML)
//!
//! Defines YAML schema types. Loading and export live on `ImageConfig`.

use super::stage_configs::*;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Base preset
    pub preset: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,

    /// Qualified name of the method the image starts in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_entry_point: Option<String>,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checker: Option<CheckerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<ReflectionConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe: Option<UniverseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ConfigError;
    use crate::config::{ImageConfig, Preset};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = ImageConfig::preset(Preset::Balanced)
            .image_name("hello")
            .analysis(|c| c.max_iterations(50));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: balanced"));
        assert!(yaml.contains("max_iterations: 50"));

        let loaded = ImageConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded.analysis().max_iterations, 50);
        assert_eq!(loaded.image_name(), "hello");
    }

    #[test]
    fn test_yaml_loading_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
version: 1
preset: thorough
main_entry_point: "app.Main.main()"
overrides:
  checker:
    namespace_markers:
      - marker: hosted
        exempt_prefixes: ["org.graalvm.nativeimage."]
  parallel:
    num_workers: 2
"#
        )
        .unwrap();

        let config = ImageConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.preset(), Preset::Thorough);
        assert_eq!(config.main_entry_point(), Some("app.Main.main()"));
        assert!(config.checker().verify_naming_conventions);
        assert_eq!(config.checker().namespace_markers[0].exempt_prefixes.len(), 1);
        assert_eq!(config.parallel().num_workers, 2);
        assert_eq!(config.analysis().max_iterations, 5000);
    }

    #[test]
    fn test_partial_stage_override_keeps_preset_values() {
        let yaml = "version: 1\npreset: thorough\noverrides:\n  analysis:\n    max_iterations: 50\n";

        let config = ImageConfig::from_yaml_str(yaml).unwrap();
        let analysis = config.analysis();
        assert_eq!(analysis.max_iterations, 50);
        assert!(analysis.report_analysis_statistics);
        assert_eq!(
            analysis,
            AnalysisConfig::from_preset(Preset::Thorough).max_iterations(50)
        );
        // Stages without an override come from the preset as before
        assert!(config.checker().verify_naming_conventions);
    }

    #[test]
    fn test_partial_override_on_fast_preset() {
        let yaml = "version: 1\npreset: fast\noverrides:\n  analysis:\n    return_after_analysis: true\n";

        let config = ImageConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.analysis().max_iterations, 200);
        assert!(config.analysis().return_after_analysis);
    }

    #[test]
    fn test_yaml_missing_version() {
        let err = ImageConfig::from_yaml_str("preset: fast\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let err = ImageConfig::from_yaml_str("version: 2\npreset: fast\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_yaml_unknown_preset() {
        let err = ImageConfig::from_yaml_str("version: 1\npreset: turbo\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(p) if p == "turbo"));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let err = ImageConfig::from_yaml_str("version: 1\npreset: fast\nturbo: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_yaml_invalid_override_rejected() {
        let err = ImageConfig::from_yaml_str(
            "version: 1\npreset: fast\noverrides:\n  analysis:\n    max_iterations: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Range { .. }));
    }
}
