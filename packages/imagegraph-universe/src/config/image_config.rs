//! Image build configuration (builder)
//!
//! Preset first, then per-stage overrides via closures, then `build()` to
//! validate everything once.

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, ConfigOverrides};
use super::preset::Preset;
use super::stage_configs::{
    AnalysisConfig, CheckerConfig, ParallelConfig, ReflectionConfig, UniverseConfig,
};
use std::path::Path;
use tracing::warn;

const SUPPORTED_VERSIONS: [u32; 1] = [1];
const DEFAULT_IMAGE_NAME: &str = "image";

#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Base preset
    pub(crate) preset: Preset,

    pub(crate) image_name: String,
    pub(crate) main_entry_point: Option<String>,

    /// Stage-specific overrides
    pub(crate) analysis: Option<AnalysisConfig>,
    pub(crate) checker: Option<CheckerConfig>,
    pub(crate) reflection: Option<ReflectionConfig>,
    pub(crate) universe: Option<UniverseConfig>,
    pub(crate) parallel: Option<ParallelConfig>,
}

impl ImageConfig {
    /// Create from preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            main_entry_point: None,
            analysis: None,
            checker: None,
            reflection: None,
            universe: None,
            parallel: None,
        }
    }

    pub fn image_name(mut self, name: impl Into<String>) -> Self {
        self.image_name = name.into();
        self
    }

    /// Qualified name of the method the image starts in
    pub fn main_entry_point(mut self, name: impl Into<String>) -> Self {
        self.main_entry_point = Some(name.into());
        self
    }

    /// Override analysis stage
    pub fn analysis<F>(mut self, f: F) -> Self
    where
        F: FnOnce(AnalysisConfig) -> AnalysisConfig,
    {
        let base = self.analysis.take().unwrap_or_else(|| AnalysisConfig::from_preset(self.preset));
        self.analysis = Some(f(base));
        self
    }

    /// Override checker stage
    pub fn checker<F>(mut self, f: F) -> Self
    where
        F: FnOnce(CheckerConfig) -> CheckerConfig,
    {
        let base = self.checker.take().unwrap_or_else(|| CheckerConfig::from_preset(self.preset));
        self.checker = Some(f(base));
        self
    }

    /// Override reflection feature
    pub fn reflection<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ReflectionConfig) -> ReflectionConfig,
    {
        let base = self
            .reflection
            .take()
            .unwrap_or_else(|| ReflectionConfig::from_preset(self.preset));
        self.reflection = Some(f(base));
        self
    }

    /// Override universe builder
    pub fn universe<F>(mut self, f: F) -> Self
    where
        F: FnOnce(UniverseConfig) -> UniverseConfig,
    {
        let base = self.universe.take().unwrap_or_else(|| UniverseConfig::from_preset(self.preset));
        self.universe = Some(f(base));
        self
    }

    /// Override parallelism
    pub fn parallel<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ParallelConfig) -> ParallelConfig,
    {
        let base = self.parallel.take().unwrap_or_else(|| ParallelConfig::from_preset(self.preset));
        self.parallel = Some(f(base));
        self
    }

    /// Build and validate
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        // Step 1: individual stage configs
        if self.image_name.trim().is_empty() {
            return Err(ConfigError::Validation("image_name must not be empty".to_string()));
        }
        if let Some(ref cfg) = self.analysis {
            cfg.validate()?;
        }
        if let Some(ref cfg) = self.checker {
            cfg.validate()?;
        }
        if let Some(ref cfg) = self.reflection {
            cfg.validate()?;
        }
        if let Some(ref cfg) = self.universe {
            cfg.validate()?;
        }
        if let Some(ref cfg) = self.parallel {
            cfg.validate()?;
        }

        // Step 2: cross-stage validation
        self.cross_validate()?;

        Ok(ValidatedConfig(self))
    }

    fn cross_validate(&self) -> ConfigResult<()> {
        let analysis = self.effective_analysis();
        if analysis.return_after_analysis && analysis.exit_after_analysis {
            return Err(ConfigError::CrossStageConflict {
                issue: "return_after_analysis and exit_after_analysis are both set".to_string(),
                fix: "Keep return_after_analysis for a successful early stop, or exit_after_analysis for an interrupted one".to_string(),
            });
        }

        if let Some(ref reflection) = self.reflection {
            if !reflection.enabled && !reflection.configuration_files.is_empty() {
                warn!(
                    files = reflection.configuration_files.len(),
                    "reflection configuration files are ignored because the reflection feature is disabled"
                );
            }
        }

        Ok(())
    }

    fn effective_analysis(&self) -> AnalysisConfig {
        self.analysis
            .clone()
            .unwrap_or_else(|| AnalysisConfig::from_preset(self.preset))
    }

    /// Get base preset
    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<ValidatedConfig> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Load from YAML text (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        let mut raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        if raw.get("version").is_none() {
            return Err(ConfigError::MissingVersion);
        }
        // Unknown presets are reported below, after the schema check
        if let Some(preset) = raw
            .get("preset")
            .and_then(|p| p.as_str())
            .and_then(|p| Preset::from_str(p).ok())
        {
            merge_overrides_over_preset(&mut raw, preset)?;
        }
        let export: ConfigExportV1 = serde_yaml::from_value(raw)?;

        if !SUPPORTED_VERSIONS.contains(&export.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: export.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(name) = export.image_name {
            config.image_name = name;
        }
        config.main_entry_point = export.main_entry_point;

        if let Some(overrides) = export.overrides {
            config.analysis = overrides.analysis;
            config.checker = overrides.checker;
            config.reflection = overrides.reflection;
            config.universe = overrides.universe;
            config.parallel = overrides.parallel;
        }

        config.build()
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            preset: self.preset.to_string(),
            image_name: Some(self.image_name.clone()),
            main_entry_point: self.main_entry_point.clone(),
            overrides: Some(ConfigOverrides {
                analysis: self.analysis.clone(),
                checker: self.checker.clone(),
                reflection: self.reflection.clone(),
                universe: self.universe.clone(),
                parallel: self.parallel.clone(),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

/// Fill every partial stage override with the preset's values, so fields the
/// file leaves out keep the preset instead of the Balanced defaults
fn merge_overrides_over_preset(raw: &mut serde_yaml::Value, preset: Preset) -> ConfigResult<()> {
    let Some(overrides) = raw.get_mut("overrides").and_then(|o| o.as_mapping_mut()) else {
        return Ok(());
    };
    let stages = [
        ("analysis", serde_yaml::to_value(AnalysisConfig::from_preset(preset))?),
        ("checker", serde_yaml::to_value(CheckerConfig::from_preset(preset))?),
        ("reflection", serde_yaml::to_value(ReflectionConfig::from_preset(preset))?),
        ("universe", serde_yaml::to_value(UniverseConfig::from_preset(preset))?),
        ("parallel", serde_yaml::to_value(ParallelConfig::from_preset(preset))?),
    ];
    for (stage, mut merged) in stages {
        let Some(partial) = overrides.get_mut(stage) else {
            continue;
        };
        // Non-mapping values are left for the schema to reject
        let (Some(base), Some(fields)) = (merged.as_mapping_mut(), partial.as_mapping()) else {
            continue;
        };
        for (key, value) in fields {
            base.insert(key.clone(), value.clone());
        }
        *partial = merged;
    }
    Ok(())
}

/// Validated configuration (immutable, safe to use)
#[derive(Debug, Clone)]
pub struct ValidatedConfig(ImageConfig);

impl ValidatedConfig {
    pub fn into_inner(self) -> ImageConfig {
        self.0
    }

    pub fn as_inner(&self) -> &ImageConfig {
        &self.0
    }

    pub fn preset(&self) -> Preset {
        self.0.preset
    }

    pub fn image_name(&self) -> &str {
        &self.0.image_name
    }

    pub fn main_entry_point(&self) -> Option<&str> {
        self.0.main_entry_point.as_deref()
    }

    /// Get effective analysis config
    pub fn analysis(&self) -> AnalysisConfig {
        self.0.effective_analysis()
    }

    /// Get effective checker config
    pub fn checker(&self) -> CheckerConfig {
        self.0
            .checker
            .clone()
            .unwrap_or_else(|| CheckerConfig::from_preset(self.0.preset))
    }

    /// Get effective reflection config
    pub fn reflection(&self) -> ReflectionConfig {
        self.0
            .reflection
            .clone()
            .unwrap_or_else(|| ReflectionConfig::from_preset(self.0.preset))
    }

    /// Get effective universe config
    pub fn universe(&self) -> UniverseConfig {
        self.0
            .universe
            .clone()
            .unwrap_or_else(|| UniverseConfig::from_preset(self.0.preset))
    }

    /// Get effective parallel config
    pub fn parallel(&self) -> ParallelConfig {
        self.0
            .parallel
            .clone()
            .unwrap_or_else(|| ParallelConfig::from_preset(self.0.preset))
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let analysis = self.analysis();
        format!(
            "{} [image={}, max_iterations={}, naming_checks={}, reflection={}, workers={}]",
            self.preset(),
            self.image_name(),
            analysis.max_iterations,
            self.checker().verify_naming_conventions,
            self.reflection().enabled,
            self.parallel().effective_workers(),
        )
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        self.0.to_yaml()
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self(ImageConfig::preset(Preset::Balanced))
    }
}
