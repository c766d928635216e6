//! Stage-specific configurations
//!
//! One struct per build stage. Every stage config has `from_preset`, builder
//! setters named after their field, and a `validate()` that reports the
//! offending field with a hint.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Analysis (fixpoint driver)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fixpoint iteration ceiling (1..=100000)
    pub max_iterations: usize,

    /// Log the analysis statistics as JSON when the analysis exits
    pub report_analysis_statistics: bool,

    /// Stop the build successfully right after analysis
    pub return_after_analysis: bool,

    /// Stop the build right after analysis with an interrupted outcome
    pub exit_after_analysis: bool,

    /// Type states larger than this may be reported as "close to all
    /// instantiated" (1..=1000000)
    pub close_to_all_threshold: usize,
}

impl AnalysisConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_iterations == 0 || self.max_iterations > 100_000 {
            return Err(ConfigError::range_with_hint(
                "max_iterations",
                self.max_iterations,
                1,
                100_000,
                "The fixpoint needs at least one iteration",
            ));
        }
        if self.close_to_all_threshold == 0 || self.close_to_all_threshold > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "close_to_all_threshold",
                self.close_to_all_threshold,
                1,
                1_000_000,
                "Threshold must be a positive type count",
            ));
        }
        Ok(())
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Builder: Set report_analysis_statistics
    pub fn report_analysis_statistics(mut self, v: bool) -> Self {
        self.report_analysis_statistics = v;
        self
    }

    /// Builder: Set return_after_analysis
    pub fn return_after_analysis(mut self, v: bool) -> Self {
        self.return_after_analysis = v;
        self
    }

    /// Builder: Set exit_after_analysis
    pub fn exit_after_analysis(mut self, v: bool) -> Self {
        self.exit_after_analysis = v;
        self
    }

    /// Builder: Set close_to_all_threshold
    pub fn close_to_all_threshold(mut self, v: usize) -> Self {
        self.close_to_all_threshold = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self {
            max_iterations: 1000,
            report_analysis_statistics: false,
            return_after_analysis: false,
            exit_after_analysis: false,
            close_to_all_threshold: crate::shared::models::DEFAULT_CLOSE_TO_ALL_THRESHOLD,
        };
        match preset {
            Preset::Fast => Self {
                max_iterations: 200,
                ..base
            },
            Preset::Balanced | Preset::Custom => base,
            Preset::Thorough => Self {
                max_iterations: 5000,
                report_analysis_statistics: true,
                ..base
            },
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

// ============================================================================
// Consistency checker
// ============================================================================

/// Substring that marks a build-time-only namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceMarker {
    /// Lowercase substring searched in lowercased qualified names
    pub marker: String,

    /// Qualified-name prefixes allowed to contain the marker
    #[serde(default)]
    pub exempt_prefixes: Vec<String>,
}

impl NamespaceMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            exempt_prefixes: Vec::new(),
        }
    }

    /// Builder: add an exempt prefix
    pub fn exempt(mut self, prefix: impl Into<String>) -> Self {
        self.exempt_prefixes.push(prefix.into());
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.marker.is_empty() {
            return Err(ConfigError::Validation(
                "namespace marker must not be empty".to_string(),
            ));
        }
        if self.marker.chars().any(char::is_uppercase) {
            return Err(ConfigError::Validation(format!(
                "namespace marker '{}' must be lowercase; names are compared lowercased",
                self.marker
            )));
        }
        Ok(())
    }
}

impl Default for NamespaceMarker {
    fn default() -> Self {
        Self::new("hosted")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Flag run-time use of build-time-only elements
    pub verify_naming_conventions: bool,

    /// Build-time namespace markers
    pub namespace_markers: Vec<NamespaceMarker>,
}

impl CheckerConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.verify_naming_conventions && self.namespace_markers.is_empty() {
            return Err(ConfigError::Validation(
                "verify_naming_conventions requires at least one namespace marker".to_string(),
            ));
        }
        for marker in &self.namespace_markers {
            marker.validate()?;
        }
        Ok(())
    }

    /// Builder: Set verify_naming_conventions
    pub fn verify_naming_conventions(mut self, v: bool) -> Self {
        self.verify_naming_conventions = v;
        self
    }

    /// Builder: Replace the namespace markers
    pub fn namespace_markers(mut self, v: Vec<NamespaceMarker>) -> Self {
        self.namespace_markers = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            verify_naming_conventions: matches!(preset, Preset::Thorough),
            namespace_markers: vec![NamespaceMarker::default()],
        }
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

// ============================================================================
// Reflection feature
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    /// Register the built-in reflection feature
    pub enabled: bool,

    /// JSON reflection configuration files, parsed during setup
    pub configuration_files: Vec<PathBuf>,

    /// Annotation that registers a type for reflection
    pub annotation: String,
}

impl ReflectionConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.annotation.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reflection annotation name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder: Set enabled
    pub fn enabled(mut self, v: bool) -> Self {
        self.enabled = v;
        self
    }

    /// Builder: Set configuration_files
    pub fn configuration_files(mut self, v: Vec<PathBuf>) -> Self {
        self.configuration_files = v;
        self
    }

    /// Builder: Set annotation
    pub fn annotation(mut self, v: impl Into<String>) -> Self {
        self.annotation = v.into();
        self
    }

    /// Create from preset
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            enabled: true,
            configuration_files: Vec::new(),
            annotation: "ContainReflection".to_string(),
        }
    }
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

// ============================================================================
// Universe builder
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Log every hosted type after the universe is built
    pub print_universe: bool,
}

impl UniverseConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    /// Builder: Set print_universe
    pub fn print_universe(mut self, v: bool) -> Self {
        self.print_universe = v;
        self
    }

    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            print_universe: false,
        }
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

// ============================================================================
// Parallelism
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of workers (0=auto, 1..=256)
    pub num_workers: usize,

    /// Enable Rayon parallel iterator
    pub enable_rayon: bool,
}

impl ParallelConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_workers > 256 {
            return Err(ConfigError::range_with_hint(
                "num_workers",
                self.num_workers,
                0,
                256,
                "Number of workers must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    /// Builder: Set num_workers
    pub fn num_workers(mut self, v: usize) -> Self {
        self.num_workers = v;
        self
    }

    /// Builder: Set enable_rayon
    pub fn enable_rayon(mut self, v: bool) -> Self {
        self.enable_rayon = v;
        self
    }

    /// Worker count with 0 resolved to the CPU count
    pub fn effective_workers(&self) -> usize {
        if self.num_workers == 0 {
            num_cpus::get()
        } else {
            self.num_workers
        }
    }

    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Custom => Self {
                num_workers: 1,
                enable_rayon: false,
            },
            _ => Self {
                num_workers: 0, // Auto
                enable_rayon: true,
            },
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
