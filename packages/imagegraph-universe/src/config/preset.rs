//! Preset configurations
//!
//! Presets provide complete default configurations for common build modes.

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Quick iteration builds
    ///
    /// - Analysis: max_iterations=200
    /// - Checker: naming conventions off
    /// - Parallel: rayon on
    Fast,

    /// Default build
    ///
    /// - Analysis: max_iterations=1000
    /// - Checker: naming conventions off
    Balanced,

    /// Release / audit build
    ///
    /// - Analysis: max_iterations=5000, statistics reported
    /// - Checker: naming conventions on
    Thorough,

    /// Custom: minimal defaults, override via YAML or builder API
    Custom,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: fast, balanced, thorough, custom",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
