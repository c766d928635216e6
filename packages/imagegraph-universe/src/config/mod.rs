//! Configuration System
//!
//! Three levels of control:
//! - Level 1: Preset - one-liner
//! - Level 2: Stage override - partial adjustment through closures
//! - Level 3: YAML - complete control, versioned schema
//!
//! # Examples
//!
//! ```rust,ignore
//! use imagegraph_universe::config::{ImageConfig, Preset};
//!
//! // Level 1
//! let config = ImageConfig::preset(Preset::Fast).build()?;
//!
//! // Level 2
//! let config = ImageConfig::preset(Preset::Balanced)
//!     .main_entry_point("app.Main.main(java.lang.String[])")
//!     .analysis(|c| c.max_iterations(500).report_analysis_statistics(true))
//!     .checker(|c| c.verify_naming_conventions(true))
//!     .build()?;
//!
//! // Level 3
//! let config = ImageConfig::from_yaml("release-image.yaml")?;
//! ```

pub mod error;
pub mod image_config;
pub mod io;
pub mod preset;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use image_config::{ImageConfig, ValidatedConfig};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use stage_configs::{
    AnalysisConfig, CheckerConfig, NamespaceMarker, ParallelConfig, ReflectionConfig,
    UniverseConfig,
};
pub use validation::{Validatable, ValidatableCollection};
