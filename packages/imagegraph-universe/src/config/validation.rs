//! Configuration validation
//!
//! `Validatable` lets callers validate any stage config generically.

use super::error::ConfigResult;
use super::stage_configs::{
    AnalysisConfig, CheckerConfig, NamespaceMarker, ParallelConfig, ReflectionConfig,
    UniverseConfig,
};

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// fn check<C: Validatable>(config: &C) -> ConfigResult<()> {
///     config.validate()
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Extension trait for validating collections of configs
pub trait ValidatableCollection {
    fn validate_all(&self) -> ConfigResult<()>;
}

impl<T: Validatable> ValidatableCollection for Vec<T> {
    fn validate_all(&self) -> ConfigResult<()> {
        for config in self {
            config.validate()?;
        }
        Ok(())
    }
}

impl<T: Validatable> ValidatableCollection for Option<T> {
    fn validate_all(&self) -> ConfigResult<()> {
        if let Some(config) = self {
            config.validate()?;
        }
        Ok(())
    }
}

macro_rules! impl_validatable {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Validatable for $ty {
                fn validate(&self) -> ConfigResult<()> {
                    <$ty>::validate(self)
                }

                fn config_name(&self) -> &'static str {
                    $name
                }
            }
        )*
    };
}

impl_validatable! {
    AnalysisConfig => "analysis",
    CheckerConfig => "checker",
    NamespaceMarker => "checker.namespace_markers",
    ReflectionConfig => "reflection",
    UniverseConfig => "universe",
    ParallelConfig => "parallel",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_validation_stops_at_invalid() {
        let markers = vec![NamespaceMarker::new("hosted"), NamespaceMarker::new("")];
        assert!(markers.validate_all().is_err());

        let none: Option<AnalysisConfig> = None;
        assert!(none.validate_all().is_ok());
        assert!(Some(AnalysisConfig::default().max_iterations(0)).validate_all().is_err());
    }

    #[test]
    fn test_config_names() {
        assert_eq!(Validatable::config_name(&AnalysisConfig::default()), "analysis");
        assert_eq!(Validatable::config_name(&ParallelConfig::default()), "parallel");
    }
}
