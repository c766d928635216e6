//! Feature registry
//!
//! Explicit, ordered list of features. Dispatch order is registration order
//! at every checkpoint.

use crate::features::feature_hooks::ports::{Checkpoint, Feature, FeatureResult, HookError};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error};

/// Failure of an isolated hook (on-exit): logged and recorded, never propagated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsolatedFailure {
    pub feature: String,
    pub checkpoint: Checkpoint,
    pub message: String,
    pub panicked: bool,
}

#[derive(Default)]
pub struct FeatureRegistry {
    features: Vec<Box<dyn Feature>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: Feature + 'static>(&mut self, feature: F) -> &mut Self {
        self.register_boxed(Box::new(feature))
    }

    pub fn register_boxed(&mut self, feature: Box<dyn Feature>) -> &mut Self {
        debug!(feature = feature.name(), position = self.features.len(), "register feature");
        self.features.push(feature);
        self
    }

    /// Builder form of `register`
    pub fn with<F: Feature + 'static>(mut self, feature: F) -> Self {
        self.register(feature);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Names in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Run `hook` on every feature in order; stops at the first error
    pub fn dispatch<H>(&mut self, checkpoint: Checkpoint, mut hook: H) -> Result<(), HookError>
    where
        H: FnMut(&mut dyn Feature) -> FeatureResult,
    {
        for feature in self.features.iter_mut() {
            debug!(feature = feature.name(), %checkpoint, "dispatch");
            if let Err(source) = hook(feature.as_mut()) {
                return Err(HookError {
                    feature: feature.name().to_string(),
                    checkpoint,
                    source,
                });
            }
        }
        Ok(())
    }

    /// Run `hook` on every feature in order. An error or a panic in one
    /// feature is logged and recorded, and the remaining features still run.
    pub fn dispatch_isolated<H>(&mut self, checkpoint: Checkpoint, mut hook: H) -> Vec<IsolatedFailure>
    where
        H: FnMut(&mut dyn Feature) -> FeatureResult,
    {
        let mut failures = Vec::new();
        for feature in self.features.iter_mut() {
            let outcome = catch_unwind(AssertUnwindSafe(|| hook(feature.as_mut())));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => IsolatedFailure {
                    feature: feature.name().to_string(),
                    checkpoint,
                    message: err.to_string(),
                    panicked: false,
                },
                Err(payload) => IsolatedFailure {
                    feature: feature.name().to_string(),
                    checkpoint,
                    message: panic_message(payload.as_ref()),
                    panicked: true,
                },
            };
            error!(
                feature = %failure.feature,
                %checkpoint,
                panicked = failure.panicked,
                "Exception during {}.{}(): {}",
                failure.feature,
                checkpoint,
                failure.message
            );
            failures.push(failure);
        }
        failures
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::feature_hooks::ports::FeatureError;

    struct Named(&'static str);

    impl Feature for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn registry(names: &[&'static str]) -> FeatureRegistry {
        names
            .iter()
            .copied()
            .fold(FeatureRegistry::new(), |registry, name| registry.with(Named(name)))
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut registry = registry(&["first", "second", "third"]);
        let mut visited = Vec::new();

        registry
            .dispatch(Checkpoint::BeforeAnalysis, |feature| {
                visited.push(feature.name().to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["first", "second", "third"]);
        assert_eq!(registry.names(), vec!["first", "second", "third"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_dispatch_stops_at_first_error() {
        let mut registry = registry(&["failing", "never"]);
        let mut visited = Vec::new();

        let err = registry
            .dispatch(Checkpoint::DuringSetup, |feature| {
                visited.push(feature.name().to_string());
                Err(FeatureError::failed(feature.name(), "refused"))
            })
            .unwrap_err();

        assert_eq!(visited, vec!["failing"]);
        assert_eq!(err.feature, "failing");
        assert_eq!(err.checkpoint, Checkpoint::DuringSetup);
        assert!(err.to_string().contains("during_setup"));
    }

    #[test]
    fn test_isolated_dispatch_survives_errors_and_panics() {
        let mut registry = registry(&["erroring", "panicking", "healthy"]);
        let mut visited = 0;

        let failures = registry.dispatch_isolated(Checkpoint::OnAnalysisExit, |feature| {
            visited += 1;
            match feature.name() {
                "erroring" => Err(FeatureError::failed("erroring", "refused")),
                "panicking" => panic!("panicking exploded"),
                _ => Ok(()),
            }
        });

        assert_eq!(visited, 3);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].feature, "erroring");
        assert!(!failures[0].panicked);
        assert!(failures[0].message.contains("refused"));
        assert_eq!(failures[1].feature, "panicking");
        assert!(failures[1].panicked);
        assert!(failures[1].message.contains("exploded"));
    }
}
