//! imagegraph-universe - Closed-world analysis driver and universe builder
//!
//! Drives a points-to / type-flow computation to a fixed point over an
//! enumerable set of program elements, lets features extend the reachable set
//! under a growth-accounting contract, builds the compilation universe
//! (dense identities, type-check intervals, dispatch tables) and verifies the
//! invariants downstream compilation relies on.
//!
//! # Architecture
//! - `shared/` - identities, reachability flags, the TypeState lattice
//! - `features/` - vertical slices (analysis universe, type flow, hooks,
//!   fixpoint driver, hosted universe, consistency checks)
//! - `pipeline/` - end-to-end image build over a codegen backend port
//! - `config/` - presets, stage configs, versioned YAML
//!
//! # Example
//!
//! ```rust,ignore
//! use imagegraph_universe::config::{ImageConfig, Preset};
//! use imagegraph_universe::pipeline::ImagePipeline;
//!
//! let config = ImageConfig::preset(Preset::Balanced)
//!     .analysis(|c| c.max_iterations(200))
//!     .build()?;
//! let pipeline = ImagePipeline::new(config);
//! let mut features = pipeline.default_features();
//! let result = pipeline.run(&mut ctx, &mut engine, &mut features, None)?;
//! ```

#![allow(clippy::new_without_default)]

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use errors::{BuildError, Result};
