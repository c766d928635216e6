pub mod checker;

pub use checker::UniverseChecker;
