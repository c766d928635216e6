pub mod builder;

pub use builder::UniverseBuilder;
