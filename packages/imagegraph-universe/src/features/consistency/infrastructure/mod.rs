pub mod naming;

pub use naming::NamingConventions;
