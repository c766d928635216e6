//! Layout algorithms

pub mod type_ordering;
pub mod vtable;

pub use type_ordering::order_types;
pub use vtable::{build_dispatch_tables, DispatchTables};
