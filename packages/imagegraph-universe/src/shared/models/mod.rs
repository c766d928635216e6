//! Shared models

mod ids;
pub mod reachability;
pub mod type_state;

pub(crate) use ids::element_id;
pub use ids::{ElementRef, FieldId, MethodId, TypeId};
pub use reachability::{Reachability, ReachabilityFlag};
pub use type_state::{TypeState, DEFAULT_CLOSE_TO_ALL_THRESHOLD};
