//! Hosted universe domain

pub mod hosted;
pub mod ids;
pub mod type_check;

pub use hosted::{CompiledGraph, HostedField, HostedMethod, HostedType, HostedUniverse};
pub use ids::{HostedFieldId, HostedMethodId, HostedTypeId};
pub use type_check::{encode_ranges, ranges_contain, TypeCheckRange};
