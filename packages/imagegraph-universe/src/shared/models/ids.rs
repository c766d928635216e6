//! Dense element identities
//!
//! Ids are indices into the analysis universe arenas. They are handed out at
//! first registration and never reused, so an id is stable for the whole build.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw arena index
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Raw value
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

pub(crate) use element_id;

element_id!(
    /// Identity of an analysis type
    TypeId,
    "type"
);
element_id!(
    /// Identity of an analysis method
    MethodId,
    "method"
);
element_id!(
    /// Identity of an analysis field
    FieldId,
    "field"
);

/// A program element: type, method or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Type(TypeId),
    Method(MethodId),
    Field(FieldId),
}

impl From<TypeId> for ElementRef {
    fn from(id: TypeId) -> Self {
        Self::Type(id)
    }
}

impl From<MethodId> for ElementRef {
    fn from(id: MethodId) -> Self {
        Self::Method(id)
    }
}

impl From<FieldId> for ElementRef {
    fn from(id: FieldId) -> Self {
        Self::Field(id)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(id) => id.fmt(f),
            Self::Method(id) => id.fmt(f),
            Self::Field(id) => id.fmt(f),
        }
    }
}
