//! Reachability flags
//!
//! Monotonic per-element flag set. Flags are only ever added; there is no way
//! to clear one once the analysis observed it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Single reachability flag
/// Using u8 for efficient bit operations
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReachabilityFlag {
    /// An instance of the type is allocated somewhere reachable
    Instantiated = 1,
    /// The method is the target of a reachable call (or a root)
    Invoked = 2,
    /// A virtual call resolved to this concrete implementation
    ImplementationInvoked = 4,
    /// The field is read or written by reachable code
    Accessed = 8,
    /// The type is used in a reachable type check
    InTypeCheck = 16,
    /// Reachable for any other reason (supertypes, declaring types, reflection)
    Reachable = 32,
}

impl ReachabilityFlag {
    pub const ALL: [ReachabilityFlag; 6] = [
        Self::Instantiated,
        Self::Invoked,
        Self::ImplementationInvoked,
        Self::Accessed,
        Self::InTypeCheck,
        Self::Reachable,
    ];

    /// Convert to bitflag value
    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instantiated => "instantiated",
            Self::Invoked => "invoked",
            Self::ImplementationInvoked => "implementation-invoked",
            Self::Accessed => "accessed",
            Self::InTypeCheck => "in-type-check",
            Self::Reachable => "reachable",
        }
    }
}

/// Combined flags as bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Reachability(u8);

impl Reachability {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn of(flag: ReachabilityFlag) -> Self {
        Self(flag as u8)
    }

    /// Add a flag. Returns `true` if it was not set before.
    pub fn mark(&mut self, flag: ReachabilityFlag) -> bool {
        let before = self.0;
        self.0 |= flag as u8;
        before != self.0
    }

    pub fn has(&self, flag: ReachabilityFlag) -> bool {
        self.0 & (flag as u8) != 0
    }

    /// No flag at all: the element is not part of the reachable program
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `true` if every flag in `self` is also in `other`
    pub fn is_subset_of(&self, other: Reachability) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = ReachabilityFlag> + '_ {
        ReachabilityFlag::ALL.into_iter().filter(|f| self.has(*f))
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|flag| flag.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
