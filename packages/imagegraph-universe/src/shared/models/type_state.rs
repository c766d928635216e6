//! TypeState lattice
//!
//! Immutable set of concrete types a value may have at run time. Either an
//! explicit sorted set or the `CloseToAllInstantiated` sentinel, which stands
//! for "every instantiated type" and is materialized only when an operation
//! needs the concrete members.

use super::ids::TypeId;
use std::sync::Arc;

/// States with more types than this are candidates for "close to all instantiated"
pub const DEFAULT_CLOSE_TO_ALL_THRESHOLD: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeState {
    /// Sorted, deduplicated set of concrete types
    Types(Arc<[TypeId]>),
    /// Over-approximation: all instantiated types
    CloseToAllInstantiated,
}

impl Default for TypeState {
    fn default() -> Self {
        Self::empty()
    }
}

impl TypeState {
    pub fn empty() -> Self {
        Self::Types(Arc::from(Vec::new()))
    }

    pub fn single(ty: TypeId) -> Self {
        Self::Types(Arc::from(vec![ty]))
    }

    pub fn from_types<I: IntoIterator<Item = TypeId>>(types: I) -> Self {
        let mut types: Vec<TypeId> = types.into_iter().collect();
        types.sort_unstable();
        types.dedup();
        Self::Types(Arc::from(types))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Types(types) => types.is_empty(),
            Self::CloseToAllInstantiated => false,
        }
    }

    pub fn is_close_to_all_instantiated(&self) -> bool {
        matches!(self, Self::CloseToAllInstantiated)
    }

    /// Number of explicit types; `None` for the sentinel
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Types(types) => Some(types.len()),
            Self::CloseToAllInstantiated => None,
        }
    }

    /// Explicit members; `None` for the sentinel
    pub fn types(&self) -> Option<&[TypeId]> {
        match self {
            Self::Types(types) => Some(types),
            Self::CloseToAllInstantiated => None,
        }
    }

    /// Membership. The sentinel contains every type.
    pub fn contains(&self, ty: TypeId) -> bool {
        match self {
            Self::Types(types) => types.binary_search(&ty).is_ok(),
            Self::CloseToAllInstantiated => true,
        }
    }

    pub fn union(&self, other: &TypeState) -> TypeState {
        match (self, other) {
            (Self::CloseToAllInstantiated, _) | (_, Self::CloseToAllInstantiated) => {
                Self::CloseToAllInstantiated
            }
            (Self::Types(a), Self::Types(b)) => {
                if b.is_empty() {
                    return self.clone();
                }
                if a.is_empty() {
                    return other.clone();
                }
                let mut merged = Vec::with_capacity(a.len() + b.len());
                let (mut i, mut j) = (0, 0);
                while i < a.len() && j < b.len() {
                    match a[i].cmp(&b[j]) {
                        std::cmp::Ordering::Less => {
                            merged.push(a[i]);
                            i += 1;
                        }
                        std::cmp::Ordering::Greater => {
                            merged.push(b[j]);
                            j += 1;
                        }
                        std::cmp::Ordering::Equal => {
                            merged.push(a[i]);
                            i += 1;
                            j += 1;
                        }
                    }
                }
                merged.extend_from_slice(&a[i..]);
                merged.extend_from_slice(&b[j..]);
                Self::Types(Arc::from(merged))
            }
        }
    }

    /// `self - other`. The sentinel on either side is materialized against
    /// `instantiated` (sorted ids of every instantiated type).
    pub fn subtract(&self, other: &TypeState, instantiated: &[TypeId]) -> TypeState {
        if other.is_close_to_all_instantiated() {
            // Anything left over was never instantiated.
            return match self {
                Self::Types(types) => Self::from_types(
                    types
                        .iter()
                        .copied()
                        .filter(|ty| instantiated.binary_search(ty).is_err()),
                ),
                Self::CloseToAllInstantiated => Self::empty(),
            };
        }
        let lhs: &[TypeId] = match self {
            Self::Types(types) => types,
            Self::CloseToAllInstantiated => instantiated,
        };
        Self::Types(
            lhs.iter()
                .copied()
                .filter(|ty| !other.contains(*ty))
                .collect::<Vec<_>>()
                .into(),
        )
    }

    /// Large enough to be treated as "all instantiated types": the sentinel,
    /// or more than `threshold` types covering at least 90% of the
    /// `instantiated_count` instantiated types.
    pub fn close_to_all_instantiated(&self, instantiated_count: usize, threshold: usize) -> bool {
        match self {
            Self::CloseToAllInstantiated => true,
            Self::Types(types) => {
                types.len() > threshold && types.len() * 10 >= instantiated_count * 9
            }
        }
    }

    /// Render as `[a.B, c.D]` using `name_of` for each member
    pub fn display_with<'a, F>(&self, name_of: F) -> String
    where
        F: Fn(TypeId) -> &'a str,
    {
        match self {
            Self::CloseToAllInstantiated => "close to all instantiated".to_string(),
            Self::Types(types) => {
                let names: Vec<&str> = types.iter().map(|ty| name_of(*ty)).collect();
                format!("[{}]", names.join(", "))
            }
        }
    }
}
