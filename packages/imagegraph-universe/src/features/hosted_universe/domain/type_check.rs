//! Interval encoding of subtype sets
//!
//! The set of hosted type ids assignable to a type is stored as sorted,
//! disjoint, non-adjacent `[start, end)` intervals. Because class ids come
//! from a pre-order walk of the class tree, a class always needs exactly one
//! interval; interfaces may need several.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeCheckRange {
    pub start: u32,
    pub end: u32,
}

impl TypeCheckRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.start <= id && id < self.end
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for TypeCheckRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Merge ids into the minimal interval list
pub fn encode_ranges(mut ids: Vec<u32>) -> Vec<TypeCheckRange> {
    ids.sort_unstable();
    ids.dedup();

    let mut ranges: Vec<TypeCheckRange> = Vec::new();
    for id in ids {
        match ranges.last_mut() {
            Some(last) if last.end == id => last.end += 1,
            _ => ranges.push(TypeCheckRange::new(id, id + 1)),
        }
    }
    ranges
}

/// Binary search over sorted, disjoint ranges
pub fn ranges_contain(ranges: &[TypeCheckRange], id: u32) -> bool {
    let candidate = ranges.partition_point(|r| r.start <= id);
    candidate > 0 && ranges[candidate - 1].contains(id)
}
