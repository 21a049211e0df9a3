//! Contiguous runs of denizen ids

use serde::{Deserialize, Serialize};

use crate::core::types::DenizenId;

/// Half-open id range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: DenizenId,
    pub end: DenizenId,
}

impl IndexRange {
    pub fn new(start: DenizenId, end: DenizenId) -> Self {
        debug_assert!(start <= end, "range {}..{} is inverted", start, end);
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Last id inside the range, if any
    pub fn last(&self) -> Option<DenizenId> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    #[inline]
    pub fn contains(&self, id: DenizenId) -> bool {
        self.start <= id && id < self.end
    }

    pub fn ids(&self) -> std::ops::Range<DenizenId> {
        self.start..self.end
    }

    /// Overlap of two ranges, if non-empty
    pub fn intersect(&self, other: &IndexRange) -> Option<IndexRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(IndexRange { start, end })
    }

    /// Collapse a list of ids into sorted, disjoint, non-adjacent ranges
    ///
    /// Duplicates are dropped and the input may be in any order.
    pub fn condense(ids: &[DenizenId]) -> Vec<IndexRange> {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut ranges: Vec<IndexRange> = Vec::new();
        for id in sorted {
            match ranges.last_mut() {
                Some(range) if range.end == id => range.end += 1,
                _ => ranges.push(IndexRange::new(id, id + 1)),
            }
        }
        ranges
    }

    /// Intersect two sorted, disjoint range lists
    pub fn intersect_all(a: &[IndexRange], b: &[IndexRange]) -> Vec<IndexRange> {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if let Some(overlap) = a[i].intersect(&b[j]) {
                out.push(overlap);
            }
            if a[i].end <= b[j].end {
                i += 1;
            } else {
                j += 1;
            }
        }
        merge_adjacent(out)
    }
}

/// Drop empty ranges and join ranges that touch
pub fn merge_adjacent(ranges: Vec<IndexRange>) -> Vec<IndexRange> {
    let mut merged: Vec<IndexRange> = Vec::with_capacity(ranges.len());
    for range in ranges.into_iter().filter(|r| !r.is_empty()) {
        match merged.last_mut() {
            Some(prev) if prev.end == range.start => prev.end = range.end,
            _ => merged.push(range),
        }
    }
    merged
}
