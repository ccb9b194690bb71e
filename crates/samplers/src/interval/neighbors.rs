use std::{
    collections::BTreeMap,
    ops::Bound::{Excluded, Unbounded},
};

use crate::coord::Coord;

/// Sorted map from each point to its left and right neighbors.
///
/// Entries refer to their neighbors by key rather than by reference, so
/// inserting a point patches the adjacent entries in place.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(super) struct Neighbors(BTreeMap<Coord, [Option<Coord>; 2]>);

impl Neighbors {
    /// Returns `[left, right]` for a known point.
    pub(super) fn get(&self, x: Coord) -> Option<[Option<Coord>; 2]> {
        self.0.get(&x).copied()
    }

    /// Inserts `x` between its sorted neighbors.
    ///
    /// Returns `false` if `x` was already present.
    pub(super) fn insert(&mut self, x: Coord) -> bool {
        if self.0.contains_key(&x) {
            return false;
        }

        let left = self.0.range(..x).next_back().map(|(&k, _)| k);
        let right = self.0.range((Excluded(x), Unbounded)).next().map(|(&k, _)| k);

        self.0.insert(x, [left, right]);
        if let Some(entry) = left.and_then(|k| self.0.get_mut(&k)) {
            entry[1] = Some(x);
        }
        if let Some(entry) = right.and_then(|k| self.0.get_mut(&k)) {
            entry[0] = Some(x);
        }
        true
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.0.len()
    }
}
