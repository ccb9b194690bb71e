use std::{
    cmp::Ordering,
    collections::{BTreeMap, BinaryHeap},
};

use super::Interval;

/// An interval with the number of parts it will be split into.
#[derive(Debug, Clone, Copy)]
struct Entry {
    interval: Interval,
    loss: f64,
    parts: usize,
}

impl Entry {
    /// Loss carried by each part after splitting.
    #[allow(clippy::cast_precision_loss)]
    fn density(&self) -> f64 {
        self.loss / self.parts as f64
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    /// Highest density first; ties go to the leftmost interval.
    fn cmp(&self, other: &Self) -> Ordering {
        self.density()
            .total_cmp(&other.density())
            .then_with(|| other.interval.cmp(&self.interval))
    }
}

/// Spreads `n` new points over the intervals.
///
/// Every interval starts as a single part. Each of the `n` steps gives one
/// more part to the interval whose loss per part is currently largest, which
/// minimizes the largest loss per part over all allocations of `n` points.
/// Each interval split into `k` parts contributes `k - 1` evenly spaced
/// interior points, each reporting the interval's loss divided by `k` as its
/// expected improvement.
///
/// Points are returned in increasing order of `x`.
#[allow(clippy::cast_precision_loss)]
pub(super) fn allocate(losses: &BTreeMap<Interval, f64>, n: usize) -> Vec<(f64, f64)> {
    let mut heap: BinaryHeap<Entry> = losses
        .iter()
        .map(|(&interval, &loss)| Entry {
            interval,
            loss,
            parts: 1,
        })
        .collect();

    for _ in 0..n {
        let Some(mut worst) = heap.pop() else {
            break;
        };
        worst.parts += 1;
        heap.push(worst);
    }

    let mut entries = heap.into_vec();
    entries.sort_by_key(|entry| entry.interval);

    entries
        .iter()
        .flat_map(|entry| {
            let (left, right) = (entry.interval.0.get(), entry.interval.1.get());
            let step = (right - left) / entry.parts as f64;
            let improvement = entry.density();
            (1..entry.parts).map(move |i| (left + step * i as f64, improvement))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::coord::Coord;

    fn losses(entries: &[(f64, f64, f64)]) -> BTreeMap<Interval, f64> {
        entries
            .iter()
            .map(|&(l, r, loss)| {
                ((Coord::new(l).unwrap(), Coord::new(r).unwrap()), loss)
            })
            .collect()
    }

    #[test]
    fn returns_exactly_n_points() {
        let losses = losses(&[(0.0, 1.0, 0.3), (1.0, 2.0, 0.9), (2.0, 4.0, 0.5)]);
        for n in 0..20 {
            assert_eq!(allocate(&losses, n).len(), n);
        }
    }

    #[test]
    fn splits_the_worst_interval_evenly() {
        let losses = losses(&[(0.0, 1.0, 0.1), (1.0, 4.0, 1.0)]);
        let points = allocate(&losses, 2);

        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].0, 2.0);
        assert_relative_eq!(points[1].0, 3.0);
        assert_relative_eq!(points[0].1, 1.0 / 3.0);
    }

    #[test]
    fn minimizes_the_largest_loss_per_part() {
        // 0.8 is split twice (0.4, then 0.27) before 0.3 is split once.
        let losses = losses(&[(0.0, 1.0, 0.3), (1.0, 2.0, 0.8)]);
        let points = allocate(&losses, 3);

        let in_first = points.iter().filter(|(x, _)| *x < 1.0).count();
        let in_second = points.len() - in_first;
        assert_eq!((in_first, in_second), (1, 2));
    }

    #[test]
    fn no_intervals_yields_nothing() {
        assert!(allocate(&BTreeMap::new(), 5).is_empty());
    }
}
