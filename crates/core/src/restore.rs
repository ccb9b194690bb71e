use std::ops::{Deref, DerefMut};

/// Explicit capture and restoration of a sampler's mutable state.
///
/// A snapshot holds everything an observer could distinguish: recorded
/// observations, pending points, queued candidates and the losses derived
/// from them. Configuration is not part of a snapshot, and derived caches are
/// rebuilt lazily after a restore.
pub trait Restore {
    type Snapshot;

    /// Captures the current state.
    #[must_use]
    fn capture(&self) -> Self::Snapshot;

    /// Replaces the current state with a previously captured one.
    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// Scoped guard that restores a group of samplers when dropped.
///
/// The guard captures every target on creation and dereferences to the
/// targets, so they can be mutated freely while it is alive. When it goes out
/// of scope, including through an early `?` return or a panic, each target is
/// restored to its captured state.
///
/// # Example
///
/// ```
/// use tessel_core::{Restore, Restored};
///
/// struct Counter(u32);
///
/// impl Restore for Counter {
///     type Snapshot = u32;
///
///     fn capture(&self) -> u32 {
///         self.0
///     }
///
///     fn restore(&mut self, snapshot: u32) {
///         self.0 = snapshot;
///     }
/// }
///
/// let mut counters = [Counter(1), Counter(2)];
/// {
///     let mut guard = Restored::new(&mut counters);
///     guard[0].0 = 10;
///     guard[1].0 = 20;
/// }
/// assert_eq!(counters[0].0, 1);
/// assert_eq!(counters[1].0, 2);
/// ```
pub struct Restored<'a, S: Restore> {
    targets: &'a mut [S],
    snapshots: Vec<S::Snapshot>,
}

impl<'a, S: Restore> Restored<'a, S> {
    /// Captures every target and returns a guard over them.
    pub fn new(targets: &'a mut [S]) -> Self {
        let snapshots = targets.iter().map(Restore::capture).collect();
        Self { targets, snapshots }
    }

    /// Captures a single target and returns a guard over it.
    pub fn single(target: &'a mut S) -> Self {
        Self::new(std::slice::from_mut(target))
    }
}

impl<S: Restore> Deref for Restored<'_, S> {
    type Target = [S];

    fn deref(&self) -> &[S] {
        self.targets
    }
}

impl<S: Restore> DerefMut for Restored<'_, S> {
    fn deref_mut(&mut self) -> &mut [S] {
        self.targets
    }
}

impl<S: Restore> Drop for Restored<'_, S> {
    fn drop(&mut self) {
        for (target, snapshot) in self.targets.iter_mut().zip(self.snapshots.drain(..)) {
            target.restore(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tally {
        items: Vec<u32>,
    }

    impl Restore for Tally {
        type Snapshot = Vec<u32>;

        fn capture(&self) -> Vec<u32> {
            self.items.clone()
        }

        fn restore(&mut self, snapshot: Vec<u32>) {
            self.items = snapshot;
        }
    }

    fn push_then_fail(guard: &mut Restored<'_, Tally>) -> Result<(), &'static str> {
        guard[0].items.push(99);
        Err("failed after mutating")
    }

    #[test]
    fn restores_after_scope_ends() {
        let mut tally = Tally { items: vec![1, 2] };
        {
            let mut guard = Restored::single(&mut tally);
            guard[0].items.clear();
            assert!(guard[0].items.is_empty());
        }
        assert_eq!(tally.items, vec![1, 2]);
    }

    #[test]
    fn restores_after_error() {
        let mut tallies = vec![Tally { items: vec![1] }, Tally { items: vec![] }];
        let result = {
            let mut guard = Restored::new(&mut tallies);
            push_then_fail(&mut guard)
        };

        assert!(result.is_err());
        assert_eq!(tallies[0].items, vec![1]);
        assert!(tallies[1].items.is_empty());
    }

    #[test]
    fn restores_after_panic() {
        let mut tally = Tally { items: vec![7] };
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = Restored::single(&mut tally);
            guard[0].items.push(8);
            panic!("boom");
        }));

        assert!(outcome.is_err());
        assert_eq!(tally.items, vec![7]);
    }
}
