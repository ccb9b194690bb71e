use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// A finite coordinate usable as an ordered map key.
///
/// Ordering uses [`f64::total_cmp`]. Negative zero is folded into positive
/// zero on construction so that equal coordinates always compare equal.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Coord(f64);

impl Coord {
    /// Wraps a finite value, or returns `None` for NaN and infinities.
    #[allow(clippy::float_cmp)]
    pub(crate) fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(if value == 0.0 { 0.0 } else { value }))
        } else {
            None
        }
    }

    pub(crate) fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A finite 2-D point usable as a map key.
pub(crate) type Coord2 = [Coord; 2];

/// Wraps both components, or returns `None` if either is not finite.
pub(crate) fn coord2(point: [f64; 2]) -> Option<Coord2> {
    Some([Coord::new(point[0])?, Coord::new(point[1])?])
}

pub(crate) fn unwrap2(point: Coord2) -> [f64; 2] {
    [point[0].get(), point[1].get()]
}
