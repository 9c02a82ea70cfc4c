//! Parametric windows: which part of `[0,1]²` a clipped mesh represents.

use nurbray_math::{DVec2, Interval};

/// A sub-rectangle `u × v` of the unit parameter square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricWindow {
    pub u: Interval,
    pub v: Interval,
}

impl ParametricWindow {
    /// The whole parameter domain.
    pub const FULL: ParametricWindow = ParametricWindow {
        u: Interval::UNIT,
        v: Interval::UNIT,
    };

    pub fn new(u: Interval, v: Interval) -> Self {
        Self { u, v }
    }

    pub fn midpoint(&self) -> DVec2 {
        DVec2::new(self.u.midpoint(), self.v.midpoint())
    }

    /// Largest of the two extents.
    pub fn extent(&self) -> f64 {
        self.u.size().max(self.v.size())
    }

    /// Maps local patch coordinates of a clipped mesh into this window.
    pub fn to_global(&self, local: DVec2) -> DVec2 {
        DVec2::new(self.u.lerp(local.x), self.v.lerp(local.y))
    }

    /// The window of grid cell `(row, col)` when `u` is cut into `cols` and
    /// `v` into `rows` equal pieces.
    pub fn cell(&self, row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self {
            u: self.u.piece(col, cols),
            v: self.v.piece(row, rows),
        }
    }

    /// Returns true if `other` lies inside this window.
    pub fn encloses(&self, other: &ParametricWindow) -> bool {
        self.u.encloses(&other.u) && self.v.encloses(&other.v)
    }
}

impl Default for ParametricWindow {
    fn default() -> Self {
        Self::FULL
    }
}
