//! Rectangular grids of Bezier control points.
//!
//! A mesh of `rows × cols` points is a single tensor-product Bezier patch of
//! degree `(cols - 1)` in `u` and `(rows - 1)` in `v`: `u` runs along a row
//! (column index), `v` runs down a column (row index).

use nurbray_math::{from_homogeneous, Aabb, ControlPoint, DMat4, DVec2, DVec3, DVec4};
use thiserror::Error;

/// Errors raised when a control mesh is constructed from invalid input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("control mesh needs at least 2 rows, got {0}")]
    TooFewRows(usize),

    #[error("control mesh needs at least 2 columns, got {0}")]
    TooFewColumns(usize),

    #[error("expected {expected} control points for the grid, got {actual}")]
    PointCountMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} points, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A `rows × cols` grid of control points stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMesh<P> {
    rows: usize,
    cols: usize,
    points: Vec<P>,
}

impl<P: ControlPoint> ControlMesh<P> {
    /// Create a mesh from row-major points.
    pub fn new(rows: usize, cols: usize, points: Vec<P>) -> MeshResult<Self> {
        if rows < 2 {
            return Err(MeshError::TooFewRows(rows));
        }
        if cols < 2 {
            return Err(MeshError::TooFewColumns(cols));
        }
        if points.len() != rows * cols {
            return Err(MeshError::PointCountMismatch {
                expected: rows * cols,
                actual: points.len(),
            });
        }
        Ok(Self { rows, cols, points })
    }

    /// Grid built by the geometry routines themselves, whose shapes are
    /// derived from an already valid mesh.
    pub(crate) fn from_raw(rows: usize, cols: usize, points: Vec<P>) -> Self {
        debug_assert!(rows >= 2 && cols >= 2 && points.len() == rows * cols);
        Self { rows, cols, points }
    }

    /// Create a mesh from a list of rows.
    pub fn from_rows(rows: Vec<Vec<P>>) -> MeshResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        for (row, points) in rows.iter().enumerate() {
            if points.len() != cols {
                return Err(MeshError::RaggedRow {
                    row,
                    expected: cols,
                    actual: points.len(),
                });
            }
        }
        let row_count = rows.len();
        Self::new(row_count, cols, rows.into_iter().flatten().collect())
    }

    /// A mesh with every point set to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: P) -> MeshResult<Self> {
        Self::new(rows, cols, vec![fill; rows * cols])
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Degree of the patch along `u` (within a row).
    pub fn degree_u(&self) -> usize {
        self.cols - 1
    }

    /// Degree of the patch along `v` (within a column).
    pub fn degree_v(&self) -> usize {
        self.rows - 1
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> P {
        self.points[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: P) {
        self.points[row * self.cols + col] = value;
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn row(&self, row: usize) -> &[P] {
        let start = row * self.cols;
        &self.points[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [P] {
        let start = row * self.cols;
        &mut self.points[start..start + self.cols]
    }

    /// Copy of one column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<P> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Overwrites one column; `values` must hold `rows` points.
    pub fn set_column(&mut self, col: usize, values: &[P]) {
        debug_assert_eq!(values.len(), self.rows);
        for (row, value) in values.iter().enumerate() {
            self.set(row, col, *value);
        }
    }

    /// Corner points in the order `[(0,0), (0,last), (last,0), (last,last)]`.
    pub fn corners(&self) -> [P; 4] {
        let (r, c) = (self.rows - 1, self.cols - 1);
        [self.get(0, 0), self.get(0, c), self.get(r, 0), self.get(r, c)]
    }

    /// Applies `f` to every control point.
    pub fn map<Q, F>(&self, f: F) -> ControlMesh<Q>
    where
        Q: ControlPoint,
        F: FnMut(P) -> Q,
    {
        ControlMesh {
            rows: self.rows,
            cols: self.cols,
            points: self.points.iter().copied().map(f).collect(),
        }
    }

    /// Swaps the roles of `u` and `v`.
    pub fn transpose(&self) -> Self {
        let mut points = Vec::with_capacity(self.points.len());
        for col in 0..self.cols {
            points.extend((0..self.rows).map(|row| self.get(row, col)));
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            points,
        }
    }
}

impl ControlMesh<DVec4> {
    /// Lifts an ordinary point grid to homogeneous points of weight 1.
    pub fn from_points(mesh: &ControlMesh<DVec3>) -> Self {
        mesh.map(|p| p.extend(1.0))
    }

    /// Applies an affine transform to every homogeneous control point.
    pub fn transformed(&self, matrix: DMat4) -> Self {
        self.map(|p| matrix * p)
    }

    /// Dehomogenised control points.
    pub fn to_points(&self) -> ControlMesh<DVec3> {
        self.map(from_homogeneous)
    }

    /// Bounding box of the dehomogenised control points.
    ///
    /// With positive weights the surface lies inside the convex hull of these
    /// points, so the box bounds the surface as well.
    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing(self.points.iter().copied().map(from_homogeneous))
    }
}

impl ControlMesh<DVec2> {
    /// Mesh of ordinary 2D points lifted into the `z = 0` plane.
    pub fn lift(&self) -> ControlMesh<DVec3> {
        self.map(|p| p.extend(0.0))
    }
}
