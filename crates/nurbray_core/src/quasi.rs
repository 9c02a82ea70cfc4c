//! Quasi-interpolation clipping: certified root finding on Bezier patches.
//!
//! A ray is turned into the 2D origin by projecting the control mesh onto two
//! planes through the ray. The solver then walks a FIFO queue of parametric
//! windows. For every window it clips the mesh, bounds the distance between
//! the surface and its quasi-interpolated control net, and keeps only the
//! cells of that net that come within the bound of the origin. Windows that
//! are smaller than the tolerance in every respect are solved as bilinear
//! patches and the result is polished with Newton steps on the clipped mesh.

use std::collections::VecDeque;
use std::f64::consts::SQRT_2;

use nurbray_math::{DVec2, DVec3, DVec4, Interval, RayPlanes};

use crate::bezier::{curve, surface};
use crate::bilinear::{bilinear_patch_roots, invert_bilinear};
use crate::hull::{origin_circle_overlaps_segment, origin_inside_polygon};
use crate::{ControlMesh, ParametricWindow};

pub const DEFAULT_EPSILON: f64 = 1e-8;
pub const DEFAULT_MAX_WINDOWS: usize = 20_000;

/// Newton steps spent polishing the root of a converged window.
const POLISH_STEPS: usize = 4;

/// Tolerance and work limit of one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub epsilon: f64,
    /// Upper bound on the number of windows taken from the queue.
    pub max_windows: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_windows: DEFAULT_MAX_WINDOWS,
        }
    }
}

impl SolverOptions {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_windows(mut self, max_windows: usize) -> Self {
        self.max_windows = max_windows;
        self
    }
}

/// Roots found by a solve, plus how much work it took.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveReport {
    pub roots: Vec<DVec2>,
    pub windows: usize,
    /// The window budget ran out; `roots` holds what was found until then.
    pub truncated: bool,
}

/// Flags, row-major over the `(rows-1) × (cols-1)` cells of `quasi`, the
/// cells whose `offset`-neighbourhood may contain the origin.
///
/// Every edge that passes within `offset` of the origin flags both cells it
/// borders; the remaining cells are tested with point-in-polygon.
pub fn cells_near_origin(quasi: &ControlMesh<DVec2>, offset: f64) -> Vec<bool> {
    let (rows, cols) = (quasi.rows(), quasi.cols());
    let (cell_rows, cell_cols) = (rows - 1, cols - 1);
    let radius2 = offset * offset;
    let mut near = vec![false; cell_rows * cell_cols];

    for row in 0..rows {
        for col in 0..cell_cols {
            if origin_circle_overlaps_segment(quasi.get(row, col), quasi.get(row, col + 1), radius2) {
                if row > 0 {
                    near[(row - 1) * cell_cols + col] = true;
                }
                if row < cell_rows {
                    near[row * cell_cols + col] = true;
                }
            }
        }
    }

    for row in 0..cell_rows {
        for col in 0..cols {
            if origin_circle_overlaps_segment(quasi.get(row, col), quasi.get(row + 1, col), radius2) {
                if col > 0 {
                    near[row * cell_cols + col - 1] = true;
                }
                if col < cell_cols {
                    near[row * cell_cols + col] = true;
                }
            }
        }
    }

    for row in 0..cell_rows {
        for col in 0..cell_cols {
            let index = row * cell_cols + col;
            if near[index] {
                continue;
            }
            near[index] = origin_inside_polygon(&[
                quasi.get(row, col),
                quasi.get(row, col + 1),
                quasi.get(row + 1, col + 1),
                quasi.get(row + 1, col),
            ]);
        }
    }

    near
}

/// Parameters where the projected surface `mesh` passes through the origin.
pub fn solve_projected(mesh: &ControlMesh<DVec2>, options: &SolverOptions) -> SolveReport {
    if mesh.rows() == 2 && mesh.cols() == 2 {
        return SolveReport {
            roots: bilinear_patch_roots(mesh),
            windows: 1,
            truncated: false,
        };
    }

    let epsilon = options.epsilon;
    let (cell_rows, cell_cols) = (mesh.rows() - 1, mesh.cols() - 1);
    // A linear axis has a single cell; halve it so the window still shrinks.
    let split_v = if cell_rows == 1 { 2 } else { 1 };
    let split_u = if cell_cols == 1 { 2 } else { 1 };

    let mut queue = VecDeque::from([ParametricWindow::FULL]);
    let mut raw_roots = Vec::new();
    let mut windows = 0;
    let mut truncated = false;

    while let Some(window) = queue.pop_front() {
        if windows == options.max_windows {
            truncated = true;
            break;
        }
        windows += 1;

        let clipped = surface::clipped(mesh, &window);
        let deviation = surface::max_deviation(&clipped);

        if deviation < epsilon && window.u.size() < epsilon && window.v.size() < epsilon {
            raw_roots.extend(converged_window_roots(&clipped, &window, epsilon));
            continue;
        }

        let quasi = surface::quasi_interpolate(&clipped);
        // The bound is per coordinate; the disc test needs a Euclidean radius.
        let near = cells_near_origin(&quasi, deviation * SQRT_2);

        for row in 0..cell_rows {
            for col in 0..cell_cols {
                if !near[row * cell_cols + col] {
                    continue;
                }
                let cell = window.cell(row, col, cell_rows, cell_cols);
                for a in 0..split_v {
                    for b in 0..split_u {
                        queue.push_back(cell.cell(a, b, split_v, split_u));
                    }
                }
            }
        }
    }

    if truncated {
        log::debug!(
            "Root search stopped after {} windows with {} pending, {} candidate roots kept",
            windows,
            queue.len(),
            raw_roots.len()
        );
    }

    SolveReport {
        roots: merge_roots(raw_roots, 2.0 * epsilon),
        windows,
        truncated,
    }
}

/// Parameters `(u, v)` where the ray meets the rational surface of `mesh`.
///
/// Weights must be positive. A zero-length direction has no roots.
pub fn ray_surface_roots(
    origin: DVec3,
    direction: DVec3,
    mesh: &ControlMesh<DVec4>,
    options: &SolverOptions,
) -> SolveReport {
    let Some(planes) = RayPlanes::new(origin, direction) else {
        return SolveReport::default();
    };
    let projected = mesh.map(|p| planes.project(p));
    solve_projected(&projected, options)
}

/// Roots of a window whose clipped mesh is flat and small, in global
/// parameters.
///
/// The corners of `clipped` are inverted as a bilinear patch, with the window
/// centre as the start when that has no solution. Starts whose polished
/// residual stays above `epsilon` are dropped.
fn converged_window_roots(
    clipped: &ControlMesh<DVec2>,
    window: &ParametricWindow,
    epsilon: f64,
) -> Vec<DVec2> {
    let mut starts = invert_bilinear(DVec2::ZERO, clipped, epsilon);
    if starts.is_empty() {
        starts.push(DVec2::splat(0.5));
    }

    starts
        .into_iter()
        .filter_map(|start| {
            let (local, residual) = polish_root(clipped, start);
            (residual <= epsilon).then(|| window.to_global(local))
        })
        .collect()
}

/// Newton iteration towards the origin on the projected surface of `mesh`,
/// in the mesh's own parameters. Returns the best point seen and its residual
/// in the infinity norm.
fn polish_root(mesh: &ControlMesh<DVec2>, start: DVec2) -> (DVec2, f64) {
    let residual = |p: DVec2| surface::evaluate(mesh, p.x, p.y).abs().max_element();
    let mut best = (start, residual(start));
    let mut p = start;

    for _ in 0..POLISH_STEPS {
        let (value, du, dv) = surface::derivatives(mesh, p.x, p.y);
        let det = du.perp_dot(dv);
        if det == 0.0 || !det.is_finite() {
            break;
        }
        p -= DVec2::new(value.perp_dot(dv), du.perp_dot(value)) / det;
        // Stay next to the window; roots further out belong to other windows.
        if p.min_element() < -1.0 || p.max_element() > 2.0 {
            break;
        }
        let r = residual(p);
        if r < best.1 {
            best = (p, r);
        }
    }
    best
}

/// Collapses roots closer than `tolerance` (per coordinate) into their mean.
fn merge_roots(raw: Vec<DVec2>, tolerance: f64) -> Vec<DVec2> {
    let mut clusters: Vec<(DVec2, DVec2, usize)> = Vec::new();
    for root in raw {
        match clusters
            .iter_mut()
            .find(|(seed, _, _)| (*seed - root).abs().max_element() <= tolerance)
        {
            Some((_, sum, count)) => {
                *sum += root;
                *count += 1;
            }
            None => clusters.push((root, root, 1)),
        }
    }
    clusters
        .into_iter()
        .map(|(_, sum, count)| sum / count as f64)
        .collect()
}

/// Roots in `[0, 1]` of the scalar Bezier function with coefficients `values`.
pub fn curve_roots(values: &[f64], options: &SolverOptions) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }

    let epsilon = options.epsilon;
    let segments = values.len() - 1;
    let mut queue = VecDeque::from([Interval::UNIT]);
    let mut roots: Vec<f64> = Vec::new();
    let mut windows = 0;

    while let Some(window) = queue.pop_front() {
        if windows == options.max_windows {
            log::debug!("Curve root search stopped after {windows} windows");
            break;
        }
        windows += 1;

        let mut clipped = values.to_vec();
        curve::clip(&mut clipped, window.min, window.max);
        let deviation = curve::max_deviation(&clipped);
        let quasi = curve::quasi_interpolate(&clipped);

        for i in 0..segments {
            let (a, b) = (quasi[i], quasi[i + 1]);
            let below = a < -deviation && b < -deviation;
            let above = a > deviation && b > deviation;
            if below || above {
                continue;
            }

            let piece = window.piece(i, segments);
            if deviation >= epsilon {
                queue.push_back(piece);
            } else if a * b < 0.0 {
                let ratio = a / (a - b);
                roots.push(piece.lerp(ratio));
            } else {
                if a == 0.0 {
                    roots.push(piece.min);
                }
                if b == 0.0 {
                    roots.push(piece.max);
                }
            }
        }
    }

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|a, b| (*a - *b).abs() <= epsilon);
    roots
}

/// Curve parameters where a planar rational Bezier curve meets the line
/// through `origin` along `direction`.
///
/// `points` are homogeneous `(w·x, w·y, w)`.
pub fn ray_curve_intersections(
    origin: DVec2,
    direction: DVec2,
    points: &[DVec3],
    options: &SolverOptions,
) -> Vec<f64> {
    let Some(normal) = direction.perp().try_normalize() else {
        return Vec::new();
    };
    let line = normal.extend(-normal.dot(origin));
    let distances: Vec<f64> = points.iter().map(|p| p.dot(line)).collect();
    curve_roots(&distances, options)
}
