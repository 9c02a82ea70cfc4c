//! Planar containment tests against the projected origin.
//!
//! After projecting onto the two planes through a ray, the ray itself is the
//! 2D origin, so most tests here ask where the origin lies relative to a
//! segment, polygon or point cloud.

use std::f64::consts::{PI, TAU};

use nurbray_math::{unnormalized_hesse_from, DVec2, DVec3, RayPlanes};

/// Foot of the perpendicular from the origin onto the line through `p` and
/// `q`, if it falls strictly between them.
fn foot_within_segment(p: DVec2, q: DVec2) -> Option<DVec2> {
    let line = unnormalized_hesse_from(p, q);
    let normal = line.truncate();
    let length2 = normal.length_squared();
    if length2 == 0.0 {
        return None;
    }
    let foot = normal * (-line.z / length2);
    let along = normal.perp();
    if along.dot(p) * along.dot(q) < 0.0 {
        Some(foot)
    } else {
        None
    }
}

/// Point of the segment `pq` nearest to the origin.
pub fn closest_point_to_origin_of_segment(p: DVec2, q: DVec2) -> DVec2 {
    if let Some(foot) = foot_within_segment(p, q) {
        return foot;
    }
    if p.length_squared() < q.length_squared() {
        p
    } else {
        q
    }
}

/// Returns true if the segment `pq` comes within `sqrt(radius2)` of the origin.
pub fn origin_circle_overlaps_segment(p: DVec2, q: DVec2, radius2: f64) -> bool {
    p.length_squared() <= radius2
        || q.length_squared() <= radius2
        || foot_within_segment(p, q).is_some_and(|foot| foot.length_squared() <= radius2)
}

/// Whether the segment `pq` crosses the half-line `{(x, 0) : x >= 0}`.
///
/// Endpoints on the axis count only when the other endpoint lies below it,
/// so a polygon vertex on the half-line is counted exactly once.
pub fn intersects_e1_halfline(p: DVec2, q: DVec2) -> bool {
    let product = p.y * q.y;
    if product > 0.0 {
        return false;
    }
    if product == 0.0 {
        return (p.y == 0.0 && p.x >= 0.0 && q.y < 0.0) || (q.y == 0.0 && q.x >= 0.0 && p.y < 0.0);
    }
    let ratio = p.y / (p.y - q.y);
    let crossing = (1.0 - ratio) * p.x + ratio * q.x;
    crossing >= 0.0
}

/// Crossing-parity test for the origin against a closed polygon.
pub fn origin_inside_polygon(polygon: &[DVec2]) -> bool {
    let n = polygon.len();
    let crossings = (0..n)
        .filter(|&i| intersects_e1_halfline(polygon[i], polygon[(i + 1) % n]))
        .count();
    crossings % 2 == 1
}

/// Crossing-parity test for an arbitrary point.
pub fn inside_polygon(point: DVec2, polygon: &[DVec2]) -> bool {
    let centered: Vec<DVec2> = polygon.iter().map(|p| *p - point).collect();
    origin_inside_polygon(&centered)
}

/// Returns true if the disc of `radius` around the origin touches the polygon.
pub fn circle_overlaps_polygon(radius: f64, polygon: &[DVec2]) -> bool {
    let radius2 = radius * radius;
    let n = polygon.len();
    let touches_edge = (0..n).any(|i| {
        let closest = closest_point_to_origin_of_segment(polygon[i], polygon[(i + 1) % n]);
        closest.length_squared() <= radius2
    });
    touches_edge || origin_inside_polygon(polygon)
}

/// Polar angle in `[0, 2π)`.
fn polar_angle(p: DVec2) -> f64 {
    let angle = p.y.atan2(p.x);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// Whether the origin lies in the convex hull of `points`.
///
/// Sorting by polar angle, the origin is inside exactly when no two
/// angularly consecutive points are more than half a turn apart.
pub fn origin_in_convex_hull(points: &[DVec2]) -> bool {
    if points.is_empty() {
        return false;
    }
    if points.iter().any(|p| *p == DVec2::ZERO) {
        return true;
    }

    let mut angles: Vec<f64> = points.iter().map(|p| polar_angle(*p)).collect();
    angles.sort_by(f64::total_cmp);

    let wrap_gap = angles[0] + TAU - angles[angles.len() - 1];
    let largest_gap = angles
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(wrap_gap, f64::max);
    largest_gap <= PI + 1e-12
}

/// Whether the ray through `origin` along `direction` passes through the
/// convex hull of `points`.
pub fn inside_convex_hull(origin: DVec3, direction: DVec3, points: &[DVec3]) -> bool {
    let Some(planes) = RayPlanes::new(origin, direction) else {
        return false;
    };
    let projected: Vec<DVec2> = points.iter().map(|p| planes.project_point(*p)).collect();
    origin_in_convex_hull(&projected)
}
