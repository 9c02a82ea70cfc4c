// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod plane;
mod point;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use plane::{
    cross2, horizontal_plane_of_ray, unnormalized_hesse_from, vertical_plane_of_ray, RayPlanes,
};
pub use point::{from_homogeneous, to_homogeneous, to_homogeneous2, weighted_point, ControlPoint};
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvec3_operations() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, DVec3::new(5.0, 7.0, 9.0));
    }
}
