use crate::DVec3;

/// A ray in 3D space with origin and direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// The same ray with a unit-length direction, or `None` for a zero direction.
    pub fn normalized(&self) -> Option<Ray> {
        let direction = self.direction.try_normalize()?;
        Some(Ray::new(self.origin, direction))
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Distance between `point` and the infinite line carrying this ray.
    pub fn distance_to_line(&self, point: DVec3) -> f64 {
        let Some(direction) = self.direction.try_normalize() else {
            return (point - self.origin).length();
        };
        let offset = point - self.origin;
        (offset - direction * offset.dot(direction)).length()
    }
}
