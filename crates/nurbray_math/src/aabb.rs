use crate::{DVec3, Interval, Ray};

/// Axis-Aligned Bounding Box used as a broad-phase in front of the exact
/// surface solvers.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest AABB containing every point of `points`; `EMPTY` for no points.
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut bounds = Aabb::EMPTY;
        let mut any = false;
        for p in points {
            any = true;
            bounds.x = bounds.x.include(p.x);
            bounds.y = bounds.y.include(p.y);
            bounds.z = bounds.z.include(p.z);
        }
        if any {
            bounds.pad_to_minimums();
        }
        bounds
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Pad intervals to avoid zero-width AABBs (flat control meshes).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> DVec3 {
        DVec3::new(self.x.midpoint(), self.y.midpoint(), self.z.midpoint())
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(DVec3::new(10.0, 0.0, 0.0), DVec3::new(0.0, 10.0, 10.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_enclosing_pads_flat_boxes() {
        let aabb = Aabb::enclosing([
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(0.0, 0.5, 0.0),
        ]);

        assert_eq!(aabb.x, Interval::new(-1.0, 1.0));
        assert_eq!(aabb.y, Interval::new(-1.0, 2.0));
        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.surrounds(0.0));
    }

    #[test]
    fn test_aabb_enclosing_nothing_is_empty() {
        assert_eq!(Aabb::enclosing(std::iter::empty()), Aabb::EMPTY);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(DVec3::ZERO, DVec3::splat(5.0));
        let box2 = Aabb::from_points(DVec3::splat(3.0), DVec3::splat(10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x, Interval::new(0.0, 10.0));
        assert_eq!(surrounding.centroid(), DVec3::splat(5.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0));
        let forward = Interval::new(0.0, f64::INFINITY);

        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
        assert!(aabb.hit(&ray, forward));

        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), -DVec3::Z);
        assert!(!aabb.hit(&ray, forward));

        let ray = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::Z);
        assert!(!aabb.hit(&ray, forward));
    }
}
