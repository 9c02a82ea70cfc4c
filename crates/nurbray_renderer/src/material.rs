//! Surface materials and the sampling helpers the shader needs.

use nurbray_math::DVec3;
use rand::{Rng, RngCore};

/// How a surface responds to an incoming ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Material {
    /// Monte-Carlo hemisphere sampling, tinted by the surface colour.
    #[default]
    Diffuse,
    /// Perfect mirror losing 10% per bounce.
    Reflective,
    /// No recursion: Lambert factor towards the light times surface colour.
    Flat,
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// `(1 + n̂·l̂) / 2`: 1 facing the light, 0 facing away.
pub fn shade_factor(normal: DVec3, light_direction: DVec3) -> f64 {
    (1.0 + normal.normalize_or_zero().dot(light_direction.normalize_or_zero())) / 2.0
}

/// Random unit vector in the hemisphere around `normal`.
///
/// Rejection-samples the unit ball, then flips the sample to the side of
/// `normal`.
pub fn random_in_hemisphere(normal: DVec3, rng: &mut dyn RngCore) -> DVec3 {
    loop {
        let candidate = DVec3::new(
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
        );
        let length2 = candidate.length_squared();
        if length2 > 1e-12 && length2 < 1.0 {
            let unit = candidate / length2.sqrt();
            return if unit.dot(normal) < 0.0 { -unit } else { unit };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reflect() {
        let reflected = reflect(DVec3::new(1.0, -1.0, 0.0), DVec3::Y);
        assert_eq!(reflected, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_shade_factor_range() {
        assert_eq!(shade_factor(DVec3::Z, DVec3::Z * 3.0), 1.0);
        assert_eq!(shade_factor(DVec3::Z, -DVec3::Z), 0.0);
        assert!((shade_factor(DVec3::Z, DVec3::X) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_hemisphere_samples() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = DVec3::new(0.3, -1.0, 0.2);

        for _ in 0..200 {
            let sample = random_in_hemisphere(normal, &mut rng);
            assert!((sample.length() - 1.0).abs() < 1e-12);
            assert!(sample.dot(normal) >= 0.0);
        }
    }
}
