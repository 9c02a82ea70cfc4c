//! Scene descriptors and render settings.

use nurbray_core::{ColorFunction, MeshHierarchy, SolverOptions, TriangleMesh};
use nurbray_math::DVec3;
use serde::{Deserialize, Serialize};

use crate::{ScreenGeometry, SceneObject};

/// Numerical and sampling knobs of a render.
///
/// Every field is optional in JSON; missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Root-finder tolerance in parameter space.
    pub epsilon: f64,
    /// Windows the root finder may process per ray before giving up.
    pub max_windows: usize,
    /// Recursion depth of the shader.
    pub max_depth: u32,
    /// Samples per pixel; 1 traces the pixel centre only.
    pub samples_per_pixel: u32,
    /// `None` writes linear colour.
    pub gamma: Option<f64>,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            epsilon: 1e-8,
            max_windows: 20_000,
            max_depth: 3,
            samples_per_pixel: 2,
            gamma: Some(1.5),
            seed: 0,
        }
    }
}

impl RenderSettings {
    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            epsilon: self.epsilon,
            max_windows: self.max_windows,
        }
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Everything the shader reads; shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct SceneDescriptor {
    pub screen: ScreenGeometry,
    pub origin: DVec3,
    /// Light position.
    pub light: DVec3,
    pub objects: Vec<SceneObject>,
    pub settings: RenderSettings,
}

impl SceneDescriptor {
    pub fn new(screen: ScreenGeometry) -> Self {
        Self {
            screen,
            origin: DVec3::ZERO,
            light: DVec3::new(0.0, 10.0, 0.0),
            objects: Vec::new(),
            settings: RenderSettings::default(),
        }
    }

    pub fn with_origin(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_light(mut self, light: DVec3) -> Self {
        self.light = light;
        self
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_object(mut self, object: impl Into<SceneObject>) -> Self {
        self.objects.push(object.into());
        self
    }
}

/// A flat-shaded triangle mesh seen from `origin`.
#[derive(Debug, Clone)]
pub struct FacettedScene {
    pub screen: ScreenGeometry,
    pub origin: DVec3,
    /// Light direction.
    pub light: DVec3,
    pub mesh: TriangleMesh,
}

/// A pre-subdivided patch drawn leaf by leaf.
#[derive(Clone)]
pub struct HierarchyScene {
    pub screen: ScreenGeometry,
    pub origin: DVec3,
    /// Light direction.
    pub light: DVec3,
    pub hierarchy: MeshHierarchy,
    pub color: ColorFunction,
}
