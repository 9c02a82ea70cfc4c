//! nurbray core - rational Bezier geometry and ray/surface root finding.
//!
//! This crate provides:
//!
//! - **Control meshes**: `ControlMesh`, `ParametricWindow`
//! - **Bezier operations**: evaluation, subdivision, clipping, quasi-interpolation
//! - **Solvers**: the quasi-interpolation clipping solver and its closed-form
//!   bilinear base case
//! - **Hull tests** and the subdivision `MeshHierarchy` built on them
//! - **Triangle meshes** (Wavefront OBJ) and **textures**
//!
//! # Example
//!
//! ```ignore
//! use nurbray_core::{ray_surface_roots, ControlMesh, SolverOptions};
//!
//! let report = ray_surface_roots(origin, direction, &mesh, &SolverOptions::default());
//! for root in &report.roots {
//!     println!("hit at u={} v={}", root.x, root.y);
//! }
//! ```

pub mod bezier;
pub mod bilinear;
pub mod control_mesh;
pub mod hierarchy;
pub mod hull;
pub mod mesh;
pub mod quasi;
pub mod texture;
pub mod window;

// Re-export commonly used types
pub use bilinear::{bilinear_patch_roots, invert_bilinear, quadratic_roots, BilinearPatch, PatchHit};
pub use control_mesh::{ControlMesh, MeshError, MeshResult};
pub use hierarchy::{HierarchyNode, MeshHierarchy};
pub use hull::{inside_convex_hull, origin_in_convex_hull, origin_inside_polygon};
pub use mesh::{load_wavefront, parse_wavefront, TriangleMesh, WavefrontError};
pub use quasi::{
    curve_roots, ray_curve_intersections, ray_surface_roots, solve_projected, SolveReport,
    SolverOptions,
};
pub use texture::{checker, solid, Color, ColorFunction, ImageTexture, TextureError};
pub use window::ParametricWindow;
