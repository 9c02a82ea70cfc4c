//! Quad-tree of pre-subdivided control meshes used as a broad-phase.

use std::collections::VecDeque;

use nurbray_math::{from_homogeneous, DVec3, DVec4};

use crate::bezier::surface;
use crate::hull::inside_convex_hull;
use crate::{ControlMesh, ParametricWindow};

/// One node of a [`MeshHierarchy`].
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub mesh: ControlMesh<DVec4>,
    pub window: ParametricWindow,
}

impl HierarchyNode {
    /// Dehomogenised control points; their convex hull contains the patch.
    pub fn hull_points(&self) -> Vec<DVec3> {
        self.mesh.points().iter().map(|p| from_homogeneous(*p)).collect()
    }

    /// Mean of the dehomogenised control points.
    pub fn barycenter(&self) -> DVec3 {
        let points = self.hull_points();
        points.iter().copied().sum::<DVec3>() / points.len() as f64
    }

    /// Normal of the plane spanned by the corner control points.
    pub fn corner_normal(&self) -> DVec3 {
        let [c00, c01, c10, _] = self.mesh.corners().map(from_homogeneous);
        (c01 - c00).cross(c10 - c00)
    }
}

/// Complete 4-ary tree of sub-patches stored breadth first.
///
/// The children of node `i` are `4i + 1 ..= 4i + 4`: each node is split at
/// `u = 0.5` and both halves again at `v = 0.5`.
#[derive(Debug, Clone)]
pub struct MeshHierarchy {
    nodes: Vec<HierarchyNode>,
}

impl MeshHierarchy {
    /// Subdivides `mesh` `steps` times.
    pub fn build(mesh: &ControlMesh<DVec4>, steps: usize) -> Self {
        let mut nodes = vec![HierarchyNode {
            mesh: mesh.clone(),
            window: ParametricWindow::FULL,
        }];

        let mut level_start = 0;
        for _ in 0..steps {
            let level_end = nodes.len();
            for index in level_start..level_end {
                let parent = nodes[index].clone();
                let (left, right) = surface::subdivide_rows(&parent.mesh, 0.5);
                for (col, half) in [left, right].into_iter().enumerate() {
                    let (top, bottom) = surface::subdivide_columns(&half, 0.5);
                    for (row, quarter) in [top, bottom].into_iter().enumerate() {
                        nodes.push(HierarchyNode {
                            mesh: quarter,
                            window: parent.window.cell(row, col, 2, 2),
                        });
                    }
                }
            }
            level_start = level_end;
        }

        log::debug!(
            "Built mesh hierarchy: {} levels, {} nodes",
            steps,
            nodes.len()
        );

        Self { nodes }
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &HierarchyNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf indices whose convex hull is pierced by the ray.
    ///
    /// Breadth-first: children are only visited when their parent's hull
    /// test passes.
    pub fn intersect(&self, origin: DVec3, direction: DVec3) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::from([0usize]);

        while let Some(index) = queue.pop_front() {
            if !inside_convex_hull(origin, direction, &self.nodes[index].hull_points()) {
                continue;
            }
            let first_child = 4 * index + 1;
            if first_child < self.nodes.len() {
                queue.extend(first_child..first_child + 4);
            } else {
                leaves.push(index);
            }
        }

        leaves
    }
}
