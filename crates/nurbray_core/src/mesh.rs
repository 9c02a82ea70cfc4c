//! Flat triangle meshes and a minimal Wavefront OBJ reader.
//!
//! Only `v x y z` and `f i j k` records are read; indices are 1-based and may
//! carry `/vt/vn` suffixes, which are dropped. Every other record is skipped.

use std::path::Path;

use nurbray_math::{Aabb, DVec3};
use thiserror::Error;

/// Errors that can occur while reading a Wavefront file.
#[derive(Error, Debug)]
pub enum WavefrontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid number at line {line}: {value}")]
    ParseFloat { line: usize, value: String },

    #[error("Invalid vertex index at line {line}: {value}")]
    ParseIndex { line: usize, value: String },

    #[error("Vertex index {index} at line {line} is outside 1..={count}")]
    IndexOutOfRange { line: usize, index: usize, count: usize },

    #[error("Malformed record at line {line}: {message}")]
    MalformedLine { line: usize, message: String },
}

pub type WavefrontResult<T> = Result<T, WavefrontError>;

/// Points plus triangles indexing into them.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    pub points: Vec<DVec3>,
    pub facets: Vec<[usize; 3]>,
}

impl TriangleMesh {
    pub fn new(points: Vec<DVec3>, facets: Vec<[usize; 3]>) -> Self {
        Self { points, facets }
    }

    pub fn triangle_count(&self) -> usize {
        self.facets.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Corner points of facet `index`.
    pub fn triangle(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.facets[index];
        [self.points[a], self.points[b], self.points[c]]
    }

    /// Unnormalized `(p1 - p0) × (p2 - p0)` of facet `index`.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        let [p0, p1, p2] = self.triangle(index);
        (p1 - p0).cross(p2 - p0)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing(self.points.iter().copied())
    }
}

/// Parse Wavefront OBJ text.
pub fn parse_wavefront(content: &str) -> WavefrontResult<TriangleMesh> {
    let mut points = Vec::new();
    let mut raw_facets = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line_number = number + 1;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                let coords = fields
                    .take(3)
                    .map(|field| {
                        field.parse::<f64>().map_err(|_| WavefrontError::ParseFloat {
                            line: line_number,
                            value: field.to_string(),
                        })
                    })
                    .collect::<WavefrontResult<Vec<f64>>>()?;
                if coords.len() != 3 {
                    return Err(WavefrontError::MalformedLine {
                        line: line_number,
                        message: format!("vertex needs 3 coordinates, found {}", coords.len()),
                    });
                }
                points.push(DVec3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let indices = fields
                    .map(|field| parse_index(field, line_number))
                    .collect::<WavefrontResult<Vec<usize>>>()?;
                if indices.len() != 3 {
                    return Err(WavefrontError::MalformedLine {
                        line: line_number,
                        message: format!("face needs 3 vertices, found {}", indices.len()),
                    });
                }
                raw_facets.push((line_number, [indices[0], indices[1], indices[2]]));
            }
            _ => {}
        }
    }

    // Faces may reference vertices declared later in the file
    let count = points.len();
    let facets = raw_facets
        .into_iter()
        .map(|(line, face)| {
            let mut facet = [0; 3];
            for (slot, index) in facet.iter_mut().zip(face) {
                if index == 0 || index > count {
                    return Err(WavefrontError::IndexOutOfRange { line, index, count });
                }
                *slot = index - 1;
            }
            Ok(facet)
        })
        .collect::<WavefrontResult<Vec<_>>>()?;

    Ok(TriangleMesh::new(points, facets))
}

/// Read and parse a Wavefront OBJ file.
pub fn load_wavefront(path: impl AsRef<Path>) -> WavefrontResult<TriangleMesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_wavefront(&content)?;
    log::debug!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn parse_index(field: &str, line: usize) -> WavefrontResult<usize> {
    let head = field.split('/').next().unwrap_or(field);
    head.parse::<usize>().map_err(|_| WavefrontError::ParseIndex {
        line,
        value: field.to_string(),
    })
}
