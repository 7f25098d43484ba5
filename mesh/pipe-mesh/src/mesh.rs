//! Pipe mesh buffers and the sink contract.

use nalgebra::{Point3, Vector2, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receives the buffers produced by a mesh build or combine.
///
/// The sink owns everything derived from them: normals, bounds and any
/// host-side optimization happen in [`MeshSink::finish`]. Producers call
/// the setters once each and `finish` last.
pub trait MeshSink {
    /// Replace all vertex positions.
    fn set_vertices(&mut self, vertices: &[Point3<f64>]);

    /// Replace the triangles of `submesh`, growing the submesh list as needed.
    fn set_triangles(&mut self, submesh: usize, triangles: &[[u32; 3]]);

    /// Replace the per-vertex texture coordinates.
    fn set_uvs(&mut self, uvs: &[Vector2<f64>]);

    /// Drop every buffer.
    fn clear(&mut self);

    /// Recompute derived data once all buffers are set.
    fn finish(&mut self) {}
}

/// Axis-aligned bounds of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Bounds {
    /// Bounds of a point set, or `None` if it is empty.
    #[must_use]
    pub fn from_points<'a>(mut points: impl Iterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let first = *points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            |bounds, p| Self {
                min: bounds.min.inf(p),
                max: bounds.max.sup(p),
            },
        ))
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

/// A pipe mesh: vertices, per-vertex UVs and triangles grouped into submeshes.
///
/// Triangles use counter-clockwise winding seen from the side they face:
/// outer walls face away from the spine, inner walls toward it, and end caps
/// face out of the tube ends.
///
/// # Example
///
/// ```
/// use pipe_mesh::{MeshSink, PipeMesh};
/// use nalgebra::{Point3, Vector2};
///
/// let mut mesh = PipeMesh::new("triangle");
/// mesh.set_vertices(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)]);
/// mesh.set_triangles(0, &[[0, 1, 2]]);
/// mesh.set_uvs(&[Vector2::zeros(); 3]);
/// mesh.finish();
///
/// assert_eq!(mesh.triangle_count(), 1);
/// assert_eq!(mesh.index_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipeMesh {
    /// Asset name.
    pub name: String,

    /// Vertex positions in the owner's local space.
    pub vertices: Vec<Point3<f64>>,

    /// Texture coordinates, one per vertex.
    pub uvs: Vec<Vector2<f64>>,

    /// Triangle lists, one per submesh.
    pub submeshes: Vec<Vec<[u32; 3]>>,

    normals: Vec<Vector3<f64>>,
    bounds: Option<Bounds>,
}

impl PipeMesh {
    /// Create an empty named mesh.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of submeshes.
    #[inline]
    #[must_use]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Triangles across all submeshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }

    /// Triangle indices across all submeshes.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.triangle_count() * 3
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// All triangles in submesh order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.submeshes.iter().flat_map(|tris| tris.iter().copied())
    }

    /// Vertex normals computed by the last [`MeshSink::finish`].
    #[must_use]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Bounds computed by the last [`MeshSink::finish`].
    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Signed volume by the divergence theorem.
    ///
    /// Positive for a closed mesh whose faces point outward.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let volume: f64 = self
            .triangles()
            .map(|[a, b, c]| {
                let v0 = self.vertices[a as usize].coords;
                let v1 = self.vertices[b as usize].coords;
                let v2 = self.vertices[c as usize].coords;
                v0.dot(&v1.cross(&v2))
            })
            .sum();
        volume / 6.0
    }

    /// Whether the faces point inward.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Area-weighted vertex normals.
    ///
    /// Vertices that share a position but not an index, such as the UV seam,
    /// get independent normals.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(&(self.vertices[c] - self.vertices[a]));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for normal in &mut normals {
            *normal = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        self.normals = normals;
    }

    /// Recompute the cached bounds.
    pub fn recalculate_bounds(&mut self) {
        self.bounds = Bounds::from_points(self.vertices.iter());
    }
}

impl AsRef<Self> for PipeMesh {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl MeshSink for PipeMesh {
    fn set_vertices(&mut self, vertices: &[Point3<f64>]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
    }

    fn set_triangles(&mut self, submesh: usize, triangles: &[[u32; 3]]) {
        if self.submeshes.len() <= submesh {
            self.submeshes.resize_with(submesh + 1, Vec::new);
        }
        let target = &mut self.submeshes[submesh];
        target.clear();
        target.extend_from_slice(triangles);
    }

    fn set_uvs(&mut self, uvs: &[Vector2<f64>]) {
        self.uvs.clear();
        self.uvs.extend_from_slice(uvs);
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.submeshes.clear();
        self.normals.clear();
        self.bounds = None;
    }

    fn finish(&mut self) {
        self.recalculate_normals();
        self.recalculate_bounds();
    }
}
