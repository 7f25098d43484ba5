//! Merging pipe meshes into one mesh with a submesh per material.

use nalgebra::{Point3, Vector2};
use pipe_geometry::Transform3D;
use tracing::info;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{MeshSink, PipeMesh};

/// A mesh placed in the world with the material it renders with.
#[derive(Debug, Clone)]
pub struct CombineSource<'a, M> {
    /// Mesh in its owner's local space.
    pub mesh: &'a PipeMesh,
    /// Owner's local-to-world transform.
    pub transform: Transform3D,
    /// Material the mesh renders with; compared by equality.
    pub material: M,
}

impl<'a, M> CombineSource<'a, M> {
    /// Create a combine source.
    pub const fn new(mesh: &'a PipeMesh, transform: Transform3D, material: M) -> Self {
        Self {
            mesh,
            transform,
            material,
        }
    }
}

/// Result of a combine: the mesh and the material of each of its submeshes.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedMesh<M> {
    /// Combined mesh in the parent's space.
    pub mesh: PipeMesh,
    /// `materials[i]` renders `mesh.submeshes[i]`.
    pub materials: Vec<M>,
}

impl<M> AsRef<PipeMesh> for CombinedMesh<M> {
    fn as_ref(&self) -> &PipeMesh {
        &self.mesh
    }
}

/// Distinct materials in first-seen order.
fn unique_materials<M: PartialEq + Clone>(sources: &[CombineSource<'_, M>]) -> Vec<M> {
    let mut materials: Vec<M> = Vec::new();
    for source in sources {
        if !materials.contains(&source.material) {
            materials.push(source.material.clone());
        }
    }
    materials
}

/// Combine `sources` into a new mesh named `name`.
///
/// # Errors
///
/// See [`combine_into`].
///
/// # Example
///
/// ```
/// use control_line::{ControlLine, LineDefaults};
/// use pipe_geometry::Transform3D;
/// use pipe_mesh::{CombineSource, MeshBuildParams, MeshBuilder, combine_meshes};
/// use nalgebra::Vector3;
///
/// let line = ControlLine::new(LineDefaults::default());
/// let pipe = MeshBuilder::new().build(&line, &MeshBuildParams::default(), "pipe").unwrap();
///
/// let sources = [
///     CombineSource::new(&pipe, Transform3D::identity(), "steel"),
///     CombineSource::new(&pipe, Transform3D::from_translation(Vector3::x() * 5.0), "steel"),
/// ];
/// let combined = combine_meshes("pipes", &Transform3D::identity(), &sources).unwrap();
///
/// assert_eq!(combined.materials, vec!["steel"]);
/// assert_eq!(combined.mesh.triangle_count(), 2 * pipe.triangle_count());
/// ```
pub fn combine_meshes<M: PartialEq + Clone>(
    name: impl Into<String>,
    parent: &Transform3D,
    sources: &[CombineSource<'_, M>],
) -> MeshResult<CombinedMesh<M>> {
    let mut mesh = PipeMesh::new(name);
    let materials = combine_into(parent, sources, &mut mesh)?;
    Ok(CombinedMesh { mesh, materials })
}

/// Combine `sources` into `sink`, returning the material of each submesh.
///
/// Vertices are carried from each source's local space to the world and
/// then into the parent's space. Only the parent's translation is used;
/// its rotation and scale are treated as identity while combining. Every
/// triangle of a source, whatever its submesh, lands in the submesh of the
/// source's material. UVs are concatenated in source order.
///
/// # Errors
///
/// - [`MeshError::NothingToCombine`] if `sources` is empty
/// - [`MeshError::TooManyVertices`] if 32-bit indices cannot address the result
#[allow(clippy::cast_possible_truncation)]
pub fn combine_into<M: PartialEq + Clone, S: MeshSink + ?Sized>(
    parent: &Transform3D,
    sources: &[CombineSource<'_, M>],
    sink: &mut S,
) -> MeshResult<Vec<M>> {
    if sources.is_empty() {
        return Err(MeshError::NothingToCombine);
    }
    let vertex_total: usize = sources.iter().map(|s| s.mesh.vertex_count()).sum();
    if u32::try_from(vertex_total).is_err() {
        return Err(MeshError::TooManyVertices(vertex_total));
    }

    let materials = unique_materials(sources);
    let mut submeshes: Vec<Vec<[u32; 3]>> = vec![Vec::new(); materials.len()];
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_total);
    let mut uvs: Vec<Vector2<f64>> = Vec::with_capacity(vertex_total);
    let parent = parent.translation_only();

    for source in sources {
        let submesh = materials
            .iter()
            .position(|material| *material == source.material)
            .unwrap_or_default();
        // Truncation: checked against u32 above
        let offset = vertices.len() as u32;

        vertices.extend(source.mesh.vertices.iter().map(|local| {
            let world = source.transform.transform_point(local);
            parent.inverse_transform_point(&world)
        }));
        uvs.extend_from_slice(&source.mesh.uvs);
        uvs.resize(vertices.len(), Vector2::zeros());

        submeshes[submesh].extend(
            source
                .mesh
                .triangles()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    info!(
        sources = sources.len(),
        materials = materials.len(),
        vertices = vertices.len(),
        triangles = submeshes.iter().map(Vec::len).sum::<usize>(),
        "Combined pipe meshes"
    );

    sink.clear();
    sink.set_vertices(&vertices);
    for (index, triangles) in submeshes.iter().enumerate() {
        sink.set_triangles(index, triangles);
    }
    sink.set_uvs(&uvs);
    sink.finish();
    Ok(materials)
}
