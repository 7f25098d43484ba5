//! Sweeping the cross-section along the chord samples.

use control_line::{ChordNode, ControlLine, RadiusSettings};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector2};
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{MeshSink, PipeMesh};
use crate::params::{MIN_CIRCLE_DETAIL, MeshBuildParams};

/// Fewest chord samples that form a wall.
pub const MIN_CHORDS: usize = 2;

/// Builds pipe meshes from a control line.
///
/// The builder keeps its vertex, triangle and UV buffers between builds and
/// clears them at the start of each one, so a long-lived builder allocates
/// only when a pipe outgrows every previous one. One build at a time per
/// builder.
///
/// # Layout
///
/// Vertices are emitted side by side: the outer wall, then the inner wall,
/// then the two end caps. Every ring has `circle_detail + 1` vertices, the
/// last one repeating the first at the UV seam. A cap is its inner ring
/// followed by its outer ring.
///
/// # Example
///
/// ```
/// use control_line::{ControlLine, LineDefaults};
/// use pipe_mesh::{MeshBuildParams, MeshBuilder};
///
/// let line = ControlLine::new(LineDefaults::default());
/// let mut builder = MeshBuilder::new();
/// let mesh = builder.build(&line, &MeshBuildParams::default(), "pipe").unwrap();
///
/// assert!(mesh.signed_volume() > 0.0);
/// ```
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    uvs: Vec<Vector2<f64>>,
}

impl MeshBuilder {
    /// Create a builder with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a named mesh.
    ///
    /// # Errors
    ///
    /// See [`MeshBuilder::build_into`].
    pub fn build(
        &mut self,
        line: &ControlLine,
        params: &MeshBuildParams,
        name: impl Into<String>,
    ) -> MeshResult<PipeMesh> {
        let mut mesh = PipeMesh::new(name);
        self.build_into(line, params, &mut mesh)?;
        Ok(mesh)
    }

    /// Build into an existing sink, replacing its contents.
    ///
    /// All triangles go to submesh 0.
    ///
    /// # Errors
    ///
    /// - [`MeshError::CircleDetailTooLow`] if `params.circle_detail` is below
    ///   [`MIN_CIRCLE_DETAIL`]
    /// - [`MeshError::TooFewChords`] if the line has fewer than [`MIN_CHORDS`]
    ///   chord samples
    /// - [`MeshError::TooManyVertices`] if 32-bit indices cannot address the mesh
    pub fn build_into<S: MeshSink + ?Sized>(
        &mut self,
        line: &ControlLine,
        params: &MeshBuildParams,
        sink: &mut S,
    ) -> MeshResult<()> {
        let detail = params.circle_detail;
        if detail < MIN_CIRCLE_DETAIL {
            return Err(MeshError::CircleDetailTooLow {
                min: MIN_CIRCLE_DETAIL,
                actual: detail,
            });
        }
        let chords = line.chord_count();
        if chords < MIN_CHORDS {
            return Err(MeshError::TooFewChords {
                min: MIN_CHORDS,
                actual: chords,
            });
        }

        let ring = params.ring_size();
        let sides = &params.sides;
        let vertex_total = ring * (chords * sides.wall_count() + if sides.edges { 4 } else { 0 });
        if u32::try_from(vertex_total).is_err() {
            return Err(MeshError::TooManyVertices(vertex_total));
        }

        self.vertices.clear();
        self.triangles.clear();
        self.uvs.clear();
        self.vertices.reserve(vertex_total);
        self.uvs.reserve(vertex_total);

        let length = line.chord_line_length();
        let uv = &params.uv;
        let defaults = line.defaults();

        if sides.outer {
            let start = self.vertices.len();
            self.push_wall_vertices(line, detail, params.rotation, RadiusSettings::outer);
            self.push_wall_triangles(start, ring, chords, false);
            self.push_wall_uvs(line, detail, length, false);
            let uvs = &mut self.uvs[start..];
            uv.outer.apply(uvs);
            uv.outer.apply_auto_tiling(uvs, length, defaults.radius.outer());
        }

        if sides.inner {
            let start = self.vertices.len();
            self.push_wall_vertices(line, detail, params.rotation, RadiusSettings::inner);
            self.push_wall_triangles(start, ring, chords, true);
            self.push_wall_uvs(line, detail, length, true);
            let uvs = &mut self.uvs[start..];
            uv.inner.apply(uvs);
            uv.inner.apply_auto_tiling(uvs, length, defaults.radius.inner());
        }

        if sides.edges {
            let start = self.vertices.len();
            self.push_edges(line, detail, params.rotation);
            uv.edges.apply(&mut self.uvs[start..]);
        }

        debug!(
            detail,
            chords,
            vertices = self.vertices.len(),
            triangles = self.triangles.len(),
            "Built pipe mesh"
        );

        sink.clear();
        sink.set_vertices(&self.vertices);
        sink.set_triangles(0, &self.triangles);
        sink.set_uvs(&self.uvs);
        sink.finish();
        Ok(())
    }

    fn push_wall_vertices(
        &mut self,
        line: &ControlLine,
        detail: u32,
        rotation: f64,
        radius: fn(&RadiusSettings) -> f64,
    ) {
        let defaults = line.defaults();
        for node in line.nodes() {
            let r = radius(node.radius_settings(defaults));
            for chord in node.chords() {
                push_ring(&mut self.vertices, chord, r, detail, rotation);
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex totals are checked against u32 before any push
    fn push_wall_triangles(&mut self, start: usize, ring: usize, chords: usize, inward: bool) {
        let n = ring as u32;
        for row in 0..chords - 1 {
            for x in 0..ring - 1 {
                let vi = (start + row * ring + x) as u32;
                if inward {
                    self.triangles.push([vi, vi + 1, vi + n]);
                    self.triangles.push([vi + n, vi + 1, vi + n + 1]);
                } else {
                    self.triangles.push([vi, vi + n, vi + 1]);
                    self.triangles.push([vi + 1, vi + n, vi + n + 1]);
                }
            }
        }
    }

    /// U follows the arc length along the chords; V walks around the ring,
    /// top to bottom outside and bottom to top inside.
    fn push_wall_uvs(&mut self, line: &ControlLine, detail: u32, length: f64, inner: bool) {
        let step = 1.0 / f64::from(detail);
        let v = |row: u32| {
            if inner {
                step * f64::from(row)
            } else {
                1.0 - step * f64::from(row)
            }
        };

        let mut u = 0.0;
        let mut previous: Option<Point3<f64>> = None;
        for chord in line.chords() {
            if let Some(prev) = previous {
                if length > 0.0 {
                    u += (chord.position() - prev).norm() / length;
                }
            }
            previous = Some(chord.position());
            self.uvs.extend((0..=detail).map(|row| Vector2::new(u, v(row))));
        }
    }

    /// Annuli closing both ends: the start cap faces back along the spine,
    /// the end cap forward.
    #[allow(clippy::cast_possible_truncation)]
    fn push_edges(&mut self, line: &ControlLine, detail: u32, rotation: f64) {
        let defaults = line.defaults();
        let (Some(first_node), Some(last_node)) = (line.nodes().first(), line.nodes().last()) else {
            return;
        };
        let (Some(first_chord), Some(last_chord)) =
            (first_node.chords().first(), last_node.chords().last())
        else {
            return;
        };

        let ring = detail as usize + 1;
        let n = ring as u32;
        let caps = [
            (first_chord, first_node.radius_settings(defaults), false),
            (last_chord, last_node.radius_settings(defaults), true),
        ];

        for (chord, radii, faces_forward) in caps {
            let start = self.vertices.len();
            push_ring(&mut self.vertices, chord, radii.inner(), detail, rotation);
            push_ring(&mut self.vertices, chord, radii.outer(), detail, rotation);

            for x in 0..ring - 1 {
                let vi = (start + x) as u32;
                if faces_forward {
                    self.triangles.push([vi, vi + 1, vi + n]);
                    self.triangles.push([vi + 1, vi + n + 1, vi + n]);
                } else {
                    self.triangles.push([vi, vi + n, vi + 1]);
                    self.triangles.push([vi + 1, vi + n, vi + n + 1]);
                }
            }

            // Both caps map to the same disc; the end cap runs mirrored so the
            // texture reads the same from outside either end.
            let sign = if faces_forward { -1.0 } else { 1.0 };
            let ratio = radii.inner() / radii.outer();
            self.uvs.extend(disc_uvs(detail, sign, ratio));
            self.uvs.extend(disc_uvs(detail, sign, 1.0));
        }
    }
}

/// One ring of `detail + 1` vertices around `chord`, starting at its `up`.
fn push_ring(out: &mut Vec<Point3<f64>>, chord: &ChordNode, radius: f64, detail: u32, rotation: f64) {
    let step = 360.0 / f64::from(detail);
    let axis = Unit::new_normalize(-chord.forward());
    let spoke = chord.up() * radius;
    let center = chord.position();
    out.extend((0..=detail).map(|i| {
        let angle = (step * f64::from(i) + rotation).to_radians();
        center + UnitQuaternion::from_axis_angle(&axis, angle) * spoke
    }));
}

fn disc_uvs(detail: u32, sign: f64, scale: f64) -> impl Iterator<Item = Vector2<f64>> {
    let step = sign * 360.0 / f64::from(detail);
    (0..=detail).map(move |i| {
        let (sin, cos) = (step * f64::from(i)).to_radians().sin_cos();
        Vector2::new(sin, cos) * (0.5 * scale) + Vector2::new(0.5, 0.5)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MeshSides;
    use crate::uv::{SideUv, UvProperties};
    use approx::assert_relative_eq;
    use control_line::{LineDefaults, Setting, TurnSettings};

    fn straight(length: f64) -> ControlLine {
        ControlLine::from_points(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, length)],
            LineDefaults::default(),
        )
        .unwrap()
    }

    fn corner() -> ControlLine {
        ControlLine::from_points(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 5.0),
                Point3::new(5.0, 0.0, 5.0),
            ],
            LineDefaults::default().with_turn(TurnSettings::new(2.0, 6)),
        )
        .unwrap()
    }

    fn outer_only(detail: u32) -> MeshBuildParams {
        MeshBuildParams::default()
            .with_circle_detail(detail)
            .with_sides(MeshSides::outer_only())
    }

    #[test]
    fn straight_tube_outer_only_counts() {
        let mesh = MeshBuilder::new()
            .build(&straight(5.0), &outer_only(4), "tube")
            .unwrap();
        assert_eq!(mesh.vertex_count(), 10);
        assert_eq!(mesh.index_count(), 24);
        assert_eq!(mesh.uvs.len(), 10);
        assert_eq!(mesh.submesh_count(), 1);
    }

    #[test]
    fn ring_starts_at_up_and_closes() {
        let mesh = MeshBuilder::new()
            .build(&straight(5.0), &outer_only(4), "tube")
            .unwrap();
        let up = straight(5.0).chord(0).unwrap().up();
        assert_relative_eq!(mesh.vertices[0].coords, up, epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[4], mesh.vertices[0], epsilon = 1e-12);
        for vertex in &mesh.vertices[..5] {
            assert_relative_eq!(vertex.z, 0.0, epsilon = 1e-12);
            assert_relative_eq!(vertex.coords.xy().norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn extra_rotation_turns_rings() {
        let line = straight(5.0);
        let base = MeshBuilder::new().build(&line, &outer_only(4), "a").unwrap();
        let turned = MeshBuilder::new()
            .build(&line, &outer_only(4).with_rotation(90.0), "b")
            .unwrap();
        assert_relative_eq!(turned.vertices[0], base.vertices[1], epsilon = 1e-12);
    }

    #[test]
    fn outer_wall_faces_away_from_spine() {
        let mesh = MeshBuilder::new()
            .build(&straight(5.0), &outer_only(8), "tube")
            .unwrap();
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (mesh.vertices[a as usize], mesh.vertices[b as usize], mesh.vertices[c as usize]);
            let normal = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let radial = nalgebra::Vector3::new(centroid.x, centroid.y, 0.0);
            assert!(normal.dot(&radial) > 0.0);
        }
    }

    #[test]
    fn inner_wall_faces_spine() {
        let params = MeshBuildParams::default()
            .with_circle_detail(8)
            .with_sides(MeshSides {
                outer: false,
                inner: true,
                edges: false,
            });
        let mesh = MeshBuilder::new().build(&straight(5.0), &params, "tube").unwrap();
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (mesh.vertices[a as usize], mesh.vertices[b as usize], mesh.vertices[c as usize]);
            let normal = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let radial = nalgebra::Vector3::new(centroid.x, centroid.y, 0.0);
            assert!(normal.dot(&radial) < 0.0);
        }
    }

    #[test]
    fn caps_face_out_of_tube_ends() {
        let params = MeshBuildParams::default()
            .with_circle_detail(6)
            .with_sides(MeshSides {
                outer: false,
                inner: false,
                edges: true,
            });
        let mesh = MeshBuilder::new().build(&straight(5.0), &params, "caps").unwrap();
        assert_eq!(mesh.vertex_count(), 4 * 7);
        assert_eq!(mesh.triangle_count(), 6 * 4);

        for (i, [a, b, c]) in mesh.triangles().enumerate() {
            let (a, b, c) = (mesh.vertices[a as usize], mesh.vertices[b as usize], mesh.vertices[c as usize]);
            let normal = (b - a).cross(&(c - a));
            if i < 12 {
                assert!(normal.z < 0.0);
            } else {
                assert!(normal.z > 0.0);
            }
        }
    }

    #[test]
    fn full_pipe_is_closed_and_outward() {
        let line = corner();
        let mesh = MeshBuilder::new()
            .build(&line, &MeshBuildParams::default().with_circle_detail(24), "pipe")
            .unwrap();
        // A hollow tube: positive volume below the solid cylinder of the outer radius.
        let volume = mesh.signed_volume();
        let solid = std::f64::consts::PI * line.chord_line_length();
        assert!(volume > 0.0);
        assert!(volume < solid);
    }

    #[test]
    fn per_node_radius_applies_to_owned_chords() {
        let mut line = straight(5.0);
        line.set_node_radius(1, Setting::Custom(RadiusSettings::new(3.0, 2.0).unwrap()))
            .unwrap();
        let mesh = MeshBuilder::new().build(&line, &outer_only(4), "tube").unwrap();
        assert_relative_eq!(mesh.vertices[0].coords.xy().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[5].coords.xy().norm(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn outer_uvs_follow_length() {
        let line = corner();
        let mesh = MeshBuilder::new().build(&line, &outer_only(4), "tube").unwrap();
        let ring = 5;
        assert_relative_eq!(mesh.uvs[0], Vector2::new(0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[4], Vector2::new(0.0, 0.0), epsilon = 1e-12);
        let last = mesh.uvs.len() - ring;
        assert_relative_eq!(mesh.uvs[last].x, 1.0, epsilon = 1e-9);

        let us: Vec<_> = mesh.uvs.iter().step_by(ring).map(|uv| uv.x).collect();
        for pair in us.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn inner_uvs_run_upward() {
        let params = MeshBuildParams::default()
            .with_circle_detail(4)
            .with_sides(MeshSides {
                outer: false,
                inner: true,
                edges: false,
            });
        let mesh = MeshBuilder::new().build(&straight(5.0), &params, "tube").unwrap();
        assert_relative_eq!(mesh.uvs[0], Vector2::new(0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[4], Vector2::new(0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[5], Vector2::new(1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn uv_tiling_offset_and_auto_tiling() {
        let uv = UvProperties::default().with_outer(
            SideUv::default()
                .with_tiling(Vector2::new(2.0, 1.0))
                .with_offset(Vector2::new(0.0, 0.5))
                .with_auto_tiling(true),
        );
        let mesh = MeshBuilder::new()
            .build(&straight(6.0), &outer_only(4).with_uv(uv), "tube")
            .unwrap();
        // U: 1 * 2 (tiling) * 6 / (2 * 1) (auto) at the far ring.
        assert_relative_eq!(mesh.uvs[5].x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[5].y, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn inner_auto_tiling_uses_inner_flag() {
        let params = MeshBuildParams::default()
            .with_circle_detail(4)
            .with_sides(MeshSides {
                outer: true,
                inner: true,
                edges: false,
            })
            .with_uv(UvProperties::default().with_inner(SideUv::default().with_auto_tiling(true)));
        let mesh = MeshBuilder::new().build(&straight(6.0), &params, "tube").unwrap();
        // Outer untouched; inner scaled by 6 / (2 * 0.5).
        assert_relative_eq!(mesh.uvs[5].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[15].x, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn edge_uvs_form_discs() {
        let params = MeshBuildParams::default()
            .with_circle_detail(4)
            .with_sides(MeshSides {
                outer: false,
                inner: false,
                edges: true,
            });
        let mesh = MeshBuilder::new().build(&straight(5.0), &params, "caps").unwrap();
        // Inner ring at half the outer radius.
        assert_relative_eq!(mesh.uvs[0], Vector2::new(0.5, 0.75), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[5], Vector2::new(0.5, 1.0), epsilon = 1e-12);
        // Start cap turns one way, end cap the other.
        assert_relative_eq!(mesh.uvs[6], Vector2::new(1.0, 0.5), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[11], Vector2::new(0.25, 0.5), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[15], Vector2::new(0.5, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.uvs[16], Vector2::new(0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn rejects_low_detail() {
        let err = MeshBuilder::new()
            .build(&straight(5.0), &outer_only(2), "tube")
            .unwrap_err();
        assert!(matches!(err, MeshError::CircleDetailTooLow { min: 3, actual: 2 }));
    }

    #[test]
    fn buffers_are_reused() {
        let mut builder = MeshBuilder::new();
        let big = builder.build(&corner(), &MeshBuildParams::default(), "big").unwrap();
        let small = builder.build(&straight(5.0), &outer_only(4), "small").unwrap();
        assert!(big.vertex_count() > small.vertex_count());
        assert_eq!(small.vertex_count(), 10);
    }
}
