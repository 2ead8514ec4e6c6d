use std::f64::consts::TAU;

use crate::config::VesselConfig;
use crate::math::{Point3, MIN_DIMENSION};
use crate::stage::MeshData;

/// Lowest angular resolution of the visual shell.
pub const MIN_VISUAL_SEGMENTS: u32 = 16;

/// Highest angular resolution of the visual shell.
pub const MAX_VISUAL_SEGMENTS: u32 = 4096;

/// Builds the watertight visual shell of a vessel: a hollow cylinder with a
/// solid floor.
///
/// Vertices are laid out as four rings of `segments` points (outer-bottom,
/// outer-top, inner-top, inner-bottom) followed by the bottom center and the
/// floor center, giving `4 * segments + 2` vertices. Faces are all triangles:
/// two per quad on the outer wall, rim and inner wall, plus one per segment in
/// the bottom and floor fans, giving `8 * segments` triangles.
///
/// Winding is consistent over the closed shell: the outer wall faces away from
/// the axis, the rim and floor face +z, the inner wall faces the cavity and the
/// bottom faces -z.
pub struct ShellMesh {
    outer_radius: f64,
    inner_radius: f64,
    floor_height: f64,
    total_height: f64,
    segments: u32,
}

impl ShellMesh {
    /// Derives the shell dimensions from a vessel config.
    ///
    /// Radii, heights and the wall thickness are floored to
    /// [`MIN_DIMENSION`]. The thickness is then clamped so the inner radius
    /// stays at least [`MIN_DIMENSION`] and strictly below the outer radius.
    #[must_use]
    pub fn new(config: &VesselConfig) -> Self {
        let outer_radius = config.base_radius.max(2.0 * MIN_DIMENSION);
        let thickness = config
            .wall_thickness
            .max(MIN_DIMENSION)
            .min(outer_radius - MIN_DIMENSION);
        let inner_radius = outer_radius - thickness;
        let floor_height = config.base_height.max(MIN_DIMENSION);
        let total_height = floor_height + config.wall_height.max(MIN_DIMENSION);
        Self {
            outer_radius,
            inner_radius,
            floor_height,
            total_height,
            segments: config
                .visual_segments
                .clamp(MIN_VISUAL_SEGMENTS, MAX_VISUAL_SEGMENTS),
        }
    }

    /// Angular resolution actually used.
    #[must_use]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Generates the mesh.
    #[must_use]
    pub fn execute(&self) -> MeshData {
        let n = self.segments;
        let mut points = Vec::with_capacity(4 * n as usize + 2);

        let outer_bottom = push_ring(&mut points, self.outer_radius, 0.0, n);
        let outer_top = push_ring(&mut points, self.outer_radius, self.total_height, n);
        let inner_top = push_ring(&mut points, self.inner_radius, self.total_height, n);
        let inner_bottom = push_ring(&mut points, self.inner_radius, self.floor_height, n);
        let bottom_center = index_of(points.len());
        points.push(Point3::new(0.0, 0.0, 0.0));
        let floor_center = index_of(points.len());
        points.push(Point3::new(0.0, 0.0, self.floor_height));

        let mut faces = Faces::with_capacity(8 * n as usize);
        faces.connect_rings(outer_bottom, outer_top, n);
        faces.connect_rings(outer_top, inner_top, n);
        faces.connect_rings(inner_top, inner_bottom, n);
        for i in 0..n {
            let next = (i + 1) % n;
            faces.triangle(bottom_center, outer_bottom + next, outer_bottom + i);
            faces.triangle(floor_center, inner_bottom + i, inner_bottom + next);
        }

        MeshData {
            points,
            face_vertex_counts: faces.counts,
            face_vertex_indices: faces.indices,
            double_sided: true,
            subdivision: None,
        }
    }
}

/// Appends a ring of `n` points and returns the index of its first point.
fn push_ring(points: &mut Vec<Point3>, radius: f64, z: f64, n: u32) -> u32 {
    let start = index_of(points.len());
    points.extend((0..n).map(|i| {
        let angle = TAU * f64::from(i) / f64::from(n);
        Point3::new(radius * angle.cos(), radius * angle.sin(), z)
    }));
    start
}

#[allow(clippy::cast_possible_truncation)]
fn index_of(len: usize) -> u32 {
    len as u32
}

struct Faces {
    counts: Vec<u32>,
    indices: Vec<u32>,
}

impl Faces {
    fn with_capacity(triangles: usize) -> Self {
        Self {
            counts: Vec::with_capacity(triangles),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.counts.push(3);
        self.indices.extend([a, b, c]);
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    /// Joins ring `a` to ring `b`; faces point to the left of `a -> b`
    /// when walking the rings counterclockwise seen from +z.
    fn connect_rings(&mut self, start_a: u32, start_b: u32, n: u32) {
        for i in 0..n {
            let next = (i + 1) % n;
            self.quad(start_a + i, start_a + next, start_b + next, start_b + i);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::math::Vector3;

    fn triangles(mesh: &MeshData) -> Vec<[usize; 3]> {
        mesh.face_vertex_indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect()
    }

    fn normal(mesh: &MeshData, tri: [usize; 3]) -> Vector3 {
        let [a, b, c] = tri.map(|i| mesh.points[i]);
        (b - a).cross(&(c - a))
    }

    #[test]
    fn vertex_and_face_counts() {
        let config = VesselConfig {
            visual_segments: 24,
            ..VesselConfig::default()
        };
        let mesh = ShellMesh::new(&config).execute();
        assert_eq!(mesh.points.len(), 4 * 24 + 2);
        assert_eq!(mesh.face_count(), 8 * 24);
        assert!(mesh.face_vertex_counts.iter().all(|&c| c == 3));
        assert_eq!(mesh.face_vertex_indices.len(), 3 * mesh.face_count());
        assert!(mesh.double_sided);
        assert!(mesh.subdivision.is_none());
    }

    #[test]
    fn resolution_is_floored() {
        let config = VesselConfig {
            visual_segments: 3,
            ..VesselConfig::default()
        };
        let shell = ShellMesh::new(&config);
        assert_eq!(shell.segments(), MIN_VISUAL_SEGMENTS);
        assert_eq!(shell.execute().points.len(), 4 * 16 + 2);
    }

    fn centroid(mesh: &MeshData, tri: [usize; 3]) -> Vector3 {
        let [a, b, c] = tri.map(|i| mesh.points[i].coords);
        (a + b + c) / 3.0
    }

    #[test]
    fn shell_is_closed_and_consistently_wound() {
        let mesh = ShellMesh::new(&VesselConfig::default()).execute();
        let mut edges: HashMap<(usize, usize), usize> = HashMap::new();
        for [a, b, c] in triangles(&mesh) {
            for edge in [(a, b), (b, c), (c, a)] {
                *edges.entry(edge).or_default() += 1;
            }
        }
        for (&(a, b), &count) in &edges {
            assert_eq!(count, 1, "edge {a}->{b} used by {count} faces");
            assert_eq!(edges.get(&(b, a)), Some(&1), "edge {a}->{b} has no twin");
        }
    }

    #[test]
    fn bands_face_their_side() {
        let mesh = ShellMesh::new(&VesselConfig::default()).execute();
        let tris = triangles(&mesh);
        let n = 64;

        // bands in order: outer wall, rim, inner wall; two triangles per quad
        for &tri in &tris[..2 * n] {
            let c = centroid(&mesh, tri);
            assert!(normal(&mesh, tri).dot(&Vector3::new(c.x, c.y, 0.0)) > 0.0);
        }
        for &tri in &tris[2 * n..4 * n] {
            assert!(normal(&mesh, tri).z > 0.0);
        }
        for &tri in &tris[4 * n..6 * n] {
            let c = centroid(&mesh, tri);
            assert!(normal(&mesh, tri).dot(&Vector3::new(c.x, c.y, 0.0)) < 0.0);
        }

        // fans are interleaved after the three bands
        for i in 0..n {
            assert!(normal(&mesh, tris[6 * n + 2 * i]).z < 0.0);
            assert!(normal(&mesh, tris[6 * n + 2 * i + 1]).z > 0.0);
        }
    }

    fn assert_non_degenerate(config: &VesselConfig) {
        let shell = ShellMesh::new(config);
        assert!(shell.inner_radius() > 0.0);
        assert!(shell.inner_radius() < shell.outer_radius());
        let mesh = shell.execute();
        for tri in triangles(&mesh) {
            assert!(normal(&mesh, tri).norm() > 0.0, "zero-area face {tri:?}");
        }
    }

    #[test]
    fn degenerate_dimensions_keep_positive_area() {
        assert_non_degenerate(&VesselConfig {
            base_radius: 0.0,
            ..VesselConfig::default()
        });
        assert_non_degenerate(&VesselConfig {
            wall_thickness: -0.01,
            ..VesselConfig::default()
        });
        assert_non_degenerate(&VesselConfig {
            wall_thickness: 0.06,
            ..VesselConfig::default()
        });
        assert_non_degenerate(&VesselConfig {
            base_radius: -1.0,
            wall_thickness: 0.5,
            base_height: -1.0,
            wall_height: 0.0,
            ..VesselConfig::default()
        });
    }

    #[test]
    fn negative_thickness_matches_collision_floor() {
        let shell = ShellMesh::new(&VesselConfig {
            wall_thickness: -0.01,
            ..VesselConfig::default()
        });
        assert!((shell.outer_radius() - shell.inner_radius() - MIN_DIMENSION).abs() < 1e-12);
    }

    #[test]
    fn resolution_is_capped() {
        let config = VesselConfig {
            visual_segments: u32::MAX,
            ..VesselConfig::default()
        };
        assert_eq!(ShellMesh::new(&config).segments(), MAX_VISUAL_SEGMENTS);
    }

    #[test]
    fn degenerate_dimensions_stay_finite() {
        let config = VesselConfig {
            base_radius: 0.0,
            wall_thickness: 0.5,
            base_height: -1.0,
            wall_height: 0.0,
            ..VesselConfig::default()
        };
        let mesh = ShellMesh::new(&config).execute();
        assert!(mesh
            .points
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite()));
        assert!(mesh.points.iter().all(|p| p.z >= 0.0));
    }
}
