use crate::config::{GlassParams, ParticleMaterialParams, ParticleSystemParams};
use crate::math::{Point3, Vector3};

use super::xform::XformOp;

slotmap::new_key_type! {
    /// Unique identifier for a prim in the stage.
    pub struct PrimId;
}

/// The schema type of a prim and its type-specific attributes.
#[derive(Debug, Clone)]
pub enum PrimKind {
    /// A typeless prim, created implicitly for missing ancestors.
    Untyped,
    /// A transformable grouping node.
    Xform,
    /// A non-transformable grouping node.
    Scope,
    /// A z-aligned cylinder centered on its origin.
    Cylinder { radius: f64, height: f64 },
    /// An axis-aligned cube centered on its origin.
    Cube { size: f64 },
    /// A sphere centered on its origin.
    Sphere {
        radius: f64,
        display_color: Option<[f32; 3]>,
    },
    /// A polygonal mesh.
    Mesh(MeshData),
    /// A point instancer.
    PointInstancer(PointInstancerData),
    /// A generic point cloud.
    Points(Vec<Point3>),
    /// A particle system that owns particle sets.
    ParticleSystem(ParticleSystemParams),
    /// A position-based-dynamics particle material.
    ParticleMaterial(ParticleMaterialParams),
    /// A translucent glass material.
    Material(GlassParams),
}

/// Polygonal mesh attributes.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub points: Vec<Point3>,
    /// Number of vertices in each face.
    pub face_vertex_counts: Vec<u32>,
    /// Flattened per-face vertex indices.
    pub face_vertex_indices: Vec<u32>,
    /// Whether both sides of each face are rendered.
    pub double_sided: bool,
    /// Subdivision scheme; `None` means flat facets.
    pub subdivision: Option<String>,
}

impl MeshData {
    /// Number of faces in the mesh.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }
}

/// Point instancer attributes.
#[derive(Debug, Clone, Default)]
pub struct PointInstancerData {
    /// Per-instance positions.
    pub positions: Vec<Point3>,
    /// Per-instance velocities.
    pub velocities: Vec<Vector3>,
    /// Per-instance prototype index.
    pub proto_indices: Vec<u32>,
    /// Paths of the prototype prims.
    pub prototypes: Vec<String>,
}

/// Collision settings applied to a collider prim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub enabled: bool,
    pub contact_offset: f64,
    pub rest_offset: f64,
}

/// Rigid-body settings applied to a dynamic root prim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub enabled: bool,
    pub disable_gravity: bool,
}

/// Membership of a prim in a particle system.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    /// Path of the owning particle system.
    pub system: String,
    pub self_collision: bool,
    pub fluid: bool,
    pub group: u32,
    pub particle_mass: f64,
    /// Positions written back by the simulation, if authored.
    pub simulation_points: Option<Vec<Point3>>,
}

/// Data associated with a prim.
#[derive(Debug, Clone)]
pub struct PrimData {
    /// Absolute path of the prim.
    pub path: String,
    /// Schema type and attributes.
    pub kind: PrimKind,
    /// Parent prim, `None` for top-level prims.
    pub parent: Option<PrimId>,
    /// Child prims in creation order.
    pub children: Vec<PrimId>,
    /// Local transform op stack.
    pub xform_ops: Vec<XformOp>,
    pub collider: Option<Collider>,
    pub rigid_body: Option<RigidBody>,
    /// Explicit mass; `None` lets the physics engine infer it.
    pub mass: Option<f64>,
    /// Path of the bound material.
    pub material_binding: Option<String>,
    pub particle_set: Option<ParticleSet>,
}

impl PrimData {
    /// Creates a prim with no transform, tags or children.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: PrimKind, parent: Option<PrimId>) -> Self {
        Self {
            path: path.into(),
            kind,
            parent,
            children: Vec::new(),
            xform_ops: Vec::new(),
            collider: None,
            rigid_body: None,
            mass: None,
            material_binding: None,
            particle_set: None,
        }
    }
}
