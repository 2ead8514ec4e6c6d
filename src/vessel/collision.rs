use std::f64::consts::PI;

use crate::config::VesselConfig;
use crate::math::{Matrix4, Vector3, MIN_DIMENSION, TOLERANCE};
use crate::stage::{xform, Collider, PrimKind, XformOp};

/// Collider settings shared by the base and every wall segment.
pub const VESSEL_COLLIDER: Collider = Collider {
    enabled: true,
    contact_offset: 0.002,
    rest_offset: 0.0,
};

/// Most wall segments a vessel is built with.
pub const MAX_WALL_SEGMENTS: u32 = 1024;

/// Shape of a collision primitive before its transform is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    /// A z-aligned cylinder centered on its origin.
    Cylinder { radius: f64, height: f64 },
    /// A unit cube, sized through the primitive's scale.
    UnitCube,
}

impl PrimitiveShape {
    /// The prim kind used to author this shape.
    #[must_use]
    pub fn prim_kind(self) -> PrimKind {
        match self {
            Self::Cylinder { radius, height } => PrimKind::Cylinder { radius, height },
            Self::UnitCube => PrimKind::Cube { size: 1.0 },
        }
    }
}

/// A simple collision shape placed relative to the vessel root.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionPrimitive {
    /// Prim name under the vessel root (or under the wall group).
    pub name: String,
    pub shape: PrimitiveShape,
    pub translate: Vector3,
    /// Rotation about the vertical axis, in degrees.
    pub rotate_z: f64,
    pub scale: Vector3,
}

impl CollisionPrimitive {
    /// Transform ops in translate, rotate, scale order; identity ops are omitted.
    #[must_use]
    pub fn xform_ops(&self) -> Vec<XformOp> {
        let mut ops = vec![XformOp::Translate(self.translate)];
        if self.rotate_z.abs() > TOLERANCE {
            ops.push(XformOp::RotateXYZ(Vector3::new(0.0, 0.0, self.rotate_z)));
        }
        if (self.scale - Vector3::repeat(1.0)).norm() > TOLERANCE {
            ops.push(XformOp::Scale(self.scale));
        }
        ops
    }

    /// The primitive's transform relative to its parent.
    #[must_use]
    pub fn local_transform(&self) -> Matrix4 {
        xform::compose(&self.xform_ops())
    }
}

/// Builds the floor disk whose top face sits at `z = base_height`.
#[must_use]
pub fn base_primitive(config: &VesselConfig) -> CollisionPrimitive {
    let radius = config.base_radius.max(MIN_DIMENSION);
    let height = config.base_height.max(MIN_DIMENSION);
    CollisionPrimitive {
        name: "Base".to_owned(),
        shape: PrimitiveShape::Cylinder { radius, height },
        translate: Vector3::new(0.0, 0.0, height * 0.5),
        rotate_z: 0.0,
        scale: Vector3::repeat(1.0),
    }
}

/// Builds the ring of box segments approximating the cylindrical wall.
///
/// Segment `i` sits on the ring at angle `2*pi*i/n` and is rotated so its
/// local x axis is tangent to the ring. Each segment is lowered by
/// [`VesselConfig::wall_overlap`] and lengthened by the same amount so the
/// ring overlaps the base and no seam opens above the floor.
#[must_use]
pub fn wall_primitives(config: &VesselConfig) -> Vec<CollisionPrimitive> {
    let thickness = config.wall_thickness.max(MIN_DIMENSION);
    let outer_radius = config.base_radius.max(thickness + MIN_DIMENSION);
    let ring_radius = (outer_radius - thickness * 0.5).max(MIN_DIMENSION);
    let overlap = config.wall_overlap();
    let height = config.wall_height.max(MIN_DIMENSION) + overlap;
    let z_center = config.base_height - overlap + config.wall_height.max(MIN_DIMENSION) * 0.5;

    let count = config.segment_count.clamp(3, MAX_WALL_SEGMENTS);
    let width = if config.segment_width > 0.0 {
        config.segment_width
    } else {
        chord_width(ring_radius, count)
    };

    (0..count)
        .map(|idx| {
            let angle = 2.0 * PI * f64::from(idx) / f64::from(count);
            CollisionPrimitive {
                name: format!("Segment_{idx:02}"),
                shape: PrimitiveShape::UnitCube,
                translate: Vector3::new(
                    ring_radius * angle.cos(),
                    ring_radius * angle.sin(),
                    z_center,
                ),
                rotate_z: angle.to_degrees() - 90.0,
                scale: Vector3::new(width, thickness, height),
            }
        })
        .collect()
}

/// Side length of the regular `count`-gon circumscribed about a circle.
fn chord_width(ring_radius: f64, count: u32) -> f64 {
    2.0 * ring_radius * (PI / f64::from(count)).tan()
}
