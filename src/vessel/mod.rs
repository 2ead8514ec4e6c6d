mod collision;
mod material;
mod shell_mesh;

pub use collision::{
    base_primitive, wall_primitives, CollisionPrimitive, PrimitiveShape, MAX_WALL_SEGMENTS,
    VESSEL_COLLIDER,
};
pub use material::{MaterialSystem, StageMaterials};
pub use shell_mesh::{ShellMesh, MAX_VISUAL_SEGMENTS, MIN_VISUAL_SEGMENTS};

use crate::config::{VesselConfig, VesselOverrides};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::Result;
use crate::math::Vector3;
use crate::stage::{path, MeshData, PrimId, PrimKind, RigidBody, Stage, XformOp};

/// Geometric representation of a vessel, in vessel-local coordinates.
#[derive(Debug, Clone)]
pub struct VesselGeometry {
    pub base: CollisionPrimitive,
    /// Wall segments in ring order.
    pub walls: Vec<CollisionPrimitive>,
    pub visual: MeshData,
}

impl VesselGeometry {
    /// Computes the geometry for a config without touching any stage.
    #[must_use]
    pub fn from_config(config: &VesselConfig) -> Self {
        Self {
            base: base_primitive(config),
            walls: wall_primitives(config),
            visual: ShellMesh::new(config).execute(),
        }
    }
}

/// Result of [`BuildVessel::execute`].
#[derive(Debug, Clone)]
pub struct VesselBuild {
    /// The vessel root, `None` if it could not be created.
    pub root: Option<PrimId>,
    /// The merged config the vessel was built from.
    pub config: VesselConfig,
    pub geometry: VesselGeometry,
    pub diagnostics: Diagnostics,
}

/// Builds (or rebuilds) a vessel at a stage path.
///
/// The vessel is a root `Xform` holding a cylinder base, a ring of box wall
/// segments (the collision proxy) and one visual shell mesh:
///
/// ```text
/// <path>                 Xform, translate op, optional rigid body + mass
/// <path>/Base            Cylinder collider
/// <path>/Wall            Xform
/// <path>/Wall/Segment_NN Cube colliders
/// <path>/Visual          Mesh
/// ```
///
/// Building is destructive: any prim subtree already at the path is removed
/// first, so repeated builds never accumulate prims or transform ops.
pub struct BuildVessel<'a> {
    path: String,
    position: Vector3,
    overrides: VesselOverrides,
    materials: Option<&'a dyn MaterialSystem>,
}

impl BuildVessel<'static> {
    /// Creates a new `BuildVessel` operation using [`StageMaterials`].
    #[must_use]
    pub fn new(path: impl Into<String>, position: Vector3, overrides: VesselOverrides) -> Self {
        Self {
            path: path.into(),
            position,
            overrides,
            materials: Some(&StageMaterials),
        }
    }
}

impl<'a> BuildVessel<'a> {
    /// Uses `materials` to author and bind the glass material.
    #[must_use]
    pub fn with_materials<'b>(self, materials: &'b dyn MaterialSystem) -> BuildVessel<'b> {
        BuildVessel {
            path: self.path,
            position: self.position,
            overrides: self.overrides,
            materials: Some(materials),
        }
    }

    /// Builds without a material system; the vessel stays unshaded.
    #[must_use]
    pub fn without_materials(mut self) -> Self {
        self.materials = None;
        self
    }

    /// The config this operation builds from: defaults merged with overrides.
    #[must_use]
    pub fn config(&self) -> VesselConfig {
        VesselConfig::default().with_overrides(&self.overrides)
    }

    /// Executes the build.
    ///
    /// Never fails: sub-prims that cannot be authored and a missing or failing
    /// material system are reported in [`VesselBuild::diagnostics`].
    pub fn execute(&self, stage: &mut Stage) -> VesselBuild {
        let config = self.config();
        let geometry = VesselGeometry::from_config(&config);
        let mut diagnostics = Diagnostics::new();

        stage.remove(&self.path);
        let root = match self.author_root(stage, &config) {
            Ok(id) => Some(id),
            Err(e) => {
                diagnostics.push(
                    DiagnosticKind::PrimCreationFailed,
                    format!("could not create vessel root {}: {e}", self.path),
                );
                None
            }
        };

        if root.is_some() {
            if let Err(e) = self.author_colliders(stage, &geometry) {
                diagnostics.push(
                    DiagnosticKind::PrimCreationFailed,
                    format!("could not author vessel colliders: {e}"),
                );
            }
            let visual = path::child(&self.path, "Visual");
            if let Err(e) = stage.define(&visual, PrimKind::Mesh(geometry.visual.clone())) {
                diagnostics.push(
                    DiagnosticKind::PrimCreationFailed,
                    format!("could not author visual mesh {visual}: {e}"),
                );
            }
            self.bind_material(stage, &config, &mut diagnostics);

            tracing::info!(
                path = %self.path,
                radius = config.base_radius,
                wall_height = config.wall_height,
                segments = geometry.walls.len(),
                "built procedural vessel"
            );
        }

        VesselBuild {
            root,
            config,
            geometry,
            diagnostics,
        }
    }

    fn author_root(&self, stage: &mut Stage, config: &VesselConfig) -> Result<PrimId> {
        let root = stage.define(&self.path, PrimKind::Xform)?;
        stage.set_xform_ops(root, vec![XformOp::Translate(self.position)])?;

        let prim = stage.prim_mut(root)?;
        if config.enable_rigid_body {
            prim.rigid_body = Some(RigidBody {
                enabled: true,
                disable_gravity: config.disable_gravity,
            });
            if config.mass > 0.0 {
                prim.mass = Some(config.mass);
            }
        }
        Ok(root)
    }

    fn author_colliders(&self, stage: &mut Stage, geometry: &VesselGeometry) -> Result<()> {
        author_primitive(stage, &self.path, &geometry.base)?;

        let wall = path::child(&self.path, "Wall");
        stage.define(&wall, PrimKind::Xform)?;
        for segment in &geometry.walls {
            author_primitive(stage, &wall, segment)?;
        }
        Ok(())
    }

    fn bind_material(
        &self,
        stage: &mut Stage,
        config: &VesselConfig,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(materials) = self.materials else {
            diagnostics.push(
                DiagnosticKind::MaterialUnavailable,
                format!("no material system; {} left unshaded", self.path),
            );
            return;
        };
        match materials.bind_glass(stage, &self.path, &config.glass) {
            Ok(material) => tracing::debug!(%material, "bound vessel material"),
            Err(e) => diagnostics.push(
                DiagnosticKind::MaterialFailed,
                format!("could not bind glass material to {}: {e}", self.path),
            ),
        }
    }
}

fn author_primitive(
    stage: &mut Stage,
    parent: &str,
    primitive: &CollisionPrimitive,
) -> Result<PrimId> {
    let prim_path = path::child(parent, &primitive.name);
    let id = stage.define(&prim_path, primitive.shape.prim_kind())?;
    stage.set_xform_ops(id, primitive.xform_ops())?;
    stage.prim_mut(id)?.collider = Some(VESSEL_COLLIDER);
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GlassParams;
    use crate::error::MaterialError;
    use approx::assert_relative_eq;

    fn build(stage: &mut Stage, overrides: VesselOverrides) -> VesselBuild {
        BuildVessel::new("/World/Cup", Vector3::new(0.1, 0.2, 0.3), overrides).execute(stage)
    }

    fn wall_children(stage: &Stage) -> usize {
        let wall = stage.prim_by_path("/World/Cup/Wall").unwrap();
        wall.children.len()
    }

    struct BrokenMaterials;

    impl MaterialSystem for BrokenMaterials {
        fn bind_glass(
            &self,
            _stage: &mut Stage,
            _target: &str,
            _glass: &GlassParams,
        ) -> std::result::Result<String, MaterialError> {
            Err(MaterialError::Unavailable("no renderer".into()))
        }
    }

    #[test]
    fn builds_base_wall_and_visual() {
        let mut stage = Stage::new();
        let built = build(&mut stage, VesselOverrides::default());

        assert!(built.diagnostics.is_empty());
        assert_eq!(built.geometry.walls.len(), 32);
        assert_eq!(wall_children(&stage), 32);
        assert_eq!(built.geometry.visual.points.len(), 4 * 64 + 2);
        assert_eq!(built.geometry.visual.face_count(), 8 * 64);

        let base = stage.prim_by_path("/World/Cup/Base").unwrap();
        assert!(matches!(base.kind, PrimKind::Cylinder { .. }));
        assert_eq!(base.collider, Some(VESSEL_COLLIDER));
        let segment = stage.prim_by_path("/World/Cup/Wall/Segment_07").unwrap();
        assert!(matches!(segment.kind, PrimKind::Cube { .. }));
        assert_eq!(segment.collider, Some(VESSEL_COLLIDER));
        assert!(matches!(
            stage.prim_by_path("/World/Cup/Visual").unwrap().kind,
            PrimKind::Mesh(_)
        ));
    }

    #[test]
    fn root_has_single_translate_and_physics_tags() {
        let mut stage = Stage::new();
        let built = build(&mut stage, VesselOverrides::default());
        let root = stage.prim(built.root.unwrap()).unwrap();

        assert_eq!(
            root.xform_ops,
            vec![XformOp::Translate(Vector3::new(0.1, 0.2, 0.3))]
        );
        assert_eq!(
            root.rigid_body,
            Some(RigidBody {
                enabled: true,
                disable_gravity: false
            })
        );
        assert_relative_eq!(root.mass.unwrap(), 0.5);
        assert_eq!(
            root.material_binding.as_deref(),
            Some("/World/CupLooks/CupGlass")
        );
    }

    #[test]
    fn non_positive_mass_leaves_mass_unset() {
        let mut stage = Stage::new();
        let built = build(
            &mut stage,
            VesselOverrides {
                mass: Some(0.0),
                disable_gravity: Some(true),
                ..VesselOverrides::default()
            },
        );
        let root = stage.prim(built.root.unwrap()).unwrap();
        assert!(root.mass.is_none());
        assert!(root.rigid_body.unwrap().disable_gravity);
    }

    #[test]
    fn static_vessel_has_no_rigid_body() {
        let mut stage = Stage::new();
        let built = build(
            &mut stage,
            VesselOverrides {
                enable_rigid_body: Some(false),
                ..VesselOverrides::default()
            },
        );
        let root = stage.prim(built.root.unwrap()).unwrap();
        assert!(root.rigid_body.is_none());
        assert!(root.mass.is_none());
    }

    #[test]
    fn rebuild_replaces_previous_vessel() {
        let mut stage = Stage::new();
        build(&mut stage, VesselOverrides::default());
        let first_count = stage.subtree_paths("/World/Cup").len();
        assert_eq!(first_count, 1 + 1 + 1 + 32 + 1);

        let built = build(
            &mut stage,
            VesselOverrides {
                segment_count: Some(8),
                base_radius: Some(0.1),
                ..VesselOverrides::default()
            },
        );
        assert_eq!(wall_children(&stage), 8);
        assert!(stage.prim_at_path("/World/Cup/Wall/Segment_08").is_none());
        assert_eq!(stage.subtree_paths("/World/Cup").len(), 1 + 1 + 1 + 8 + 1);

        let root = stage.prim(built.root.unwrap()).unwrap();
        assert_eq!(root.xform_ops.len(), 1);
        let base = stage.prim_by_path("/World/Cup/Base").unwrap();
        let PrimKind::Cylinder { radius, .. } = base.kind else {
            panic!("base must be a cylinder");
        };
        assert_relative_eq!(radius, 0.1);
    }

    #[test]
    fn missing_material_system_is_not_fatal() {
        let mut stage = Stage::new();
        let built = BuildVessel::new("/World/Cup", Vector3::zeros(), VesselOverrides::default())
            .without_materials()
            .execute(&mut stage);
        assert!(built.root.is_some());
        assert!(built.diagnostics.contains(DiagnosticKind::MaterialUnavailable));
        assert_eq!(wall_children(&stage), 32);
        assert!(stage.prim_at_path("/World/CupLooks").is_none());
    }

    #[test]
    fn failing_material_system_is_not_fatal() {
        let mut stage = Stage::new();
        let built = BuildVessel::new("/World/Cup", Vector3::zeros(), VesselOverrides::default())
            .with_materials(&BrokenMaterials)
            .execute(&mut stage);
        assert!(built.root.is_some());
        assert!(built.diagnostics.contains(DiagnosticKind::MaterialFailed));
        assert!(stage.prim_at_path("/World/Cup/Visual").is_some());
    }

    #[test]
    fn invalid_path_yields_degenerate_build() {
        let mut stage = Stage::new();
        let built = BuildVessel::new("not/a/path", Vector3::zeros(), VesselOverrides::default())
            .execute(&mut stage);
        assert!(built.root.is_none());
        assert!(built.diagnostics.contains(DiagnosticKind::PrimCreationFailed));
        assert!(stage.is_empty());
        assert_eq!(built.geometry.walls.len(), 32);
    }
}
