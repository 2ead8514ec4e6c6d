use crate::config::GlassParams;
use crate::error::MaterialError;
use crate::stage::{path, PrimKind, Stage};

/// A service that authors a glass material and binds it to a prim.
///
/// Binding is best-effort: builders report a failure as a diagnostic and
/// carry on with an unshaded vessel.
pub trait MaterialSystem {
    /// Authors a glass material for the prim at `target` and binds it.
    ///
    /// Returns the path of the bound material.
    ///
    /// # Errors
    ///
    /// Returns an error if the material cannot be authored or bound.
    fn bind_glass(
        &self,
        stage: &mut Stage,
        target: &str,
        glass: &GlassParams,
    ) -> Result<String, MaterialError>;
}

/// Authors glass materials directly on the stage.
///
/// The material lives at `<parent>/<name>Looks/CupGlass`, next to the target
/// rather than beneath it, so it survives a rebuild of the target subtree.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageMaterials;

impl MaterialSystem for StageMaterials {
    fn bind_glass(
        &self,
        stage: &mut Stage,
        target: &str,
        glass: &GlassParams,
    ) -> Result<String, MaterialError> {
        let failed = |e: crate::error::StageError| MaterialError::Failed(e.to_string());

        let target_id = stage
            .prim_at_path(target)
            .ok_or_else(|| MaterialError::Failed(format!("no prim at {target}")))?;
        let looks = path::sibling(target, &format!("{}Looks", path::name(target)));
        stage.define(&looks, PrimKind::Scope).map_err(failed)?;
        let material = path::child(&looks, "CupGlass");
        stage
            .define(&material, PrimKind::Material(*glass))
            .map_err(failed)?;
        stage.prim_mut(target_id).map_err(failed)?.material_binding = Some(material.clone());
        Ok(material)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::VesselConfig;

    #[test]
    fn binds_material_next_to_target() {
        let mut stage = Stage::new();
        stage.define("/World/Cup", PrimKind::Xform).unwrap();
        let glass = VesselConfig::default().glass;

        let material = StageMaterials
            .bind_glass(&mut stage, "/World/Cup", &glass)
            .unwrap();
        assert_eq!(material, "/World/CupLooks/CupGlass");

        let cup = stage.prim_by_path("/World/Cup").unwrap();
        assert_eq!(cup.material_binding.as_deref(), Some("/World/CupLooks/CupGlass"));
        let PrimKind::Material(params) = stage.prim_by_path(&material).unwrap().kind else {
            panic!("expected a material prim");
        };
        assert_eq!(params, glass);
    }

    #[test]
    fn missing_target_fails() {
        let mut stage = Stage::new();
        let glass = VesselConfig::default().glass;
        assert!(StageMaterials
            .bind_glass(&mut stage, "/World/Cup", &glass)
            .is_err());
    }
}
