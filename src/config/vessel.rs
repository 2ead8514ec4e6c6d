use serde::Deserialize;

/// Appearance parameters for the translucent vessel material.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GlassParams {
    /// Tint color, linear RGB in `[0, 1]`.
    pub color: [f32; 3],
    /// Index of refraction.
    pub ior: f64,
    /// Absorption depth of the surface.
    pub depth: f64,
    pub thin_walled: bool,
}

/// Immutable description of one vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselConfig {
    pub base_radius: f64,
    /// Height (thickness) of the floor disk.
    pub base_height: f64,
    pub wall_height: f64,
    pub wall_thickness: f64,
    /// Number of box segments in the collision wall ring, clamped to
    /// `3..=MAX_WALL_SEGMENTS` when built.
    pub segment_count: u32,
    /// Explicit segment width; `<= 0` derives the chord length.
    pub segment_width: f64,
    /// Angular resolution of the visual mesh, clamped to
    /// `MIN_VISUAL_SEGMENTS..=MAX_VISUAL_SEGMENTS` when built.
    pub visual_segments: u32,
    /// How far the wall ring reaches down into the base.
    pub wall_overlap_height: Option<f64>,
    /// Fill spacing; used as the overlap when no explicit overlap is given.
    pub particle_spacing: Option<f64>,
    pub enable_rigid_body: bool,
    /// Explicit mass; `<= 0` leaves the mass to the physics engine.
    pub mass: f64,
    pub disable_gravity: bool,
    pub glass: GlassParams,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            base_radius: 0.06,
            base_height: 0.01,
            wall_height: 0.12,
            wall_thickness: 0.008,
            segment_count: 32,
            segment_width: 0.0,
            visual_segments: 64,
            wall_overlap_height: None,
            particle_spacing: None,
            enable_rigid_body: true,
            mass: 0.5,
            disable_gravity: false,
            glass: GlassParams {
                color: [0.88, 0.95, 1.0],
                ior: 1.45,
                depth: 0.01,
                thin_walled: true,
            },
        }
    }
}

impl VesselConfig {
    /// Returns a copy of this config with `overrides` applied on top.
    #[must_use]
    pub fn with_overrides(&self, overrides: &VesselOverrides) -> Self {
        let mut config = self.clone();
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = overrides.$field {
                    config.$field = value;
                })*
            };
        }
        apply!(
            base_radius,
            base_height,
            wall_height,
            wall_thickness,
            segment_count,
            segment_width,
            visual_segments,
            enable_rigid_body,
            mass,
            disable_gravity
        );
        if overrides.wall_overlap_height.is_some() {
            config.wall_overlap_height = overrides.wall_overlap_height;
        }
        if overrides.particle_spacing.is_some() {
            config.particle_spacing = overrides.particle_spacing;
        }
        if let Some(color) = overrides.glass_color {
            config.glass.color = color;
        }
        if let Some(ior) = overrides.glass_ior {
            config.glass.ior = ior;
        }
        if let Some(depth) = overrides.glass_depth {
            config.glass.depth = depth;
        }
        if let Some(thin) = overrides.glass_thin_walled {
            config.glass.thin_walled = thin;
        }
        config
    }

    /// Nominal inner radius of the cavity.
    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.base_radius - self.wall_thickness
    }

    /// Height of the cavity floor above the vessel origin.
    #[must_use]
    pub fn floor_height(&self) -> f64 {
        self.base_height
    }

    /// Height of the cavity above the floor.
    #[must_use]
    pub fn interior_height(&self) -> f64 {
        self.wall_height
    }

    /// Vertical overlap between the wall ring and the base.
    ///
    /// Uses `wall_overlap_height`, else `particle_spacing`, else zero,
    /// clamped to `[0, base_height]`.
    #[must_use]
    pub fn wall_overlap(&self) -> f64 {
        let overlap = self
            .wall_overlap_height
            .or(self.particle_spacing)
            .unwrap_or(0.0);
        overlap.min(self.base_height).max(0.0)
    }
}

/// Partial update for a [`VesselConfig`]; every `Some` field wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VesselOverrides {
    pub base_radius: Option<f64>,
    pub base_height: Option<f64>,
    pub wall_height: Option<f64>,
    pub wall_thickness: Option<f64>,
    pub segment_count: Option<u32>,
    pub segment_width: Option<f64>,
    pub visual_segments: Option<u32>,
    pub wall_overlap_height: Option<f64>,
    pub particle_spacing: Option<f64>,
    pub enable_rigid_body: Option<bool>,
    pub mass: Option<f64>,
    pub disable_gravity: Option<bool>,
    pub glass_color: Option<[f32; 3]>,
    pub glass_ior: Option<f64>,
    pub glass_depth: Option<f64>,
    pub glass_thin_walled: Option<bool>,
}

impl VesselOverrides {
    /// Layers `other` over `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        macro_rules! pick {
            ($($field:ident),*) => {
                Self { $($field: other.$field.or(self.$field)),* }
            };
        }
        pick!(
            base_radius,
            base_height,
            wall_height,
            wall_thickness,
            segment_count,
            segment_width,
            visual_segments,
            wall_overlap_height,
            particle_spacing,
            enable_rigid_body,
            mass,
            disable_gravity,
            glass_color,
            glass_ior,
            glass_depth,
            glass_thin_walled
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = VesselOverrides {
            base_radius: Some(0.1),
            segment_count: Some(12),
            glass_color: Some([1.0, 0.0, 0.0]),
            ..VesselOverrides::default()
        };
        let config = VesselConfig::default().with_overrides(&overrides);
        assert_relative_eq!(config.base_radius, 0.1);
        assert_eq!(config.segment_count, 12);
        assert_eq!(config.glass.color, [1.0, 0.0, 0.0]);
        assert_relative_eq!(config.wall_height, 0.12);
        assert_relative_eq!(config.glass.ior, 1.45);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let config = VesselConfig::default().with_overrides(&VesselOverrides::default());
        assert_eq!(config, VesselConfig::default());
    }

    #[test]
    fn merge_prefers_later_layer() {
        let base = VesselOverrides {
            mass: Some(0.5),
            enable_rigid_body: Some(true),
            ..VesselOverrides::default()
        };
        let caller = VesselOverrides {
            mass: Some(2.0),
            ..VesselOverrides::default()
        };
        let merged = base.merge(&caller);
        assert_eq!(merged.mass, Some(2.0));
        assert_eq!(merged.enable_rigid_body, Some(true));
    }

    #[test]
    fn overlap_falls_back_to_spacing_then_zero() {
        let mut config = VesselConfig::default();
        assert_relative_eq!(config.wall_overlap(), 0.0);

        config.particle_spacing = Some(0.006);
        assert_relative_eq!(config.wall_overlap(), 0.006);

        config.wall_overlap_height = Some(0.002);
        assert_relative_eq!(config.wall_overlap(), 0.002);

        // clamped to the floor thickness
        config.wall_overlap_height = Some(0.5);
        assert_relative_eq!(config.wall_overlap(), config.base_height);

        config.wall_overlap_height = Some(-1.0);
        assert_relative_eq!(config.wall_overlap(), 0.0);
    }

    #[test]
    fn overrides_deserialize_from_ron() {
        let overrides: VesselOverrides =
            ron::from_str("(base_radius: Some(0.08), glass_thin_walled: Some(false))").unwrap();
        assert_eq!(overrides.base_radius, Some(0.08));
        assert_eq!(overrides.glass_thin_walled, Some(false));
        assert_eq!(overrides.mass, None);
    }

    #[test]
    fn unknown_field_rejected_by_deserializer() {
        let result: Result<VesselOverrides, _> = ron::from_str("(cup_handle: Some(1.0))");
        assert!(result.is_err());
    }
}
