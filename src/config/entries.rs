use crate::diagnostics::{DiagnosticKind, Diagnostics};

use super::VesselOverrides;

/// A loosely typed value from a flat key/value override map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Color([f32; 3]),
}

impl OverrideValue {
    #[allow(clippy::cast_precision_loss)]
    fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn as_u32(self) -> Option<u32> {
        match self {
            Self::Int(v) => u32::try_from(v.max(0)).ok(),
            Self::Float(v) if v.is_finite() => Some(v.max(0.0).min(f64::from(u32::MAX)) as u32),
            _ => None,
        }
    }

    fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn as_color(self) -> Option<[f32; 3]> {
        match self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<f64> for OverrideValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for OverrideValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for OverrideValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<[f32; 3]> for OverrideValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Color(v)
    }
}

impl VesselOverrides {
    /// Builds overrides from a flat key/value map.
    ///
    /// Documented keys are the field names of [`VesselOverrides`]. Unknown keys
    /// and values of the wrong type are skipped and reported in `diagnostics`.
    pub fn from_entries<'a, I>(entries: I, diagnostics: &mut Diagnostics) -> Self
    where
        I: IntoIterator<Item = (&'a str, OverrideValue)>,
    {
        let mut overrides = Self::default();
        for (key, value) in entries {
            let accepted = match key {
                "base_radius" => set(&mut overrides.base_radius, value.as_f64()),
                "base_height" => set(&mut overrides.base_height, value.as_f64()),
                "wall_height" => set(&mut overrides.wall_height, value.as_f64()),
                "wall_thickness" => set(&mut overrides.wall_thickness, value.as_f64()),
                "segment_count" => set(&mut overrides.segment_count, value.as_u32()),
                "segment_width" => set(&mut overrides.segment_width, value.as_f64()),
                "visual_segments" => set(&mut overrides.visual_segments, value.as_u32()),
                "wall_overlap_height" => set(&mut overrides.wall_overlap_height, value.as_f64()),
                "particle_spacing" => set(&mut overrides.particle_spacing, value.as_f64()),
                "enable_rigid_body" => set(&mut overrides.enable_rigid_body, value.as_bool()),
                "mass" => set(&mut overrides.mass, value.as_f64()),
                "disable_gravity" => set(&mut overrides.disable_gravity, value.as_bool()),
                "glass_color" => set(&mut overrides.glass_color, value.as_color()),
                "glass_ior" => set(&mut overrides.glass_ior, value.as_f64()),
                "glass_depth" => set(&mut overrides.glass_depth, value.as_f64()),
                "glass_thin_walled" => set(&mut overrides.glass_thin_walled, value.as_bool()),
                _ => {
                    diagnostics.push(
                        DiagnosticKind::UnknownOverride,
                        format!("ignoring unknown vessel override {key:?}"),
                    );
                    continue;
                }
            };
            if !accepted {
                diagnostics.push(
                    DiagnosticKind::InvalidOverride,
                    format!("ignoring vessel override {key:?}: unexpected value {value:?}"),
                );
            }
        }
        overrides
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}
