use crate::config::{FluidParams, VesselConfig};
use crate::math::{Point3, Vector3};

/// Interior bounds used to place fill points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillSpec {
    /// Nominal inner radius of the cavity.
    pub inner_radius: f64,
    /// Height of the cavity floor in vessel-local space.
    pub floor_height: f64,
    /// Height of the cavity above the floor.
    pub interior_height: f64,
    /// Inset from the wall and floor.
    pub margin: f64,
    /// Highest fill level above the floor.
    pub max_fill_height: f64,
    /// Extra lift of the lowest layer.
    pub spawn_offset: f64,
}

impl FillSpec {
    /// Derives the fill bounds of a vessel.
    #[must_use]
    pub fn new(vessel: &VesselConfig, fluid: &FluidParams) -> Self {
        Self {
            inner_radius: vessel.inner_radius(),
            floor_height: vessel.floor_height(),
            interior_height: vessel.interior_height(),
            margin: fluid.fill_margin,
            max_fill_height: fluid.max_fill_height,
            spawn_offset: fluid.spawn_offset,
        }
    }

    /// Radius of the disk points are placed in.
    #[must_use]
    pub fn effective_radius(&self) -> f64 {
        self.inner_radius - self.margin
    }

    /// Height of the lowest layer.
    #[must_use]
    pub fn min_height(&self) -> f64 {
        self.floor_height + self.margin + self.spawn_offset
    }

    /// Height of the fillable column above the lowest layer, never negative.
    #[must_use]
    pub fn fill_height(&self) -> f64 {
        self.max_fill_height
            .min(self.interior_height - self.margin - self.spawn_offset)
            .max(0.0)
    }

    /// Highest allowed point height.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.min_height() + self.fill_height()
    }

    /// Whether the bounds admit no points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.effective_radius() > 0.0 && self.fill_height() > 0.0)
    }
}

/// Generated point cloud: positions with matching velocities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<Point3>,
    pub velocities: Vec<Vector3>,
}

impl PointCloud {
    /// Number of points; this is the initial fill count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Fills a [`FillSpec`] with a lattice of points at a given spacing.
///
/// The cavity is filled layer by layer with a square lattice clipped to a
/// disk. No closest-packing is attempted.
pub struct GenerateFill {
    spec: FillSpec,
    spacing: f64,
}

impl GenerateFill {
    /// Creates a new `GenerateFill` operation.
    #[must_use]
    pub fn new(spec: FillSpec, spacing: f64) -> Self {
        Self { spec, spacing }
    }

    /// Number of horizontal layers.
    #[must_use]
    pub fn layers(&self) -> u32 {
        steps(self.spec.fill_height(), self.spacing)
    }

    /// Lattice half-extent in x and y, in steps.
    #[must_use]
    pub fn radial_steps(&self) -> u32 {
        steps(self.spec.effective_radius(), self.spacing)
    }

    /// Executes the fill.
    ///
    /// Empty bounds or a non-positive spacing yield an empty cloud rather than
    /// an error. All velocities are zero.
    #[must_use]
    pub fn execute(&self) -> PointCloud {
        let spacing = self.spacing;
        if self.spec.is_empty() || !(spacing.is_finite() && spacing > 0.0) {
            tracing::debug!(spec = ?self.spec, spacing, "fill region is empty");
            return PointCloud::default();
        }

        let radius = self.spec.effective_radius();
        let radius_sq = radius * radius;
        let layers = self.layers();
        let steps = i64::from(self.radial_steps());
        let base_z = self.spec.min_height();

        let mut positions = Vec::new();
        for layer in 0..layers {
            let z = base_z + f64::from(layer) * spacing;
            for ix in -steps..=steps {
                let x = lattice(ix, spacing);
                for iy in -steps..=steps {
                    let y = lattice(iy, spacing);
                    if x * x + y * y <= radius_sq {
                        positions.push(Point3::new(x, y, z));
                    }
                }
            }
        }

        tracing::debug!(layers, radial_steps = steps, points = positions.len(), "generated fill");
        let velocities = vec![Vector3::zeros(); positions.len()];
        PointCloud {
            positions,
            velocities,
        }
    }
}

/// `max(1, floor(extent / spacing))`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn steps(extent: f64, spacing: f64) -> u32 {
    let n = (extent / spacing).floor();
    if n.is_finite() && n >= 1.0 {
        n.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

#[allow(clippy::cast_precision_loss)]
fn lattice(index: i64, spacing: f64) -> f64 {
    index as f64 * spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spec() -> FillSpec {
        FillSpec::new(&VesselConfig::default(), &FluidParams::default())
    }

    #[test]
    fn default_bounds() {
        let s = spec();
        assert_relative_eq!(s.effective_radius(), 0.0495, epsilon = 1e-12);
        assert_relative_eq!(s.min_height(), 0.013, epsilon = 1e-12);
        assert_relative_eq!(s.fill_height(), 0.115, epsilon = 1e-12);
        assert!(!s.is_empty());
    }

    #[test]
    fn default_fill_dimensions() {
        let fill = GenerateFill::new(spec(), 0.006);
        assert_eq!(fill.layers(), 19);
        assert_eq!(fill.radial_steps(), 8);
        let cloud = fill.execute();
        assert!(!cloud.is_empty());
        assert_eq!(cloud.len() % 19, 0);
        assert_eq!(cloud.velocities.len(), cloud.len());
        assert!(cloud.velocities.iter().all(|v| *v == Vector3::zeros()));
    }

    #[test]
    fn points_stay_inside_bounds() {
        let s = spec();
        let cloud = GenerateFill::new(s, 0.006).execute();
        let r_sq = s.effective_radius().powi(2);
        for p in &cloud.positions {
            assert!(p.x * p.x + p.y * p.y <= r_sq);
            assert!(p.z >= s.min_height() - 1e-12);
            assert!(p.z <= s.max_height() + 1e-12);
        }
    }

    #[test]
    fn layer_holds_lattice_points_in_disk() {
        // radius 1, spacing 1: (0,0) and the four axis neighbors
        let s = FillSpec {
            inner_radius: 1.5,
            floor_height: 0.0,
            interior_height: 10.0,
            margin: 0.5,
            max_fill_height: 1.0,
            spawn_offset: 0.0,
        };
        let cloud = GenerateFill::new(s, 1.0).execute();
        assert_eq!(cloud.len(), 5);
        assert!(cloud.positions.iter().all(|p| (p.z - 0.5).abs() < 1e-12));
    }

    #[test]
    fn is_deterministic() {
        let a = GenerateFill::new(spec(), 0.006).execute();
        let b = GenerateFill::new(spec(), 0.006).execute();
        assert_eq!(a, b);
    }

    #[test]
    fn non_positive_radius_gives_empty_fill() {
        let s = FillSpec {
            inner_radius: 0.002,
            ..spec()
        };
        assert!(s.effective_radius() <= 0.0);
        assert!(s.is_empty());
        assert!(GenerateFill::new(s, 0.006).execute().is_empty());
    }

    #[test]
    fn non_positive_height_gives_empty_fill() {
        let s = FillSpec {
            interior_height: 0.002,
            ..spec()
        };
        assert_relative_eq!(s.fill_height(), 0.0);
        assert!(GenerateFill::new(s, 0.006).execute().is_empty());

        let s = FillSpec {
            max_fill_height: -1.0,
            ..spec()
        };
        assert!(GenerateFill::new(s, 0.006).execute().is_empty());
    }

    #[test]
    fn non_positive_spacing_gives_empty_fill() {
        assert!(GenerateFill::new(spec(), 0.0).execute().is_empty());
        assert!(GenerateFill::new(spec(), -0.006).execute().is_empty());
        assert!(GenerateFill::new(spec(), f64::NAN).execute().is_empty());
    }

    #[test]
    fn thin_column_still_gets_one_layer() {
        let s = FillSpec {
            max_fill_height: 0.001,
            ..spec()
        };
        let fill = GenerateFill::new(s, 0.006);
        assert_eq!(fill.layers(), 1);
        assert!(!fill.execute().is_empty());
    }
}
