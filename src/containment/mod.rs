mod source;

pub use source::{read_live_points, PointSource};

use crate::config::{FluidParams, VesselConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::math::{transform_point, Matrix4, Point3};
use crate::stage::Stage;

/// Cavity bounds used to classify points, in vessel-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentBounds {
    pub inner_radius: f64,
    pub floor_height: f64,
    pub interior_height: f64,
    /// Slack added around the cavity; independent of the fill margin.
    pub margin: f64,
}

impl ContainmentBounds {
    /// Derives the bounds of a vessel.
    #[must_use]
    pub fn new(vessel: &VesselConfig, fluid: &FluidParams) -> Self {
        Self {
            inner_radius: vessel.inner_radius(),
            floor_height: vessel.floor_height(),
            interior_height: vessel.interior_height(),
            margin: fluid.containment_margin,
        }
    }

    /// Lowest contained height.
    #[must_use]
    pub fn min_height(&self) -> f64 {
        self.floor_height - self.margin
    }

    /// Highest contained height.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.floor_height + self.interior_height + self.margin
    }

    /// Whether a vessel-local point lies inside the cavity.
    ///
    /// Both the radial and the height bounds are inclusive. A cavity whose
    /// radius is consumed by the margin contains nothing.
    #[must_use]
    pub fn contains(&self, local: &Point3) -> bool {
        let radius = self.inner_radius - self.margin;
        if radius < 0.0 {
            return false;
        }
        let radial_sq = local.x * local.x + local.y * local.y;
        radial_sq <= radius * radius
            && self.min_height() <= local.z
            && local.z <= self.max_height()
    }

    /// Counts the points inside the cavity.
    ///
    /// With `world_to_local` the points are mapped into vessel space first;
    /// without it they are taken to be in vessel space already.
    #[must_use]
    pub fn count_inside(&self, points: &[Point3], world_to_local: Option<&Matrix4>) -> usize {
        match world_to_local {
            Some(m) => points
                .iter()
                .filter(|p| self.contains(&transform_point(m, p)))
                .count(),
            None => points.iter().filter(|p| self.contains(p)).count(),
        }
    }
}

/// Snapshot of how much fluid is inside the vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidStatus {
    pub particles_in_cup: usize,
    /// Fill count recorded when the fluid was generated or captured.
    pub initial_particles: usize,
    /// `particles_in_cup / initial_particles`, zero when nothing was filled.
    pub fraction: f64,
    /// Set when the measurement fell back to a reduced mode: no vessel
    /// transform (world space was used) or no readable live points.
    pub degraded: bool,
}

impl FluidStatus {
    fn empty(initial_particles: usize, degraded: bool) -> Self {
        Self {
            particles_in_cup: 0,
            initial_particles,
            fraction: 0.0,
            degraded,
        }
    }
}

/// Tracks the retention of a fill inside a vessel.
///
/// Every query is re-derived from the current stage: live positions are read
/// from the fluid prim, mapped into the vessel's local frame and classified
/// against the cavity bounds.
#[derive(Debug, Clone)]
pub struct ContainmentTracker {
    vessel_path: String,
    points_path: String,
    bounds: ContainmentBounds,
    initial_count: usize,
}

impl ContainmentTracker {
    /// Creates a tracker for the vessel at `vessel_path` and the point cloud
    /// at `points_path`, measured against `initial_count` filled points.
    #[must_use]
    pub fn new(
        vessel_path: impl Into<String>,
        points_path: impl Into<String>,
        bounds: ContainmentBounds,
        initial_count: usize,
    ) -> Self {
        Self {
            vessel_path: vessel_path.into(),
            points_path: points_path.into(),
            bounds,
            initial_count,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> &ContainmentBounds {
        &self.bounds
    }

    /// The fill count fractions are measured against.
    #[must_use]
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Adopts the current live point count as the initial fill count.
    ///
    /// Used when the fluid was authored outside this crate, e.g. loaded from
    /// an asset. Returns the captured count (zero if no points are readable).
    pub fn capture_initial_state(&mut self, stage: &Stage) -> usize {
        self.initial_count = self.live_points(stage).map_or(0, <[Point3]>::len);
        tracing::info!(
            path = %self.points_path,
            count = self.initial_count,
            "captured initial fluid state"
        );
        self.initial_count
    }

    /// Measures the current retention.
    ///
    /// Degraded modes are logged and flagged on the status.
    #[must_use]
    pub fn status(&self, stage: &Stage) -> FluidStatus {
        self.measure(stage, &mut Diagnostics::new())
    }

    /// Like [`ContainmentTracker::status`], also returning the diagnostics
    /// that explain a degraded measurement.
    #[must_use]
    pub fn status_with_diagnostics(&self, stage: &Stage) -> (FluidStatus, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let status = self.measure(stage, &mut diagnostics);
        (status, diagnostics)
    }

    fn measure(&self, stage: &Stage, diagnostics: &mut Diagnostics) -> FluidStatus {
        let Some(points) = self.live_points(stage) else {
            let degraded = self.initial_count > 0;
            if degraded {
                diagnostics.push(
                    DiagnosticKind::PointsUnavailable,
                    format!("no live fluid points readable at {}", self.points_path),
                );
            }
            return FluidStatus::empty(self.initial_count, degraded);
        };
        if self.initial_count == 0 {
            return FluidStatus::empty(0, false);
        }

        let world_to_local = self.world_to_vessel(stage);
        if world_to_local.is_none() {
            diagnostics.push(
                DiagnosticKind::TransformUnavailable,
                format!(
                    "transform of {} unavailable; measuring in world space",
                    self.vessel_path
                ),
            );
        }
        let inside = self.bounds.count_inside(points, world_to_local.as_ref());

        #[allow(clippy::cast_precision_loss)]
        let fraction = inside as f64 / self.initial_count as f64;
        tracing::debug!(inside, initial = self.initial_count, fraction, "fluid status");
        FluidStatus {
            particles_in_cup: inside,
            initial_particles: self.initial_count,
            fraction,
            degraded: world_to_local.is_none(),
        }
    }

    /// Convenience wrapper returning only the fraction.
    #[must_use]
    pub fn remaining_fraction(&self, stage: &Stage) -> f64 {
        self.status(stage).fraction
    }

    fn live_points<'s>(&self, stage: &'s Stage) -> Option<&'s [Point3]> {
        let prim = stage.prim_by_path(&self.points_path).ok()?;
        read_live_points(prim).map(|(_, points)| points)
    }

    /// Inverse of the vessel's accumulated transform, if it can be computed.
    fn world_to_vessel(&self, stage: &Stage) -> Option<Matrix4> {
        let id = stage.prim_at_path(&self.vessel_path)?;
        stage.local_to_world(id).ok()?.try_inverse()
    }
}
