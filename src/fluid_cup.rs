use crate::config::{FluidParams, ParticleMaterialParams, VesselConfig, VesselOverrides};
use crate::containment::{ContainmentBounds, ContainmentTracker, FluidStatus};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::Result;
use crate::fill::{FillSpec, GenerateFill, PointCloud};
use crate::math::Vector3;
use crate::stage::{path, ParticleSet, PointInstancerData, PrimKind, Stage};
use crate::vessel::BuildVessel;

/// Display color of the particle prototype sphere.
pub const PARTICLE_COLOR: [f32; 3] = [0.3, 0.5, 0.9];

const PROTOTYPE_NAME: &str = "particlePrototype0";

/// Overrides the orchestrator lays under the caller's cup overrides.
fn base_cup_overrides() -> VesselOverrides {
    VesselOverrides {
        enable_rigid_body: Some(true),
        disable_gravity: Some(false),
        mass: Some(0.5),
        glass_color: Some([0.9, 0.95, 1.0]),
        ..VesselOverrides::default()
    }
}

/// Spawns a fluid-filled vessel and tracks how much fluid it retains.
///
/// ```text
/// <root>                             Xform
/// <root>/Cup                         vessel, see [`BuildVessel`]
/// <root>/ParticleSystem              bound to <root>/ParticleMaterial
/// <root>/ParticleMaterial            PBD material
/// <root>/Fluid                       point instancer + particle set
/// <root>/Fluid/particlePrototype0    sphere prototype
/// ```
#[derive(Debug, Clone)]
pub struct FluidCup {
    root_path: String,
    cup_overrides: VesselOverrides,
    fluid: FluidParams,
    material: ParticleMaterialParams,
    tracker: ContainmentTracker,
}

impl FluidCup {
    /// Creates an orchestrator rooted at `root_path`. Nothing is authored
    /// until [`FluidCup::generate`].
    #[must_use]
    pub fn new(root_path: impl Into<String>) -> Self {
        let root_path = root_path.into();
        let fluid = FluidParams::default();
        let cup_overrides = VesselOverrides::default();
        let tracker = ContainmentTracker::new(
            path::child(&root_path, "Cup"),
            path::child(&root_path, "Fluid"),
            bounds_for(&cup_overrides, &fluid),
            0,
        );
        Self {
            root_path,
            cup_overrides,
            fluid,
            material: ParticleMaterialParams::default(),
            tracker,
        }
    }

    /// Overrides laid over the orchestrator's base cup overrides.
    #[must_use]
    pub fn with_cup_overrides(mut self, overrides: VesselOverrides) -> Self {
        self.cup_overrides = overrides;
        self.refresh_tracker();
        self
    }

    #[must_use]
    pub fn with_fluid_params(mut self, fluid: FluidParams) -> Self {
        self.fluid = fluid;
        self.refresh_tracker();
        self
    }

    #[must_use]
    pub fn with_particle_material(mut self, material: ParticleMaterialParams) -> Self {
        self.material = material;
        self
    }

    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    #[must_use]
    pub fn cup_path(&self) -> String {
        path::child(&self.root_path, "Cup")
    }

    #[must_use]
    pub fn particle_system_path(&self) -> String {
        path::child(&self.root_path, "ParticleSystem")
    }

    #[must_use]
    pub fn particle_material_path(&self) -> String {
        path::child(&self.root_path, "ParticleMaterial")
    }

    #[must_use]
    pub fn fluid_path(&self) -> String {
        path::child(&self.root_path, "Fluid")
    }

    /// The merged cup overrides: base overrides, then the caller's.
    #[must_use]
    pub fn merged_cup_overrides(&self) -> VesselOverrides {
        base_cup_overrides().merge(&self.cup_overrides)
    }

    /// The vessel config the cup is built from.
    #[must_use]
    pub fn vessel_config(&self) -> VesselConfig {
        VesselConfig::default().with_overrides(&self.merged_cup_overrides())
    }

    /// Number of points in the initial fill.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.tracker.initial_count()
    }

    #[must_use]
    pub fn tracker(&self) -> &ContainmentTracker {
        &self.tracker
    }

    /// Authors (or re-authors) the whole hierarchy and records the fill count.
    ///
    /// Never fails; problems are returned as diagnostics. A failure to
    /// create the root prim aborts the remaining steps.
    pub fn generate(&mut self, stage: &mut Stage) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        tracing::info!(root = %self.root_path, "generating fluid cup");

        if let Err(e) = stage.define(&self.root_path, PrimKind::Xform) {
            diagnostics.push(
                DiagnosticKind::PrimCreationFailed,
                format!("could not create fluid cup root {}: {e}", self.root_path),
            );
            self.tracker = self.tracker_with_count(0);
            return diagnostics;
        }

        let build =
            BuildVessel::new(self.cup_path(), Vector3::zeros(), self.merged_cup_overrides())
                .execute(stage);
        diagnostics.extend(build.diagnostics);

        if let Err(e) = self.author_particle_system(stage) {
            diagnostics.push(
                DiagnosticKind::PrimCreationFailed,
                format!("could not author particle system: {e}"),
            );
        }

        let cloud = GenerateFill::new(
            FillSpec::new(&build.config, &self.fluid),
            self.fluid.particle_spacing,
        )
        .execute();
        self.tracker = self.tracker_with_count(cloud.len());

        stage.remove(&self.fluid_path());
        if cloud.is_empty() {
            diagnostics.push(
                DiagnosticKind::DegenerateFill,
                format!("no fluid positions fit inside {}", self.cup_path()),
            );
            return diagnostics;
        }
        if let Err(e) = self.author_fluid(stage, cloud) {
            diagnostics.push(
                DiagnosticKind::PrimCreationFailed,
                format!("could not author fluid at {}: {e}", self.fluid_path()),
            );
        }

        tracing::info!(
            root = %self.root_path,
            particles = self.particle_count(),
            "generated fluid cup"
        );
        diagnostics
    }

    /// Adopts the current live point count as the initial fill count.
    ///
    /// For fluids authored elsewhere, e.g. a loaded asset using the same
    /// layout. Returns the captured count.
    pub fn capture_initial_state(&mut self, stage: &Stage) -> usize {
        let count = self.tracker.capture_initial_state(stage);
        if count == 0 {
            tracing::warn!(path = %self.fluid_path(), "no fluid particles detected");
        }
        count
    }

    /// How much of the fill is currently inside the cup.
    #[must_use]
    pub fn status(&self, stage: &Stage) -> FluidStatus {
        self.tracker.status(stage)
    }

    #[must_use]
    pub fn remaining_fraction(&self, stage: &Stage) -> f64 {
        self.tracker.remaining_fraction(stage)
    }

    fn author_particle_system(&self, stage: &mut Stage) -> Result<()> {
        let system = self.particle_system_path();
        let material = self.particle_material_path();
        let system_id = stage.define(
            &system,
            PrimKind::ParticleSystem(self.fluid.particle_system()),
        )?;
        stage.define(&material, PrimKind::ParticleMaterial(self.material))?;
        stage.prim_mut(system_id)?.material_binding = Some(material);
        Ok(())
    }

    fn author_fluid(&self, stage: &mut Stage, cloud: PointCloud) -> Result<()> {
        let fluid = self.fluid_path();
        let id = stage.define(
            &fluid,
            PrimKind::PointInstancer(PointInstancerData {
                positions: cloud.positions,
                velocities: cloud.velocities,
                ..PointInstancerData::default()
            }),
        )?;
        stage.prim_mut(id)?.particle_set = Some(ParticleSet {
            system: self.particle_system_path(),
            self_collision: true,
            fluid: true,
            group: 0,
            particle_mass: self.fluid.particle_mass,
            simulation_points: None,
        });

        let prototype = path::child(&fluid, PROTOTYPE_NAME);
        stage.define(
            &prototype,
            PrimKind::Sphere {
                radius: self.fluid.particle_system().fluid_rest_offset,
                display_color: Some(PARTICLE_COLOR),
            },
        )?;

        if let PrimKind::PointInstancer(instancer) = &mut stage.prim_mut(id)?.kind {
            if !instancer.prototypes.contains(&prototype) {
                instancer.prototypes.push(prototype);
            }
            if instancer.proto_indices.len() != instancer.positions.len() {
                instancer.proto_indices = vec![0; instancer.positions.len()];
            }
        }
        Ok(())
    }

    fn refresh_tracker(&mut self) {
        let count = self.tracker.initial_count();
        self.tracker = self.tracker_with_count(count);
    }

    fn tracker_with_count(&self, initial_count: usize) -> ContainmentTracker {
        ContainmentTracker::new(
            self.cup_path(),
            self.fluid_path(),
            bounds_for(&self.merged_cup_overrides(), &self.fluid),
            initial_count,
        )
    }
}

/// Containment bounds of a cup built from `overrides` over the base overrides.
fn bounds_for(overrides: &VesselOverrides, fluid: &FluidParams) -> ContainmentBounds {
    let config = VesselConfig::default().with_overrides(&base_cup_overrides().merge(overrides));
    ContainmentBounds::new(&config, fluid)
}
