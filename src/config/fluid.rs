use serde::Deserialize;

/// Fill and containment parameters of the fluid charge.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FluidParams {
    /// Highest fill level above the cavity floor.
    pub max_fill_height: f64,
    /// Inset from the walls and floor used when spawning points.
    pub fill_margin: f64,
    /// Extra lift of the lowest layer above the floor.
    pub spawn_offset: f64,
    /// Slack added to the cavity bounds when classifying points.
    pub containment_margin: f64,
    /// Lattice spacing between neighboring points.
    pub particle_spacing: f64,
    pub particle_mass: f64,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            max_fill_height: 0.115,
            fill_margin: 0.0025,
            spawn_offset: 0.0005,
            containment_margin: 0.0025,
            particle_spacing: 0.006,
            particle_mass: 0.0005,
        }
    }
}

impl FluidParams {
    /// Particle system offsets derived from the particle spacing.
    #[must_use]
    pub fn particle_system(&self) -> ParticleSystemParams {
        ParticleSystemParams::from_spacing(self.particle_spacing)
    }
}

/// Particle system settings authored for the external solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSystemParams {
    pub contact_offset: f64,
    pub rest_offset: f64,
    pub particle_contact_offset: f64,
    pub solid_rest_offset: f64,
    /// Rest offset between fluid particles; also the rendered particle radius.
    pub fluid_rest_offset: f64,
    pub solver_position_iterations: u32,
    pub max_neighborhood: u32,
    pub smoothing_strength: f64,
    pub anisotropy_scale: f64,
}

impl ParticleSystemParams {
    /// Derives the offsets from the lattice spacing.
    #[must_use]
    pub fn from_spacing(spacing: f64) -> Self {
        let rest_offset = spacing * 0.9;
        let solid_rest_offset = rest_offset;
        let fluid_rest_offset = rest_offset * 0.6;
        Self {
            contact_offset: rest_offset + 0.002,
            rest_offset,
            particle_contact_offset: (solid_rest_offset + 0.002).max(fluid_rest_offset / 0.6),
            solid_rest_offset,
            fluid_rest_offset,
            solver_position_iterations: 4,
            max_neighborhood: 96,
            smoothing_strength: 1.0,
            anisotropy_scale: 1.0,
        }
    }
}

/// Position-based-dynamics material of the fluid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleMaterialParams {
    pub cohesion: f64,
    pub viscosity: f64,
    pub surface_tension: f64,
    pub friction: f64,
    pub damping: f64,
}

impl Default for ParticleMaterialParams {
    fn default() -> Self {
        Self {
            cohesion: 0.005,
            viscosity: 0.01,
            surface_tension: 0.001,
            friction: 0.1,
            damping: 0.05,
        }
    }
}
