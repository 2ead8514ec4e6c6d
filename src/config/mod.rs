mod entries;
mod fluid;
mod vessel;

pub use entries::OverrideValue;
pub use fluid::{FluidParams, ParticleMaterialParams, ParticleSystemParams};
pub use vessel::{GlassParams, VesselConfig, VesselOverrides};
