pub mod config;
pub mod containment;
pub mod diagnostics;
pub mod error;
pub mod fill;
pub mod fluid_cup;
pub mod math;
pub mod stage;
pub mod vessel;

pub use config::{FluidParams, VesselConfig, VesselOverrides};
pub use containment::{ContainmentTracker, FluidStatus};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{FluidCupError, Result};
pub use fluid_cup::FluidCup;
pub use stage::Stage;
