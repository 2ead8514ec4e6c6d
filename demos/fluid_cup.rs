//! Builds a fluid cup, tilts it and reports how much fluid stays inside.
//!
//! Usage:
//! ```text
//! cargo run --example fluid_cup
//! RUST_LOG=fluidcup=debug cargo run --example fluid_cup
//! ```
//!
//! No solver runs here: a "spill" is staged by writing simulation points
//! directly, the way the external solver would.

use fluidcup::config::OverrideValue;
use fluidcup::math::{transform_point, Vector3};
use fluidcup::stage::{xform, PrimKind, XformOp};
use fluidcup::{Diagnostics, FluidCup, Stage, VesselOverrides};

fn main() {
    // Default: WARN for everything, INFO for fluidcup.
    // Override with RUST_LOG env var (e.g. RUST_LOG=fluidcup=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("fluid_cup=info".parse().unwrap_or_default())
        .add_directive("fluidcup=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut diagnostics = Diagnostics::new();
    let overrides = VesselOverrides::from_entries(
        [
            ("base_radius", OverrideValue::Float(0.05)),
            ("wall_height", OverrideValue::Float(0.1)),
            ("segment_count", OverrideValue::Int(24)),
        ],
        &mut diagnostics,
    );

    let mut stage = Stage::new();
    let mut cup = FluidCup::new("/World/FluidCup").with_cup_overrides(overrides);
    diagnostics.extend(cup.generate(&mut stage));
    tracing::info!(
        particles = cup.particle_count(),
        warnings = diagnostics.len(),
        "fluid cup ready"
    );

    // Tip the cup over by increasing angles; the fluid is left where it was,
    // so everything above the new rim counts as spilled.
    let Ok(base_ops) = stage
        .prim_by_path(&cup.cup_path())
        .map(|p| p.xform_ops.clone())
    else {
        return;
    };
    for step in 0..=6 {
        let angle = f64::from(step) * 15.0;
        let tilt = XformOp::RotateXYZ(Vector3::new(angle, 0.0, 0.0));
        let mut ops = base_ops.clone();
        ops.push(tilt);
        if let Some(id) = stage.prim_at_path(&cup.cup_path()) {
            if stage.set_xform_ops(id, ops).is_err() {
                return;
            }
        }

        let status = cup.status(&stage);
        tracing::info!(
            angle,
            in_cup = status.particles_in_cup,
            initial = status.initial_particles,
            "remaining {:.1}%",
            status.fraction * 100.0
        );
    }

    // Hand the fluid to the "solver": tilt the points with the cup and the
    // fraction returns to full.
    let tilt = xform::compose(&[XformOp::RotateXYZ(Vector3::new(90.0, 0.0, 0.0))]);
    if let Ok(fluid) = stage.prim_by_path_mut(&cup.fluid_path()) {
        let moved = match &fluid.kind {
            PrimKind::PointInstancer(data) => data
                .positions
                .iter()
                .map(|p| transform_point(&tilt, p))
                .collect(),
            _ => Vec::new(),
        };
        if let Some(set) = fluid.particle_set.as_mut() {
            set.simulation_points = Some(moved);
        }
    }
    tracing::info!(
        fraction = cup.remaining_fraction(&stage),
        "after moving the fluid with the cup"
    );
}
