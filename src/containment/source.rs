use crate::math::Point3;
use crate::stage::{PrimData, PrimKind};

/// Where the live positions of a point cloud can be read from.
///
/// The external solver writes positions to one of three attribute shapes;
/// they are tried in [`PointSource::PRIORITY`] order and the first non-empty
/// one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    /// Positions written back by the particle solver, when authored.
    SimulationPoints,
    /// Positions of a point instancer.
    InstancerPositions,
    /// Points of a generic point cloud prim.
    GenericPoints,
}

impl PointSource {
    /// Lookup order for live positions.
    pub const PRIORITY: [Self; 3] = [
        Self::SimulationPoints,
        Self::InstancerPositions,
        Self::GenericPoints,
    ];

    /// Reads this source from a prim; `None` if absent or empty.
    #[must_use]
    pub fn read(self, prim: &PrimData) -> Option<&[Point3]> {
        let points = match self {
            Self::SimulationPoints => prim.particle_set.as_ref()?.simulation_points.as_deref()?,
            Self::InstancerPositions => match &prim.kind {
                PrimKind::PointInstancer(instancer) => instancer.positions.as_slice(),
                _ => return None,
            },
            Self::GenericPoints => match &prim.kind {
                PrimKind::Points(points) => points.as_slice(),
                _ => return None,
            },
        };
        (!points.is_empty()).then_some(points)
    }
}

/// Reads the live positions of a prim from the first source that has any.
#[must_use]
pub fn read_live_points(prim: &PrimData) -> Option<(PointSource, &[Point3])> {
    PointSource::PRIORITY
        .into_iter()
        .find_map(|source| source.read(prim).map(|points| (source, points)))
}
