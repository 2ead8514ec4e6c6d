use thiserror::Error;

/// Top-level error type for the fluid cup crate.
#[derive(Debug, Error)]
pub enum FluidCupError {
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Errors related to scene-graph access.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid prim path: {0:?}")]
    InvalidPath(String),

    #[error("prim not found: {0}")]
    PrimNotFound(String),
}

/// Errors raised by a material system while authoring or binding a material.
///
/// Material failures never abort a build; they are reported as diagnostics.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("material system unavailable: {0}")]
    Unavailable(String),

    #[error("material authoring failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`FluidCupError`].
pub type Result<T> = std::result::Result<T, FluidCupError>;
