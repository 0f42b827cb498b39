use thiserror::Error;

/// Failures surfaced by the storm core.
///
/// Only `OutOfBounds` indicates a caller bug. `NoPathFound` is routine and the
/// scheduler swallows it; `InvalidMaterial` is normally recovered by falling back
/// to air.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StormError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("no conductive path reaches ground")]
    NoPathFound,
    #[error("unknown material '{0}'")]
    InvalidMaterial(String),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}
