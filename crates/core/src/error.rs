//! Error types for the noisegraph core.

use thiserror::Error;

/// Errors produced while configuring modules, building noise maps or rendering.
///
/// Sampling itself never fails; every variant here is raised either when a
/// module is constructed or at the start of a `build()`/`render()` call.
#[derive(Debug, Error)]
pub enum NoiseError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two surfaces had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A lower bound was not strictly below its upper bound, or lay outside
    /// the range its projection accepts.
    #[error("invalid {what} bounds: lower {lower} must be below upper {upper}")]
    InvalidBounds {
        what: &'static str,
        lower: f64,
        upper: f64,
    },

    /// A required input (source module, noise map, sink, gradient) was not set.
    #[error("{0} is not bound")]
    Unbound(&'static str),

    /// A projection was asked to drive a module lacking the dimension it samples in.
    #[error("{projection} projection cannot sample a {dims}D module")]
    UnsupportedDimension {
        projection: &'static str,
        dims: usize,
    },

    /// Curve or terrace control points were too few or not strictly increasing.
    #[error("invalid control points: {0}")]
    InvalidControlPoints(String),

    /// A numeric parameter was outside its accepted range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A quality name could not be parsed.
    #[error("invalid quality: {0}")]
    InvalidQuality(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A gradient ramp could not be constructed.
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),

    /// A named primitive, filter, projection or gradient was not recognized.
    #[error("unknown {kind}: {name}")]
    Unknown { kind: &'static str, name: String },

    /// The progress callback asked to stop after the given row.
    #[error("cancelled after row {row}")]
    Cancelled { row: usize },

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
