//! 16-bit heightmap renderer.

use std::fmt;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{bound_input, check_output_size, finish_row};
use crate::builder::ProgressCallback;
use crate::error::NoiseError;
use crate::noise_map::NoiseMap;
use crate::sink::HeightSink;

/// Value range mapped linearly onto `0..=u16::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightRange {
    /// Values at or below `lower` become 0, at or above `upper` become 65535.
    Fixed { lower: f64, upper: f64 },
    /// Fit the map's own minimum and maximum.
    Exact,
}

impl Default for HeightRange {
    fn default() -> Self {
        HeightRange::Fixed {
            lower: -1.0,
            upper: 1.0,
        }
    }
}

/// Quantizes `value` over `[lower, lower + span]`. NaN maps to 0.
fn quantize(value: f64, lower: f64, span: f64) -> u16 {
    if span <= 0.0 || value.is_nan() {
        return 0;
    }
    let t = ((value - lower) / span).clamp(0.0, 1.0);
    (t * f64::from(u16::MAX)).round() as u16
}

/// Writes a noise map into a [`HeightSink`].
#[derive(Default)]
pub struct HeightmapRenderer<'a> {
    input: Option<&'a NoiseMap>,
    output: Option<&'a mut dyn HeightSink>,
    range: HeightRange,
    progress: Option<ProgressCallback<'a>>,
}

impl fmt::Debug for HeightmapRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightmapRenderer")
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl<'a> HeightmapRenderer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: &'a NoiseMap) {
        self.input = Some(input);
    }

    pub fn set_output(&mut self, output: &'a mut dyn HeightSink) {
        self.output = Some(output);
    }

    pub fn range(&self) -> HeightRange {
        self.range
    }

    pub fn set_range(&mut self, range: HeightRange) {
        self.range = range;
    }

    pub fn set_progress_callback(&mut self, callback: impl FnMut(usize) -> ControlFlow<()> + 'a) {
        self.progress = Some(Box::new(callback));
    }

    pub fn render(&mut self) -> Result<(), NoiseError> {
        let map = bound_input(self.input)?;
        let output = self
            .output
            .as_deref_mut()
            .ok_or(NoiseError::Unbound("output height sink"))?;
        check_output_size(map, output.width(), output.height())?;
        let (lower, upper) = match self.range {
            HeightRange::Fixed { lower, upper } => {
                if !(lower < upper) {
                    return Err(NoiseError::InvalidBounds {
                        what: "height range",
                        lower,
                        upper,
                    });
                }
                (lower, upper)
            }
            HeightRange::Exact => map.min_max().unwrap_or((0.0, 0.0)),
        };

        let (width, height) = (map.width(), map.height());
        debug!(width, height, lower, upper, "rendering heightmap");
        for y in 0..height {
            if let Some(row) = map.row(y) {
                for (x, &value) in row.iter().enumerate() {
                    output.set_height(x, y, quantize(value, lower, upper - lower));
                }
            }
            finish_row(&mut self.progress, "heightmap", y)?;
        }
        debug!(rows = height, "heightmap rendered");
        Ok(())
    }
}
