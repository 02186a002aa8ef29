//! Tangent-space normal map renderer.

use std::fmt;
use std::ops::ControlFlow;

use glam::DVec3;
use tracing::debug;

use super::{bound_input, check_output_size, finish_row, Neighborhood};
use crate::builder::ProgressCallback;
use crate::color::Srgb;
use crate::error::NoiseError;
use crate::noise_map::NoiseMap;
use crate::sink::PixelSink;

/// Writes the surface normal of each cell as a color, mapping each
/// component from [-1, 1] to [0, 1] (x to red, y to green, z to blue).
///
/// The normal uses forward differences towards the right and upper
/// neighbors, scaled by the bump height.
pub struct NormalMapRenderer<'a> {
    input: Option<&'a NoiseMap>,
    output: Option<&'a mut dyn PixelSink>,
    bump_height: f64,
    wrap: bool,
    progress: Option<ProgressCallback<'a>>,
}

impl Default for NormalMapRenderer<'_> {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            bump_height: 1.0,
            wrap: false,
            progress: None,
        }
    }
}

impl fmt::Debug for NormalMapRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalMapRenderer")
            .field("bump_height", &self.bump_height)
            .field("wrap", &self.wrap)
            .finish_non_exhaustive()
    }
}

fn encode(v: DVec3) -> Srgb {
    Srgb::new((v.x + 1.0) / 2.0, (v.y + 1.0) / 2.0, (v.z + 1.0) / 2.0)
}

impl<'a> NormalMapRenderer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: &'a NoiseMap) {
        self.input = Some(input);
    }

    pub fn set_output(&mut self, output: &'a mut dyn PixelSink) {
        self.output = Some(output);
    }

    pub fn bump_height(&self) -> f64 {
        self.bump_height
    }

    pub fn set_bump_height(&mut self, bump_height: f64) {
        self.bump_height = bump_height;
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn set_progress_callback(&mut self, callback: impl FnMut(usize) -> ControlFlow<()> + 'a) {
        self.progress = Some(Box::new(callback));
    }

    pub fn render(&mut self) -> Result<(), NoiseError> {
        let map = bound_input(self.input)?;
        let output = self
            .output
            .as_deref_mut()
            .ok_or(NoiseError::Unbound("output pixel sink"))?;
        check_output_size(map, output.width(), output.height())?;
        if !self.bump_height.is_finite() {
            return Err(NoiseError::InvalidParameter {
                name: "bump_height",
                reason: format!("{} is not finite", self.bump_height),
            });
        }

        let (width, height) = (map.width(), map.height());
        debug!(width, height, bump_height = self.bump_height, "rendering normal map");
        for y in 0..height {
            for x in 0..width {
                let n = Neighborhood::at(map, x, y, self.wrap);
                let normal = DVec3::new(
                    (n.center - n.right) * self.bump_height,
                    (n.center - n.up) * self.bump_height,
                    1.0,
                )
                .normalize();
                output.set_pixel(x, y, encode(normal));
            }
            finish_row(&mut self.progress, "normal map", y)?;
        }
        debug!(rows = height, "normal map rendered");
        Ok(())
    }
}
