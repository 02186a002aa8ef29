//! Gradient-colored image renderer with optional directional lighting.

use std::fmt;
use std::ops::ControlFlow;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{bound_input, check_output_size, finish_row, Neighborhood};
use crate::builder::ProgressCallback;
use crate::error::NoiseError;
use crate::gradient::GradientColor;
use crate::noise_map::NoiseMap;
use crate::sink::PixelSink;

pub const DEFAULT_LIGHT_AZIMUTH: f64 = 45.0;
pub const DEFAULT_LIGHT_ELEVATION: f64 = 45.0;

/// Directional light applied over the gradient colors.
///
/// The surface normal at each cell comes from the differences between its
/// left/right and down/up neighbors, scaled by `bump_height`. A flat cell
/// keeps its gradient color times `brightness`; `contrast` exaggerates the
/// deviation of sloped cells from that flat level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    pub enabled: bool,
    /// Degrees counter-clockwise from +x.
    pub azimuth: f64,
    /// Degrees above the map plane, in (0, 90].
    pub elevation: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub bump_height: f64,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            enabled: false,
            azimuth: DEFAULT_LIGHT_AZIMUTH,
            elevation: DEFAULT_LIGHT_ELEVATION,
            brightness: 1.0,
            contrast: 1.0,
            bump_height: 1.0,
        }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> NoiseError {
    NoiseError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

impl LightParams {
    pub fn validate(&self) -> Result<(), NoiseError> {
        for (name, v) in [
            ("azimuth", self.azimuth),
            ("elevation", self.elevation),
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("bump_height", self.bump_height),
        ] {
            if !v.is_finite() {
                return Err(invalid(name, format!("{v} is not finite")));
            }
        }
        if !(self.elevation > 0.0 && self.elevation <= 90.0) {
            return Err(invalid("elevation", format!("{} is outside (0, 90]", self.elevation)));
        }
        if self.brightness < 0.0 {
            return Err(invalid("brightness", "must not be negative"));
        }
        if self.contrast < 0.0 {
            return Err(invalid("contrast", "must not be negative"));
        }
        Ok(())
    }

    /// Unit vector pointing towards the light.
    fn direction(&self) -> DVec3 {
        let (az, el) = (self.azimuth.to_radians(), self.elevation.to_radians());
        DVec3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
    }

    /// Multiplier for the cell at `n`.
    fn intensity(&self, light: DVec3, n: Neighborhood) -> f64 {
        let normal = DVec3::new(
            (n.left - n.right) * self.bump_height,
            (n.down - n.up) * self.bump_height,
            1.0,
        )
        .normalize();
        let diffuse = normal.dot(light).max(0.0);
        let flat = light.z;
        let lit = flat + (diffuse - flat) * self.contrast;
        (lit / flat).max(0.0) * self.brightness
    }
}

/// Renders a noise map through a [`GradientColor`] into a [`PixelSink`].
pub struct ImageRenderer<'a> {
    input: Option<&'a NoiseMap>,
    output: Option<&'a mut dyn PixelSink>,
    gradient: GradientColor,
    light: LightParams,
    wrap: bool,
    progress: Option<ProgressCallback<'a>>,
}

impl Default for ImageRenderer<'_> {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            gradient: GradientColor::grayscale(),
            light: LightParams::default(),
            wrap: false,
            progress: None,
        }
    }
}

impl fmt::Debug for ImageRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRenderer")
            .field("input", &self.input.map(|m| (m.width(), m.height())))
            .field("gradient", &self.gradient)
            .field("light", &self.light)
            .field("wrap", &self.wrap)
            .finish_non_exhaustive()
    }
}

impl<'a> ImageRenderer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: &'a NoiseMap) {
        self.input = Some(input);
    }

    pub fn set_output(&mut self, output: &'a mut dyn PixelSink) {
        self.output = Some(output);
    }

    pub fn set_gradient(&mut self, gradient: GradientColor) {
        self.gradient = gradient;
    }

    pub fn gradient(&self) -> &GradientColor {
        &self.gradient
    }

    /// Sets the light strength parameters and toggles lighting, keeping the
    /// current direction.
    pub fn set_light_params(&mut self, brightness: f64, contrast: f64, bump_height: f64, enabled: bool) {
        self.light = LightParams {
            enabled,
            brightness,
            contrast,
            bump_height,
            ..self.light
        };
    }

    pub fn set_light_direction(&mut self, azimuth: f64, elevation: f64) {
        self.light.azimuth = azimuth;
        self.light.elevation = elevation;
    }

    pub fn set_light(&mut self, light: LightParams) {
        self.light = light;
    }

    pub fn light(&self) -> &LightParams {
        &self.light
    }

    /// Read lighting neighbors across opposite edges, for tileable maps.
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
        if self.light.enabled {
            self.light.validate()?;
        }

        let (width, height) = (map.width(), map.height());
        debug!(width, height, lighting = self.light.enabled, "rendering image");
        let light_dir = self.light.direction();
        for y in 0..height {
            for x in 0..width {
                let value = map.get(x as isize, y as isize);
                let mut color = self.gradient.color_at(value);
                if self.light.enabled {
                    let n = Neighborhood::at(map, x, y, self.wrap);
                    color = color.scaled(self.light.intensity(light_dir, n));
                }
                output.set_pixel(x, y, color);
            }
            finish_row(&mut self.progress, "image", y)?;
        }
        debug!(rows = height, "image rendered");
        Ok(())
    }
}
