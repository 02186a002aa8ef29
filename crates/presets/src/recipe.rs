//! Reproducible description of a render request.
//!
//! A [`Recipe`] carries everything needed to recreate an image: primitive,
//! filter, quality, seed, fractal parameters, optional turbulence,
//! projection, output size, gradient and lighting. Two identical recipes
//! produce bit-identical noise maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use noisegraph_core::params::{
    fractal_overrides, param_bool, param_f64, param_i32, param_quality, param_string, param_usize,
};
use noisegraph_core::{FractalParams, GradientColor, LightParams, NoiseError, Projection, Quality};

use crate::{FilterKind, PrimitiveKind};

pub const DEFAULT_SIZE: usize = 256;

/// Planar bounds used when no projection is given: `[2, 4] x [2, 4]`.
pub fn default_projection() -> Projection {
    Projection::Planar {
        lower_x: 2.0,
        upper_x: 4.0,
        lower_y: 2.0,
        upper_y: 4.0,
        seamless: true,
    }
}

/// Three fractal distortion modules displacing the input point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbulenceSpec {
    pub power: f64,
    pub frequency: f64,
    /// Octave count of each distortion module.
    pub roughness: usize,
}

impl Default for TurbulenceSpec {
    fn default() -> Self {
        Self {
            power: 1.0,
            frequency: 1.0,
            roughness: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub primitive: PrimitiveKind,
    pub quality: Quality,
    pub seed: i32,
    pub filter: FilterKind,
    pub fractal: FractalParams,
    /// Rescale filter output into roughly [-1, 1] for display.
    pub normalize: bool,
    pub turbulence: Option<TurbulenceSpec>,
    pub projection: Projection,
    pub width: usize,
    pub height: usize,
    pub gradient: String,
    pub light: LightParams,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            primitive: PrimitiveKind::ImprovedPerlin,
            quality: Quality::Standard,
            seed: 0,
            filter: FilterKind::Sum,
            fractal: FractalParams::default(),
            normalize: true,
            turbulence: None,
            projection: default_projection(),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            gradient: "grayscale".to_string(),
            light: LightParams::default(),
        }
    }
}

impl Recipe {
    /// Checks size, projection, fractal parameters and gradient name.
    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.width == 0 || self.height == 0 {
            return Err(NoiseError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(NoiseError::InvalidDimensions)?;
        self.projection.validate()?;
        self.fractal.validate()?;
        if let Some(t) = &self.turbulence {
            if t.roughness == 0 || !t.power.is_finite() || !t.frequency.is_finite() {
                return Err(NoiseError::InvalidParameter {
                    name: "turbulence",
                    reason: format!(
                        "power {} and frequency {} must be finite, roughness {} at least 1",
                        t.power, t.frequency, t.roughness
                    ),
                });
            }
        }
        if self.light.enabled {
            self.light.validate()?;
        }
        self.gradient().map(drop)
    }

    pub fn gradient(&self) -> Result<GradientColor, NoiseError> {
        GradientColor::from_name(&self.gradient)
    }

    /// The projection the render uses. Spheres and cylinders are not
    /// tileable, so seamless planar blending is switched off for them.
    pub fn effective_projection(&self) -> Projection {
        match self.projection {
            Projection::Planar {
                lower_x,
                upper_x,
                lower_y,
                upper_y,
                seamless,
            } => Projection::Planar {
                lower_x,
                upper_x,
                lower_y,
                upper_y,
                seamless: seamless && self.primitive.tileable(),
            },
            other => other,
        }
    }

    /// Applies a JSON object of overrides. Unknown keys and values of the
    /// wrong type are ignored; names that do not parse keep the current
    /// value.
    ///
    /// Recognized keys: `primitive`, `filter`, `quality`, `seed`, `width`,
    /// `height`, `gradient`, `seamless`, `normalize`, `turbulence_power`,
    /// `light`, and the fractal keys of
    /// [`fractal_overrides`](noisegraph_core::params::fractal_overrides).
    pub fn with_overrides(&self, params: &Value) -> Recipe {
        let mut recipe = self.clone();
        let primitive = param_string(params, "primitive", self.primitive.name());
        recipe.primitive = PrimitiveKind::from_name(&primitive).unwrap_or(self.primitive);
        let filter = param_string(params, "filter", self.filter.name());
        recipe.filter = FilterKind::from_name(&filter).unwrap_or(self.filter);
        recipe.quality = param_quality(params, "quality", self.quality);
        recipe.seed = param_i32(params, "seed", self.seed);
        recipe.fractal = fractal_overrides(params, self.fractal);
        recipe.normalize = param_bool(params, "normalize", self.normalize);
        recipe.width = param_usize(params, "width", self.width);
        recipe.height = param_usize(params, "height", self.height);
        recipe.gradient = param_string(params, "gradient", &self.gradient);
        if let Projection::Planar { seamless, .. } = &mut recipe.projection {
            *seamless = param_bool(params, "seamless", *seamless);
        }
        if params.get("turbulence_power").is_some() {
            let base = self.turbulence.unwrap_or_default();
            recipe.turbulence = Some(TurbulenceSpec {
                power: param_f64(params, "turbulence_power", base.power),
                ..base
            });
        }
        recipe.light.enabled = param_bool(params, "light", self.light.enabled);
        recipe
    }
}
