#![deny(unsafe_code)]
//! Recipe-driven module tree assembly and image output.
//!
//! This crate sits between `noisegraph-core` (modules, builders, renderers)
//! and front ends such as the CLI. A [`Recipe`] names a primitive, a fractal
//! filter and render settings; [`assemble`] turns it into a module tree and
//! [`render_recipe`] runs the builder and image renderer over it.

pub mod pixel;
pub mod recipe;

#[cfg(feature = "png")]
pub mod snapshot;

use std::ops::ControlFlow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use noisegraph_core::{
    BevinsGradient, BevinsValue, Billow, Checkerboard, Constant, Cylinders, External,
    FractalParams, HeightRange, Heightmap16, HeightmapRenderer, HeterogeneousMultiFractal,
    HybridMultiFractal, Image, ImageRenderer, ImprovedPerlin, ModuleRef, NormalMapRenderer, MultiFractal, NoiseError, NoiseMap, NoiseMapBuilder, Pipe, Quality,
    RidgedMultiFractal, Sample3D, ScaleBias, SimplexPerlin, SinFractal, Spheres, SumFractal,
    Turbulence, Voronoi,
};

pub use recipe::{Recipe, TurbulenceSpec};

const PRIMITIVE_NAMES: &[&str] = &[
    "bevins_gradient",
    "bevins_value",
    "improved_perlin",
    "simplex_perlin",
    "open_simplex",
    "checkerboard",
    "constant",
    "cylinders",
    "spheres",
];

const FILTER_NAMES: &[&str] = &[
    "none",
    "pipe",
    "sum",
    "sin",
    "billow",
    "multi",
    "heterogeneous",
    "hybrid",
    "ridged",
    "voronoi",
];

/// The generator at the bottom of a recipe's module tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    BevinsGradient,
    BevinsValue,
    #[default]
    ImprovedPerlin,
    SimplexPerlin,
    /// OpenSimplex from the `noise` crate.
    OpenSimplex,
    Checkerboard,
    /// Outputs the recipe's `offset`.
    Constant,
    /// Frequency taken from the recipe's `offset`.
    Cylinders,
    /// Frequency taken from the recipe's `offset`.
    Spheres,
}

impl PrimitiveKind {
    /// Parses a snake_case name, case insensitive.
    pub fn from_name(name: &str) -> Result<Self, NoiseError> {
        serde_json::from_value(serde_json::Value::String(name.to_ascii_lowercase())).map_err(|_| {
            NoiseError::Unknown {
                kind: "primitive",
                name: name.to_string(),
            }
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::BevinsGradient => "bevins_gradient",
            PrimitiveKind::BevinsValue => "bevins_value",
            PrimitiveKind::ImprovedPerlin => "improved_perlin",
            PrimitiveKind::SimplexPerlin => "simplex_perlin",
            PrimitiveKind::OpenSimplex => "open_simplex",
            PrimitiveKind::Checkerboard => "checkerboard",
            PrimitiveKind::Constant => "constant",
            PrimitiveKind::Cylinders => "cylinders",
            PrimitiveKind::Spheres => "spheres",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        PRIMITIVE_NAMES
    }

    /// Whether seamless planar blending makes sense for this primitive.
    pub fn tileable(self) -> bool {
        !matches!(self, PrimitiveKind::Cylinders | PrimitiveKind::Spheres)
    }

    /// Builds the primitive. Shapes and the constant use `offset` as their
    /// argument; the lattice generators use `seed` and `quality`.
    pub fn build(self, seed: i32, quality: Quality, offset: f64) -> Arc<dyn Sample3D> {
        match self {
            PrimitiveKind::BevinsGradient => Arc::new(BevinsGradient::new(seed).with_quality(quality)),
            PrimitiveKind::BevinsValue => Arc::new(BevinsValue::new(seed).with_quality(quality)),
            PrimitiveKind::ImprovedPerlin => Arc::new(ImprovedPerlin::new(seed).with_quality(quality)),
            PrimitiveKind::SimplexPerlin => Arc::new(SimplexPerlin::new(seed)),
            PrimitiveKind::OpenSimplex => {
                Arc::new(External::new(noise::OpenSimplex::new(seed as u32)))
            }
            PrimitiveKind::Checkerboard => Arc::new(Checkerboard),
            PrimitiveKind::Constant => Arc::new(Constant::new(offset)),
            PrimitiveKind::Cylinders => Arc::new(Cylinders::new(offset)),
            PrimitiveKind::Spheres => Arc::new(Spheres::new(offset)),
        }
    }
}

/// The fractal filter wrapped around the primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// The primitive alone.
    None,
    Pipe,
    #[default]
    Sum,
    Sin,
    Billow,
    Multi,
    Heterogeneous,
    Hybrid,
    Ridged,
    /// Voronoi cells at the recipe's frequency and seed. Replaces the
    /// primitive rather than filtering it.
    Voronoi,
}

impl FilterKind {
    /// Parses a snake_case name, case insensitive.
    pub fn from_name(name: &str) -> Result<Self, NoiseError> {
        serde_json::from_value(serde_json::Value::String(name.to_ascii_lowercase())).map_err(|_| {
            NoiseError::Unknown {
                kind: "filter",
                name: name.to_string(),
            }
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Pipe => "pipe",
            FilterKind::Sum => "sum",
            FilterKind::Sin => "sin",
            FilterKind::Billow => "billow",
            FilterKind::Multi => "multi",
            FilterKind::Heterogeneous => "heterogeneous",
            FilterKind::Hybrid => "hybrid",
            FilterKind::Ridged => "ridged",
            FilterKind::Voronoi => "voronoi",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        FILTER_NAMES
    }

    /// `(scale, bias)` that brings this filter's typical output into the
    /// [-1, 1] domain of the built-in gradients.
    pub fn display_scale_bias(self) -> Option<(f64, f64)> {
        match self {
            FilterKind::Multi => Some((1.0, -0.8)),
            FilterKind::Heterogeneous => Some((-1.0, 2.0)),
            FilterKind::Hybrid => Some((0.7, -2.0)),
            FilterKind::Ridged => Some((0.9, -1.25)),
            _ => None,
        }
    }

    /// Wraps `source` in this filter. With `normalize`, the output is
    /// rescaled by [`FilterKind::display_scale_bias`] and billows are biased
    /// towards the dark end.
    pub fn apply(
        self,
        source: Arc<dyn Sample3D>,
        params: FractalParams,
        seed: i32,
        normalize: bool,
    ) -> Result<Arc<dyn Sample3D>, NoiseError> {
        let filtered: Arc<dyn Sample3D> = match self {
            FilterKind::None => source,
            FilterKind::Pipe => Arc::new(Pipe::with_params(source, params)?),
            FilterKind::Sum => Arc::new(SumFractal::with_params(source, params)?),
            FilterKind::Sin => Arc::new(SinFractal::with_params(source, params)?),
            FilterKind::Billow => {
                let mut billow = Billow::with_params(source, params)?;
                if normalize {
                    billow.bias = -0.2;
                }
                Arc::new(billow)
            }
            FilterKind::Multi => Arc::new(MultiFractal::with_params(source, params)?),
            FilterKind::Heterogeneous => {
                Arc::new(HeterogeneousMultiFractal::with_params(source, params)?)
            }
            FilterKind::Hybrid => Arc::new(HybridMultiFractal::with_params(source, params)?),
            FilterKind::Ridged => Arc::new(RidgedMultiFractal::with_params(source, params)?),
            FilterKind::Voronoi => {
                params.validate()?;
                Arc::new(Voronoi {
                    frequency: params.frequency,
                    displacement: 1.0,
                    enable_distance: true,
                    seed,
                })
            }
        };
        match self.display_scale_bias() {
            Some((scale, bias)) if normalize => {
                Ok(Arc::new(ScaleBias::new(filtered, scale, bias)))
            }
            _ => Ok(filtered),
        }
    }
}

/// Displaces `source` with three independent fractal distortion modules.
fn turbulent(
    source: Arc<dyn Sample3D>,
    spec: &TurbulenceSpec,
    seed: i32,
) -> Result<Arc<dyn Sample3D>, NoiseError> {
    let params = FractalParams {
        frequency: spec.frequency,
        octave_count: spec.roughness as f64,
        ..FractalParams::default()
    };
    let distort = |offset: i32| {
        SumFractal::with_params(Arc::new(BevinsGradient::new(seed.wrapping_add(offset))), params)
            .map(Arc::new)
    };
    Ok(Arc::new(Turbulence::new(
        source,
        distort(1)?,
        distort(2)?,
        distort(3)?,
        spec.power,
    )))
}

/// Builds the module tree a recipe describes: primitive, filter, optional
/// display rescale, then optional turbulence.
pub fn assemble(recipe: &Recipe) -> Result<Arc<dyn Sample3D>, NoiseError> {
    let primitive = recipe
        .primitive
        .build(recipe.seed, recipe.quality, recipe.fractal.offset);
    let filtered = recipe
        .filter
        .apply(primitive, recipe.fractal, recipe.seed, recipe.normalize)?;
    debug!(
        primitive = recipe.primitive.name(),
        filter = recipe.filter.name(),
        turbulence = recipe.turbulence.is_some(),
        "assembled module tree"
    );
    match &recipe.turbulence {
        Some(spec) => turbulent(filtered, spec, recipe.seed),
        None => Ok(filtered),
    }
}

/// Pass reported to the progress callback of [`render_recipe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Render,
}

/// Output of a full recipe run.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub map: NoiseMap,
    pub image: Image,
}

/// Builds the recipe's noise map.
pub fn build_map(
    recipe: &Recipe,
    mut progress: impl FnMut(usize) -> ControlFlow<()>,
) -> Result<NoiseMap, NoiseError> {
    recipe.validate()?;
    let module = assemble(recipe)?;
    let mut builder = NoiseMapBuilder::new();
    builder.set_source(ModuleRef::Dim3(module));
    builder.set_projection(recipe.effective_projection());
    builder.set_size(recipe.width, recipe.height);
    builder.set_progress_callback(|row| progress(row));
    builder.build()?;
    Ok(builder.take_output())
}

/// Builds the noise map and renders it through the recipe's gradient and
/// lighting.
pub fn render_recipe(
    recipe: &Recipe,
    mut progress: impl FnMut(Stage, usize) -> ControlFlow<()>,
) -> Result<Rendered, NoiseError> {
    let map = build_map(recipe, |row| progress(Stage::Build, row))?;
    let mut image = Image::new(map.width(), map.height())?;
    {
        let mut renderer = ImageRenderer::new();
        renderer.set_input(&map);
        renderer.set_output(&mut image);
        renderer.set_gradient(recipe.gradient()?);
        renderer.set_light(recipe.light);
        renderer.set_wrap(matches!(
            recipe.effective_projection(),
            noisegraph_core::Projection::Planar { seamless: true, .. }
        ));
        renderer.set_progress_callback(|row| progress(Stage::Render, row));
        renderer.render()?;
    }
    Ok(Rendered { map, image })
}

/// Renders a tangent-space normal map of `map`.
pub fn render_normal_map(map: &NoiseMap, bump_height: f64, wrap: bool) -> Result<Image, NoiseError> {
    let mut image = Image::new(map.width(), map.height())?;
    let mut renderer = NormalMapRenderer::new();
    renderer.set_input(map);
    renderer.set_output(&mut image);
    renderer.set_bump_height(bump_height);
    renderer.set_wrap(wrap);
    renderer.render()?;
    drop(renderer);
    Ok(image)
}

/// Quantizes `map` to 16-bit heights over `range`.
pub fn render_heightmap(map: &NoiseMap, range: HeightRange) -> Result<Heightmap16, NoiseError> {
    let mut heights = Heightmap16::new(map.width(), map.height())?;
    let mut renderer = HeightmapRenderer::new();
    renderer.set_input(map);
    renderer.set_output(&mut heights);
    renderer.set_range(range);
    renderer.render()?;
    drop(renderer);
    Ok(heights)
}
