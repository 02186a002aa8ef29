#![deny(unsafe_code)]
//! Core of noisegraph: composable coherent-noise modules.
//!
//! Modules implement [`Sample2D`], [`Sample3D`] and/or [`Sample4D`] and hold
//! their children as `Arc`s, so a module graph is an immutable DAG that can
//! be shared freely. A [`NoiseMapBuilder`] samples a graph through a
//! [`Projection`] into a [`NoiseMap`]; renderers turn the map into colors,
//! normals or 16-bit heights.
//!
//! ```
//! use std::sync::Arc;
//! use noisegraph_core::{ModuleRef, NoiseMapBuilder, SumFractal, ImprovedPerlin};
//!
//! let terrain = Arc::new(SumFractal::new(Arc::new(ImprovedPerlin::new(7))));
//! let mut builder = NoiseMapBuilder::new();
//! builder.set_source(ModuleRef::Dim3(terrain));
//! builder.set_size(32, 32);
//! builder.set_bounds(0.0, 4.0, 0.0, 4.0);
//! builder.build().unwrap();
//! assert_eq!(builder.output().width(), 32);
//! ```

pub mod builder;
pub mod color;
pub mod combiner;
pub mod error;
pub mod filter;
pub mod gradient;
pub mod math;
pub mod modifier;
pub mod module;
pub mod noise_map;
pub mod params;
pub mod primitive;
pub mod prng;
pub mod renderer;
pub mod selector;
pub mod sink;
pub mod transformer;

pub use builder::{BuildState, NoiseMapBuilder, ProgressCallback, Projection};
pub use color::{OkLab, Srgb};
pub use combiner::{Add, Max, Min, Multiply, Power};
pub use error::NoiseError;
pub use filter::{
    Billow, FractalParams, HeterogeneousMultiFractal, HybridMultiFractal, MultiFractal, Pipe,
    RidgedMultiFractal, SinFractal, SumFractal,
};
pub use gradient::{ColorSpace, GradientColor, GradientPoint};
pub use modifier::{Abs, Clamp, ControlPoint, Curve, Exponent, Invert, ScaleBias, Terrace};
pub use module::{External, ModuleRef, Sample2D, Sample3D, Sample4D};
pub use noise_map::NoiseMap;
pub use primitive::{
    BevinsGradient, BevinsValue, Checkerboard, Constant, Cylinders, ImprovedPerlin,
    LinearGradient, Quality, SimplexPerlin, Spheres, Voronoi,
};
pub use prng::Xorshift64;
pub use renderer::{
    HeightRange, HeightmapRenderer, ImageRenderer, LightParams, NormalMapRenderer,
};
pub use selector::{Blend, Select};
pub use sink::{Heightmap16, Image, PixelSink, HeightSink};
pub use transformer::{Displace, RotatePoint, ScalePoint, TranslatePoint, Turbulence};
