//! End-to-end scenarios: module graphs built into noise maps and rendered.

use std::ops::ControlFlow;
use std::sync::Arc;

use noisegraph_core::{
    BevinsGradient, Blend, Clamp, Constant, FractalParams, GradientColor, Image, ImageRenderer,
    ImprovedPerlin, ModuleRef, NoiseError, NoiseMap, NoiseMapBuilder, Projection, Quality,
    Sample3D, ScaleBias, SumFractal, Turbulence,
};

fn build(source: ModuleRef, width: usize, height: usize, projection: Projection) -> NoiseMap {
    let mut builder = NoiseMapBuilder::new();
    builder.set_source(source);
    builder.set_size(width, height);
    builder.set_projection(projection);
    builder.build().unwrap();
    builder.take_output()
}

#[test]
fn improved_perlin_build_is_bit_reproducible() {
    let run = || {
        let perlin = ImprovedPerlin::new(0).with_quality(Quality::Standard);
        build(
            ModuleRef::Dim3(Arc::new(perlin)),
            128,
            128,
            Projection::planar(0.0, 4.0, 0.0, 4.0),
        )
    };
    let (a, b) = (run(), run());
    assert_eq!(a.width(), 128);
    assert_eq!(a.height(), 128);
    let bits = |m: &NoiseMap| m.data().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
    let (lo, hi) = a.min_max().unwrap();
    assert!(lo < hi, "noise map should not be constant");
}

#[test]
fn blend_of_opposites_at_half_is_zero_everywhere() {
    let blend = Blend::new(
        Arc::new(Constant::new(1.0)),
        Arc::new(Constant::new(-1.0)),
        Arc::new(Constant::new(0.5)),
    );
    let map = build(
        ModuleRef::Dim3(Arc::new(blend)),
        16,
        16,
        Projection::planar(-10.0, 10.0, -10.0, 10.0),
    );
    assert!(map.data().iter().all(|&v| v == 0.0));
}

#[test]
fn clamp_caps_constant_source() {
    let clamp = Clamp::new(Arc::new(Constant::new(10.0)), -0.5, 0.5).unwrap();
    let map = build(
        ModuleRef::Dim3(Arc::new(clamp)),
        8,
        8,
        Projection::spherical(-90.0, 90.0, -180.0, 180.0),
    );
    assert!(map.data().iter().all(|&v| v == 0.5));
}

#[test]
fn progress_is_reported_once_per_row_in_order() {
    let height = 37;
    let mut rows = Vec::new();
    let mut builder = NoiseMapBuilder::new();
    builder.set_source(ModuleRef::Dim3(Arc::new(BevinsGradient::new(5))));
    builder.set_size(11, height);
    builder.set_progress_callback(|row| {
        rows.push(row);
        ControlFlow::Continue(())
    });
    builder.build().unwrap();
    drop(builder);
    assert_eq!(rows, (0..height).collect::<Vec<_>>());
}

#[test]
fn seamless_planar_map_tiles() {
    let source = Arc::new(SumFractal::new(Arc::new(ImprovedPerlin::new(9))));
    let mut builder = NoiseMapBuilder::new();
    builder.set_source(ModuleRef::Dim3(source));
    builder.set_size(32, 32);
    builder.set_projection(Projection::Planar {
        lower_x: 1.0,
        upper_x: 5.0,
        lower_y: -2.0,
        upper_y: 2.0,
        seamless: true,
    });
    for i in 0..=32 {
        let (left, right) = (builder.sample_cell(0, i).unwrap(), builder.sample_cell(32, i).unwrap());
        assert!((left - right).abs() < 1e-9, "row {i}: {left} != {right}");
        let (top, bottom) = (builder.sample_cell(i, 0).unwrap(), builder.sample_cell(i, 32).unwrap());
        assert!((top - bottom).abs() < 1e-9, "column {i}: {top} != {bottom}");
    }
}

#[test]
fn turbulence_without_power_is_transparent() {
    let source = Arc::new(ImprovedPerlin::new(1));
    let distort = |seed| Arc::new(BevinsGradient::new(seed));
    let turbulence = Turbulence::new(source.clone(), distort(2), distort(3), distort(4), 0.0);
    for &(x, y, z) in &[(0.1, 0.2, 0.3), (-4.7, 12.25, 3.5), (1e6, -1e6, 0.5)] {
        assert_eq!(turbulence.sample_3d(x, y, z), source.sample_3d(x, y, z));
    }
}

#[test]
fn identity_scale_bias_is_transparent() {
    let source = Arc::new(SumFractal::new(Arc::new(BevinsGradient::new(0))));
    let identity = ScaleBias::new(source.clone(), 1.0, 0.0);
    for i in 0..64 {
        let p = f64::from(i) * 0.173;
        assert_eq!(identity.sample_3d(p, -p, p * 0.5), source.sample_3d(p, -p, p * 0.5));
    }
}

#[test]
fn single_octave_sum_is_one_scaled_sample() {
    let source = Arc::new(ImprovedPerlin::new(3));
    let params = FractalParams {
        frequency: 2.0,
        octave_count: 1.0,
        ..FractalParams::default()
    };
    let sum = SumFractal::with_params(source.clone(), params).unwrap();
    for &(x, y, z) in &[(0.3, 0.7, 1.1), (-2.5, 4.0, 0.25)] {
        assert_eq!(sum.sample_3d(x, y, z), source.sample_3d(x * 2.0, y * 2.0, z * 2.0));
    }
}

#[test]
fn misconfigured_builds_fail_before_sampling() {
    let mut builder = NoiseMapBuilder::new();
    builder.set_size(4, 4);
    assert!(matches!(builder.build(), Err(NoiseError::Unbound(_))));

    builder.set_source(ModuleRef::Dim3(Arc::new(Constant::new(0.0))));
    builder.set_bounds(2.0, 1.0, 0.0, 1.0);
    assert!(matches!(builder.build(), Err(NoiseError::InvalidBounds { .. })));

    builder.set_bounds(0.0, 1.0, 0.0, 1.0);
    builder.set_size(0, 4);
    assert!(matches!(builder.build(), Err(NoiseError::InvalidDimensions)));
    assert!(builder.output().is_empty());
}

#[test]
fn build_then_render_terrain() {
    let terrain = Arc::new(SumFractal::new(Arc::new(BevinsGradient::new(42))));
    let map = build(
        ModuleRef::Dim3(terrain),
        24,
        16,
        Projection::planar(0.0, 3.0, 0.0, 2.0),
    );
    let mut image = Image::new(24, 16).unwrap();
    let mut rendered_rows = 0;
    let mut renderer = ImageRenderer::new();
    renderer.set_input(&map);
    renderer.set_output(&mut image);
    renderer.set_gradient(GradientColor::terrain());
    renderer.set_light_params(1.5, 2.0, 4.0, true);
    renderer.set_progress_callback(|_| {
        rendered_rows += 1;
        ControlFlow::Continue(())
    });
    renderer.render().unwrap();
    drop(renderer);
    assert_eq!(rendered_rows, 16);
    let distinct: std::collections::HashSet<[u8; 3]> =
        image.pixels().iter().map(|p| p.to_rgb8()).collect();
    assert!(distinct.len() > 10);
}
