//! Integer-hash lattice noise: value noise and gradient noise.

use serde::{Deserialize, Serialize};

use super::{gradient_index, lattice_interpolate, value_noise, Quality, DEFAULT_SEED};
use crate::module::{Sample2D, Sample3D, Sample4D};

const H: f64 = std::f64::consts::FRAC_1_SQRT_2;
const T: f64 = 0.577_350_269_189_625_8; // 1/sqrt(3)

const GRAD2: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [H, H],
    [-H, H],
    [H, -H],
    [-H, -H],
];

// Cube edge midpoints, four repeated to fill 16 slots.
const GRAD3: [[f64; 3]; 16] = [
    [H, H, 0.0],
    [-H, H, 0.0],
    [H, -H, 0.0],
    [-H, -H, 0.0],
    [H, 0.0, H],
    [-H, 0.0, H],
    [H, 0.0, -H],
    [-H, 0.0, -H],
    [0.0, H, H],
    [0.0, -H, H],
    [0.0, H, -H],
    [0.0, -H, -H],
    [H, H, 0.0],
    [0.0, -H, H],
    [-H, H, 0.0],
    [0.0, -H, -H],
];

const GRAD4: [[f64; 4]; 32] = [
    [0.0, T, T, T],
    [0.0, T, T, -T],
    [0.0, T, -T, T],
    [0.0, T, -T, -T],
    [0.0, -T, T, T],
    [0.0, -T, T, -T],
    [0.0, -T, -T, T],
    [0.0, -T, -T, -T],
    [T, 0.0, T, T],
    [T, 0.0, T, -T],
    [T, 0.0, -T, T],
    [T, 0.0, -T, -T],
    [-T, 0.0, T, T],
    [-T, 0.0, T, -T],
    [-T, 0.0, -T, T],
    [-T, 0.0, -T, -T],
    [T, T, 0.0, T],
    [T, T, 0.0, -T],
    [T, -T, 0.0, T],
    [T, -T, 0.0, -T],
    [-T, T, 0.0, T],
    [-T, T, 0.0, -T],
    [-T, -T, 0.0, T],
    [-T, -T, 0.0, -T],
    [T, T, T, 0.0],
    [T, T, -T, 0.0],
    [T, -T, T, 0.0],
    [T, -T, -T, 0.0],
    [-T, T, T, 0.0],
    [-T, T, -T, 0.0],
    [-T, -T, T, 0.0],
    [-T, -T, -T, 0.0],
];

/// Rescales the interpolated dot products to roughly [-1, 1].
fn gradient_scale(dims: usize) -> f64 {
    match dims {
        2 => 1.5,
        3 => 2.12,
        _ => 2.4,
    }
}

fn gradient_at<const N: usize>(cell: [i32; N], offset: [f64; N], seed: i32) -> f64 {
    let idx = gradient_index(cell, seed);
    let g: &[f64] = match N {
        2 => &GRAD2[idx & 7],
        3 => &GRAD3[idx & 15],
        _ => &GRAD4[idx & 31],
    };
    g.iter().zip(offset.iter()).map(|(a, b)| a * b).sum()
}

/// Value noise: a pseudo-random value at every lattice point, smoothly
/// interpolated between them. Output lies in (-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BevinsValue {
    seed: i32,
    quality: Quality,
}

impl Default for BevinsValue {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BevinsValue {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            quality: Quality::default(),
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    fn eval<const N: usize>(&self, p: [f64; N]) -> f64 {
        lattice_interpolate(p, self.quality, |cell, _| value_noise(cell, self.seed))
    }
}

impl Sample2D for BevinsValue {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.eval([x, y])
    }
}

impl Sample3D for BevinsValue {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.eval([x, y, z])
    }
}

impl Sample4D for BevinsValue {
    fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        self.eval([x, y, z, w])
    }
}

/// Gradient noise: a pseudo-random unit gradient at every lattice point.
/// The value is zero on lattice points and roughly in [-1, 1] elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BevinsGradient {
    seed: i32,
    quality: Quality,
}

impl Default for BevinsGradient {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BevinsGradient {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            quality: Quality::default(),
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    fn eval<const N: usize>(&self, p: [f64; N]) -> f64 {
        let v = lattice_interpolate(p, self.quality, |cell, offset| {
            gradient_at(cell, offset, self.seed)
        });
        v * gradient_scale(N)
    }
}

impl Sample2D for BevinsGradient {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.eval([x, y])
    }
}

impl Sample3D for BevinsGradient {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.eval([x, y, z])
    }
}

impl Sample4D for BevinsGradient {
    fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        self.eval([x, y, z, w])
    }
}
