//! Leaf generators: seedable coherent noise and analytic shapes.
//!
//! Every lattice primitive folds its coordinates with
//! [`to_int32_range`](crate::math::to_int32_range) before locating the
//! containing cell, so extreme inputs hash to the same corners on every
//! platform.

mod bevins;
mod improved;
mod shapes;
mod simplex;
mod voronoi;

pub use bevins::{BevinsGradient, BevinsValue};
pub use improved::ImprovedPerlin;
pub use shapes::{Checkerboard, Constant, Cylinders, LinearGradient, Spheres};
pub use simplex::SimplexPerlin;
pub use voronoi::Voronoi;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NoiseError;
use crate::math::{lerp, scurve3, scurve5, to_int32_range};
use crate::prng::Xorshift64;

/// Seed used by primitives constructed with `Default`.
pub const DEFAULT_SEED: i32 = 0;

/// Interpolation fidelity of a lattice primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Linear interpolation between corners.
    Fast,
    /// Cubic S-curve.
    #[default]
    Standard,
    /// Quintic S-curve with zero first and second derivatives at the corners.
    Best,
}

impl Quality {
    /// Applies this quality's S-curve to a fractional cell offset.
    #[inline]
    pub fn curve(self, t: f64) -> f64 {
        match self {
            Quality::Fast => t,
            Quality::Standard => scurve3(t),
            Quality::Best => scurve5(t),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quality::Fast => "fast",
            Quality::Standard => "standard",
            Quality::Best => "best",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quality {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Quality::Fast),
            "standard" => Ok(Quality::Standard),
            "best" => Ok(Quality::Best),
            _ => Err(NoiseError::InvalidQuality(s.to_string())),
        }
    }
}

// Per-axis multipliers of the lattice hash. All odd, so a shift of 2^31 on any
// axis only flips bit 31 of the hash.
const NOISE_GEN: [i32; 4] = [1619, 31337, 6971, 1291];
const SEED_NOISE_GEN: i32 = 1013;
const SHIFT_NOISE_GEN: u32 = 8;

/// Mixes integer lattice coordinates and a seed into a 32-bit hash.
fn lattice_hash<const N: usize>(cell: [i32; N], seed: i32) -> i32 {
    cell.iter()
        .zip(NOISE_GEN)
        .fold(SEED_NOISE_GEN.wrapping_mul(seed), |h, (&c, g)| {
            h.wrapping_add(g.wrapping_mul(c))
        })
}

/// Pseudo-random integer in [0, 2^31) for a lattice point.
pub(crate) fn int_value_noise<const N: usize>(cell: [i32; N], seed: i32) -> i32 {
    let mut n = lattice_hash(cell, seed) & 0x7fff_ffff;
    n ^= n >> 13;
    n.wrapping_mul(
        n.wrapping_mul(n)
            .wrapping_mul(60493)
            .wrapping_add(19_990_303),
    )
    .wrapping_add(1_376_312_589)
        & 0x7fff_ffff
}

/// Pseudo-random value in (-1, 1] for a lattice point.
pub(crate) fn value_noise<const N: usize>(cell: [i32; N], seed: i32) -> f64 {
    1.0 - f64::from(int_value_noise(cell, seed)) / 1_073_741_824.0
}

/// Index of the gradient assigned to a lattice point, in [0, 256).
pub(crate) fn gradient_index<const N: usize>(cell: [i32; N], seed: i32) -> usize {
    let mut v = lattice_hash(cell, seed) as u32;
    v ^= v >> SHIFT_NOISE_GEN;
    (v & 0xff) as usize
}

/// Interpolates corner contributions of the unit lattice cell containing `p`.
///
/// `corner` receives the integer corner and the offset of `p` from it. Corner
/// values are combined with the S-curve of `quality`, one axis at a time.
pub(crate) fn lattice_interpolate<const N: usize>(
    p: [f64; N],
    quality: Quality,
    corner: impl Fn([i32; N], [f64; N]) -> f64,
) -> f64 {
    let mut base = [0i32; N];
    let mut frac = [0.0f64; N];
    let mut t = [0.0f64; N];
    for i in 0..N {
        let c = to_int32_range(p[i]);
        let f = c.floor();
        base[i] = f as i32;
        frac[i] = c - f;
        t[i] = quality.curve(frac[i]);
    }

    // Bit `i` of a corner mask selects the upper neighbour on axis `i`.
    let mut values = [0.0f64; 16];
    for (mask, value) in values.iter_mut().enumerate().take(1 << N) {
        let mut cell = base;
        let mut offset = frac;
        for i in 0..N {
            if (mask >> i) & 1 == 1 {
                cell[i] = cell[i].wrapping_add(1);
                offset[i] -= 1.0;
            }
        }
        *value = corner(cell, offset);
    }

    let mut count = 1 << N;
    for &ti in t.iter() {
        count >>= 1;
        for j in 0..count {
            values[j] = lerp(values[2 * j], values[2 * j + 1], ti);
        }
    }
    values[0]
}

/// Builds the doubled 512-entry permutation table used by the
/// permutation-based primitives, shuffled deterministically from `seed`.
pub(crate) fn permutation_table(seed: i32) -> [u8; 512] {
    let mut rng = Xorshift64::new(u64::from(seed as u32) ^ 0x9E37_79B9_7F4A_7C15);
    let mut perm = [0u8; 512];
    for (i, p) in perm.iter_mut().enumerate().take(256) {
        *p = i as u8;
    }
    let (low, high) = perm.split_at_mut(256);
    rng.shuffle(low);
    high.copy_from_slice(low);
    perm
}
