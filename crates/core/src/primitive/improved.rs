//! Ken Perlin's improved noise (2002) over a seeded permutation table.

use std::fmt;

use super::{lattice_interpolate, permutation_table, Quality, DEFAULT_SEED};
use crate::module::{Sample2D, Sample3D};

/// Gradient selected by the low four bits of `hash`: one of the twelve cube
/// edges, with four repeated.
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// Improved Perlin gradient noise.
///
/// The permutation table is rebuilt from the seed whenever the seed changes,
/// so sampling never allocates. 2D samples equal 3D samples at `z = 0`.
#[derive(Clone)]
pub struct ImprovedPerlin {
    seed: i32,
    quality: Quality,
    perm: [u8; 512],
}

impl fmt::Debug for ImprovedPerlin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImprovedPerlin")
            .field("seed", &self.seed)
            .field("quality", &self.quality)
            .finish_non_exhaustive()
    }
}

impl Default for ImprovedPerlin {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl ImprovedPerlin {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            quality: Quality::default(),
            perm: permutation_table(seed),
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
        if seed != self.seed {
            self.seed = seed;
            self.perm = permutation_table(seed);
        }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    fn hash(&self, cell: [i32; 3]) -> u8 {
        let p = &self.perm;
        let [x, y, z] = cell.map(|c| (c & 255) as usize);
        p[p[p[x] as usize + y] as usize + z]
    }

    fn eval(&self, x: f64, y: f64, z: f64) -> f64 {
        lattice_interpolate([x, y, z], self.quality, |cell, [dx, dy, dz]| {
            grad(self.hash(cell), dx, dy, dz)
        })
    }
}

impl Sample2D for ImprovedPerlin {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.eval(x, y, 0.0)
    }
}

impl Sample3D for ImprovedPerlin {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.eval(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_on_lattice_points() {
        let m = ImprovedPerlin::new(0);
        assert_eq!(m.sample_3d(1.0, 2.0, 3.0), 0.0);
        assert_eq!(m.sample_3d(-4.0, 0.0, 9.0), 0.0);
    }

    #[test]
    fn two_d_matches_three_d_at_z_zero() {
        let m = ImprovedPerlin::new(77);
        assert_eq!(m.sample_2d(0.37, 1.91), m.sample_3d(0.37, 1.91, 0.0));
    }

    #[test]
    fn set_seed_rebuilds_table() {
        let mut m = ImprovedPerlin::new(1);
        let before = m.sample_3d(0.5, 0.25, 0.75);
        m.set_seed(2);
        assert_eq!(m.seed(), 2);
        assert_eq!(m.sample_3d(0.5, 0.25, 0.75), ImprovedPerlin::new(2).sample_3d(0.5, 0.25, 0.75));
        assert_ne!(before, m.sample_3d(0.5, 0.25, 0.75));
    }

    #[test]
    fn periodic_every_256_cells() {
        let m = ImprovedPerlin::new(8);
        let a = m.sample_3d(0.3, 0.6, 0.9);
        let b = m.sample_3d(256.3, 0.6, 0.9);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn grad_picks_cube_edges() {
        assert_eq!(grad(0, 1.0, 2.0, 3.0), 3.0);
        assert_eq!(grad(3, 1.0, 2.0, 3.0), -3.0);
        assert_eq!(grad(4, 1.0, 2.0, 3.0), 4.0);
        assert_eq!(grad(12, 1.0, 2.0, 3.0), 3.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_is_bounded(
                x in -500.0_f64..500.0,
                y in -500.0_f64..500.0,
                z in -500.0_f64..500.0,
                seed: i32,
            ) {
                let v = ImprovedPerlin::new(seed).sample_3d(x, y, z);
                prop_assert!(v.abs() <= 1.5, "value {} at ({}, {}, {})", v, x, y, z);
            }
        }
    }
}
