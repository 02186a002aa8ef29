//! Voronoi cells: the nearest of one jittered seed point per unit cube.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{value_noise, DEFAULT_SEED};
use crate::math::to_int32_range;
use crate::module::Sample3D;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Cellular noise.
///
/// Every unit cube holds one seed point, jittered inside the cube by value
/// noise. The output is `displacement` times a per-cell pseudo-random value
/// for the cell owning the nearest seed point. With `enable_distance`, the
/// scaled distance to that point is added, which brightens cell borders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voronoi {
    pub frequency: f64,
    pub displacement: f64,
    pub enable_distance: bool,
    pub seed: i32,
}

impl Default for Voronoi {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            displacement: 1.0,
            enable_distance: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl Voronoi {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    fn seed_point(&self, cell: [i32; 3]) -> DVec3 {
        let jitter = |s: i32| (value_noise(cell, self.seed.wrapping_add(s)) + 1.0) * 0.5;
        DVec3::new(
            f64::from(cell[0]) + jitter(0),
            f64::from(cell[1]) + jitter(1),
            f64::from(cell[2]) + jitter(2),
        )
    }
}

impl Sample3D for Voronoi {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = DVec3::new(x, y, z) * self.frequency;
        let p = DVec3::new(to_int32_range(p.x), to_int32_range(p.y), to_int32_range(p.z));
        let base = p.floor();
        let (bx, by, bz) = (base.x as i32, base.y as i32, base.z as i32);

        let mut min_dist = f64::MAX;
        let mut nearest_cell = [bx, by, bz];
        let mut nearest = p;
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let cell = [
                        bx.wrapping_add(dx),
                        by.wrapping_add(dy),
                        bz.wrapping_add(dz),
                    ];
                    let candidate = self.seed_point(cell);
                    let dist = candidate.distance_squared(p);
                    if dist < min_dist {
                        min_dist = dist;
                        nearest_cell = cell;
                        nearest = candidate;
                    }
                }
            }
        }

        let value = if self.enable_distance {
            nearest.distance(p) * SQRT_3 - 1.0
        } else {
            0.0
        };
        value + self.displacement * value_noise(nearest_cell, DEFAULT_SEED)
    }
}
