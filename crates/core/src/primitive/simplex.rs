//! Simplex noise in 2, 3 and 4 dimensions over a seeded permutation table.
//!
//! Follows Stefan Gustavson's formulation; the 4D simplex is found by ranking
//! the coordinate magnitudes. Quality has no effect on simplex noise, whose
//! radial kernels are already smooth.

use std::fmt;

use super::{permutation_table, DEFAULT_SEED};
use crate::math::to_int32_range;
use crate::module::{Sample2D, Sample3D, Sample4D};

const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

const GRAD4: [[f64; 4]; 32] = [
    [0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, -1.0],
    [0.0, 1.0, -1.0, 1.0],
    [0.0, 1.0, -1.0, -1.0],
    [0.0, -1.0, 1.0, 1.0],
    [0.0, -1.0, 1.0, -1.0],
    [0.0, -1.0, -1.0, 1.0],
    [0.0, -1.0, -1.0, -1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0],
    [1.0, 0.0, -1.0, 1.0],
    [1.0, 0.0, -1.0, -1.0],
    [-1.0, 0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0, 1.0],
    [-1.0, 0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, -1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, -1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, -1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, -1.0, 0.0],
    [1.0, -1.0, 1.0, 0.0],
    [1.0, -1.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0, 0.0],
    [-1.0, 1.0, -1.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0],
    [-1.0, -1.0, -1.0, 0.0],
];

/// Radial falloff `(r2 - |d|²)⁴ · (g · d)`, zero outside the kernel.
fn contribution(r2: f64, grad: &[f64], d: &[f64]) -> f64 {
    let t = r2 - d.iter().map(|c| c * c).sum::<f64>();
    if t <= 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    t2 * t2 * grad.iter().zip(d).map(|(g, c)| g * c).sum::<f64>()
}

/// Floors into the low eight bits used to index the permutation table.
/// Skewed coordinates can exceed `i32`, so the floor goes through `i64`.
fn cell(v: f64) -> (f64, usize) {
    let f = v.floor();
    (f, (f as i64 & 255) as usize)
}

/// Simplex gradient noise.
#[derive(Clone)]
pub struct SimplexPerlin {
    seed: i32,
    perm: [u8; 512],
}

impl fmt::Debug for SimplexPerlin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplexPerlin")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for SimplexPerlin {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SimplexPerlin {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            perm: permutation_table(seed),
        }
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

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }
}

impl Sample2D for SimplexPerlin {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let f2 = 0.5 * (3.0_f64.sqrt() - 1.0);
        let g2 = (3.0 - 3.0_f64.sqrt()) / 6.0;
        let (x, y) = (to_int32_range(x), to_int32_range(y));

        let s = (x + y) * f2;
        let (i, ii) = cell(x + s);
        let (j, jj) = cell(y + s);
        let t = (i + j) * g2;
        let d0 = [x - (i - t), y - (j - t)];

        let (i1, j1) = if d0[0] > d0[1] { (1, 0) } else { (0, 1) };
        let d1 = [d0[0] - i1 as f64 + g2, d0[1] - j1 as f64 + g2];
        let d2 = [d0[0] - 1.0 + 2.0 * g2, d0[1] - 1.0 + 2.0 * g2];

        let gi0 = self.p(ii + self.p(jj)) % 12;
        let gi1 = self.p(ii + i1 + self.p(jj + j1)) % 12;
        let gi2 = self.p(ii + 1 + self.p(jj + 1)) % 12;

        70.0 * (contribution(0.5, &GRAD3[gi0][..2], &d0)
            + contribution(0.5, &GRAD3[gi1][..2], &d1)
            + contribution(0.5, &GRAD3[gi2][..2], &d2))
    }
}

impl Sample3D for SimplexPerlin {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        const F3: f64 = 1.0 / 3.0;
        const G3: f64 = 1.0 / 6.0;
        let (x, y, z) = (to_int32_range(x), to_int32_range(y), to_int32_range(z));

        let s = (x + y + z) * F3;
        let (i, ii) = cell(x + s);
        let (j, jj) = cell(y + s);
        let (k, kk) = cell(z + s);
        let t = (i + j + k) * G3;
        let d0 = [x - (i - t), y - (j - t), z - (k - t)];

        let ([i1, j1, k1], [i2, j2, k2]) = if d0[0] >= d0[1] {
            if d0[1] >= d0[2] {
                ([1, 0, 0], [1, 1, 0])
            } else if d0[0] >= d0[2] {
                ([1, 0, 0], [1, 0, 1])
            } else {
                ([0, 0, 1], [1, 0, 1])
            }
        } else if d0[1] < d0[2] {
            ([0, 0, 1], [0, 1, 1])
        } else if d0[0] < d0[2] {
            ([0, 1, 0], [0, 1, 1])
        } else {
            ([0, 1, 0], [1, 1, 0])
        };

        let offset = |d: &[f64; 3], o: [usize; 3], g: f64| {
            [
                d[0] - o[0] as f64 + g,
                d[1] - o[1] as f64 + g,
                d[2] - o[2] as f64 + g,
            ]
        };
        let d1 = offset(&d0, [i1, j1, k1], G3);
        let d2 = offset(&d0, [i2, j2, k2], 2.0 * G3);
        let d3 = offset(&d0, [1, 1, 1], 3.0 * G3);

        let gi0 = self.p(ii + self.p(jj + self.p(kk))) % 12;
        let gi1 = self.p(ii + i1 + self.p(jj + j1 + self.p(kk + k1))) % 12;
        let gi2 = self.p(ii + i2 + self.p(jj + j2 + self.p(kk + k2))) % 12;
        let gi3 = self.p(ii + 1 + self.p(jj + 1 + self.p(kk + 1))) % 12;

        32.0 * (contribution(0.6, &GRAD3[gi0], &d0)
            + contribution(0.6, &GRAD3[gi1], &d1)
            + contribution(0.6, &GRAD3[gi2], &d2)
            + contribution(0.6, &GRAD3[gi3], &d3))
    }
}

impl Sample4D for SimplexPerlin {
    fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        let f4 = (5.0_f64.sqrt() - 1.0) / 4.0;
        let g4 = (5.0 - 5.0_f64.sqrt()) / 20.0;
        let p = [x, y, z, w].map(to_int32_range);

        let s = p.iter().sum::<f64>() * f4;
        let cells = p.map(|c| cell(c + s));
        let t = cells.iter().map(|(f, _)| f).sum::<f64>() * g4;
        let mut d0 = [0.0; 4];
        for a in 0..4 {
            d0[a] = p[a] - (cells[a].0 - t);
        }

        // Rank each axis by how many others it exceeds; the simplex corners
        // are then visited in descending rank order.
        let mut rank = [0usize; 4];
        for a in 0..4 {
            for b in (a + 1)..4 {
                if d0[a] > d0[b] {
                    rank[a] += 1;
                } else {
                    rank[b] += 1;
                }
            }
        }

        let idx = cells.map(|(_, i)| i);
        let mut total = 0.0;
        for step in 0..=4usize {
            // Step 0 is the origin corner and step 4 the far corner.
            let o = rank.map(|r| usize::from(r + step >= 4));
            let d = [
                d0[0] - o[0] as f64 + step as f64 * g4,
                d0[1] - o[1] as f64 + step as f64 * g4,
                d0[2] - o[2] as f64 + step as f64 * g4,
                d0[3] - o[3] as f64 + step as f64 * g4,
            ];
            let gi = self.p(
                idx[0] + o[0] + self.p(idx[1] + o[1] + self.p(idx[2] + o[2] + self.p(idx[3] + o[3]))),
            ) % 32;
            total += contribution(0.6, &GRAD4[gi], &d);
        }
        27.0 * total
    }
}
