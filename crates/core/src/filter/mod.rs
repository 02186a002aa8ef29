//! Fractal filters: combine several octaves of one source module.
//!
//! Every filter shares [`FractalParams`]. Octave `i` samples the source at
//! `frequency * lacunarity^i`; how the octaves are weighted and accumulated is
//! what distinguishes the filters. The ridged, heterogeneous and hybrid
//! families weight octave `i` by the spectral weight
//! `(lacunarity^i)^-spectral_exponent`, which is recomputed whenever
//! lacunarity or exponent change so sampling stays read-only.

mod fractal;

pub use fractal::{
    Billow, HeterogeneousMultiFractal, HybridMultiFractal, MultiFractal, Pipe, RidgedMultiFractal,
    SinFractal, SumFractal,
};

use serde::{Deserialize, Serialize};

use crate::error::NoiseError;

/// Upper limit on the octave count of every fractal filter.
pub const MAX_OCTAVE: usize = 30;

pub const DEFAULT_FREQUENCY: f64 = 1.0;
pub const DEFAULT_LACUNARITY: f64 = 2.0;
pub const DEFAULT_OCTAVE_COUNT: f64 = 6.0;
pub const DEFAULT_PERSISTENCE: f64 = 0.5;
pub const DEFAULT_OFFSET: f64 = 1.0;
pub const DEFAULT_GAIN: f64 = 2.0;
pub const DEFAULT_SPECTRAL_EXPONENT: f64 = 0.9;

/// Parameters shared by every fractal filter.
///
/// `octave_count` may be fractional; the fractional part weights one extra
/// partial octave in the filters that support it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    pub frequency: f64,
    pub lacunarity: f64,
    pub octave_count: f64,
    pub persistence: f64,
    pub offset: f64,
    pub gain: f64,
    pub spectral_exponent: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            lacunarity: DEFAULT_LACUNARITY,
            octave_count: DEFAULT_OCTAVE_COUNT,
            persistence: DEFAULT_PERSISTENCE,
            offset: DEFAULT_OFFSET,
            gain: DEFAULT_GAIN,
            spectral_exponent: DEFAULT_SPECTRAL_EXPONENT,
        }
    }
}

impl FractalParams {
    /// Checks that every field is finite and that octave count and
    /// lacunarity are usable.
    pub fn validate(&self) -> Result<(), NoiseError> {
        let fields = [
            ("frequency", self.frequency),
            ("lacunarity", self.lacunarity),
            ("octave_count", self.octave_count),
            ("persistence", self.persistence),
            ("offset", self.offset),
            ("gain", self.gain),
            ("spectral_exponent", self.spectral_exponent),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(NoiseError::InvalidParameter {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        if self.lacunarity <= 0.0 {
            return Err(NoiseError::InvalidParameter {
                name: "lacunarity",
                reason: format!("must be positive, got {}", self.lacunarity),
            });
        }
        if !(1.0..=MAX_OCTAVE as f64).contains(&self.octave_count) {
            return Err(NoiseError::InvalidParameter {
                name: "octave_count",
                reason: format!("must be in [1, {MAX_OCTAVE}], got {}", self.octave_count),
            });
        }
        Ok(())
    }

    /// Number of full octaves.
    pub fn whole_octaves(&self) -> usize {
        (self.octave_count.floor().max(0.0) as usize).min(MAX_OCTAVE)
    }

    /// Weight of the trailing partial octave, in [0, 1).
    pub fn remainder(&self) -> f64 {
        if self.whole_octaves() >= MAX_OCTAVE {
            0.0
        } else {
            (self.octave_count - self.octave_count.floor()).max(0.0)
        }
    }
}

/// Spectral weight of each octave, one extra slot for the partial octave.
pub(crate) type SpectralWeights = [f64; MAX_OCTAVE + 1];

pub(crate) fn spectral_weights(lacunarity: f64, exponent: f64) -> SpectralWeights {
    let mut weights = [0.0; MAX_OCTAVE + 1];
    let mut frequency = 1.0_f64;
    for w in weights.iter_mut() {
        *w = frequency.powf(-exponent);
        frequency *= lacunarity;
    }
    weights
}

/// Parameters plus their derived weight table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spectrum {
    params: FractalParams,
    weights: SpectralWeights,
}

impl Default for Spectrum {
    fn default() -> Self {
        Self::new(FractalParams::default())
    }
}

impl Spectrum {
    pub(crate) fn new(params: FractalParams) -> Self {
        Self {
            weights: spectral_weights(params.lacunarity, params.spectral_exponent),
            params,
        }
    }

    pub(crate) fn params(&self) -> &FractalParams {
        &self.params
    }

    pub(crate) fn weight(&self, octave: usize) -> f64 {
        self.weights[octave.min(MAX_OCTAVE)]
    }

    /// Sums `signal(s) * persistence^i` over the octaves, including the
    /// partial one. `sample` takes the octave frequency.
    pub(crate) fn persistence_sum(
        &self,
        sample: impl Fn(f64) -> f64,
        signal: impl Fn(f64) -> f64,
    ) -> f64 {
        let p = &self.params;
        let mut frequency = p.frequency;
        let mut amplitude = 1.0;
        let mut value = 0.0;
        for _ in 0..p.whole_octaves() {
            value += signal(sample(frequency)) * amplitude;
            frequency *= p.lacunarity;
            amplitude *= p.persistence;
        }
        let remainder = p.remainder();
        if remainder > 0.0 {
            value += remainder * signal(sample(frequency)) * amplitude;
        }
        value
    }
}
