//! The fractal filter families.
//!
//! The multifractal variants follow Musgrave's formulations in *Texturing &
//! Modeling: A Procedural Approach*.

use std::fmt;
use std::sync::Arc;

use super::{FractalParams, Spectrum, MAX_OCTAVE};
use crate::error::NoiseError;
use crate::module::{Sample2D, Sample3D, Sample4D};

/// Shared constructors, parameter setters and sampling impls. Each filter
/// provides `evaluate(x, sample)`, where `x` is the first input coordinate and
/// `sample(f)` samples the source at the input scaled by frequency `f`.
macro_rules! fractal_filter {
    ($name:ident { $($field:ident: $default:expr),* $(,)? }) => {
        impl<S: ?Sized> $name<S> {
            /// Wraps `source` with the default fractal parameters.
            pub fn new(source: Arc<S>) -> Self {
                Self {
                    source,
                    spectrum: Spectrum::default(),
                    $($field: $default,)*
                }
            }

            pub fn with_params(source: Arc<S>, params: FractalParams) -> Result<Self, NoiseError> {
                params.validate()?;
                Ok(Self {
                    source,
                    spectrum: Spectrum::new(params),
                    $($field: $default,)*
                })
            }

            pub fn source(&self) -> &Arc<S> {
                &self.source
            }

            pub fn params(&self) -> &FractalParams {
                self.spectrum.params()
            }

            pub fn set_params(&mut self, params: FractalParams) -> Result<(), NoiseError> {
                params.validate()?;
                self.spectrum = Spectrum::new(params);
                Ok(())
            }

            pub fn set_frequency(&mut self, frequency: f64) -> Result<(), NoiseError> {
                self.set_params(FractalParams { frequency, ..*self.params() })
            }

            pub fn set_lacunarity(&mut self, lacunarity: f64) -> Result<(), NoiseError> {
                self.set_params(FractalParams { lacunarity, ..*self.params() })
            }

            /// Clamped to `[1, MAX_OCTAVE]`; NaN is rejected.
            pub fn set_octave_count(&mut self, octaves: f64) -> Result<(), NoiseError> {
                let octave_count = octaves.clamp(1.0, MAX_OCTAVE as f64);
                self.set_params(FractalParams { octave_count, ..*self.params() })
            }

            pub fn set_persistence(&mut self, persistence: f64) -> Result<(), NoiseError> {
                self.set_params(FractalParams { persistence, ..*self.params() })
            }

            pub fn set_offset(&mut self, offset: f64) -> Result<(), NoiseError> {
                self.set_params(FractalParams { offset, ..*self.params() })
            }

            pub fn set_gain(&mut self, gain: f64) -> Result<(), NoiseError> {
                self.set_params(FractalParams { gain, ..*self.params() })
            }

            pub fn set_spectral_exponent(&mut self, spectral_exponent: f64) -> Result<(), NoiseError> {
                self.set_params(FractalParams { spectral_exponent, ..*self.params() })
            }
        }

        impl<S: ?Sized> Clone for $name<S> {
            fn clone(&self) -> Self {
                Self {
                    source: Arc::clone(&self.source),
                    spectrum: self.spectrum.clone(),
                    $($field: self.$field,)*
                }
            }
        }

        impl<S: ?Sized> fmt::Debug for $name<S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("params", self.spectrum.params())
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }

        impl<S: Sample2D + ?Sized> Sample2D for $name<S> {
            fn sample_2d(&self, x: f64, y: f64) -> f64 {
                self.evaluate(x, |f| self.source.sample_2d(x * f, y * f))
            }
        }

        impl<S: Sample3D + ?Sized> Sample3D for $name<S> {
            fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
                self.evaluate(x, |f| self.source.sample_3d(x * f, y * f, z * f))
            }
        }

        impl<S: Sample4D + ?Sized> Sample4D for $name<S> {
            fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
                self.evaluate(x, |f| self.source.sample_4d(x * f, y * f, z * f, w * f))
            }
        }
    };
}

/// Samples the source once at the configured frequency.
pub struct Pipe<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(Pipe {});

impl<S: ?Sized> Pipe<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        sample(self.spectrum.params().frequency)
    }
}

/// Fractional Brownian motion: octaves summed with amplitude
/// `persistence^i`.
pub struct SumFractal<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(SumFractal {});

impl<S: ?Sized> SumFractal<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        self.spectrum.persistence_sum(sample, |s| s)
    }
}

/// Sum of folded octaves `|s| * scale + bias`, giving puffy, cloud-like
/// features. The default scale and bias map `|s|` from [0, 1] to [-1, 1].
pub struct Billow<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
    pub scale: f64,
    pub bias: f64,
}

fractal_filter!(Billow {
    scale: 2.0,
    bias: -1.0,
});

impl<S: ?Sized> Billow<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        self.spectrum
            .persistence_sum(sample, |s| s.abs() * self.scale + self.bias)
    }
}

/// Marble-like bands: `sin(x + Σ |s_i| * persistence^i)`.
pub struct SinFractal<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(SinFractal {});

impl<S: ?Sized> SinFractal<S> {
    fn evaluate(&self, x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        (x + self.spectrum.persistence_sum(sample, f64::abs)).sin()
    }
}

/// Multiplicative cascade: each octave scales the running value by
/// `offset + s_i * w_i`.
pub struct MultiFractal<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(MultiFractal {});

impl<S: ?Sized> MultiFractal<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        let p = self.spectrum.params();
        let mut frequency = p.frequency;
        let mut value = 1.0;
        let octaves = p.whole_octaves();
        for i in 0..octaves {
            value *= p.offset + sample(frequency) * self.spectrum.weight(i);
            frequency *= p.lacunarity;
        }
        let remainder = p.remainder();
        if remainder > 0.0 {
            value += remainder * sample(frequency) * self.spectrum.weight(octaves);
        }
        value
    }
}

/// Additive multifractal whose octave increments are scaled by the value so
/// far: smooth lowlands, rough highlands.
pub struct HeterogeneousMultiFractal<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(HeterogeneousMultiFractal {});

impl<S: ?Sized> HeterogeneousMultiFractal<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        let p = self.spectrum.params();
        let mut frequency = p.frequency;
        let mut value = p.offset + sample(frequency);
        frequency *= p.lacunarity;

        let octaves = p.whole_octaves();
        for i in 1..octaves {
            let increment = (sample(frequency) + p.offset) * self.spectrum.weight(i) * value;
            value += increment;
            frequency *= p.lacunarity;
        }
        let remainder = p.remainder();
        if remainder > 0.0 {
            let increment =
                (sample(frequency) + p.offset) * self.spectrum.weight(octaves) * value;
            value += remainder * increment;
        }
        value
    }
}

/// Hybrid additive/multiplicative multifractal. Each octave's contribution
/// is weighted by `gain` times the previous signal; accumulation stops once
/// that weight becomes negligible.
pub struct HybridMultiFractal<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(HybridMultiFractal {});

impl<S: ?Sized> HybridMultiFractal<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        let p = self.spectrum.params();
        let mut frequency = p.frequency;
        let mut value = (sample(frequency) + p.offset) * self.spectrum.weight(0);
        let mut weight = p.gain * value;
        frequency *= p.lacunarity;

        let octaves = p.whole_octaves();
        let mut i = 1;
        while weight > 0.001 && i < octaves {
            weight = weight.min(1.0);
            let signal = (sample(frequency) + p.offset) * self.spectrum.weight(i);
            value += weight * signal;
            weight *= p.gain * signal;
            frequency *= p.lacunarity;
            i += 1;
        }
        let remainder = p.remainder();
        if remainder > 0.0 {
            let signal = (sample(frequency) + p.offset) * self.spectrum.weight(i);
            value += remainder * signal;
        }
        value
    }
}

/// Ridged multifractal: octaves of `(offset - |s|)²`, each weighted by the
/// previous signal, giving sharp ridge lines.
pub struct RidgedMultiFractal<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    spectrum: Spectrum,
}

fractal_filter!(RidgedMultiFractal {});

impl<S: ?Sized> RidgedMultiFractal<S> {
    fn evaluate(&self, _x: f64, sample: impl Fn(f64) -> f64) -> f64 {
        let p = self.spectrum.params();
        let ridge = |s: f64| {
            let r = p.offset - s.abs();
            r * r
        };
        let mut frequency = p.frequency;
        let mut signal = ridge(sample(frequency));
        let mut value = signal;
        frequency *= p.lacunarity;

        let octaves = p.whole_octaves();
        for i in 1..octaves {
            let weight = (signal * p.gain).clamp(0.0, 1.0);
            signal = ridge(sample(frequency)) * weight;
            value += signal * self.spectrum.weight(i);
            frequency *= p.lacunarity;
        }
        let remainder = p.remainder();
        if remainder > 0.0 {
            let weight = (signal * p.gain).clamp(0.0, 1.0);
            value += remainder * ridge(sample(frequency)) * weight * self.spectrum.weight(octaves);
        }
        value
    }
}
