//! Selectors: choose between two sources using the output of a control
//! module.

use std::fmt;
use std::sync::Arc;

use crate::error::NoiseError;
use crate::math::{lerp, scurve3};
use crate::module::{Sample2D, Sample3D, Sample4D};

/// Sampling impls for a selector, given `self.select(control, a, b)` where
/// `a` and `b` are closures so that unneeded sources are never sampled.
macro_rules! control_sampling {
    ($name:ident) => {
        impl<A: ?Sized, B: ?Sized, C: ?Sized> $name<A, B, C> {
            pub fn first(&self) -> &Arc<A> {
                &self.first
            }

            pub fn second(&self) -> &Arc<B> {
                &self.second
            }

            pub fn control(&self) -> &Arc<C> {
                &self.control
            }
        }

        impl<A, B, C> Sample2D for $name<A, B, C>
        where
            A: Sample2D + ?Sized,
            B: Sample2D + ?Sized,
            C: Sample2D + ?Sized,
        {
            fn sample_2d(&self, x: f64, y: f64) -> f64 {
                self.select(
                    self.control.sample_2d(x, y),
                    || self.first.sample_2d(x, y),
                    || self.second.sample_2d(x, y),
                )
            }
        }

        impl<A, B, C> Sample3D for $name<A, B, C>
        where
            A: Sample3D + ?Sized,
            B: Sample3D + ?Sized,
            C: Sample3D + ?Sized,
        {
            fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
                self.select(
                    self.control.sample_3d(x, y, z),
                    || self.first.sample_3d(x, y, z),
                    || self.second.sample_3d(x, y, z),
                )
            }
        }

        impl<A, B, C> Sample4D for $name<A, B, C>
        where
            A: Sample4D + ?Sized,
            B: Sample4D + ?Sized,
            C: Sample4D + ?Sized,
        {
            fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
                self.select(
                    self.control.sample_4d(x, y, z, w),
                    || self.first.sample_4d(x, y, z, w),
                    || self.second.sample_4d(x, y, z, w),
                )
            }
        }
    };
}

/// Linear blend of two sources weighted by the control output.
///
/// The control is clamped to [0, 1]: 0 yields `first`, 1 yields `second`.
pub struct Blend<A: ?Sized = dyn Sample3D, B: ?Sized = A, C: ?Sized = A> {
    first: Arc<A>,
    second: Arc<B>,
    control: Arc<C>,
}

impl<A: ?Sized, B: ?Sized, C: ?Sized> Blend<A, B, C> {
    pub fn new(first: Arc<A>, second: Arc<B>, control: Arc<C>) -> Self {
        Self {
            first,
            second,
            control,
        }
    }

    fn select(&self, control: f64, a: impl Fn() -> f64, b: impl Fn() -> f64) -> f64 {
        let alpha = control.clamp(0.0, 1.0);
        lerp(a(), b(), alpha)
    }
}

impl<A: ?Sized, B: ?Sized, C: ?Sized> fmt::Debug for Blend<A, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blend").finish_non_exhaustive()
    }
}

control_sampling!(Blend);

/// Outputs `second` where the control lies inside `[lower, upper]` and
/// `first` elsewhere.
///
/// A non-zero edge falloff cross-fades the two sources with an S-curve over
/// `[bound - falloff, bound + falloff]` at each band edge.
pub struct Select<A: ?Sized = dyn Sample3D, B: ?Sized = A, C: ?Sized = A> {
    first: Arc<A>,
    second: Arc<B>,
    control: Arc<C>,
    lower: f64,
    upper: f64,
    edge_falloff: f64,
}

impl<A: ?Sized, B: ?Sized, C: ?Sized> Select<A, B, C> {
    pub fn new(
        first: Arc<A>,
        second: Arc<B>,
        control: Arc<C>,
        lower: f64,
        upper: f64,
    ) -> Result<Self, NoiseError> {
        check_band(lower, upper)?;
        Ok(Self {
            first,
            second,
            control,
            lower,
            upper,
            edge_falloff: 0.0,
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Changes the band. The current falloff is re-clamped to the new band.
    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<(), NoiseError> {
        check_band(lower, upper)?;
        self.lower = lower;
        self.upper = upper;
        self.set_edge_falloff(self.edge_falloff);
        Ok(())
    }

    pub fn edge_falloff(&self) -> f64 {
        self.edge_falloff
    }

    /// Clamped to `[0, (upper - lower) / 2]` so the two edges never overlap.
    pub fn set_edge_falloff(&mut self, falloff: f64) {
        let half = (self.upper - self.lower) / 2.0;
        self.edge_falloff = if falloff.is_nan() {
            0.0
        } else {
            falloff.clamp(0.0, half)
        };
    }

    fn select(&self, control: f64, a: impl Fn() -> f64, b: impl Fn() -> f64) -> f64 {
        let (lower, upper, falloff) = (self.lower, self.upper, self.edge_falloff);
        if falloff <= 0.0 {
            return if control < lower || control > upper {
                a()
            } else {
                b()
            };
        }

        let fade = |edge: f64| scurve3((control - (edge - falloff)) / (2.0 * falloff));
        if control < lower - falloff {
            a()
        } else if control < lower + falloff {
            lerp(a(), b(), fade(lower))
        } else if control < upper - falloff {
            b()
        } else if control < upper + falloff {
            lerp(b(), a(), fade(upper))
        } else {
            a()
        }
    }
}

fn check_band(lower: f64, upper: f64) -> Result<(), NoiseError> {
    if lower < upper {
        Ok(())
    } else {
        Err(NoiseError::InvalidBounds {
            what: "select",
            lower,
            upper,
        })
    }
}

impl<A: ?Sized, B: ?Sized, C: ?Sized> fmt::Debug for Select<A, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("edge_falloff", &self.edge_falloff)
            .finish_non_exhaustive()
    }
}

control_sampling!(Select);
