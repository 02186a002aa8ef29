//! Modifiers: remap the output of a single source module.

use std::fmt;
use std::sync::Arc;

use crate::error::NoiseError;
use crate::math::{cubic_interpolate, lerp};
use crate::module::{Sample2D, Sample3D, Sample4D};

/// Sampling impls for a modifier whose output is `self.apply(source value)`.
macro_rules! unary_modifier {
    ($name:ident) => {
        impl<S: ?Sized> $name<S> {
            pub fn source(&self) -> &Arc<S> {
                &self.source
            }
        }

        impl<S: ?Sized> fmt::Debug for $name<S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name)).finish_non_exhaustive()
            }
        }

        impl<S: Sample2D + ?Sized> Sample2D for $name<S> {
            fn sample_2d(&self, x: f64, y: f64) -> f64 {
                self.apply(self.source.sample_2d(x, y))
            }
        }

        impl<S: Sample3D + ?Sized> Sample3D for $name<S> {
            fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
                self.apply(self.source.sample_3d(x, y, z))
            }
        }

        impl<S: Sample4D + ?Sized> Sample4D for $name<S> {
            fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
                self.apply(self.source.sample_4d(x, y, z, w))
            }
        }
    };
}

/// `source * scale + bias`.
pub struct ScaleBias<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    pub scale: f64,
    pub bias: f64,
}

impl<S: ?Sized> ScaleBias<S> {
    pub fn new(source: Arc<S>, scale: f64, bias: f64) -> Self {
        Self {
            source,
            scale,
            bias,
        }
    }

    fn apply(&self, v: f64) -> f64 {
        v * self.scale + self.bias
    }
}

unary_modifier!(ScaleBias);

/// Clamps the source output to `[lower, upper]`.
pub struct Clamp<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    lower: f64,
    upper: f64,
}

impl<S: ?Sized> Clamp<S> {
    /// Fails with [`NoiseError::InvalidBounds`] unless `lower <= upper`.
    pub fn new(source: Arc<S>, lower: f64, upper: f64) -> Result<Self, NoiseError> {
        check_clamp_bounds(lower, upper)?;
        Ok(Self {
            source,
            lower,
            upper,
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<(), NoiseError> {
        check_clamp_bounds(lower, upper)?;
        self.lower = lower;
        self.upper = upper;
        Ok(())
    }

    fn apply(&self, v: f64) -> f64 {
        v.clamp(self.lower, self.upper)
    }
}

fn check_clamp_bounds(lower: f64, upper: f64) -> Result<(), NoiseError> {
    // Also rejects NaN, which `f64::clamp` would panic on.
    if lower <= upper {
        Ok(())
    } else {
        Err(NoiseError::InvalidBounds {
            what: "clamp",
            lower,
            upper,
        })
    }
}

unary_modifier!(Clamp);

/// One (input, output) pair of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoint {
    pub input: f64,
    pub output: f64,
}

impl From<(f64, f64)> for ControlPoint {
    fn from((input, output): (f64, f64)) -> Self {
        Self { input, output }
    }
}

/// Sorts `values` by `key` and rejects fewer than `min` entries or repeated
/// keys.
fn sorted_unique<T>(
    mut values: Vec<T>,
    min: usize,
    key: impl Fn(&T) -> f64,
) -> Result<Vec<T>, NoiseError> {
    if values.len() < min {
        return Err(NoiseError::InvalidControlPoints(format!(
            "need at least {min} points, got {}",
            values.len()
        )));
    }
    if values.iter().any(|v| !key(v).is_finite()) {
        return Err(NoiseError::InvalidControlPoints(
            "control point inputs must be finite".into(),
        ));
    }
    values.sort_by(|a, b| key(a).total_cmp(&key(b)));
    if let Some(pair) = values.windows(2).find(|w| key(&w[0]) == key(&w[1])) {
        return Err(NoiseError::InvalidControlPoints(format!(
            "duplicate input {}",
            key(&pair[0])
        )));
    }
    Ok(values)
}

/// Remaps the source output through a cubic spline of control points.
///
/// Outside the range of the control points the curve holds the outermost
/// output.
pub struct Curve<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    points: Vec<ControlPoint>,
}

impl<S: ?Sized> Curve<S> {
    /// Requires at least four points with distinct inputs; order is free.
    pub fn new(
        source: Arc<S>,
        points: impl IntoIterator<Item = impl Into<ControlPoint>>,
    ) -> Result<Self, NoiseError> {
        let points = sorted_unique(points.into_iter().map(Into::into).collect(), 4, |p| {
            p.input
        })?;
        Ok(Self { source, points })
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    fn apply(&self, v: f64) -> f64 {
        let last = self.points.len() - 1;
        let pos = self
            .points
            .iter()
            .position(|p| v < p.input)
            .unwrap_or(self.points.len());
        let idx = |offset: isize| (pos as isize + offset).clamp(0, last as isize) as usize;
        let (i0, i1, i2, i3) = (idx(-2), idx(-1), idx(0), idx(1));
        if i1 == i2 {
            return self.points[i1].output;
        }
        let in0 = self.points[i1].input;
        let in1 = self.points[i2].input;
        let alpha = (v - in0) / (in1 - in0);
        cubic_interpolate(
            self.points[i0].output,
            self.points[i1].output,
            self.points[i2].output,
            self.points[i3].output,
            alpha,
        )
    }
}

unary_modifier!(Curve);

/// Maps the source output onto terrace-like steps.
///
/// Between two adjacent terrace heights the value rises along a quadratic,
/// flat at the lower height and steep at the upper one. `invert` flips each
/// step.
pub struct Terrace<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    points: Vec<f64>,
    pub invert: bool,
}

impl<S: ?Sized> Terrace<S> {
    /// Requires at least two distinct heights; order is free.
    pub fn new(source: Arc<S>, points: impl IntoIterator<Item = f64>) -> Result<Self, NoiseError> {
        let points = sorted_unique(points.into_iter().collect(), 2, |p| *p)?;
        Ok(Self {
            source,
            points,
            invert: false,
        })
    }

    /// `steps` equally spaced terraces covering [-1, 1].
    pub fn with_steps(source: Arc<S>, steps: usize) -> Result<Self, NoiseError> {
        if steps < 2 {
            return Err(NoiseError::InvalidControlPoints(format!(
                "need at least 2 steps, got {steps}"
            )));
        }
        let step = 2.0 / (steps - 1) as f64;
        Self::new(source, (0..steps).map(|i| -1.0 + i as f64 * step))
    }

    pub fn control_points(&self) -> &[f64] {
        &self.points
    }

    fn apply(&self, v: f64) -> f64 {
        let last = self.points.len() - 1;
        let pos = self
            .points
            .iter()
            .position(|&p| v < p)
            .unwrap_or(self.points.len());
        let i0 = pos.saturating_sub(1).min(last);
        let i1 = pos.min(last);
        if i0 == i1 {
            return self.points[i1];
        }
        let (mut v0, mut v1) = (self.points[i0], self.points[i1]);
        let mut alpha = (v - v0) / (v1 - v0);
        if self.invert {
            alpha = 1.0 - alpha;
            std::mem::swap(&mut v0, &mut v1);
        }
        lerp(v0, v1, alpha * alpha)
    }
}

unary_modifier!(Terrace);

/// `|source|`.
pub struct Abs<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
}

impl<S: ?Sized> Abs<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    fn apply(&self, v: f64) -> f64 {
        v.abs()
    }
}

unary_modifier!(Abs);

/// `-source`.
pub struct Invert<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
}

impl<S: ?Sized> Invert<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    fn apply(&self, v: f64) -> f64 {
        -v
    }
}

unary_modifier!(Invert);

/// Raises the source output, mapped from [-1, 1] to [0, 1], to `exponent`
/// and maps the result back to [-1, 1].
pub struct Exponent<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    pub exponent: f64,
}

impl<S: ?Sized> Exponent<S> {
    pub fn new(source: Arc<S>, exponent: f64) -> Self {
        Self { source, exponent }
    }

    fn apply(&self, v: f64) -> f64 {
        ((v + 1.0) / 2.0).abs().powf(self.exponent) * 2.0 - 1.0
    }
}

unary_modifier!(Exponent);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Constant, ImprovedPerlin, LinearGradient};

    fn constant(v: f64) -> Arc<Constant> {
        Arc::new(Constant::new(v))
    }

    #[test]
    fn clamp_of_ten_is_upper_bound() {
        let clamp = Clamp::new(constant(10.0), -0.5, 0.5).unwrap();
        assert_eq!(clamp.sample_3d(1.0, 2.0, 3.0), 0.5);
        assert_eq!(clamp.sample_2d(-4.0, 0.0), 0.5);
    }

    #[test]
    fn clamp_rejects_inverted_bounds() {
        assert!(matches!(
            Clamp::new(constant(0.0), 1.0, -1.0),
            Err(NoiseError::InvalidBounds { what: "clamp", .. })
        ));
        assert!(Clamp::new(constant(0.0), f64::NAN, 1.0).is_err());
    }

    #[test]
    fn scale_bias_applies_linear_map() {
        let sb = ScaleBias::new(constant(0.5), 4.0, -1.0);
        assert_eq!(sb.sample_3d(0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn identity_scale_bias_passes_through() {
        let source = Arc::new(ImprovedPerlin::new(2));
        let sb = ScaleBias::new(Arc::clone(&source), 1.0, 0.0);
        for (x, y, z) in [(0.1, 0.2, 0.3), (5.5, -3.25, 9.0), (-100.7, 44.1, 0.0)] {
            assert_eq!(sb.sample_3d(x, y, z), source.sample_3d(x, y, z));
        }
    }

    #[test]
    fn curve_requires_four_points() {
        let err = Curve::new(constant(0.0), [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert!(matches!(err, Err(NoiseError::InvalidControlPoints(_))));
    }

    #[test]
    fn curve_rejects_duplicate_inputs() {
        let err = Curve::new(
            constant(0.0),
            [(0.0, 0.0), (1.0, 1.0), (1.0, 2.0), (2.0, 2.0)],
        );
        assert!(matches!(err, Err(NoiseError::InvalidControlPoints(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn curve_passes_through_control_points() {
        let points = [(-1.0, -0.5), (-0.25, 0.3), (0.5, 0.1), (1.0, 1.0)];
        for (input, output) in points {
            let curve = Curve::new(constant(input), points).unwrap();
            assert!(
                (curve.sample_3d(0.0, 0.0, 0.0) - output).abs() < 1e-12,
                "curve({input}) should be {output}"
            );
        }
    }

    #[test]
    fn curve_sorts_points_and_holds_outside_range() {
        let points = [(1.0, 1.0), (-1.0, -1.0), (0.5, 0.5), (0.0, 0.0)];
        let below = Curve::new(constant(-3.0), points).unwrap();
        assert_eq!(below.control_points()[0].input, -1.0);
        assert_eq!(below.sample_3d(0.0, 0.0, 0.0), -1.0);
        let above = Curve::new(constant(3.0), points).unwrap();
        assert_eq!(above.sample_3d(0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn curve_interpolates_with_libnoise_cubic() {
        let points = [(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        let curve = Curve::new(Arc::new(LinearGradient::default()), points).unwrap();
        // p = 2, q = -3, r = 2, s = 0 at t = 0.25
        assert!((curve.sample_3d(0.25, 0.0, 0.0) - 0.34375).abs() < 1e-12);
        assert!(curve.sample_3d(0.0, 0.0, 0.0).abs() < 1e-12);
        assert!((curve.sample_3d(1.0, 0.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn terrace_is_flat_at_lower_step() {
        let terrace = Terrace::new(Arc::new(LinearGradient::default()), [0.0, 1.0]).unwrap();
        assert_eq!(terrace.sample_3d(0.5, 0.0, 0.0), 0.25);
        assert_eq!(terrace.sample_3d(0.0, 0.0, 0.0), 0.0);
        assert_eq!(terrace.sample_3d(2.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn inverted_terrace_is_flat_at_upper_step() {
        let mut terrace = Terrace::new(Arc::new(LinearGradient::default()), [0.0, 1.0]).unwrap();
        terrace.invert = true;
        assert_eq!(terrace.sample_3d(0.5, 0.0, 0.0), 0.75);
    }

    #[test]
    fn terrace_with_steps_spans_unit_range() {
        let terrace = Terrace::with_steps(constant(0.0), 5).unwrap();
        assert_eq!(terrace.control_points(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert!(Terrace::with_steps(constant(0.0), 1).is_err());
        assert!(Terrace::new(constant(0.0), [0.5]).is_err());
    }

    #[test]
    fn abs_invert_exponent() {
        assert_eq!(Abs::new(constant(-0.75)).sample_3d(0.0, 0.0, 0.0), 0.75);
        assert_eq!(Invert::new(constant(0.25)).sample_2d(0.0, 0.0), -0.25);
        assert_eq!(Exponent::new(constant(0.0), 2.0).sample_3d(0.0, 0.0, 0.0), -0.5);
        assert_eq!(Exponent::new(constant(1.0), 3.0).sample_4d(0.0, 0.0, 0.0, 0.0), 1.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clamp_stays_in_range(
                value in -1e6_f64..1e6,
                lower in -10.0_f64..0.0,
                upper in 0.0_f64..10.0,
            ) {
                let clamp = Clamp::new(constant(value), lower, upper).unwrap();
                let v = clamp.sample_3d(0.0, 0.0, 0.0);
                prop_assert!(v >= lower && v <= upper);
            }

            #[test]
            fn terrace_stays_within_outer_points(value in -5.0_f64..5.0, invert: bool) {
                let mut terrace = Terrace::new(constant(value), [-0.5, 0.1, 0.75]).unwrap();
                terrace.invert = invert;
                let v = terrace.sample_3d(0.0, 0.0, 0.0);
                prop_assert!((-0.5..=0.75).contains(&v), "terrace({}) = {}", value, v);
            }
        }
    }
}
