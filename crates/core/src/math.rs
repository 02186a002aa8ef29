//! Scalar helpers shared by every module: interpolation, S-curves, coordinate
//! folding and the lat/lon to unit-sphere conversion.

/// Coordinates at or beyond this magnitude are folded back into range.
const FOLD_THRESHOLD: f64 = 1_073_741_824.0;

/// Period of the fold. Lattice hashes only look at the low 31 bits of their
/// integer coordinates, so shifting by a multiple of 2^31 never changes the
/// noise value.
const FOLD_PERIOD: f64 = 2_147_483_648.0;

/// IEEE 754 remainder: `x - y * n` where `n` is `x / y` rounded half-to-even.
fn ieee_remainder(x: f64, y: f64) -> f64 {
    x - y * (x / y).round_ties_even()
}

/// Folds a coordinate so that its lattice cell fits in an `i32`.
///
/// Values with magnitude below 2^30 are returned unchanged. Larger values are
/// wrapped symmetrically into [-2^30, 2^30] with an IEEE remainder, which is
/// exact for every finite input and makes the result identical across
/// platforms. Folding is idempotent.
pub fn to_int32_range(value: f64) -> f64 {
    if value.abs() >= FOLD_THRESHOLD {
        ieee_remainder(value, FOLD_PERIOD)
    } else {
        value
    }
}

/// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Cubic interpolation between `n1` and `n2`, shaped by their outer
/// neighbours `n0` and `n3`. Returns `n1` at `t = 0` and `n2` at `t = 1`.
///
/// This is libnoise's cubic, not Catmull-Rom: it does not reproduce
/// collinear points.
pub fn cubic_interpolate(n0: f64, n1: f64, n2: f64, n3: f64, t: f64) -> f64 {
    let p = (n3 - n2) - (n0 - n1);
    let q = (n0 - n1) - p;
    let r = n2 - n0;
    let s = n1;
    ((p * t + q) * t + r) * t + s
}

/// Cubic S-curve `3t² - 2t³`; first derivative is zero at both ends.
#[inline]
pub fn scurve3(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Quintic S-curve `6t⁵ - 15t⁴ + 10t³`; first and second derivatives are
/// zero at both ends.
#[inline]
pub fn scurve5(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Converts latitude/longitude in degrees to a point on the unit sphere.
///
/// Latitude runs along y; longitude 0 points along +x.
pub fn lat_lon_to_xyz(lat: f64, lon: f64) -> (f64, f64, f64) {
    let lat = lat.to_radians();
    let lon = lon.to_radians();
    let r = lat.cos();
    (r * lon.cos(), lat.sin(), r * lon.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn small_values_are_not_folded() {
        for v in [0.0, 1.5, -1.5, 1e9, -1e9, 1_073_741_823.0] {
            assert_eq!(to_int32_range(v), v);
        }
    }

    #[test]
    fn large_values_fold_into_i32_range() {
        for v in [3e9, -3e9, 1e15, -1e15, 1e300, 7.25e12] {
            let folded = to_int32_range(v);
            assert!(
                folded.abs() <= FOLD_THRESHOLD,
                "{v} folded to {folded}, outside +/-2^30"
            );
        }
    }

    #[test]
    fn folding_shifts_by_whole_periods() {
        let v = 5.0e9 + 0.375;
        let folded = to_int32_range(v);
        let periods = (v - folded) / FOLD_PERIOD;
        assert!(
            (periods - periods.round()).abs() < EPSILON,
            "fold moved {v} by {periods} periods"
        );
        assert!((folded.fract().abs() - 0.375).abs() < EPSILON);
    }

    #[test]
    fn fold_boundary_is_stable() {
        assert_eq!(to_int32_range(FOLD_THRESHOLD), FOLD_THRESHOLD);
        assert_eq!(to_int32_range(-FOLD_THRESHOLD), -FOLD_THRESHOLD);
        assert_eq!(to_int32_range(FOLD_THRESHOLD + 1.0), -FOLD_THRESHOLD + 1.0);
    }

    #[test]
    fn scurve5_boundary_values() {
        assert_eq!(scurve5(0.0), 0.0);
        assert_eq!(scurve5(1.0), 1.0);
        assert!((scurve5(0.5) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn scurve3_boundary_values() {
        assert_eq!(scurve3(0.0), 0.0);
        assert_eq!(scurve3(1.0), 1.0);
        assert!((scurve3(0.5) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn cubic_interpolate_hits_inner_points() {
        assert!((cubic_interpolate(-3.0, 1.0, 2.0, 9.0, 0.0) - 1.0).abs() < EPSILON);
        assert!((cubic_interpolate(-3.0, 1.0, 2.0, 9.0, 1.0) - 2.0).abs() < EPSILON);
    }

    #[test]
    fn cubic_interpolate_matches_reference_values() {
        // p = 2, q = -3, r = 2, s = 1
        let v = cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.25);
        assert!((v - 1.34375).abs() < EPSILON, "got {v}");
        let v = cubic_interpolate(-3.0, 1.0, 2.0, 9.0, 0.5);
        // p = 11, q = -15, r = 5, s = 1
        assert!((v - 1.125).abs() < EPSILON, "got {v}");
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn lat_lon_origin_is_positive_x() {
        let (x, y, z) = lat_lon_to_xyz(0.0, 0.0);
        assert!((x - 1.0).abs() < EPSILON && y.abs() < EPSILON && z.abs() < EPSILON);
    }

    #[test]
    fn lat_lon_north_pole_is_positive_y() {
        let (x, y, z) = lat_lon_to_xyz(90.0, 37.0);
        assert!(x.abs() < 1e-9 && (y - 1.0).abs() < EPSILON && z.abs() < 1e-9);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn folding_is_idempotent(v in -1e18_f64..1e18) {
                let once = to_int32_range(v);
                prop_assert_eq!(to_int32_range(once), once);
            }

            #[test]
            fn folded_values_fit_in_i32(v in prop::num::f64::NORMAL) {
                let folded = to_int32_range(v);
                prop_assert!(folded.floor() >= i32::MIN as f64);
                prop_assert!(folded.floor() < i32::MAX as f64);
            }

            #[test]
            fn scurve5_is_monotonic(a in 0.0_f64..=1.0, b in 0.0_f64..=1.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(scurve5(lo) <= scurve5(hi));
            }

            #[test]
            fn scurve5_stays_in_unit_interval(t in 0.0_f64..=1.0) {
                let v = scurve5(t);
                prop_assert!((0.0..=1.0).contains(&v), "scurve5({}) = {}", t, v);
            }

            #[test]
            fn lat_lon_lands_on_unit_sphere(lat in -90.0_f64..=90.0, lon in -180.0_f64..=180.0) {
                let (x, y, z) = lat_lon_to_xyz(lat, lon);
                let len = (x * x + y * y + z * z).sqrt();
                prop_assert!((len - 1.0).abs() < 1e-9);
            }
        }
    }
}
