//! Forgiving lookups of module parameters in a JSON object.
//!
//! Each helper takes the override object, a key and a default; a missing key
//! or a value of the wrong type yields the default. They never fail, so a
//! partially valid override object still produces a usable configuration.
//! Range checks happen later, in the constructors and setters that receive
//! the values.

use serde_json::Value;

use crate::filter::FractalParams;
use crate::primitive::Quality;

/// Any JSON number, integers included.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// A non-negative integer that fits in `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// An integer in `i32` range, as used for seeds.
pub fn param_i32(params: &Value, name: &str, default: i32) -> i32 {
    params
        .get(name)
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map_or_else(|| default.to_owned(), String::from)
}

/// A quality name; unparseable names fall back to `default`.
pub fn param_quality(params: &Value, name: &str, default: Quality) -> Quality {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Overlays the fractal keys present in `params` onto `base`.
///
/// Recognized keys: `frequency`, `lacunarity`, `octave_count`,
/// `persistence`, `offset`, `gain`, `spectral_exponent`.
pub fn fractal_overrides(params: &Value, base: FractalParams) -> FractalParams {
    FractalParams {
        frequency: param_f64(params, "frequency", base.frequency),
        lacunarity: param_f64(params, "lacunarity", base.lacunarity),
        octave_count: param_f64(params, "octave_count", base.octave_count),
        persistence: param_f64(params, "persistence", base.persistence),
        offset: param_f64(params, "offset", base.offset),
        gain: param_f64(params, "gain", base.gain),
        spectral_exponent: param_f64(params, "spectral_exponent", base.spectral_exponent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_read_as_f64() {
        let params = json!({"frequency": 2.5, "octave_count": 8});
        assert_eq!(param_f64(&params, "frequency", 1.0), 2.5);
        assert_eq!(param_f64(&params, "octave_count", 6.0), 8.0);
        assert_eq!(param_f64(&params, "lacunarity", 2.0), 2.0);
        assert_eq!(param_f64(&json!({"gain": "high"}), "gain", 2.0), 2.0);
        assert_eq!(param_f64(&json!({"gain": null}), "gain", 2.0), 2.0);
    }

    #[test]
    fn non_objects_yield_defaults() {
        let params = json!([1, 2, 3]);
        assert_eq!(param_f64(&params, "frequency", 1.0), 1.0);
        assert_eq!(param_i32(&params, "seed", 7), 7);
        assert!(param_bool(&params, "seamless", true));
    }

    #[test]
    fn usize_rejects_fractions_and_negatives() {
        assert_eq!(param_usize(&json!({"width": 512}), "width", 256), 512);
        assert_eq!(param_usize(&json!({"width": 2.5}), "width", 256), 256);
        assert_eq!(param_usize(&json!({"width": -1}), "width", 256), 256);
    }

    #[test]
    fn i32_accepts_negative_seeds_in_range() {
        assert_eq!(param_i32(&json!({"seed": -42}), "seed", 0), -42);
        assert_eq!(param_i32(&json!({"seed": 3_000_000_000_u64}), "seed", 5), 5);
        assert_eq!(param_i32(&json!({"seed": 1.5}), "seed", 5), 5);
    }

    #[test]
    fn bools_and_strings() {
        let params = json!({"seamless": true, "gradient": "terrain", "count": 1});
        assert!(param_bool(&params, "seamless", false));
        assert!(!param_bool(&params, "count", false));
        assert_eq!(param_string(&params, "gradient", "grayscale"), "terrain");
        assert_eq!(param_string(&params, "count", "grayscale"), "grayscale");
        assert_eq!(param_string(&json!({"gradient": ""}), "gradient", "x"), "");
    }

    #[test]
    fn quality_names_parse_case_insensitively() {
        assert_eq!(param_quality(&json!({"quality": "BEST"}), "quality", Quality::Standard), Quality::Best);
        assert_eq!(param_quality(&json!({"quality": "ultra"}), "quality", Quality::Fast), Quality::Fast);
    }

    #[test]
    fn fractal_overrides_only_touch_present_keys() {
        let base = FractalParams::default();
        let merged = fractal_overrides(&json!({"octave_count": 3, "gain": 1.5}), base);
        assert_eq!(merged.octave_count, 3.0);
        assert_eq!(merged.gain, 1.5);
        assert_eq!(merged.frequency, base.frequency);
        assert_eq!(merged.spectral_exponent, base.spectral_exponent);
    }
}
