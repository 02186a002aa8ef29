//! Row-major grid of scalar noise values produced by a map builder.
//!
//! Reads outside the grid return a configurable border value, or wrap
//! toroidally through [`NoiseMap::get_wrapped`]. Values are stored as
//! sampled; nothing is clamped.

use crate::error::NoiseError;

/// A `width * height` grid of noise values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseMap {
    width: usize,
    height: usize,
    data: Vec<f64>,
    border_value: f64,
}

fn checked_len(width: usize, height: usize) -> Result<usize, NoiseError> {
    if width == 0 || height == 0 {
        return Err(NoiseError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(NoiseError::InvalidDimensions)
}

impl NoiseMap {
    /// Creates a zero-filled map.
    ///
    /// Returns `NoiseError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, NoiseError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
            border_value: 0.0,
        })
    }

    /// Wraps pre-computed row-major values, validating the length.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, NoiseError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(NoiseError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
            border_value: 0.0,
        })
    }

    /// Resizes to `width * height` and zeroes every value. The border value
    /// is kept.
    pub fn set_size(&mut self, width: usize, height: usize) -> Result<(), NoiseError> {
        let len = checked_len(width, height)?;
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(len, 0.0);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True for a default-constructed map that has never been sized.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value returned by [`NoiseMap::get`] outside the grid.
    pub fn border_value(&self) -> f64 {
        self.border_value
    }

    pub fn set_border_value(&mut self, value: f64) {
        self.border_value = value;
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        let in_range = |v: isize, len: usize| v >= 0 && (v as usize) < len;
        if in_range(x, self.width) && in_range(y, self.height) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Value at `(x, y)`, or the border value outside the grid.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        self.index(x, y)
            .map_or(self.border_value, |i| self.data[i])
    }

    /// Value at `(x, y)` with toroidal wrapping. Returns the border value
    /// only for an empty map.
    pub fn get_wrapped(&self, x: isize, y: isize) -> f64 {
        if self.is_empty() {
            return self.border_value;
        }
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        self.data[yi * self.width + xi]
    }

    /// Writes `value` at `(x, y)`. Writes outside the grid are ignored.
    pub fn set(&mut self, x: isize, y: isize, value: f64) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// One row of values.
    pub fn row(&self, y: usize) -> Option<&[f64]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.data[start..start + self.width])
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut [f64]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&mut self.data[start..start + self.width])
    }

    /// Smallest and largest stored values, `None` for an empty map. NaN
    /// values are skipped.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(NoiseMap::new(0, 4), Err(NoiseError::InvalidDimensions)));
        assert!(matches!(NoiseMap::new(4, 0), Err(NoiseError::InvalidDimensions)));
    }

    #[test]
    fn new_rejects_overflow() {
        assert!(matches!(
            NoiseMap::new(usize::MAX, 2),
            Err(NoiseError::InvalidDimensions)
        ));
    }

    #[test]
    fn default_is_empty() {
        let map = NoiseMap::default();
        assert!(map.is_empty());
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get_wrapped(3, 3), 0.0);
        assert_eq!(map.min_max(), None);
    }

    #[test]
    fn out_of_range_reads_return_border_value() {
        let mut map = NoiseMap::new(3, 2).unwrap();
        map.set_border_value(-7.0);
        map.set(1, 1, 0.5);
        assert_eq!(map.get(1, 1), 0.5);
        assert_eq!(map.get(-1, 0), -7.0);
        assert_eq!(map.get(3, 0), -7.0);
        assert_eq!(map.get(0, 2), -7.0);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut map = NoiseMap::new(2, 2).unwrap();
        map.set(5, 5, 1.0);
        map.set(-1, 0, 1.0);
        assert!(map.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn wrapped_reads_are_toroidal() {
        let map = NoiseMap::from_data(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(map.get_wrapped(-1, 0), 2.0);
        assert_eq!(map.get_wrapped(2, 1), 3.0);
        assert_eq!(map.get_wrapped(-2, -1), 3.0);
    }

    #[test]
    fn values_are_not_clamped() {
        let mut map = NoiseMap::new(1, 1).unwrap();
        map.set(0, 0, 3.5);
        assert_eq!(map.get(0, 0), 3.5);
    }

    #[test]
    fn from_data_validates_length() {
        assert!(matches!(
            NoiseMap::from_data(2, 2, vec![0.0; 3]),
            Err(NoiseError::DimensionMismatch { rhs_w: 3, .. })
        ));
    }

    #[test]
    fn set_size_resets_values_and_keeps_border() {
        let mut map = NoiseMap::from_data(2, 1, vec![1.0, 1.0]).unwrap();
        map.set_border_value(0.25);
        map.set_size(3, 3).unwrap();
        assert_eq!(map.data(), &[0.0; 9]);
        assert_eq!(map.border_value(), 0.25);
        assert!(map.set_size(0, 3).is_err());
    }

    #[test]
    fn rows_and_min_max() {
        let map = NoiseMap::from_data(3, 2, vec![0.5, -1.0, 2.0, 0.0, f64::NAN, 1.0]).unwrap();
        assert_eq!(map.row(0), Some(&[0.5, -1.0, 2.0][..]));
        assert_eq!(map.row(2), None);
        assert_eq!(map.min_max(), Some((-1.0, 2.0)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrapped_reads_match_in_range_reads(
                w in 1_usize..16,
                h in 1_usize..16,
                x in -64_isize..64,
                y in -64_isize..64,
            ) {
                let data: Vec<f64> = (0..w * h).map(|i| i as f64).collect();
                let map = NoiseMap::from_data(w, h, data).unwrap();
                let xi = x.rem_euclid(w as isize);
                let yi = y.rem_euclid(h as isize);
                prop_assert_eq!(map.get_wrapped(x, y), map.get(xi, yi));
            }
        }
    }
}
