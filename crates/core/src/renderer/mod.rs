//! Renderers: turn a built [`NoiseMap`] into pixels or heights.
//!
//! - [`image`] -- gradient-colored image with optional directional lighting.
//! - [`normal_map`] -- tangent-space normal map.
//! - [`heightmap`] -- 16-bit heightmap over a fixed or fitted value range.
//!
//! Every renderer checks its configuration before writing anything, writes
//! rows in increasing order, and reports each completed row to the same
//! [`ProgressCallback`] contract as the map builder.

pub mod heightmap;
pub mod image;
pub mod normal_map;

pub use heightmap::{HeightRange, HeightmapRenderer};
pub use image::{ImageRenderer, LightParams};
pub use normal_map::NormalMapRenderer;

use tracing::{trace, warn};

use crate::builder::ProgressCallback;
use crate::error::NoiseError;
use crate::noise_map::NoiseMap;

/// Returns the bound input map, rejecting a missing or empty one.
fn bound_input<'m>(input: Option<&'m NoiseMap>) -> Result<&'m NoiseMap, NoiseError> {
    let map = input.ok_or(NoiseError::Unbound("input noise map"))?;
    if map.is_empty() {
        return Err(NoiseError::InvalidDimensions);
    }
    Ok(map)
}

fn check_output_size(map: &NoiseMap, width: usize, height: usize) -> Result<(), NoiseError> {
    if map.width() == width && map.height() == height {
        Ok(())
    } else {
        Err(NoiseError::DimensionMismatch {
            lhs_w: map.width(),
            lhs_h: map.height(),
            rhs_w: width,
            rhs_h: height,
        })
    }
}

/// Reports a completed row, turning a `Break` into `Cancelled`.
fn finish_row(
    progress: &mut Option<ProgressCallback<'_>>,
    pass: &'static str,
    row: usize,
) -> Result<(), NoiseError> {
    trace!(pass, row, "row complete");
    if let Some(callback) = progress.as_mut() {
        if callback(row).is_break() {
            warn!(pass, row, "render cancelled");
            return Err(NoiseError::Cancelled { row });
        }
    }
    Ok(())
}

/// A cell and its four neighbors. `up` is the next row, `down` the previous.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Neighborhood {
    center: f64,
    left: f64,
    right: f64,
    down: f64,
    up: f64,
}

impl Neighborhood {
    /// With `wrap`, neighbors past an edge come from the opposite edge;
    /// otherwise the center value stands in for them.
    fn at(map: &NoiseMap, x: usize, y: usize, wrap: bool) -> Self {
        let (xi, yi) = (x as isize, y as isize);
        let center = map.get(xi, yi);
        let read = |dx: isize, dy: isize| {
            if wrap {
                map.get_wrapped(xi + dx, yi + dy)
            } else {
                let (nx, ny) = (xi + dx, yi + dy);
                let inside = nx >= 0
                    && ny >= 0
                    && (nx as usize) < map.width()
                    && (ny as usize) < map.height();
                if inside {
                    map.get(nx, ny)
                } else {
                    center
                }
            }
        };
        Self {
            center,
            left: read(-1, 0),
            right: read(1, 0),
            down: read(0, -1),
            up: read(0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;

    fn ramp() -> NoiseMap {
        NoiseMap::from_data(3, 2, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap()
    }

    #[test]
    fn neighbors_clamp_to_center_at_edges() {
        let n = Neighborhood::at(&ramp(), 0, 0, false);
        assert_eq!(
            n,
            Neighborhood {
                center: 0.0,
                left: 0.0,
                right: 1.0,
                down: 0.0,
                up: 10.0,
            }
        );
    }

    #[test]
    fn neighbors_wrap_when_requested() {
        let n = Neighborhood::at(&ramp(), 0, 0, true);
        assert_eq!(n.left, 2.0);
        assert_eq!(n.down, 10.0);
    }

    #[test]
    fn missing_or_empty_input_is_rejected() {
        assert!(matches!(bound_input(None), Err(NoiseError::Unbound(_))));
        let empty = NoiseMap::default();
        assert!(matches!(bound_input(Some(&empty)), Err(NoiseError::InvalidDimensions)));
    }

    #[test]
    fn output_size_must_match() {
        assert!(check_output_size(&ramp(), 3, 2).is_ok());
        assert!(matches!(
            check_output_size(&ramp(), 2, 3),
            Err(NoiseError::DimensionMismatch { lhs_w: 3, rhs_w: 2, .. })
        ));
    }

    #[test]
    fn finish_row_maps_break_to_cancelled() {
        let mut progress: Option<ProgressCallback<'_>> =
            Some(Box::new(|row| if row > 0 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }));
        assert!(finish_row(&mut progress, "test", 0).is_ok());
        assert!(matches!(
            finish_row(&mut progress, "test", 1),
            Err(NoiseError::Cancelled { row: 1 })
        ));
        assert!(finish_row(&mut None, "test", 5).is_ok());
    }
}
