//! Analytic shapes.

use glam::{DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};

use crate::math::to_int32_range;
use crate::module::{Sample2D, Sample3D, Sample4D};

/// Returns the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for Constant {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Sample2D for Constant {
    fn sample_2d(&self, _x: f64, _y: f64) -> f64 {
        self.value
    }
}

impl Sample3D for Constant {
    fn sample_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        self.value
    }
}

impl Sample4D for Constant {
    fn sample_4d(&self, _x: f64, _y: f64, _z: f64, _w: f64) -> f64 {
        self.value
    }
}

/// Maps a radius to 1 on integer shells and -1 halfway between them.
fn shell(radius: f64) -> f64 {
    let small = radius - radius.floor();
    let nearest = small.min(1.0 - small);
    1.0 - nearest * 4.0
}

/// Concentric spheres centred on the origin, one shell per unit radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spheres {
    pub frequency: f64,
}

impl Spheres {
    pub fn new(frequency: f64) -> Self {
        Self { frequency }
    }
}

impl Default for Spheres {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Sample3D for Spheres {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        shell(DVec3::new(x, y, z).length() * self.frequency)
    }
}

/// Concentric cylinders around the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinders {
    pub frequency: f64,
}

impl Cylinders {
    pub fn new(frequency: f64) -> Self {
        Self { frequency }
    }
}

impl Default for Cylinders {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Sample3D for Cylinders {
    fn sample_3d(&self, x: f64, _y: f64, z: f64) -> f64 {
        shell(DVec2::new(x, z).length() * self.frequency)
    }
}

/// Alternating unit cubes of 1 and -1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkerboard;

fn parity(v: f64) -> i32 {
    (to_int32_range(v).floor() as i32) & 1
}

impl Sample2D for Checkerboard {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        if parity(x) ^ parity(y) == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Sample3D for Checkerboard {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        if parity(x) ^ parity(y) ^ parity(z) == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Projection of the input point onto a fixed axis. Lower-dimensional samples
/// use the leading components of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    axis: DVec4,
}

impl Default for LinearGradient {
    fn default() -> Self {
        Self { axis: DVec4::X }
    }
}

impl LinearGradient {
    pub fn new(axis: DVec4) -> Self {
        Self { axis }
    }

    pub fn axis(&self) -> DVec4 {
        self.axis
    }
}

impl Sample2D for LinearGradient {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.axis.truncate().truncate().dot(DVec2::new(x, y))
    }
}

impl Sample3D for LinearGradient {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.axis.truncate().dot(DVec3::new(x, y, z))
    }
}

impl Sample4D for LinearGradient {
    fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        self.axis.dot(DVec4::new(x, y, z, w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_coordinates() {
        let c = Constant::new(0.25);
        assert_eq!(c.sample_2d(9.0, -3.0), 0.25);
        assert_eq!(c.sample_3d(1e9, 0.0, 4.0), 0.25);
        assert_eq!(c.sample_4d(1.0, 2.0, 3.0, 4.0), 0.25);
    }

    #[test]
    fn spheres_peak_on_integer_radii() {
        let s = Spheres::default();
        assert_eq!(s.sample_3d(0.0, 0.0, 0.0), 1.0);
        assert_eq!(s.sample_3d(0.0, 2.0, 0.0), 1.0);
        assert_eq!(s.sample_3d(0.5, 0.0, 0.0), -1.0);
        assert!((s.sample_3d(0.0, 0.0, 1.25) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn spheres_frequency_scales_radius() {
        let s = Spheres::new(2.0);
        assert_eq!(s.sample_3d(0.25, 0.0, 0.0), -1.0);
    }

    #[test]
    fn cylinders_ignore_y() {
        let c = Cylinders::default();
        assert_eq!(c.sample_3d(0.5, 0.0, 0.0), c.sample_3d(0.5, 37.0, 0.0));
        assert_eq!(c.sample_3d(0.0, 5.0, 3.0), 1.0);
    }

    #[test]
    fn checkerboard_alternates() {
        let c = Checkerboard;
        assert_eq!(c.sample_2d(0.5, 0.5), 1.0);
        assert_eq!(c.sample_2d(1.5, 0.5), -1.0);
        assert_eq!(c.sample_2d(-0.5, 0.5), -1.0);
        assert_eq!(c.sample_3d(1.5, 1.5, 0.5), 1.0);
        assert_eq!(c.sample_3d(1.5, 1.5, 1.5), -1.0);
    }

    #[test]
    fn linear_gradient_projects_onto_axis() {
        let g = LinearGradient::new(DVec4::new(0.0, 2.0, 0.0, 1.0));
        assert_eq!(g.sample_2d(5.0, 3.0), 6.0);
        assert_eq!(g.sample_3d(5.0, 3.0, 9.0), 6.0);
        assert_eq!(g.sample_4d(5.0, 3.0, 9.0, -1.0), 5.0);
        assert_eq!(LinearGradient::default().sample_3d(0.75, 4.0, 4.0), 0.75);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn shells_stay_in_unit_range(
                x in -100.0_f64..100.0,
                y in -100.0_f64..100.0,
                z in -100.0_f64..100.0,
            ) {
                let s = Spheres::default().sample_3d(x, y, z);
                let c = Cylinders::default().sample_3d(x, y, z);
                prop_assert!((-1.0..=1.0).contains(&s));
                prop_assert!((-1.0..=1.0).contains(&c));
            }
        }
    }
}
