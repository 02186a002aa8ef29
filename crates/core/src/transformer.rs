//! Transformers: move the input point before sampling the source.

use std::fmt;
use std::sync::Arc;

use glam::{DMat3, DVec3, EulerRot};

use crate::module::{Sample2D, Sample3D};

/// Offsets applied before sampling each distortion module, so the three
/// axes never hit lattice zero-crossings together.
const X_OFFSET: DVec3 = DVec3::new(12414.0 / 65536.0, 65124.0 / 65536.0, 31337.0 / 65536.0);
const Y_OFFSET: DVec3 = DVec3::new(26519.0 / 65536.0, 18128.0 / 65536.0, 60493.0 / 65536.0);
const Z_OFFSET: DVec3 = DVec3::new(53820.0 / 65536.0, 11213.0 / 65536.0, 44845.0 / 65536.0);

/// Randomly displaces the input point with three distortion modules, one per
/// axis, each scaled by `power`.
pub struct Turbulence<S: ?Sized = dyn Sample3D, D: ?Sized = S> {
    source: Arc<S>,
    x_distort: Arc<D>,
    y_distort: Arc<D>,
    z_distort: Arc<D>,
    pub power: f64,
}

impl<S: ?Sized, D: ?Sized> Turbulence<S, D> {
    pub const DEFAULT_POWER: f64 = 1.0;

    pub fn new(
        source: Arc<S>,
        x_distort: Arc<D>,
        y_distort: Arc<D>,
        z_distort: Arc<D>,
        power: f64,
    ) -> Self {
        Self {
            source,
            x_distort,
            y_distort,
            z_distort,
            power,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S: ?Sized, D: ?Sized> fmt::Debug for Turbulence<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Turbulence")
            .field("power", &self.power)
            .finish_non_exhaustive()
    }
}

impl<S: Sample2D + ?Sized, D: Sample2D + ?Sized> Sample2D for Turbulence<S, D> {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let dx = self.x_distort.sample_2d(x + X_OFFSET.x, y + X_OFFSET.y);
        let dy = self.y_distort.sample_2d(x + Y_OFFSET.x, y + Y_OFFSET.y);
        self.source
            .sample_2d(x + dx * self.power, y + dy * self.power)
    }
}

impl<S: Sample3D + ?Sized, D: Sample3D + ?Sized> Sample3D for Turbulence<S, D> {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = DVec3::new(x, y, z);
        let sample = |m: &D, o: DVec3| {
            let q = p + o;
            m.sample_3d(q.x, q.y, q.z)
        };
        let dx = sample(&*self.x_distort, X_OFFSET);
        let dy = sample(&*self.y_distort, Y_OFFSET);
        let dz = sample(&*self.z_distort, Z_OFFSET);
        self.source.sample_3d(
            x + dx * self.power,
            y + dy * self.power,
            z + dz * self.power,
        )
    }
}

/// Adds the outputs of three displacement modules to the input point.
pub struct Displace<S: ?Sized = dyn Sample3D, D: ?Sized = S> {
    source: Arc<S>,
    x_displace: Arc<D>,
    y_displace: Arc<D>,
    z_displace: Arc<D>,
}

impl<S: ?Sized, D: ?Sized> Displace<S, D> {
    pub fn new(source: Arc<S>, x_displace: Arc<D>, y_displace: Arc<D>, z_displace: Arc<D>) -> Self {
        Self {
            source,
            x_displace,
            y_displace,
            z_displace,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S: ?Sized, D: ?Sized> fmt::Debug for Displace<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Displace").finish_non_exhaustive()
    }
}

impl<S: Sample2D + ?Sized, D: Sample2D + ?Sized> Sample2D for Displace<S, D> {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let dx = self.x_displace.sample_2d(x, y);
        let dy = self.y_displace.sample_2d(x, y);
        self.source.sample_2d(x + dx, y + dy)
    }
}

impl<S: Sample3D + ?Sized, D: Sample3D + ?Sized> Sample3D for Displace<S, D> {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let dx = self.x_displace.sample_3d(x, y, z);
        let dy = self.y_displace.sample_3d(x, y, z);
        let dz = self.z_displace.sample_3d(x, y, z);
        self.source.sample_3d(x + dx, y + dy, z + dz)
    }
}

/// Multiplies the input point component-wise before sampling.
pub struct ScalePoint<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    pub scale: DVec3,
}

impl<S: ?Sized> ScalePoint<S> {
    pub fn new(source: Arc<S>, scale: DVec3) -> Self {
        Self { source, scale }
    }
}

impl<S: ?Sized> fmt::Debug for ScalePoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalePoint")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl<S: Sample2D + ?Sized> Sample2D for ScalePoint<S> {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.source.sample_2d(x * self.scale.x, y * self.scale.y)
    }
}

impl<S: Sample3D + ?Sized> Sample3D for ScalePoint<S> {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = DVec3::new(x, y, z) * self.scale;
        self.source.sample_3d(p.x, p.y, p.z)
    }
}

/// Offsets the input point before sampling.
pub struct TranslatePoint<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    pub translation: DVec3,
}

impl<S: ?Sized> TranslatePoint<S> {
    pub fn new(source: Arc<S>, translation: DVec3) -> Self {
        Self {
            source,
            translation,
        }
    }
}

impl<S: ?Sized> fmt::Debug for TranslatePoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatePoint")
            .field("translation", &self.translation)
            .finish_non_exhaustive()
    }
}

impl<S: Sample2D + ?Sized> Sample2D for TranslatePoint<S> {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.source
            .sample_2d(x + self.translation.x, y + self.translation.y)
    }
}

impl<S: Sample3D + ?Sized> Sample3D for TranslatePoint<S> {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = DVec3::new(x, y, z) + self.translation;
        self.source.sample_3d(p.x, p.y, p.z)
    }
}

/// Rotates the input point about the origin before sampling.
pub struct RotatePoint<S: ?Sized = dyn Sample3D> {
    source: Arc<S>,
    angles: DVec3,
    rotation: DMat3,
}

impl<S: ?Sized> RotatePoint<S> {
    /// Angles are in degrees, applied about x, then y, then z.
    pub fn new(source: Arc<S>, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        let mut rotate = Self {
            source,
            angles: DVec3::ZERO,
            rotation: DMat3::IDENTITY,
        };
        rotate.set_angles(x_deg, y_deg, z_deg);
        rotate
    }

    /// Rebuilds the rotation matrix.
    pub fn set_angles(&mut self, x_deg: f64, y_deg: f64, z_deg: f64) {
        self.angles = DVec3::new(x_deg, y_deg, z_deg);
        self.rotation = DMat3::from_euler(
            EulerRot::ZYX,
            z_deg.to_radians(),
            y_deg.to_radians(),
            x_deg.to_radians(),
        );
    }

    pub fn angles(&self) -> DVec3 {
        self.angles
    }
}

impl<S: ?Sized> fmt::Debug for RotatePoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatePoint")
            .field("angles", &self.angles)
            .finish_non_exhaustive()
    }
}

impl<S: Sample3D + ?Sized> Sample3D for RotatePoint<S> {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = self.rotation * DVec3::new(x, y, z);
        self.source.sample_3d(p.x, p.y, p.z)
    }
}
