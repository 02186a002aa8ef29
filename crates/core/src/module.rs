//! The sampling contract every noise module implements.
//!
//! A module is a pure function from 2, 3 or 4 coordinates to a scalar that is
//! roughly in [-1, 1]. Each dimension is its own capability trait, so what a
//! node can be sampled in is known at compile time: a combinator generic over
//! its child type `S` implements exactly the capabilities `S` provides.
//!
//! All traits are object safe. Trees are assembled from `Arc<dyn Sample3D>`
//! (or the 2D/4D counterparts) when children must be shared between parents.

use std::sync::Arc;

use noise::NoiseFn;

/// A module that can be sampled on the plane.
pub trait Sample2D: Send + Sync {
    fn sample_2d(&self, x: f64, y: f64) -> f64;
}

/// A module that can be sampled in three dimensions.
pub trait Sample3D: Send + Sync {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64;
}

/// A module that can be sampled in four dimensions.
pub trait Sample4D: Send + Sync {
    fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64;
}

macro_rules! forward_sample {
    ($wrapper:ty) => {
        impl<T: Sample2D + ?Sized> Sample2D for $wrapper {
            fn sample_2d(&self, x: f64, y: f64) -> f64 {
                (**self).sample_2d(x, y)
            }
        }

        impl<T: Sample3D + ?Sized> Sample3D for $wrapper {
            fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
                (**self).sample_3d(x, y, z)
            }
        }

        impl<T: Sample4D + ?Sized> Sample4D for $wrapper {
            fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
                (**self).sample_4d(x, y, z, w)
            }
        }
    };
}

forward_sample!(&T);
forward_sample!(Box<T>);
forward_sample!(Arc<T>);

/// A root module bound to a map builder, tagged with the dimension it is
/// sampled in. The builder checks the tag against its projection before the
/// first sample is taken.
#[derive(Clone)]
pub enum ModuleRef {
    Dim2(Arc<dyn Sample2D>),
    Dim3(Arc<dyn Sample3D>),
    Dim4(Arc<dyn Sample4D>),
}

impl ModuleRef {
    /// Number of input coordinates the bound module takes.
    pub fn dims(&self) -> usize {
        match self {
            ModuleRef::Dim2(_) => 2,
            ModuleRef::Dim3(_) => 3,
            ModuleRef::Dim4(_) => 4,
        }
    }
}

impl std::fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModuleRef({}D)", self.dims())
    }
}

/// Exposes a generator from the `noise` crate as a module.
///
/// Implements whichever of [`Sample2D`]/[`Sample3D`]/[`Sample4D`] the wrapped
/// generator supports.
#[derive(Debug, Clone)]
pub struct External<N> {
    inner: N,
}

impl<N> External<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: NoiseFn<f64, 2> + Send + Sync> Sample2D for External<N> {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.inner.get([x, y])
    }
}

impl<N: NoiseFn<f64, 3> + Send + Sync> Sample3D for External<N> {
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.inner.get([x, y, z])
    }
}

impl<N: NoiseFn<f64, 4> + Send + Sync> Sample4D for External<N> {
    fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        self.inner.get([x, y, z, w])
    }
}
