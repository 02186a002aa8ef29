//! Combiners: merge the outputs of two source modules point by point.

use std::fmt;
use std::sync::Arc;

use crate::module::{Sample2D, Sample3D, Sample4D};

macro_rules! binary_combiner {
    ($(#[$doc:meta])* $name:ident, |$a:ident, $b:ident| $body:expr) => {
        $(#[$doc])*
        pub struct $name<A: ?Sized = dyn Sample3D, B: ?Sized = A> {
            left: Arc<A>,
            right: Arc<B>,
        }

        impl<A: ?Sized, B: ?Sized> $name<A, B> {
            pub fn new(left: Arc<A>, right: Arc<B>) -> Self {
                Self { left, right }
            }

            pub fn left(&self) -> &Arc<A> {
                &self.left
            }

            pub fn right(&self) -> &Arc<B> {
                &self.right
            }

            #[inline]
            fn combine($a: f64, $b: f64) -> f64 {
                $body
            }
        }

        impl<A: ?Sized, B: ?Sized> fmt::Debug for $name<A, B> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name)).finish_non_exhaustive()
            }
        }

        impl<A: Sample2D + ?Sized, B: Sample2D + ?Sized> Sample2D for $name<A, B> {
            fn sample_2d(&self, x: f64, y: f64) -> f64 {
                Self::combine(self.left.sample_2d(x, y), self.right.sample_2d(x, y))
            }
        }

        impl<A: Sample3D + ?Sized, B: Sample3D + ?Sized> Sample3D for $name<A, B> {
            fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
                Self::combine(self.left.sample_3d(x, y, z), self.right.sample_3d(x, y, z))
            }
        }

        impl<A: Sample4D + ?Sized, B: Sample4D + ?Sized> Sample4D for $name<A, B> {
            fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
                Self::combine(
                    self.left.sample_4d(x, y, z, w),
                    self.right.sample_4d(x, y, z, w),
                )
            }
        }
    };
}

binary_combiner!(
    /// `left + right`.
    Add,
    |a, b| a + b
);

binary_combiner!(
    /// `left * right`.
    Multiply,
    |a, b| a * b
);

binary_combiner!(
    /// The smaller of the two outputs.
    Min,
    |a, b| a.min(b)
);

binary_combiner!(
    /// The larger of the two outputs.
    Max,
    |a, b| a.max(b)
);

binary_combiner!(
    /// `left` raised to the power `right`.
    Power,
    |a, b| a.powf(b)
);
