//! Map builder: samples a module over a projected 2D grid into a
//! [`NoiseMap`].
//!
//! Rows are produced in increasing order and, within a row, columns in
//! increasing order. After each completed row the optional progress callback
//! receives the row index; returning [`ControlFlow::Break`] stops the build
//! with [`NoiseError::Cancelled`].

use std::fmt;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::NoiseError;
use crate::math::{lat_lon_to_xyz, lerp};
use crate::module::ModuleRef;
use crate::noise_map::NoiseMap;

/// Called with each completed row index.
pub type ProgressCallback<'a> = Box<dyn FnMut(usize) -> ControlFlow<()> + 'a>;

/// How output grid cells map onto the module's input domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// A rectangle of the plane. 2D modules see `(x, y)`, 3D modules
    /// `(x, 0, y)` and 4D modules `(x, y, 0, 0)`. With `seamless`, each cell
    /// blends four samples so that opposite edges of the map tile.
    Planar {
        lower_x: f64,
        upper_x: f64,
        lower_y: f64,
        upper_y: f64,
        #[serde(default)]
        seamless: bool,
    },
    /// A latitude/longitude window of the unit sphere, in degrees. Rows run
    /// from `south` to `north`, columns from `west` to `east`.
    Spherical {
        south: f64,
        north: f64,
        west: f64,
        east: f64,
    },
    /// The surface of a unit cylinder around the y axis: columns sweep the
    /// angle (degrees), rows the height.
    Cylindrical {
        lower_angle: f64,
        upper_angle: f64,
        lower_height: f64,
        upper_height: f64,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Self::planar(0.0, 1.0, 0.0, 1.0)
    }
}

fn check_range(what: &'static str, lower: f64, upper: f64) -> Result<(), NoiseError> {
    if lower < upper {
        Ok(())
    } else {
        Err(NoiseError::InvalidBounds { what, lower, upper })
    }
}

fn check_within(
    what: &'static str,
    lower: f64,
    upper: f64,
    limit: f64,
) -> Result<(), NoiseError> {
    check_range(what, lower, upper)?;
    if lower < -limit || upper > limit {
        return Err(NoiseError::InvalidBounds { what, lower, upper });
    }
    Ok(())
}

impl Projection {
    /// A non-seamless planar projection.
    pub fn planar(lower_x: f64, upper_x: f64, lower_y: f64, upper_y: f64) -> Self {
        Self::Planar {
            lower_x,
            upper_x,
            lower_y,
            upper_y,
            seamless: false,
        }
    }

    pub fn spherical(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self::Spherical {
            south,
            north,
            west,
            east,
        }
    }

    pub fn cylindrical(
        lower_angle: f64,
        upper_angle: f64,
        lower_height: f64,
        upper_height: f64,
    ) -> Self {
        Self::Cylindrical {
            lower_angle,
            upper_angle,
            lower_height,
            upper_height,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Projection::Planar { .. } => "planar",
            Projection::Spherical { .. } => "spherical",
            Projection::Cylindrical { .. } => "cylindrical",
        }
    }

    /// Whether a module sampled in `dims` dimensions can be driven.
    pub fn supports(&self, dims: usize) -> bool {
        match self {
            Projection::Planar { .. } => (2..=4).contains(&dims),
            Projection::Spherical { .. } | Projection::Cylindrical { .. } => dims == 3,
        }
    }

    /// Every lower bound must be below its upper bound; spherical bounds must
    /// also lie within [-90, 90] latitude and [-180, 180] longitude.
    pub fn validate(&self) -> Result<(), NoiseError> {
        match *self {
            Projection::Planar {
                lower_x,
                upper_x,
                lower_y,
                upper_y,
                ..
            } => {
                check_range("x", lower_x, upper_x)?;
                check_range("y", lower_y, upper_y)
            }
            Projection::Spherical {
                south,
                north,
                west,
                east,
            } => {
                check_within("latitude", south, north, 90.0)?;
                check_within("longitude", west, east, 180.0)
            }
            Projection::Cylindrical {
                lower_angle,
                upper_angle,
                lower_height,
                upper_height,
            } => {
                check_range("angle", lower_angle, upper_angle)?;
                check_range("height", lower_height, upper_height)
            }
        }
    }

    /// Samples `source` for cell `(col, row)` of a `width * height` grid.
    ///
    /// `col == width` and `row == height` are accepted and address the far
    /// edge of the bounds. The caller has checked [`Projection::supports`].
    fn sample(&self, source: &ModuleRef, col: usize, row: usize, width: usize, height: usize) -> f64 {
        let (col, row) = (col as f64, row as f64);
        let (width, height) = (width as f64, height as f64);
        match *self {
            Projection::Planar {
                lower_x,
                upper_x,
                lower_y,
                upper_y,
                seamless,
            } => {
                let x_extent = upper_x - lower_x;
                let y_extent = upper_y - lower_y;
                let x = lower_x + col * (x_extent / width);
                let y = lower_y + row * (y_extent / height);
                if !seamless {
                    return sample_planar(source, x, y);
                }
                let sw = sample_planar(source, x, y);
                let se = sample_planar(source, x + x_extent, y);
                let nw = sample_planar(source, x, y + y_extent);
                let ne = sample_planar(source, x + x_extent, y + y_extent);
                let x_blend = 1.0 - (x - lower_x) / x_extent;
                let y_blend = 1.0 - (y - lower_y) / y_extent;
                let south = lerp(sw, se, x_blend);
                let north = lerp(nw, ne, x_blend);
                lerp(south, north, y_blend)
            }
            Projection::Spherical {
                south,
                north,
                west,
                east,
            } => {
                let lat = south + row * ((north - south) / height);
                let lon = west + col * ((east - west) / width);
                let (x, y, z) = lat_lon_to_xyz(lat, lon);
                sample_3d(source, x, y, z)
            }
            Projection::Cylindrical {
                lower_angle,
                upper_angle,
                lower_height,
                upper_height,
            } => {
                let angle = lower_angle + col * ((upper_angle - lower_angle) / width);
                let h = lower_height + row * ((upper_height - lower_height) / height);
                let a = angle.to_radians();
                sample_3d(source, a.cos(), h, a.sin())
            }
        }
    }
}

fn sample_planar(source: &ModuleRef, x: f64, y: f64) -> f64 {
    match source {
        ModuleRef::Dim2(m) => m.sample_2d(x, y),
        ModuleRef::Dim3(m) => m.sample_3d(x, 0.0, y),
        ModuleRef::Dim4(m) => m.sample_4d(x, y, 0.0, 0.0),
    }
}

fn sample_3d(source: &ModuleRef, x: f64, y: f64, z: f64) -> f64 {
    match source {
        ModuleRef::Dim3(m) => m.sample_3d(x, y, z),
        // Excluded by `Projection::supports`.
        ModuleRef::Dim2(_) | ModuleRef::Dim4(_) => f64::NAN,
    }
}

/// Where a builder is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildState {
    /// Not yet built, or reconfigured since the last build.
    #[default]
    Configured,
    Building,
    /// The output holds a complete map for the current configuration.
    Built,
}

/// Fills a [`NoiseMap`] by sampling a module through a [`Projection`].
///
/// Configuration setters take `&mut self`, so neither the configuration nor
/// the bound module can change while [`NoiseMapBuilder::build`] runs. Modules
/// are shared immutably through [`ModuleRef`].
#[derive(Default)]
pub struct NoiseMapBuilder<'a> {
    projection: Projection,
    width: usize,
    height: usize,
    source: Option<ModuleRef>,
    output: NoiseMap,
    progress: Option<ProgressCallback<'a>>,
    state: BuildState,
}

impl fmt::Debug for NoiseMapBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseMapBuilder")
            .field("projection", &self.projection)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source", &self.source)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> NoiseMapBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.state = BuildState::Configured;
    }

    /// Replaces the bounds of a planar projection, keeping its seamless flag.
    /// Any other projection is replaced by a planar one.
    pub fn set_bounds(&mut self, lower_x: f64, upper_x: f64, lower_y: f64, upper_y: f64) {
        let seamless = matches!(self.projection, Projection::Planar { seamless: true, .. });
        self.set_projection(Projection::Planar {
            lower_x,
            upper_x,
            lower_y,
            upper_y,
            seamless,
        });
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Output dimensions; validated when the build starts.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.state = BuildState::Configured;
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn set_source(&mut self, source: ModuleRef) {
        self.source = Some(source);
        self.state = BuildState::Configured;
    }

    /// Map to build into. It is resized and fully overwritten by each build.
    pub fn set_output(&mut self, output: NoiseMap) {
        self.output = output;
        self.state = BuildState::Configured;
    }

    pub fn output(&self) -> &NoiseMap {
        &self.output
    }

    /// Moves the output map out, leaving an empty one behind.
    pub fn take_output(&mut self) -> NoiseMap {
        self.state = BuildState::Configured;
        std::mem::take(&mut self.output)
    }

    pub fn set_progress_callback(&mut self, callback: impl FnMut(usize) -> ControlFlow<()> + 'a) {
        self.progress = Some(Box::new(callback));
    }

    pub fn clear_progress_callback(&mut self) {
        self.progress = None;
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Checks the full configuration and returns the bound source.
    fn validated_source(&self) -> Result<&ModuleRef, NoiseError> {
        if self.width == 0 || self.height == 0 {
            return Err(NoiseError::InvalidDimensions);
        }
        self.projection.validate()?;
        let source = self.source.as_ref().ok_or(NoiseError::Unbound("source module"))?;
        if !self.projection.supports(source.dims()) {
            return Err(NoiseError::UnsupportedDimension {
                projection: self.projection.name(),
                dims: source.dims(),
            });
        }
        Ok(source)
    }

    /// Value the build would store for `(col, row)`. Accepts `col == width`
    /// and `row == height`, the cells just past the far edges.
    pub fn sample_cell(&self, col: usize, row: usize) -> Result<f64, NoiseError> {
        let source = self.validated_source()?;
        Ok(self
            .projection
            .sample(source, col, row, self.width, self.height))
    }

    /// Samples every cell into the output map.
    ///
    /// Configuration errors are reported before any sample is taken. A
    /// cancelled build leaves the rows completed so far in the output.
    pub fn build(&mut self) -> Result<(), NoiseError> {
        let source = self.validated_source()?.clone();
        let (width, height, projection) = (self.width, self.height, self.projection);
        self.output.set_size(width, height)?;
        self.state = BuildState::Building;
        debug!(
            width,
            height,
            projection = projection.name(),
            dims = source.dims(),
            "building noise map"
        );

        for row in 0..height {
            if let Some(values) = self.output.row_mut(row) {
                for (col, value) in values.iter_mut().enumerate() {
                    *value = projection.sample(&source, col, row, width, height);
                }
            }
            trace!(row, "noise map row complete");
            if let Some(callback) = self.progress.as_mut() {
                if callback(row).is_break() {
                    self.state = BuildState::Configured;
                    warn!(row, height, "noise map build cancelled");
                    return Err(NoiseError::Cancelled { row });
                }
            }
        }

        self.state = BuildState::Built;
        debug!(rows = height, "noise map built");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Sample3D;
    use crate::primitive::{Constant, ImprovedPerlin, LinearGradient, SimplexPerlin};
    use glam::DVec4;
    use std::sync::Arc;

    fn planar_builder<'a>(source: ModuleRef, w: usize, h: usize) -> NoiseMapBuilder<'a> {
        let mut b = NoiseMapBuilder::new();
        b.set_source(source);
        b.set_size(w, h);
        b.set_bounds(0.0, 4.0, 0.0, 4.0);
        b
    }

    #[test]
    fn build_fills_every_cell() {
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(Constant::new(0.3))), 5, 4);
        b.build().unwrap();
        assert_eq!(b.state(), BuildState::Built);
        assert_eq!(b.output().width(), 5);
        assert!(b.output().data().iter().all(|&v| v == 0.3));
    }

    #[test]
    fn planar_coordinates_step_from_lower_bound() {
        let gradient = Arc::new(LinearGradient::new(DVec4::new(1.0, 0.0, 0.0, 0.0)));
        let mut b = planar_builder(ModuleRef::Dim3(gradient), 4, 2);
        b.build().unwrap();
        assert_eq!(b.output().row(0), Some(&[0.0, 1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn planar_maps_rows_onto_the_plane_axis_for_each_dimension() {
        let axis = DVec4::new(0.0, 1.0, 1.0, 0.0);
        let gradient = Arc::new(LinearGradient::new(axis));
        for (source, expected) in [
            (ModuleRef::Dim2(gradient.clone()), 2.0),
            (ModuleRef::Dim3(gradient.clone()), 2.0),
            (ModuleRef::Dim4(gradient.clone()), 2.0),
        ] {
            let b = planar_builder(source, 4, 4);
            assert_eq!(b.sample_cell(0, 2).unwrap(), expected);
        }
    }

    #[test]
    fn missing_source_is_unbound() {
        let mut b = NoiseMapBuilder::new();
        b.set_size(4, 4);
        assert!(matches!(b.build(), Err(NoiseError::Unbound(_))));
        assert_eq!(b.state(), BuildState::Configured);
    }

    #[test]
    fn zero_size_is_invalid() {
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(Constant::new(0.0))), 0, 4);
        assert!(matches!(b.build(), Err(NoiseError::InvalidDimensions)));
    }

    #[test]
    fn inverted_bounds_are_rejected_before_sampling() {
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(Constant::new(0.0))), 4, 4);
        b.set_bounds(1.0, -1.0, 0.0, 1.0);
        let mut called = false;
        b.set_progress_callback(|_| {
            called = true;
            ControlFlow::Continue(())
        });
        assert!(matches!(b.build(), Err(NoiseError::InvalidBounds { what: "x", .. })));
        drop(b);
        assert!(!called);
    }

    #[test]
    fn spherical_bounds_are_range_checked() {
        for p in [
            Projection::spherical(-100.0, 0.0, -180.0, 180.0),
            Projection::spherical(0.0, 0.0, -180.0, 180.0),
            Projection::spherical(-90.0, 90.0, -190.0, 180.0),
        ] {
            assert!(matches!(p.validate(), Err(NoiseError::InvalidBounds { .. })), "{p:?}");
        }
        assert!(Projection::spherical(-90.0, 90.0, -180.0, 180.0).validate().is_ok());
    }

    #[test]
    fn spherical_rejects_two_d_modules() {
        let mut b = planar_builder(ModuleRef::Dim2(Arc::new(Constant::new(0.0))), 4, 4);
        b.set_projection(Projection::spherical(-90.0, 90.0, -180.0, 180.0));
        assert!(matches!(
            b.build(),
            Err(NoiseError::UnsupportedDimension { projection: "spherical", dims: 2 })
        ));
    }

    #[test]
    fn spherical_samples_lie_on_unit_sphere() {
        struct Radius;
        impl Sample3D for Radius {
            fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
                (x * x + y * y + z * z).sqrt()
            }
        }
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(Radius)), 8, 4);
        b.set_projection(Projection::spherical(-90.0, 90.0, -180.0, 180.0));
        b.build().unwrap();
        assert!(b.output().data().iter().all(|r| (r - 1.0).abs() < 1e-12));
    }

    #[test]
    fn cylindrical_rows_follow_height() {
        struct Height;
        impl Sample3D for Height {
            fn sample_3d(&self, _x: f64, y: f64, _z: f64) -> f64 {
                y
            }
        }
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(Height)), 3, 2);
        b.set_projection(Projection::cylindrical(-180.0, 180.0, 0.0, 2.0));
        b.build().unwrap();
        assert_eq!(b.output().row(1), Some(&[1.0, 1.0, 1.0][..]));
    }

    #[test]
    fn progress_reports_each_row_in_order() {
        let mut rows = Vec::new();
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(ImprovedPerlin::new(0))), 6, 9);
        b.set_progress_callback(|row| {
            rows.push(row);
            ControlFlow::Continue(())
        });
        b.build().unwrap();
        drop(b);
        assert_eq!(rows, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn breaking_from_progress_cancels() {
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(ImprovedPerlin::new(0))), 4, 10);
        b.set_progress_callback(|row| {
            if row == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(matches!(b.build(), Err(NoiseError::Cancelled { row: 3 })));
        assert_eq!(b.state(), BuildState::Configured);
    }

    #[test]
    fn seamless_edges_match() {
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(SimplexPerlin::new(3))), 16, 16);
        b.set_projection(Projection::Planar {
            lower_x: 0.0,
            upper_x: 3.0,
            lower_y: 0.0,
            upper_y: 3.0,
            seamless: true,
        });
        for i in 0..=16 {
            let left = b.sample_cell(0, i).unwrap();
            let right = b.sample_cell(16, i).unwrap();
            assert!((left - right).abs() < 1e-9, "row {i}: {left} vs {right}");
            let top = b.sample_cell(i, 0).unwrap();
            let bottom = b.sample_cell(i, 16).unwrap();
            assert!((top - bottom).abs() < 1e-9, "col {i}: {top} vs {bottom}");
        }
    }

    #[test]
    fn set_bounds_keeps_seamless_flag() {
        let mut b = NoiseMapBuilder::new();
        b.set_projection(Projection::Planar {
            lower_x: 0.0,
            upper_x: 1.0,
            lower_y: 0.0,
            upper_y: 1.0,
            seamless: true,
        });
        b.set_bounds(2.0, 3.0, 2.0, 3.0);
        assert!(matches!(b.projection(), Projection::Planar { seamless: true, lower_x, .. } if *lower_x == 2.0));
    }

    #[test]
    fn rebuild_overwrites_output() {
        let mut b = planar_builder(ModuleRef::Dim3(Arc::new(Constant::new(1.0))), 4, 4);
        b.set_output(NoiseMap::from_data(2, 1, vec![9.0, 9.0]).unwrap());
        b.build().unwrap();
        b.set_source(ModuleRef::Dim3(Arc::new(Constant::new(-1.0))));
        assert_eq!(b.state(), BuildState::Configured);
        b.build().unwrap();
        let map = b.take_output();
        assert_eq!(map.data().len(), 16);
        assert!(map.data().iter().all(|&v| v == -1.0));
    }

    #[test]
    fn projection_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Projection::spherical(-90.0, 90.0, -180.0, 180.0)).unwrap();
        assert!(json.contains("\"kind\":\"spherical\""), "{json}");
        let back: Projection = serde_json::from_str(
            r#"{"kind":"planar","lower_x":0,"upper_x":2,"lower_y":0,"upper_y":1}"#,
        )
        .unwrap();
        assert_eq!(back, Projection::planar(0.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn supports_matches_projection_kind() {
        let planar = Projection::default();
        assert!(planar.supports(2) && planar.supports(3) && planar.supports(4));
        let sphere = Projection::spherical(-90.0, 90.0, -180.0, 180.0);
        assert!(!sphere.supports(2) && sphere.supports(3) && !sphere.supports(4));
    }
}
