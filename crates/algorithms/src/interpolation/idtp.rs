//! Inverse Distance to a Power (IDTP) interpolation
//!
//! Estimates a value at (x, y) from the samples inside the search window
//! `[x - rx, x + rx] x [y - ry, y + ry]`:
//!
//! ```text
//! z(x,y) = Σ(zi / wi) / Σ(1 / wi)
//! where wi = d(x,y, xi,yi)^p
//! ```
//!
//! Samples whose value falls inside an ignore interval are dropped. When
//! fewer than `min_data` remain the window grows by the configured radius
//! increases and the search repeats; without growth the estimate is the
//! no-data value. When more than `max_data` remain only the nearest are used.
//!
//! A sample at distance zero is not special-cased: its weight is zero and the
//! estimate degenerates to NaN, which is reported as no-data. Rasterization
//! with a snap tolerance copies such coinciding samples into the grid instead.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use serde::{Deserialize, Serialize};
use spatia_core::raster::{AffineTransform, GeoTransform, Raster, RasterElement};
use spatia_core::{Algorithm, Envelope};
use tracing::{debug, info};

use super::error::InterpolationError;
use super::quadtree::{Quadtree, SpatialIndex};
use super::{DataTuple, ValueInterval};
use crate::maybe_rayon::try_map_rows;

/// Parameters for IDTP interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdtpParams {
    /// Distance exponent (default: 2.0)
    pub power: f64,
    /// Fewest samples an estimate may use (default: 5)
    pub min_data: usize,
    /// Most samples an estimate may use; the nearest win (default: 20)
    pub max_data: usize,
    /// Value written where no estimate is possible (default: 0.0)
    pub no_value: f64,
    /// Half width of the search window.
    /// `None` means a fifth of the data extent's diagonal.
    pub radius_x: Option<f64>,
    /// Half height of the search window, defaulting like `radius_x`
    pub radius_y: Option<f64>,
    /// Growth of `radius_x` per retry when too few samples are found (default: 0)
    pub radius_increase_x: f64,
    /// Growth of `radius_y` per retry (default: 0)
    pub radius_increase_y: f64,
    /// Sample values to leave out
    pub ignore: Vec<ValueInterval>,
    /// Grid cells with a sample within this distance (per axis) take the
    /// sample's value instead of an estimate. `None` disables snapping.
    pub snap_tolerance: Option<f64>,
}

impl Default for IdtpParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            min_data: 5,
            max_data: 20,
            no_value: 0.0,
            radius_x: None,
            radius_y: None,
            radius_increase_x: 0.0,
            radius_increase_y: 0.0,
            ignore: Vec::new(),
            snap_tolerance: None,
        }
    }
}

impl IdtpParams {
    pub fn validate(&self) -> Result<(), InterpolationError> {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !self.power.is_finite() {
            return Err(InterpolationError::invalid("power", "must be finite"));
        }
        if self.min_data == 0 {
            return Err(InterpolationError::invalid("min_data", "must be at least 1"));
        }
        if self.max_data < self.min_data {
            return Err(InterpolationError::invalid(
                "max_data",
                format!("{} is below min_data {}", self.max_data, self.min_data),
            ));
        }
        for (name, radius) in [("radius_x", self.radius_x), ("radius_y", self.radius_y)] {
            if radius.is_some_and(|r| !non_negative(r)) {
                return Err(InterpolationError::invalid(name, "must be a non-negative distance"));
            }
        }
        for (name, inc) in [
            ("radius_increase_x", self.radius_increase_x),
            ("radius_increase_y", self.radius_increase_y),
        ] {
            if !non_negative(inc) {
                return Err(InterpolationError::invalid(name, "must be a non-negative distance"));
            }
        }
        if let Some(iv) = self.ignore.iter().find(|iv| !(iv.min <= iv.max)) {
            return Err(InterpolationError::invalid(
                "ignore",
                format!("[{}, {}] is not an interval", iv.min, iv.max),
            ));
        }
        if self.snap_tolerance.is_some_and(|t| !non_negative(t)) {
            return Err(InterpolationError::invalid(
                "snap_tolerance",
                "must be a non-negative distance",
            ));
        }
        if self.no_value.is_finite() && !f32::cast_from(self.no_value).is_finite() {
            return Err(InterpolationError::invalid("no_value", "outside the f32 range"));
        }
        Ok(())
    }

    fn is_ignored(&self, value: f64) -> bool {
        self.ignore.iter().any(|iv| iv.contains(value))
    }
}

/// Outcome of one search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// `None` when no estimate was possible
    pub value: Option<f64>,
    /// Window half width the search ended with
    pub radius_x: f64,
    /// Window half height the search ended with
    pub radius_y: f64,
    /// Samples that went into the estimate
    pub samples: usize,
}

/// Rasterized interpolation result
#[derive(Debug, Clone)]
pub struct InterpolatedGrid {
    /// Row 0 is the northern edge of `envelope`; no-data is the `no_value` parameter
    pub raster: Raster<f32>,
    /// World rectangle spanned by the grid nodes
    pub envelope: Envelope,
    /// Cells filled from a coinciding sample
    pub snapped_cells: usize,
    /// Cells without an estimate
    pub no_value_cells: usize,
}

impl InterpolatedGrid {
    pub fn width(&self) -> usize {
        self.raster.cols()
    }

    pub fn height(&self) -> usize {
        self.raster.rows()
    }

    /// Dense `[height][width]` copy of the values
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.raster.to_rows()
    }
}

/// IDTP interpolator over a spatial index
#[derive(Debug)]
pub struct InverseDistanceToPower<'a, I: ?Sized> {
    index: &'a I,
    params: IdtpParams,
    bbox: Envelope,
    radius_x: f64,
    radius_y: f64,
}

struct Row {
    values: Vec<f32>,
    snapped: usize,
    empty: usize,
}

impl<'a, I> InverseDistanceToPower<'a, I>
where
    I: SpatialIndex<DataTuple> + ?Sized,
{
    /// Fails on invalid parameters and on an empty index
    pub fn new(index: &'a I, params: IdtpParams) -> Result<Self, InterpolationError> {
        params.validate()?;
        let bbox = index.root_bounding_box()?;
        let default_radius = bbox.diagonal() / 5.0;
        Ok(Self {
            index,
            radius_x: params.radius_x.unwrap_or(default_radius),
            radius_y: params.radius_y.unwrap_or(default_radius),
            params,
            bbox,
        })
    }

    pub fn params(&self) -> &IdtpParams {
        &self.params
    }

    /// Initial search radii (x, y)
    pub fn radii(&self) -> (f64, f64) {
        (self.radius_x, self.radius_y)
    }

    /// Extent of the indexed samples
    pub fn bounding_box(&self) -> Envelope {
        self.bbox
    }

    /// Estimate at (x, y) with the initial radii; no-data if impossible
    pub fn estimate(&self, x: f64, y: f64) -> Result<f64, InterpolationError> {
        self.estimate_with_radii(x, y, self.radius_x, self.radius_y)
    }

    /// Estimate at (x, y) starting from the given radii; no-data if impossible
    pub fn estimate_with_radii(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
    ) -> Result<f64, InterpolationError> {
        Ok(self
            .search(x, y, radius_x, radius_y)?
            .value
            .unwrap_or(self.params.no_value))
    }

    /// Full search at (x, y), reporting the radii and sample count used
    pub fn search(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
    ) -> Result<Estimate, InterpolationError> {
        let p = &self.params;
        let (mut rx, mut ry) = (radius_x, radius_y);

        loop {
            let window = Envelope::new(x - rx, y - ry, x + rx, y + ry);
            let mut samples: Vec<(f64, f64)> = self
                .index
                .query(&window)?
                .into_iter()
                .filter(|t| !p.is_ignored(t.value))
                .map(|t| (t.distance_to(x, y), t.value))
                .collect();

            if samples.len() < p.min_data {
                if self.growth_exhausted(&window) {
                    return Ok(Estimate {
                        value: None,
                        radius_x: rx,
                        radius_y: ry,
                        samples: samples.len(),
                    });
                }
                rx += p.radius_increase_x;
                ry += p.radius_increase_y;
                debug!(
                    x,
                    y,
                    rx,
                    ry,
                    found = samples.len(),
                    "too few samples, growing search window"
                );
                continue;
            }

            if samples.len() > p.max_data {
                samples.sort_by(|a, b| a.0.total_cmp(&b.0));
                samples.truncate(p.max_data);
            }

            let (num, den) = samples.iter().fold((0.0, 0.0), |(num, den), &(d, v)| {
                let w = d.powf(p.power);
                (num + v / w, den + 1.0 / w)
            });
            let value = num / den;

            return Ok(Estimate {
                value: value.is_finite().then_some(value),
                radius_x: rx,
                radius_y: ry,
                samples: samples.len(),
            });
        }
    }

    /// True when growing the window cannot reach more samples
    fn growth_exhausted(&self, window: &Envelope) -> bool {
        let p = &self.params;
        let grows_x = p.radius_increase_x > 0.0;
        let grows_y = p.radius_increase_y > 0.0;
        if !grows_x && !grows_y {
            return true;
        }
        let covers_x = window.min_x <= self.bbox.min_x && window.max_x >= self.bbox.max_x;
        let covers_y = window.min_y <= self.bbox.min_y && window.max_y >= self.bbox.max_y;
        (!grows_x || covers_x) && (!grows_y || covers_y)
    }

    /// Value of the nearest non-ignored sample within `tolerance` of (x, y) on both axes
    pub fn snap(&self, x: f64, y: f64, tolerance: f64) -> Result<Option<f64>, InterpolationError> {
        let window = Envelope::new(x - tolerance, y - tolerance, x + tolerance, y + tolerance);
        Ok(self
            .index
            .query(&window)?
            .into_iter()
            .filter(|t| !self.params.is_ignored(t.value))
            .min_by(|a, b| a.distance_to(x, y).total_cmp(&b.distance_to(x, y)))
            .map(|t| t.value))
    }

    fn cell(&self, x: f64, y: f64) -> Result<(Option<f64>, bool), InterpolationError> {
        if let Some(tolerance) = self.params.snap_tolerance {
            if let Some(v) = self.snap(x, y, tolerance)? {
                return Ok((Some(v), true));
            }
        }
        let estimate = self.search(x, y, self.radius_x, self.radius_y)?;
        Ok((estimate.value, false))
    }

    fn row(
        &self,
        affine: &AffineTransform,
        row: usize,
        width: usize,
    ) -> Result<Row, InterpolationError> {
        let no_value = f32::cast_from(self.params.no_value);
        let mut out = Row {
            values: Vec::with_capacity(width),
            snapped: 0,
            empty: 0,
        };
        for col in 0..width {
            let (x, y) = affine.to_source(col as f64, row as f64);
            let (value, snapped) = self.cell(x, y)?;
            // estimates beyond the f32 range are stored as no-value
            match value.map(f32::cast_from).filter(|v| v.is_finite()) {
                Some(v) => {
                    out.snapped += usize::from(snapped);
                    out.values.push(v);
                }
                None => {
                    out.empty += 1;
                    out.values.push(no_value);
                }
            }
        }
        Ok(out)
    }
}

impl<'a, I> InverseDistanceToPower<'a, I>
where
    I: SpatialIndex<DataTuple> + Sync + ?Sized,
{
    /// Rasterize onto a `width x height` grid whose corner nodes sit on the
    /// corners of the sample extent. An index failure aborts the whole run.
    pub fn interpolate(
        &self,
        width: usize,
        height: usize,
    ) -> Result<InterpolatedGrid, InterpolationError> {
        if width == 0 || height == 0 {
            return Err(InterpolationError::invalid(
                "grid",
                format!("{width}x{height} has no cells"),
            ));
        }

        let affine = AffineTransform::onto_grid(self.bbox, width, height);
        let rows = try_map_rows(height, |row| self.row(&affine, row, width))?;

        let mut data = Vec::with_capacity(width * height);
        let (mut snapped_cells, mut no_value_cells) = (0, 0);
        for row in rows {
            data.extend(row.values);
            snapped_cells += row.snapped;
            no_value_cells += row.empty;
        }

        let mut raster = Raster::from_vec(data, height, width)?;
        raster.set_transform(GeoTransform::for_node_grid(&self.bbox, width, height));
        raster.set_nodata(Some(f32::cast_from(self.params.no_value)));

        info!(
            width,
            height,
            snapped_cells,
            no_value_cells,
            "IDTP interpolation finished"
        );

        Ok(InterpolatedGrid {
            raster,
            envelope: self.bbox,
            snapped_cells,
            no_value_cells,
        })
    }
}

/// Interpolate the samples of `index` onto a `width x height` grid.
///
/// # Example
///
/// ```
/// use spatia_algorithms::interpolation::{idtp, DataTuple, IdtpParams, Quadtree};
///
/// let samples = (0..25).map(|i| DataTuple::new((i % 5) as f64, (i / 5) as f64, i as f64));
/// let index = Quadtree::from_items(samples).unwrap();
/// let params = IdtpParams { min_data: 3, snap_tolerance: Some(0.01), ..Default::default() };
/// let grid = idtp(&index, 5, 5, params).unwrap();
/// assert_eq!(grid.snapped_cells, 25);
/// ```
pub fn idtp<I>(
    index: &I,
    width: usize,
    height: usize,
    params: IdtpParams,
) -> Result<InterpolatedGrid, InterpolationError>
where
    I: SpatialIndex<DataTuple> + Sync + ?Sized,
{
    InverseDistanceToPower::new(index, params)?.interpolate(width, height)
}

/// IDTP as an [`Algorithm`]: input is the index and the grid size (width, height)
#[derive(Debug, Clone, Default)]
pub struct Idtp;

impl Algorithm for Idtp {
    type Input = (Quadtree<DataTuple>, usize, usize);
    type Output = InterpolatedGrid;
    type Params = IdtpParams;
    type Error = InterpolationError;

    fn name(&self) -> &'static str {
        "IDTP"
    }

    fn description(&self) -> &'static str {
        "Inverse distance to a power interpolation over rectangular search windows"
    }

    fn execute(
        &self,
        (index, width, height): Self::Input,
        params: Self::Params,
    ) -> Result<Self::Output, Self::Error> {
        idtp(&index, width, height, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn index(samples: &[(f64, f64, f64)]) -> Quadtree<DataTuple> {
        Quadtree::from_items(samples.iter().map(|&(x, y, v)| DataTuple::new(x, y, v))).unwrap()
    }

    fn params() -> IdtpParams {
        IdtpParams {
            min_data: 1,
            radius_x: Some(100.0),
            radius_y: Some(100.0),
            no_value: -9999.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_weighted_mean() {
        let idx = index(&[(0.0, 0.0, 10.0), (4.0, 0.0, 20.0)]);
        let interp = InverseDistanceToPower::new(&idx, params()).unwrap();

        // d = 1 and d = 3, p = 2: (10 + 20/9) / (1 + 1/9) = 11
        assert_relative_eq!(interp.estimate(1.0, 0.0).unwrap(), 11.0, epsilon = 1e-12);
        // equidistant: plain mean
        assert_relative_eq!(interp.estimate(2.0, 0.0).unwrap(), 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_hit_is_no_value_without_snapping() {
        let idx = index(&[(0.0, 0.0, 10.0), (4.0, 0.0, 20.0)]);
        let interp = InverseDistanceToPower::new(&idx, params()).unwrap();
        assert_eq!(interp.estimate(0.0, 0.0).unwrap(), -9999.0);
        assert_eq!(interp.snap(0.0, 0.0, 0.01).unwrap(), Some(10.0));
        assert_eq!(interp.snap(2.0, 0.0, 0.01).unwrap(), None);
    }

    #[test]
    fn test_sparse_data_without_growth() {
        let idx = index(&[(0.0, 0.0, 1.0), (1.0, 0.0, 2.0), (10.0, 0.0, 3.0)]);
        let p = IdtpParams {
            min_data: 3,
            radius_x: Some(1.0),
            radius_y: Some(1.0),
            no_value: -1.0,
            ..Default::default()
        };
        let interp = InverseDistanceToPower::new(&idx, p).unwrap();
        assert_eq!(interp.estimate(0.5, 0.0).unwrap(), -1.0);
    }

    #[test]
    fn test_sparse_data_grows_until_enough() {
        let idx = index(&[(0.0, 0.0, 1.0), (1.0, 0.0, 2.0), (10.0, 0.0, 3.0)]);
        let p = IdtpParams {
            min_data: 3,
            radius_x: Some(1.0),
            radius_y: Some(1.0),
            radius_increase_x: 1.0,
            radius_increase_y: 1.0,
            ..Default::default()
        };
        let interp = InverseDistanceToPower::new(&idx, p).unwrap();
        let est = interp.search(0.5, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(est.samples, 3);
        assert!(est.radius_x > 1.0 && est.radius_y > 1.0);
        assert_eq!(est.radius_x, 10.0);
        assert!(est.value.is_some());
    }

    #[test]
    fn test_growth_stops_at_data_extent() {
        let idx = index(&[(0.0, 0.0, 1.0), (1.0, 1.0, 2.0)]);
        let p = IdtpParams {
            min_data: 3,
            radius_x: Some(0.1),
            radius_y: Some(0.1),
            radius_increase_x: 0.5,
            radius_increase_y: 0.5,
            no_value: -1.0,
            ..Default::default()
        };
        let interp = InverseDistanceToPower::new(&idx, p).unwrap();
        let est = interp.search(0.5, 0.5, 0.1, 0.1).unwrap();
        assert_eq!(est.value, None);
        assert_eq!(est.samples, 2);
    }

    #[test]
    fn test_max_data_drops_far_outlier() {
        let idx = index(&[
            (0.0, 1.0, 10.0),
            (1.0, 0.0, 10.0),
            (0.0, -1.0, 10.0),
            (50.0, 50.0, 1000.0),
        ]);
        let p = IdtpParams {
            max_data: 3,
            ..params()
        };
        let interp = InverseDistanceToPower::new(&idx, p.clone()).unwrap();
        assert_relative_eq!(interp.estimate(0.0, 0.0).unwrap(), 10.0, epsilon = 1e-9);

        let all = InverseDistanceToPower::new(&idx, IdtpParams { max_data: 4, ..p }).unwrap();
        assert!(all.estimate(0.0, 0.0).unwrap() > 10.0);
    }

    #[test]
    fn test_ignore_intervals() {
        let idx = index(&[(0.0, 0.0, 10.0), (2.0, 0.0, -9999.0), (4.0, 0.0, 20.0)]);
        let p = IdtpParams {
            ignore: vec![ValueInterval::single(-9999.0)],
            ..params()
        };
        let interp = InverseDistanceToPower::new(&idx, p).unwrap();
        assert_relative_eq!(interp.estimate(2.0, 0.0).unwrap(), 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_becomes_no_value() {
        let idx = index(&[(0.0, 0.0, f64::INFINITY), (4.0, 0.0, 20.0)]);
        let interp = InverseDistanceToPower::new(&idx, params()).unwrap();
        assert_eq!(interp.estimate(1.0, 0.0).unwrap(), -9999.0);

        let grid = interp.interpolate(3, 1).unwrap();
        assert_eq!(grid.no_value_cells, 3);
    }

    #[test]
    fn test_out_of_range_estimate_is_no_value() {
        let idx = index(&[(0.0, 0.0, 1e39), (4.0, 0.0, 1e39)]);
        let interp = InverseDistanceToPower::new(&idx, params()).unwrap();
        assert_relative_eq!(interp.estimate(2.0, 0.0).unwrap(), 1e39, max_relative = 1e-12);

        let grid = interp.interpolate(3, 1).unwrap();
        assert_eq!(grid.no_value_cells, 3);
        assert_eq!(grid.to_rows(), vec![vec![-9999.0f32; 3]]);

        let snapping = IdtpParams {
            snap_tolerance: Some(0.1),
            ..params()
        };
        let interp = InverseDistanceToPower::new(&idx, snapping).unwrap();
        let grid = interp.interpolate(3, 1).unwrap();
        assert_eq!((grid.snapped_cells, grid.no_value_cells), (0, 3));

        let wide = IdtpParams {
            no_value: 1e40,
            ..params()
        };
        assert!(wide.validate().is_err());
    }

    #[test]
    fn test_default_radius_is_fifth_of_diagonal() {
        let idx = index(&[(0.0, 0.0, 1.0), (30.0, 40.0, 2.0)]);
        let interp = InverseDistanceToPower::new(&idx, IdtpParams::default()).unwrap();
        assert_eq!(interp.radii(), (10.0, 10.0));
    }

    #[test]
    fn test_grid_corners_and_snapping() {
        let samples: Vec<(f64, f64, f64)> = (0..=10)
            .flat_map(|i| (0..=10).map(move |j| (i as f64, j as f64, (i * 100 + j) as f64)))
            .collect();
        let idx = index(&samples);
        let p = IdtpParams {
            snap_tolerance: Some(0.01),
            ..params()
        };
        let grid = idtp(&idx, 11, 11, p).unwrap();

        assert_eq!(grid.snapped_cells, 121);
        assert_eq!(grid.no_value_cells, 0);
        // row 0 is the northern edge
        assert_eq!(grid.raster.get(0, 0).unwrap(), 10.0);
        assert_eq!(grid.raster.get(10, 10).unwrap(), 1000.0);
        assert_eq!(grid.raster.get(10, 0).unwrap(), 0.0);
        assert_eq!(grid.to_rows().len(), 11);
        assert_eq!(grid.raster.nodata(), Some(-9999.0));
        let (x, y) = grid.raster.pixel_to_geo(0, 0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_parameters() {
        let idx = index(&[(0.0, 0.0, 1.0)]);
        for p in [
            IdtpParams {
                min_data: 0,
                ..Default::default()
            },
            IdtpParams {
                min_data: 5,
                max_data: 4,
                ..Default::default()
            },
            IdtpParams {
                power: f64::NAN,
                ..Default::default()
            },
            IdtpParams {
                radius_x: Some(-1.0),
                ..Default::default()
            },
            IdtpParams {
                radius_increase_y: f64::INFINITY,
                ..Default::default()
            },
            IdtpParams {
                ignore: vec![ValueInterval::new(2.0, 1.0)],
                ..Default::default()
            },
            IdtpParams {
                snap_tolerance: Some(-0.1),
                ..Default::default()
            },
        ] {
            assert!(matches!(
                InverseDistanceToPower::new(&idx, p),
                Err(InterpolationError::InvalidParameter { .. })
            ));
        }
        let interp = InverseDistanceToPower::new(&idx, IdtpParams::default()).unwrap();
        assert!(interp.interpolate(0, 10).is_err());
    }

    #[test]
    fn test_params_from_json() {
        let p: IdtpParams = serde_json::from_str(
            r#"{"power": 3.0, "min_data": 2, "ignore": [{"min": -1.0, "max": 0.0}]}"#,
        )
        .unwrap();
        assert_eq!(p.power, 3.0);
        assert_eq!(p.max_data, 20);
        assert!(p.is_ignored(-0.5));
    }

    #[test]
    fn test_algorithm_trait() {
        let idx = index(&[(0.0, 0.0, 5.0), (2.0, 2.0, 5.0)]);
        let p = IdtpParams {
            min_data: 2,
            ..params()
        };
        let grid = Idtp.execute((idx, 3, 3), p).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_relative_eq!(grid.raster.get(1, 1).unwrap(), 5.0, epsilon = 1e-6);
    }
}
