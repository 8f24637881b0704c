use crate::C;
use geo::geometry::{Coord, Rect};

/// Raster dimensions plus the geographic extent they cover.
///
/// Row 0 is the northern edge of `bbox` and column 0 its western
/// edge. A cell's coordinate is its north-west corner, linearly
/// interpolated over the extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georef {
    /// Number of columns.
    width: usize,

    /// Number of rows.
    height: usize,

    /// Geographic extent, `x` is longitude and `y` latitude.
    bbox: Rect<C>,
}

impl Georef {
    pub fn new(width: usize, height: usize, bbox: Rect<C>) -> Self {
        Self {
            width,
            height,
            bbox,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bbox(&self) -> Rect<C> {
        self.bbox
    }

    /// Returns the number of cells.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Returns the geographic coordinate of cell `(x, y)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn xy_to_coord(&self, (x, y): (usize, usize)) -> Coord<C> {
        let Coord {
            x: min_lon,
            y: min_lat,
        } = self.bbox.min();
        let Coord {
            x: max_lon,
            y: max_lat,
        } = self.bbox.max();
        Coord {
            x: min_lon + (x as C / self.width as C) * (max_lon - min_lon),
            y: max_lat - (y as C / self.height as C) * (max_lat - min_lat),
        }
    }

    /// Returns the cell containing `coord`, or `None` when `coord`
    /// lies outside the extent.
    ///
    /// Coordinates on the eastern or southern edge belong to the last
    /// column or row.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn coord_to_xy(&self, coord: Coord<C>) -> Option<(usize, usize)> {
        let (min, max) = (self.bbox.min(), self.bbox.max());
        if self.len() == 0
            || !(min.x..=max.x).contains(&coord.x)
            || !(min.y..=max.y).contains(&coord.y)
        {
            return None;
        }
        let fx = (coord.x - min.x) / self.bbox.width() * self.width as C;
        let fy = (max.y - coord.y) / self.bbox.height() * self.height as C;
        let x = (fx.floor() as usize).min(self.width - 1);
        let y = (fy.floor() as usize).min(self.height - 1);
        Some((x, y))
    }

    pub fn xy_to_linear_index(&self, (x, y): (usize, usize)) -> usize {
        y * self.width + x
    }

    pub fn linear_index_to_xy(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }
}

/// A single-band elevation raster in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    georef: Georef,

    /// Row-major samples, starting at the north-west corner.
    samples: Box<[C]>,

    /// Sentinel marking samples without data.
    nodata: Option<C>,
}

impl ElevationGrid {
    /// # Panics
    ///
    /// Panics if `samples` doesn't hold exactly one value per cell.
    pub fn new(georef: Georef, samples: Vec<C>) -> Self {
        assert_eq!(
            samples.len(),
            georef.len(),
            "sample count must equal width * height"
        );
        Self {
            georef,
            samples: samples.into_boxed_slice(),
            nodata: None,
        }
    }

    #[must_use]
    pub fn with_nodata(mut self, nodata: Option<C>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn georef(&self) -> &Georef {
        &self.georef
    }

    pub fn width(&self) -> usize {
        self.georef.width
    }

    pub fn height(&self) -> usize {
        self.georef.height
    }

    pub fn bbox(&self) -> Rect<C> {
        self.georef.bbox
    }

    pub fn samples(&self) -> &[C] {
        &self.samples
    }

    pub fn nodata(&self) -> Option<C> {
        self.nodata
    }

    /// Returns the sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn get_xy(&self, (x, y): (usize, usize)) -> C {
        assert!(x < self.width() && y < self.height());
        self.samples[self.georef.xy_to_linear_index((x, y))]
    }

    /// Returns `true` if `sample` carries no elevation.
    pub fn is_nodata(&self, sample: C) -> bool {
        sample.is_nan() || Some(sample) == self.nodata
    }

    /// Returns the elevation of the cell containing `coord`.
    ///
    /// Returns `None` if `coord` is outside the grid or the cell has
    /// no data.
    pub fn elevation_at(&self, coord: Coord<C>) -> Option<C> {
        self.georef
            .coord_to_xy(coord)
            .map(|xy| self.get_xy(xy))
            .filter(|&sample| !self.is_nodata(sample))
    }

    /// Returns the cell at the geometric center of the grid.
    pub fn center_xy(&self) -> (usize, usize) {
        (self.width() / 2, self.height() / 2)
    }

    /// Returns the lowest and highest valid samples.
    pub fn elevation_range(&self) -> Option<(C, C)> {
        self.samples
            .iter()
            .copied()
            .filter(|&sample| !self.is_nodata(sample))
            .fold(None, |range, sample| match range {
                None => Some((sample, sample)),
                Some((lo, hi)) => Some((lo.min(sample), hi.max(sample))),
            })
    }
}
