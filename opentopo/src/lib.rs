//! OpenTopography global DEM rasters.
//!
//! Fetches a single-band GeoTIFF covering a bounding box and decodes
//! it into an [`ElevationGrid`].
//!
//! # References
//!
//! 1. [OpenTopography API](https://portal.opentopography.org/apidocs/)
//! 1. [GeoTIFF format](https://docs.ogc.org/is/19-008r4/19-008r4.html)
//! 1. [GDAL_NODATA tag](https://gdal.org/drivers/raster/gtiff.html#nodata-value)

mod client;
mod error;
mod geotiff;
mod grid;
pub mod http;

pub use crate::{
    client::{bounding_box, Client, DemType, DEFAULT_BASE_URL},
    error::FetchError,
    geotiff::decode,
    grid::{ElevationGrid, Georef},
};
pub use geo;

use geo::geometry::Coord;

/// Base floating point type used for all coordinates and elevations.
pub type C = f64;

/// Anything able to produce an elevation raster around a point.
pub trait ElevationSource: Send + Sync {
    /// Returns a grid covering `half_span_deg` degrees on each side of
    /// `center`.
    fn fetch(&self, center: Coord<C>, half_span_deg: C) -> Result<ElevationGrid, FetchError>;
}
