//! Single-band GeoTIFF decoding.
//!
//! Only north-up rasters georeferenced through `ModelPixelScale` and
//! `ModelTiepoint` are supported, which is what the global DEM API
//! serves.

use crate::{ElevationGrid, FetchError, Georef, C};
use geo::geometry::{Coord, Rect};
use std::io::Cursor;
use tiff::{
    decoder::{Decoder, DecodingResult},
    tags::Tag,
    ColorType,
};

/// GDAL's private tag holding the no-data value as ASCII.
pub(crate) const GDAL_NODATA: u16 = 42_113;

/// Returns the [`ElevationGrid`] stored in GeoTIFF `bytes`.
pub fn decode(bytes: &[u8]) -> Result<ElevationGrid, FetchError> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;

    match decoder.colortype()? {
        ColorType::Gray(_) => (),
        other => {
            return Err(FetchError::Format(format!(
                "expected a single band, found {other:?}"
            )))
        }
    }

    let (width, height) = {
        let (width, height) = decoder.dimensions()?;
        (width as usize, height as usize)
    };

    let bbox = {
        let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag)?;
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag)?;
        bbox(width, height, &scale, &tiepoint)?
    };

    let nodata = decoder
        .find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))?
        .map(tiff::decoder::ifd::Value::into_string)
        .transpose()?
        .and_then(|raw| {
            raw.trim_matches(|c: char| c == '\0' || c.is_whitespace())
                .parse::<C>()
                .ok()
        });

    let samples: Vec<C> = match decoder.read_image()? {
        DecodingResult::U8(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::U16(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::U32(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::I8(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::I16(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::I32(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::F32(raw) => raw.into_iter().map(C::from).collect(),
        DecodingResult::F64(raw) => raw,
        _ => {
            return Err(FetchError::Format(
                "unsupported 64-bit integer samples".to_string(),
            ))
        }
    };

    if samples.len() != width * height {
        return Err(FetchError::Format(format!(
            "expected {} samples for a {width}x{height} raster, found {}",
            width * height,
            samples.len()
        )));
    }

    Ok(ElevationGrid::new(Georef::new(width, height, bbox), samples).with_nodata(nodata))
}

/// Derives the raster extent from its pixel scale and first tie
/// point.
///
/// A tie point is `[i, j, k, x, y, z]`, pinning raster position
/// `(i, j)` to model position `(x, y)`.
#[allow(clippy::cast_precision_loss)]
fn bbox(width: usize, height: usize, scale: &[C], tiepoint: &[C]) -> Result<Rect<C>, FetchError> {
    let (scale_x, scale_y) = match scale {
        [x, y, ..] if *x > 0.0 && *y > 0.0 => (*x, *y),
        _ => {
            return Err(FetchError::Format(format!(
                "invalid pixel scale {scale:?}"
            )))
        }
    };
    let (i, j, tie_x, tie_y) = match tiepoint {
        [i, j, _k, x, y, ..] => (*i, *j, *x, *y),
        _ => {
            return Err(FetchError::Format(format!(
                "invalid tie point {tiepoint:?}"
            )))
        }
    };
    let west = tie_x - i * scale_x;
    let north = tie_y + j * scale_y;
    let east = west + width as C * scale_x;
    let south = north - height as C * scale_y;
    Ok(Rect::new(
        Coord { x: west, y: south },
        Coord { x: east, y: north },
    ))
}
