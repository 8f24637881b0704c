//! Last tower location, kept between runs.

use anyhow::Error as AnyError;
use geo::geometry::Coord;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

/// Used until a location has been chosen (London).
pub const DEFAULT_LOCATION: Coord<f64> = Coord {
    x: -0.1278,
    y: 51.5074,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Selection {
    lat: f64,
    lng: f64,
}

/// Returns the stored location, or [`DEFAULT_LOCATION`] if there is
/// none or it can't be read.
pub fn load(path: &Path) -> Coord<f64> {
    let selection = fs::read(path)
        .map_err(AnyError::from)
        .and_then(|bytes| Ok(serde_json::from_slice::<Selection>(&bytes)?));
    match selection {
        Ok(Selection { lat, lng }) => Coord { x: lng, y: lat },
        Err(e) => {
            match e.downcast_ref::<io::Error>() {
                Some(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                    debug!("no saved location at {}", path.display());
                }
                _ => warn!("ignoring saved location {}: {e}", path.display()),
            }
            DEFAULT_LOCATION
        }
    }
}

/// Overwrites the stored location.
pub fn store(path: &Path, location: Coord<f64>) -> Result<(), AnyError> {
    let selection = Selection {
        lat: location.y,
        lng: location.x,
    };
    fs::write(path, serde_json::to_vec(&selection)?)?;
    debug!("saved location {selection:?} to {}", path.display());
    Ok(())
}
