//! Great-circle distance.
//!
//! Same formula as [geo]'s `HaversineDistance`, pinned to a 6 371 km
//! sphere so curvature and distance agree on one radius.
//!
//! [geo](https://github.com/georust/geo/blob/main/geo/src/algorithm/haversine_distance.rs)

use crate::{constants::EARTH_RADIUS_M, C};
use geo::geometry::Coord;

/// Returns the surface distance in meters between `a` and `b`.
///
/// Coordinates are degrees, `x` longitude and `y` latitude.
pub fn distance(a: Coord<C>, b: Coord<C>) -> C {
    let (lat_a, lat_b) = (a.y.to_radians(), b.y.to_radians());
    let half_d_lat = (lat_b - lat_a) / 2.0;
    let half_d_lon = (b.x - a.x).to_radians() / 2.0;
    let h = half_d_lat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_d_lon.sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_RADIUS_M
}
