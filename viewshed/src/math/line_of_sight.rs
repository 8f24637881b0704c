use crate::{constants::EARTH_RADIUS_M, C};

/// Returns how far the Earth's surface falls below the tangent plane
/// `distance_m` meters away.
pub fn curvature_drop(distance_m: C) -> C {
    distance_m * distance_m / (2.0 * EARTH_RADIUS_M)
}

/// Returns `true` if a point `start_height_m` above `start_elev_m`
/// clears the curvature drop to a point `end_height_m` above
/// `end_elev_m`.
///
/// Exactly grazing is not visible.
pub fn has_line_of_sight(
    start_elev_m: C,
    start_height_m: C,
    end_elev_m: C,
    end_height_m: C,
    distance_m: C,
) -> bool {
    let height_difference = (start_elev_m + start_height_m) - (end_elev_m + end_height_m);
    height_difference - curvature_drop(distance_m) > 0.0
}
