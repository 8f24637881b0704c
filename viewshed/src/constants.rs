use crate::C;

/// Earth radius used for distances and curvature, in meters.
pub const EARTH_RADIUS_M: C = 6_371_000.0;
