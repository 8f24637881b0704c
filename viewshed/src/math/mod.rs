mod haversine;
mod line_of_sight;

pub use {
    haversine::distance,
    line_of_sight::{curvature_drop, has_line_of_sight},
};
