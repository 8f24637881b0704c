//! # Tower viewshed
//!
//! `viewshed` decides which cells of an elevation raster can see the
//! top of a tower, accounting for Earth curvature.
//!
//! Only the observer and target elevations take part in the test;
//! terrain between them does not occlude.

mod config;
pub mod constants;
mod downsample;
mod engine;
mod error;
mod job;
mod mask;
pub mod math;

pub use crate::{
    config::Config,
    downsample::{downsample, marker_radius_m, DEFAULT_STRIDE},
    engine::{Clock, Observer, ProgressSink, SystemClock, VisibilityMaskBuilder},
    error::ViewshedError,
    job::{CancellationToken, Calculator, Job, JobState, Outcome, Overlay},
    mask::VisibilityMask,
};
pub use {
    geo,
    opentopo::{self, ElevationGrid, ElevationSource, Georef, C},
};
