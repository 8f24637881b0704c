use crate::{downsample::DEFAULT_STRIDE, engine::Observer, C};
use geo::geometry::Coord;
use std::time::Duration;

/// Calculation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Tower height above ground (meters).
    pub tower_height_m: C,

    /// Height of a viewer above ground at each cell (meters).
    pub viewer_height_m: C,

    /// Degrees of latitude/longitude fetched on each side of the
    /// tower.
    pub area_half_span_deg: C,

    /// Cells scanned between progress reports and deadline checks.
    pub checkpoint_interval: usize,

    /// Maximum time a scan may take.
    pub timeout: Duration,

    /// Row/column step used when reducing a mask for display.
    pub downsample_stride: usize,
}

impl Config {
    pub const DEFAULT_TOWER_HEIGHT_M: C = 30.0;
    pub const DEFAULT_VIEWER_HEIGHT_M: C = 1.7;
    pub const DEFAULT_AREA_HALF_SPAN_DEG: C = 0.5;
    pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1000;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Returns an observer at `location` using these heights.
    pub fn observer(&self, location: Coord<C>) -> Observer {
        Observer {
            location,
            tower_height_m: self.tower_height_m,
            viewer_height_m: self.viewer_height_m,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tower_height_m: Self::DEFAULT_TOWER_HEIGHT_M,
            viewer_height_m: Self::DEFAULT_VIEWER_HEIGHT_M,
            area_half_span_deg: Self::DEFAULT_AREA_HALF_SPAN_DEG,
            checkpoint_interval: Self::DEFAULT_CHECKPOINT_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
            downsample_stride: DEFAULT_STRIDE,
        }
    }
}
