use crate::{
    job::CancellationToken,
    math::{distance, has_line_of_sight},
    Config, ElevationGrid, ViewshedError, VisibilityMask, C,
};
use geo::geometry::Coord;
use log::debug;
use std::time::{Duration, Instant};

/// A tower and the height of the viewers looking at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Tower base location.
    pub location: Coord<C>,

    /// Tower height above ground (meters).
    pub tower_height_m: C,

    /// Viewer height above ground at each cell (meters).
    pub viewer_height_m: C,
}

/// Time source for deadline checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Receives scan progress in whole percent.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent);
    }
}

pub struct VisibilityMaskBuilder {
    /// Tower location and heights (required).
    observer: Option<Observer>,

    /// Cells scanned between checkpoints (defaults to 1000).
    checkpoint_interval: usize,

    /// Longest a scan may run (defaults to 300 s).
    timeout: Duration,

    /// Checked at every checkpoint (defaults to never cancelled).
    cancel: CancellationToken,

    clock: Box<dyn Clock>,
}

impl Default for VisibilityMaskBuilder {
    fn default() -> Self {
        Self {
            observer: None,
            checkpoint_interval: Config::DEFAULT_CHECKPOINT_INTERVAL,
            timeout: Config::DEFAULT_TIMEOUT,
            cancel: CancellationToken::new(),
            clock: Box::new(SystemClock),
        }
    }
}

impl VisibilityMaskBuilder {
    /// Tower location and heights (required).
    #[must_use]
    pub fn observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Cells scanned between progress reports, deadline and
    /// cancellation checks (defaults to 1000, must be non-zero).
    #[must_use]
    pub fn checkpoint_interval(mut self, cells: usize) -> Self {
        self.checkpoint_interval = cells;
        self
    }

    /// Longest a scan may run (defaults to 300 s).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Scans every cell of `grid`.
    ///
    /// The observer's ground elevation is the grid cell containing its
    /// location. Cells without data are never visible.
    ///
    /// Deadline and cancellation are only checked every
    /// `checkpoint_interval` cells, so a scan may overrun by one
    /// interval. Nothing is returned from an aborted scan.
    pub fn build<P>(&self, grid: &ElevationGrid, progress: &mut P) -> Result<VisibilityMask, ViewshedError>
    where
        P: ProgressSink + ?Sized,
    {
        let observer = self.observer.ok_or(ViewshedError::Builder("observer"))?;
        if self.checkpoint_interval == 0 {
            return Err(ViewshedError::Builder("checkpoint_interval"));
        }

        let observer_elev_m = grid.elevation_at(observer.location).ok_or_else(|| {
            ViewshedError::Input(format!(
                "no elevation data at tower location {:?}",
                observer.location
            ))
        })?;

        let georef = grid.georef();
        let total = georef.len();
        let start = self.clock.now();
        let mut visible = Vec::with_capacity(total);

        for y in 0..georef.height() {
            for x in 0..georef.width() {
                let sample = grid.get_xy((x, y));
                let is_visible = !grid.is_nodata(sample)
                    && has_line_of_sight(
                        observer_elev_m,
                        observer.tower_height_m,
                        sample,
                        observer.viewer_height_m,
                        distance(observer.location, georef.xy_to_coord((x, y))),
                    );
                visible.push(is_visible);

                let processed = visible.len();
                if processed % self.checkpoint_interval == 0 {
                    progress.report(percent(processed, total));
                    self.checkpoint(start)?;
                }
            }
        }

        progress.report(100);

        let mask = VisibilityMask::new(*georef, visible);
        debug!(
            "viewshed; observer: {:?}, observer_elev: {}, cells: {}, visible: {}, exec: {:?}",
            observer.location,
            observer_elev_m,
            total,
            mask.visible_count(),
            self.clock.now().saturating_duration_since(start)
        );
        Ok(mask)
    }
}

/// Private API.
impl VisibilityMaskBuilder {
    fn checkpoint(&self, start: Instant) -> Result<(), ViewshedError> {
        if self.cancel.is_cancelled() {
            return Err(ViewshedError::Cancelled);
        }
        if self.clock.now().saturating_duration_since(start) > self.timeout {
            return Err(ViewshedError::Timeout(self.timeout));
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn percent(processed: usize, total: usize) -> u8 {
    (processed * 100 / total) as u8
}
