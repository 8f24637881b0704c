use crate::{
    downsample::{downsample, marker_radius_m},
    engine::Observer,
    Config, ElevationSource, ViewshedError, VisibilityMask, C,
};
use geo::geometry::Coord;
use log::{debug, warn};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
        mpsc, Arc, Mutex, OnceLock, PoisonError,
    },
    thread,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Failed,
            _ => Self::Cancelled,
        }
    }
}

/// Shared flag a running scan polls at each checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One visibility calculation.
///
/// Moves `Idle -> Running -> {Completed, Failed, Cancelled}`. Terminal
/// states are final and always report 100% progress.
#[derive(Debug)]
pub struct Job {
    id: u64,
    state: AtomicU8,
    progress: AtomicU8,
    deadline: Duration,
    token: CancellationToken,
    started: OnceLock<Instant>,
    error: OnceLock<String>,
}

impl Job {
    pub fn new(id: u64, deadline: Duration) -> Self {
        Self {
            id,
            state: AtomicU8::new(JobState::Idle as u8),
            progress: AtomicU8::new(0),
            deadline,
            token: CancellationToken::new(),
            started: OnceLock::new(),
            error: OnceLock::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn start(&self) -> Result<(), ViewshedError> {
        self.transition(JobState::Idle, JobState::Running)?;
        let _ = self.started.set(Instant::now());
        Ok(())
    }

    /// Requests cancellation. Takes effect at the next checkpoint of the
    /// scan, or between fetch and scan.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Records `percent`, never moving progress backwards.
    pub fn set_progress(&self, percent: u8) {
        self.progress.fetch_max(percent.min(100), Ordering::SeqCst);
    }

    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Failure message, only set once the job is `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.get().map(String::as_str)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Time since `start`, `None` while idle.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.get().map(Instant::elapsed)
    }

    /// Moves a running job to the terminal state matching `result`.
    pub fn finish<T>(&self, result: &Result<T, ViewshedError>) -> Result<JobState, ViewshedError> {
        let to = match result {
            Ok(_) => JobState::Completed,
            Err(ViewshedError::Cancelled) => JobState::Cancelled,
            Err(_) => JobState::Failed,
        };
        if let Err(e) = result {
            if to == JobState::Failed && self.state() == JobState::Running {
                let _ = self.error.set(e.to_string());
            }
        }
        self.transition(JobState::Running, to)?;
        self.progress.store(100, Ordering::SeqCst);
        Ok(to)
    }
}

/// Private API.
impl Job {
    fn transition(&self, from: JobState, to: JobState) -> Result<(), ViewshedError> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|actual| ViewshedError::Transition {
                from: JobState::from_u8(actual),
                to,
            })
    }
}

/// What a finished job hands to the renderer.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub observer: Observer,
    pub mask: VisibilityMask,

    /// Downsampled visible cells.
    pub points: Vec<Coord<C>>,

    /// Display radius of each point.
    pub marker_radius_m: C,
}

/// Result of a job, tagged with the job that produced it.
#[derive(Debug)]
pub struct Outcome {
    pub job_id: u64,
    pub result: Result<Overlay, ViewshedError>,
}

/// Runs fetch, scan and downsample for one tower location at a time.
///
/// Submitting a new location cancels the job in flight. Every job sends
/// exactly one [`Outcome`]; callers drop those for which
/// [`Calculator::is_current`] is false.
pub struct Calculator<S> {
    source: Arc<S>,
    config: Config,
    next_id: AtomicU64,
    current: Mutex<Option<Arc<Job>>>,
    outcomes: mpsc::Sender<Outcome>,
}

impl<S: ElevationSource + 'static> Calculator<S> {
    pub fn new(source: S, config: Config) -> (Self, mpsc::Receiver<Outcome>) {
        let (outcomes, rx) = mpsc::channel();
        let calculator = Self {
            source: Arc::new(source),
            config,
            next_id: AtomicU64::new(1),
            current: Mutex::new(None),
            outcomes,
        };
        (calculator, rx)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a job for a tower at `location`, cancelling the previous
    /// one.
    pub fn submit(&self, location: Option<Coord<C>>) -> Result<Arc<Job>, ViewshedError> {
        let location =
            location.ok_or_else(|| ViewshedError::Input("select a tower location".into()))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let job = Arc::new(Job::new(id, self.config.timeout));
        job.start()?;

        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&job));
        if let Some(previous) = previous {
            if !previous.state().is_terminal() {
                debug!("job {} superseded by {}", previous.id(), id);
            }
            previous.cancel();
        }

        let source = Arc::clone(&self.source);
        let config = self.config.clone();
        let outcomes = self.outcomes.clone();
        let worker_job = Arc::clone(&job);
        thread::spawn(move || {
            let result = run(&*source, &config, location, &worker_job);
            match &result {
                Ok(overlay) => debug!(
                    "job {} completed; points: {}, elapsed: {:?}",
                    worker_job.id(),
                    overlay.points.len(),
                    worker_job.elapsed()
                ),
                Err(ViewshedError::Cancelled) => debug!("job {} cancelled", worker_job.id()),
                Err(e) => warn!("job {} failed: {}", worker_job.id(), e),
            }
            if let Err(e) = worker_job.finish(&result) {
                warn!("job {}: {}", worker_job.id(), e);
            }
            if outcomes
                .send(Outcome {
                    job_id: worker_job.id(),
                    result,
                })
                .is_err()
            {
                debug!("job {} outcome dropped, receiver gone", worker_job.id());
            }
        });

        Ok(job)
    }

    /// Returns `true` if `job_id` is the most recently submitted job.
    pub fn is_current(&self, job_id: u64) -> bool {
        self.current().is_some_and(|job| job.id() == job_id)
    }

    pub fn current(&self) -> Option<Arc<Job>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S> Drop for Calculator<S> {
    fn drop(&mut self) {
        if let Some(job) = self
            .current
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            job.cancel();
        }
    }
}

fn run<S: ElevationSource + ?Sized>(
    source: &S,
    config: &Config,
    location: Coord<C>,
    job: &Job,
) -> Result<Overlay, ViewshedError> {
    let grid = source.fetch(location, config.area_half_span_deg)?;
    if job.token().is_cancelled() {
        return Err(ViewshedError::Cancelled);
    }

    let observer = config.observer(location);
    let mask = VisibilityMask::builder()
        .observer(observer)
        .checkpoint_interval(config.checkpoint_interval)
        .timeout(job.deadline())
        .cancel_token(job.token().clone())
        .build(&grid, &mut |percent: u8| job.set_progress(percent))?;
    let points = downsample(&mask, config.downsample_stride);

    Ok(Overlay {
        observer,
        mask,
        points,
        marker_radius_m: marker_radius_m(config.downsample_stride),
    })
}
