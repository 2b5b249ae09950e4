use finqa_core::Session;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Cosmetic upload progress, advanced on a timer until the upload settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSimulation {
    interval: Duration,
    min_step: u8,
    max_step: u8,
    cap: u8,
}

impl ProgressSimulation {
    pub const DEFAULT_CAP: u8 = 90;

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            min_step: 2,
            max_step: 12,
            cap: Self::DEFAULT_CAP,
        }
    }

    /// Random increment bounds per tick; a zero minimum is raised to 1
    pub fn with_steps(mut self, min_step: u8, max_step: u8) -> Self {
        self.min_step = min_step.max(1);
        self.max_step = max_step.max(self.min_step);
        self
    }

    /// Highest progress the ticker may report, kept below 100
    pub fn with_cap(mut self, cap: u8) -> Self {
        self.cap = cap.min(99);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cap(&self) -> u8 {
        self.cap
    }

    /// Start ticking against `state`. Cancel the returned token to stop.
    pub(crate) fn spawn(
        self,
        state: Arc<Mutex<Session>>,
        parent: &CancellationToken,
    ) -> CancellationToken {
        let token = parent.child_token();
        let stop = token.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            // first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = interval.tick() => {
                        if !self.tick(&state) {
                            break;
                        }
                    }
                }
            }
            trace!("Progress ticker stopped");
        });

        token
    }

    /// Advance once. Returns false when the upload is no longer running.
    fn tick(&self, state: &Mutex<Session>) -> bool {
        let step = rand::thread_rng().gen_range(self.min_step..=self.max_step);
        let mut session = state.lock();
        if !session.upload.is_uploading() {
            return false;
        }
        session.upload.advance(step, self.cap);
        true
    }
}

impl Default for ProgressSimulation {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}
