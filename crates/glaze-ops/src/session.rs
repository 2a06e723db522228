//! Latest-wins rendering for interactive callers.
//!
//! A [`RenderSession`] owns one base raster. Every [`submit`](RenderSession::submit)
//! starts a pipeline run on a worker thread and supersedes all earlier
//! submissions: a run whose generation is no longer the newest when it
//! finishes (or before it starts) is dropped instead of delivered. Runs are
//! never interrupted mid-stage.
//!
//! # Usage
//!
//! 1. Create with [`RenderSession::new`].
//! 2. Call [`submit`](RenderSession::submit) on every parameter change.
//! 3. Call [`poll`](RenderSession::poll) from the UI loop, or
//!    [`wait`](RenderSession::wait) to block for the newest result.
//! 4. On drop the session joins its workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use glaze_core::Raster;
use tracing::{debug, trace};

use crate::pipeline::{apply, Params};
use crate::{OpsError, OpsResult};

/// A finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    /// Generation returned by the `submit` call that started the run.
    pub generation: u64,
    /// Pipeline output.
    pub result: OpsResult<Raster>,
}

/// Runs the pipeline in the background, delivering only the newest result.
pub struct RenderSession {
    base: Raster,
    latest: Arc<AtomicU64>,
    tx: Sender<RenderOutcome>,
    rx: Receiver<RenderOutcome>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl RenderSession {
    /// Creates a session for `base`. Nothing runs until the first submit.
    pub fn new(base: Raster) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            base,
            latest: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            workers: Vec::new(),
        }
    }

    /// The raster every run starts from.
    pub fn base(&self) -> &Raster {
        &self.base
    }

    /// Generation of the newest submission, 0 before any.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Whether any worker is still running.
    pub fn is_busy(&self) -> bool {
        self.workers.iter().any(|h| !h.is_finished())
    }

    /// Starts a run with `params`, superseding every earlier one.
    ///
    /// Returns the generation of the new run.
    ///
    /// # Errors
    ///
    /// [`OpsError::Worker`] if the worker thread cannot be spawned.
    pub fn submit(&mut self, params: Params) -> OpsResult<u64> {
        self.workers.retain(|h| !h.is_finished());

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let base = self.base.clone();
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();

        let handle = thread::Builder::new()
            .name(format!("glaze-render-{generation}"))
            .spawn(move || render_worker(generation, base, params, latest, tx))
            .map_err(|e| OpsError::Worker(e.to_string()))?;

        self.workers.push(handle);
        debug!(generation, in_flight = self.workers.len(), "render submitted");
        Ok(generation)
    }

    /// Returns the newest finished run, if it has arrived. Never blocks.
    ///
    /// Older outcomes waiting in the queue are discarded.
    pub fn poll(&mut self) -> Option<RenderOutcome> {
        let latest = self.latest_generation();
        let mut newest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation == latest {
                newest = Some(outcome);
            }
        }
        newest
    }

    /// Blocks until the newest submission finishes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<RenderOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) if outcome.generation == self.latest_generation() => {
                    return Some(outcome);
                }
                Ok(outcome) => {
                    trace!(generation = outcome.generation, "dropping stale outcome");
                }
                Err(_) => return None,
            }
        }
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn render_worker(
    generation: u64,
    base: Raster,
    params: Params,
    latest: Arc<AtomicU64>,
    tx: Sender<RenderOutcome>,
) {
    if latest.load(Ordering::SeqCst) != generation {
        trace!(generation, "superseded before start");
        return;
    }

    let result = apply(&base, &params);

    if latest.load(Ordering::SeqCst) != generation {
        trace!(generation, "superseded, discarding result");
        return;
    }
    // Receiver lives as long as the session; a send error means it is gone.
    let _ = tx.send(RenderOutcome { generation, result });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::PixelFormat;

    fn base() -> Raster {
        Raster::filled(32, 32, PixelFormat::Rgb, &[200, 100, 50]).unwrap()
    }

    #[test]
    fn test_new_session_is_idle() {
        let mut session = RenderSession::new(base());
        assert_eq!(session.latest_generation(), 0);
        assert!(!session.is_busy());
        assert!(session.poll().is_none());
    }

    #[test]
    fn test_single_run_matches_apply() {
        let mut session = RenderSession::new(base());
        let params = Params::default().with_invert(true);
        let generation = session.submit(params.clone()).unwrap();
        assert_eq!(generation, 1);

        let outcome = session.wait(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.result, apply(&base(), &params));
    }

    #[test]
    fn test_latest_submission_wins() {
        let mut session = RenderSession::new(base());
        for i in 0..8 {
            session
                .submit(Params::default().with_luminance(i as f32 * 0.1))
                .unwrap();
        }
        let last = Params::default().with_luminance(0.5);
        let generation = session.submit(last.clone()).unwrap();
        assert_eq!(generation, 9);

        let outcome = session.wait(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.generation, 9);
        assert_eq!(outcome.result, apply(&base(), &last));

        // Nothing older can surface afterwards.
        for handle in session.workers.drain(..) {
            handle.join().unwrap();
        }
        assert!(session.poll().is_none());
    }

    #[test]
    fn test_poll_eventually_delivers() {
        let mut session = RenderSession::new(base());
        session.submit(Params::default()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        let outcome = loop {
            if let Some(outcome) = session.poll() {
                break outcome;
            }
            assert!(Instant::now() < deadline, "render never arrived");
            thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(outcome.generation, 1);
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn test_errors_are_delivered() {
        let mut session = RenderSession::new(base());
        session.submit(Params::default().with_luminance(-1.0)).unwrap();
        let outcome = session.wait(Duration::from_secs(10)).unwrap();
        assert!(matches!(outcome.result, Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_wait_times_out_without_submission() {
        let mut session = RenderSession::new(base());
        assert!(session.wait(Duration::from_millis(20)).is_none());
    }
}
