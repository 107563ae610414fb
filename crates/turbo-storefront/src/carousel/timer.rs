//! Autoplay timers.
//!
//! A timer delivers [`CarouselInput::Tick`] values tagged with the generation
//! of the run that produced them. Each `start` begins a new generation, so a
//! tick still queued from an earlier run is recognizably stale.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::carousel::CarouselInput;

/// Starts and stops autoplay. Both operations are idempotent.
pub trait AutoplayTimer: Send {
    /// Start ticking. A running timer is left alone.
    fn start(&mut self);

    /// Stop ticking. A stopped timer is left alone.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Whether a tick from `generation` belongs to the current run.
    fn accepts(&self, generation: u64) -> bool;
}

/// Timer backed by a tokio task that feeds ticks into the carousel's input
/// channel. The first tick arrives one full period after `start`.
#[derive(Debug)]
pub struct TokioAutoplayTimer {
    period: Duration,
    inputs: UnboundedSender<CarouselInput>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl TokioAutoplayTimer {
    pub fn new(period: Duration, inputs: UnboundedSender<CarouselInput>) -> Self {
        Self {
            period,
            inputs,
            handle: None,
            generation: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl AutoplayTimer for TokioAutoplayTimer {
    fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let inputs = self.inputs.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if inputs.send(CarouselInput::Tick(generation)).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(generation, "autoplay started");
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::trace!(generation = self.generation, "autoplay stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    fn accepts(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }
}

impl Drop for TokioAutoplayTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Default)]
struct ManualState {
    running: bool,
    generation: u64,
    starts: usize,
    stops: usize,
}

/// Timer that never fires on its own. Ticks are driven by hand.
///
/// Clones share state, so a caller can keep a handle after moving the timer
/// into a controller.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the current (or most recent) run.
    pub fn generation(&self) -> u64 {
        self.read(|s| s.generation)
    }

    /// Number of starts that actually began a run.
    pub fn starts(&self) -> usize {
        self.read(|s| s.starts)
    }

    /// Number of stops that actually ended a run.
    pub fn stops(&self) -> usize {
        self.read(|s| s.stops)
    }

    fn read<R: Default>(&self, f: impl FnOnce(&ManualState) -> R) -> R {
        self.state.lock().map(|s| f(&*s)).unwrap_or_default()
    }
}

impl AutoplayTimer for ManualTimer {
    fn start(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            if !s.running {
                s.running = true;
                s.generation += 1;
                s.starts += 1;
            }
        }
    }

    fn stop(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            if s.running {
                s.running = false;
                s.stops += 1;
            }
        }
    }

    fn is_running(&self) -> bool {
        self.read(|s| s.running)
    }

    fn accepts(&self, generation: u64) -> bool {
        self.read(|s| s.running && s.generation == generation)
    }
}
