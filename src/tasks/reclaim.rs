//! Sampled Reclamation Task
//!
//! Background task that removes expired entries without scanning the whole
//! table. Each cycle sweeps a small random sample of keys; the sample is
//! redrawn once most of it has been consumed.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::StoreInner;

/// Parameters for the reclamation worker.
#[derive(Debug, Clone, Copy)]
pub struct ReclaimOptions {
    /// Keys drawn per sample
    pub sample_size: usize,
    /// Pause between cycles
    pub interval: Duration,
}

// == Sampler ==
/// Tracks the current sample and how much of it is left.
#[derive(Debug)]
struct Sampler {
    sample_size: usize,
    keys: Vec<String>,
    drawn: usize,
}

impl Sampler {
    fn new(sample_size: usize) -> Self {
        Self {
            sample_size,
            keys: Vec::with_capacity(sample_size),
            drawn: 0,
        }
    }

    // == Needs Refresh ==
    /// True when nothing was drawn or more than 75% of the draw is consumed.
    fn needs_refresh(&self) -> bool {
        let consumed = self.drawn - self.keys.len();
        self.drawn == 0 || consumed * 4 > self.drawn * 3
    }

    // == Run Cycle ==
    /// Redraws if needed, then sweeps the sample. Returns entries removed.
    async fn run_cycle(&mut self, store: &StoreInner) -> usize {
        if self.needs_refresh() {
            self.keys = store.sample_keys(self.sample_size).await;
            self.drawn = self.keys.len();
        }

        if self.keys.is_empty() {
            return 0;
        }
        store.sweep(&mut self.keys).await
    }
}

/// Spawns the reclamation worker for a store.
///
/// The first cycle runs one interval after spawning. The worker holds a weak
/// reference and exits on the first tick after the last store handle is
/// dropped.
///
/// # Returns
/// A JoinHandle for the spawned task.
pub(crate) fn spawn_reclaim_task(store: Weak<StoreInner>, options: ReclaimOptions) -> JoinHandle<()> {
    let start = Instant::now() + options.interval;

    tokio::spawn(async move {
        info!(
            "Starting reclamation task: sample_size={}, interval={:?}",
            options.sample_size, options.interval
        );

        let mut ticker = tokio::time::interval_at(start, options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sampler = Sampler::new(options.sample_size);

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                debug!("Cache store dropped, stopping reclamation task");
                break;
            };

            let removed = sampler.run_cycle(&store).await;
            if removed > 0 {
                debug!("Reclamation: removed {} expired entries", removed);
            }
        }
    })
}
