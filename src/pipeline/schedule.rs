// src/pipeline/schedule.rs

//! Fixed-interval poll loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::pipeline::Watcher;

/// Run cycles every `period` until `shutdown` resolves.
///
/// The first cycle starts immediately. Cycles never overlap: a slow cycle
/// delays the next tick instead of queueing a burst. A shutdown request is
/// observed between cycles only, so a running cycle always completes.
///
/// Returns the number of cycles run.
pub async fn run_schedule<F>(watcher: &Watcher, period: Duration, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                log::info!("Shutdown requested, stopping after {} cycle(s)", cycles);
                return cycles;
            }
            _ = ticker.tick() => {}
        }

        cycles += 1;
        match watcher.run_cycle().await {
            Ok(summary) if !summary.save_failures.is_empty() => log::warn!(
                "Cycle {} finished but snapshots were not advanced; changes may be re-reported",
                cycles
            ),
            Ok(_) => {}
            Err(e) => log::warn!("Cycle {} aborted, retrying next tick: {}", cycles, e),
        }
    }
}
