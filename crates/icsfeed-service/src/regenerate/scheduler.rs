//! Fixed-interval regeneration.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use icsfeed_core::config::FeedConfig;
use icsfeed_db::db::StoreProvider;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::cycle::run_cycle;
use super::gate::{RunGate, SchedulerState};

/// What a tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A cycle was spawned; the handle resolves when it finishes.
    Started(JoinHandle<()>),
    /// A cycle was already running, so nothing happened.
    Skipped,
}

/// Runs regeneration cycles, never more than one at a time.
pub struct Regenerator<P> {
    provider: Arc<P>,
    config: Arc<FeedConfig>,
    gate: Arc<RunGate>,
}

impl<P: StoreProvider + 'static> Regenerator<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, config: FeedConfig) -> Self {
        Self {
            provider,
            config: Arc::new(config),
            gate: RunGate::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.gate.state()
    }

    /// ## Summary
    /// Starts a cycle in the background if none is running.
    ///
    /// A tick that finds a cycle in progress is dropped, not queued. Cycle
    /// failures are logged here and never propagate further.
    pub fn tick(&self) -> TickOutcome {
        let Some(guard) = self.gate.try_enter() else {
            tracing::debug!("Previous cycle still running, skipping tick");
            return TickOutcome::Skipped;
        };

        let provider = Arc::clone(&self.provider);
        let config = Arc::clone(&self.config);

        let handle = tokio::spawn(async move {
            let _guard = guard;
            let started = Instant::now();

            tracing::info!("Regeneration cycle started");

            match run_cycle(provider.as_ref(), &config).await {
                Ok(report) => tracing::info!(
                    written = report.written.len(),
                    failed = report.failed.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "Regeneration cycle finished"
                ),
                Err(error) => tracing::error!(
                    error = %error,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Regeneration cycle aborted, feeds left as they were"
                ),
            }
        });

        TickOutcome::Started(handle)
    }

    /// ## Summary
    /// Ticks every `period`, starting immediately, until `shutdown` resolves.
    ///
    /// A cycle still running at shutdown is not awaited. Feed writes replace
    /// whole files, so stopping mid-cycle leaves every feed intact.
    pub async fn run<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);

        tracing::info!(period_secs = period.as_secs(), "Regeneration scheduler started");

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = interval.tick() => {
                    self.tick();
                }
            }
        }

        tracing::info!("Regeneration scheduler stopped");
    }
}
