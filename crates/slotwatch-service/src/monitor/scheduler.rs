//! Periodic execution of monitoring ticks.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use slotwatch_core::config::Settings;

use super::tick::{Monitor, TickReport};
use crate::browser::SessionFactory;
use crate::error::ServiceResult;

/// When ticks run and how failures are handled.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerSettings {
    pub interval: Duration,
    /// End the loop on the first failed tick instead of waiting for the next one.
    pub stop_on_failure: bool,
    pub max_transient_retries: u32,
    pub transient_backoff: Duration,
    pub run_once: bool,
}

impl SchedulerSettings {
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self {
            interval: settings.monitor.interval(),
            stop_on_failure: settings.monitor.stop_on_failure,
            max_transient_retries: settings.monitor.max_transient_retries,
            transient_backoff: settings.monitor.transient_backoff(),
            run_once: settings.monitor.run_once,
        }
    }
}

/// Runs a [`Monitor`] immediately and then on a fixed interval.
pub struct Scheduler<F: SessionFactory> {
    monitor: Monitor<F>,
    settings: SchedulerSettings,
}

impl<F: SessionFactory> Scheduler<F> {
    #[must_use]
    pub const fn new(monitor: Monitor<F>, settings: SchedulerSettings) -> Self {
        Self { monitor, settings }
    }

    /// ## Summary
    /// Runs one tick, retrying it in place after transient failures.
    ///
    /// ## Errors
    /// Returns the tick's error once it is not transient or the retries are used up.
    pub async fn run_tick(&self) -> ServiceResult<TickReport> {
        let mut attempt = 0;
        loop {
            match self.monitor.handle_tick().await {
                Err(err) if err.is_transient() && attempt < self.settings.max_transient_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %err, "Tick failed with a transient error; retrying");
                    tokio::time::sleep(self.settings.transient_backoff).await;
                }
                outcome => return outcome,
            }
        }
    }

    /// ## Summary
    /// Runs ticks until Ctrl-C is received.
    ///
    /// ## Errors
    /// Returns the failing tick's error when `stop_on_failure` is set.
    pub async fn run(&self) -> ServiceResult<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "Cannot listen for Ctrl-C; running until killed");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// ## Summary
    /// Runs a tick now and then once per interval until `shutdown` completes. A tick in progress
    /// is abandoned on shutdown.
    ///
    /// ## Errors
    /// Returns the failing tick's error when `stop_on_failure` is set.
    #[tracing::instrument(skip_all, fields(interval = ?self.settings.interval, locations = ?self.monitor.settings().locations))]
    pub async fn run_until<S>(&self, shutdown: S) -> ServiceResult<()>
    where
        S: Future<Output = ()>,
    {
        tracing::info!("Starting monitor");

        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                () = &mut shutdown => break,
                outcome = self.run_tick() => outcome,
            };

            if let Err(err) = outcome {
                tracing::error!(error = %err, "Tick failed");
                if self.settings.stop_on_failure {
                    return Err(err);
                }
            }

            if self.settings.run_once {
                return Ok(());
            }
            tracing::info!(interval = ?self.settings.interval, "Sleeping between location checks");
        }

        tracing::info!("Shutting down monitor");
        Ok(())
    }
}
