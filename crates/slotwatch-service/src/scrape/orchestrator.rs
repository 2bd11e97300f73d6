//! Concurrent scraping of every tracked location under one shared deadline.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::Instrument;

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::types::ObservedAppointment;

use super::ScrapeOptions;
use super::error::{ScrapeError, ScrapeResult};
use super::navigator::FlowNavigator;
use crate::browser::{Browser, SessionFactory};

type LocationResult = (usize, ScrapeResult<Vec<ObservedAppointment>>);

/// Fans the booking flow out over locations, one browser session each.
pub struct LocationOrchestrator<F: SessionFactory> {
    factory: Arc<F>,
    options: ScrapeOptions,
}

impl<F: SessionFactory> LocationOrchestrator<F> {
    #[must_use]
    pub const fn new(factory: Arc<F>, options: ScrapeOptions) -> Self {
        Self { factory, options }
    }

    /// ## Summary
    /// Scrapes every location concurrently and returns all slots found.
    ///
    /// Each location gets its own session, closed as soon as its flow ends. All of them share
    /// one deadline `timeout` from now. Results are merged in the order locations finish. On the
    /// first failure the remaining flows are cancelled, and the call returns once every session
    /// is closed.
    ///
    /// ## Errors
    /// Returns the first location failure received, `ScrapeError::DeadlineExceeded` if a
    /// location is still running when the deadline passes, or `ScrapeError::TaskPanicked` if a
    /// location task panics. Results of the other locations are discarded.
    #[tracing::instrument(skip(self, locations), fields(locations = locations.len()))]
    pub async fn run_for_locations(
        &self,
        appointment_type: AppointmentType,
        locations: &[Location],
        timeout: Duration,
    ) -> ScrapeResult<Vec<ObservedAppointment>> {
        let deadline = Instant::now() + timeout;
        let (tx, mut rx) = mpsc::channel::<LocationResult>(locations.len().max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        for (index, &location) in locations.iter().enumerate() {
            let tx = tx.clone();
            let cancel = cancel_rx.clone();
            let factory = Arc::clone(&self.factory);
            let options = self.options;
            let task = async move {
                let result = AssertUnwindSafe(scrape_location(
                    factory.as_ref(),
                    appointment_type,
                    location,
                    options,
                    deadline,
                    timeout,
                    cancel,
                ))
                .catch_unwind()
                .await
                .unwrap_or(Err(ScrapeError::TaskPanicked(location)));

                if tx.send((index, result)).await.is_err() {
                    tracing::debug!("Orchestrator stopped listening; dropping result");
                }
            };
            tasks.spawn(task.instrument(tracing::debug_span!("location", %location)));
        }
        drop(tx);

        let outcome = collect_results(&mut rx, locations).await;
        if outcome.is_err() {
            cancel_tx.send_replace(true);
        }
        while tasks.join_next().await.is_some() {}

        outcome
    }
}

/// Drains one result per location, stopping at the first failure.
async fn collect_results(
    rx: &mut mpsc::Receiver<LocationResult>,
    locations: &[Location],
) -> ScrapeResult<Vec<ObservedAppointment>> {
    let mut appointments = Vec::new();
    for _ in 0..locations.len() {
        let Some((index, result)) = rx.recv().await else {
            return Err(ScrapeError::ResultChannelClosed);
        };
        let location = locations.get(index).copied().unwrap_or(Location::Invalid);

        let found = match result {
            Ok(found) => found,
            Err(err) => {
                tracing::error!(%location, error = %err, "Failed to check location");
                return Err(err);
            }
        };
        if found.is_empty() {
            tracing::info!(%location, "No appointments available");
        } else {
            tracing::info!(%location, count = found.len(), "Found appointments in location");
        }
        appointments.extend(found);
    }
    Ok(appointments)
}

/// Resolves once the orchestrator cancels the remaining flows or goes away.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        tracing::trace!("Orchestrator dropped its cancel handle");
    }
}

/// Runs one location's flow in a fresh session and closes the session afterwards, whether the
/// flow succeeded, failed, panicked, ran out of time or was cancelled.
async fn scrape_location<F: SessionFactory>(
    factory: &F,
    appointment_type: AppointmentType,
    location: Location,
    options: ScrapeOptions,
    deadline: Instant,
    timeout: Duration,
    mut cancel: watch::Receiver<bool>,
) -> ScrapeResult<Vec<ObservedAppointment>> {
    tracing::debug!("Starting to process location");

    let session = tokio::select! {
        opened = timeout_at(deadline, factory.open()) => match opened {
            Ok(session) => session?,
            Err(_elapsed) => return Err(ScrapeError::DeadlineExceeded(timeout)),
        },
        () = cancelled(&mut cancel) => return Err(ScrapeError::Cancelled(location)),
    };

    let navigator = FlowNavigator::new(&session, appointment_type, location, options);
    let flow = AssertUnwindSafe(navigator.find_appointments()).catch_unwind();
    let result = tokio::select! {
        finished = timeout_at(deadline, flow) => match finished {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => Err(ScrapeError::TaskPanicked(location)),
            Err(_elapsed) => Err(ScrapeError::DeadlineExceeded(timeout)),
        },
        () = cancelled(&mut cancel) => {
            tracing::debug!("Flow cancelled after another location failed");
            Err(ScrapeError::Cancelled(location))
        }
    };

    if let Err(err) = session.close().await {
        tracing::warn!(error = %err, "Failed to close browser session");
    }
    result
}
