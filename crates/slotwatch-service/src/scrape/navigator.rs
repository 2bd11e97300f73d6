//! The state machine that drives one session from the landing page to a location's calendar.

use slotwatch_core::catalog::{AppointmentType, Location};
use slotwatch_core::constants::{
    BOOKING_URL, CLASS_ATTRIBUTE, LOCATION_AVAILABLE_CLASS, MAKE_APPOINTMENT_BUTTON_SELECTOR,
};
use slotwatch_core::types::ObservedAppointment;

use super::ScrapeOptions;
use super::calendar::CalendarWalker;
use super::error::{ScrapeError, ScrapeResult};
use crate::browser::Browser;

/// Position of a session in the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Start,
    MainPage,
    TypeSelected,
    LocationsPage,
    LocationCalendar,
}

/// Walks the booking flow for one location in one browser session.
pub struct FlowNavigator<'a, B: Browser> {
    browser: &'a B,
    appointment_type: AppointmentType,
    location: Location,
    options: ScrapeOptions,
}

impl<'a, B: Browser> FlowNavigator<'a, B> {
    #[must_use]
    pub const fn new(
        browser: &'a B,
        appointment_type: AppointmentType,
        location: Location,
        options: ScrapeOptions,
    ) -> Self {
        Self {
            browser,
            appointment_type,
            location,
            options,
        }
    }

    /// ## Summary
    /// Runs the flow to completion and returns every slot found at the location, in discovery
    /// order. An unavailable location yields no slots and never touches the calendar.
    ///
    /// ## Errors
    /// Returns an error on any automation failure or if the location's tile is missing or
    /// ambiguous.
    #[tracing::instrument(skip(self), fields(location = %self.location, appointment_type = %self.appointment_type))]
    pub async fn find_appointments(&self) -> ScrapeResult<Vec<ObservedAppointment>> {
        let mut state = FlowState::Start;

        loop {
            tracing::trace!(?state, "Advancing booking flow");
            state = match state {
                FlowState::Start => {
                    self.browser.navigate(BOOKING_URL).await?;
                    FlowState::MainPage
                }
                FlowState::MainPage => {
                    self.browser
                        .click(MAKE_APPOINTMENT_BUTTON_SELECTOR, self.options.step_timeout)
                        .await?;
                    FlowState::TypeSelected
                }
                FlowState::TypeSelected => {
                    self.browser
                        .click(
                            &self.appointment_type.to_selector(),
                            self.options.step_timeout,
                        )
                        .await?;
                    FlowState::LocationsPage
                }
                FlowState::LocationsPage => {
                    if !self.open_location_if_available().await? {
                        tracing::debug!("Location has no open appointments");
                        return Ok(Vec::new());
                    }
                    FlowState::LocationCalendar
                }
                FlowState::LocationCalendar => {
                    let times = CalendarWalker::new(self.browser, self.appointment_type, self.options)
                        .walk()
                        .await?;
                    return Ok(times
                        .into_iter()
                        .map(|starts_at| ObservedAppointment::new(self.location, starts_at))
                        .collect());
                }
            };
        }
    }

    /// Clicks the location tile if the site marks it bookable. Returns whether it did.
    async fn open_location_if_available(&self) -> ScrapeResult<bool> {
        let selector = self.location.to_selector();
        self.browser
            .wait_visible(&selector, self.options.step_timeout)
            .await?;

        let mut nodes = self.browser.query_nodes(&selector).await?;
        let node = match nodes.len() {
            0 => return Err(ScrapeError::LocationNodeMissing(self.location)),
            1 => nodes.remove(0),
            count => {
                return Err(ScrapeError::DuplicateLocationNodes {
                    location: self.location,
                    count,
                });
            }
        };

        let class = self
            .browser
            .node_attribute(&node, CLASS_ATTRIBUTE)
            .await?
            .unwrap_or_default();
        if !class.contains(LOCATION_AVAILABLE_CLASS) {
            return Ok(false);
        }

        self.browser.click_node(&node).await?;
        Ok(true)
    }
}
