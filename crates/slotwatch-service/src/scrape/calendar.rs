//! Enumeration of a location's calendar: every clickable day of every browsable month.

use chrono::{DateTime, Utc};

use slotwatch_core::catalog::AppointmentType;
use slotwatch_core::constants::{
    CALENDAR_DAY_LINK_SELECTOR, CALENDAR_NEXT_MONTH_SELECTOR, LOADING_SPINNER_SELECTOR,
    NEXT_MONTH_HANDLER_ATTRIBUTE, TIME_DROPDOWN_SELECTOR, TIME_OPTION_ELEMENT,
    TIME_OPTION_TYPE_ID_ATTRIBUTE,
};

use super::ScrapeOptions;
use super::error::{ScrapeError, ScrapeResult};
use super::times::parse_time_options;
use crate::browser::{Browser, BrowserResult};

/// Selector of the time options that belong to `appointment_type`.
#[must_use]
pub fn time_option_selector(appointment_type: AppointmentType) -> String {
    format!(
        "{TIME_OPTION_ELEMENT}[{TIME_OPTION_TYPE_ID_ATTRIBUTE}=\"{}\"]",
        appointment_type.id()
    )
}

/// Turns an expired content-absence wait into `false`.
fn found(result: BrowserResult<()>) -> ScrapeResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_timeout() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Walks the calendar of the location currently open in `browser`.
pub struct CalendarWalker<'a, B: Browser> {
    browser: &'a B,
    appointment_type: AppointmentType,
    options: ScrapeOptions,
}

impl<'a, B: Browser> CalendarWalker<'a, B> {
    #[must_use]
    pub const fn new(
        browser: &'a B,
        appointment_type: AppointmentType,
        options: ScrapeOptions,
    ) -> Self {
        Self {
            browser,
            appointment_type,
            options,
        }
    }

    /// ## Summary
    /// Collects the start time of every slot offered in every month the calendar lets us reach.
    ///
    /// ## Errors
    /// Returns `ScrapeError::CalendarDrift` if the number of clickable days changes while a month
    /// is walked, or any automation failure.
    #[tracing::instrument(skip(self))]
    pub async fn walk(&self) -> ScrapeResult<Vec<DateTime<Utc>>> {
        self.settle().await?;

        let mut times = Vec::new();
        let mut month = 0_usize;
        loop {
            let month_times = self.walk_month().await?;
            tracing::debug!(month, slots = month_times.len(), "Walked calendar month");
            times.extend(month_times);

            let handler = self
                .browser
                .attribute_value(CALENDAR_NEXT_MONTH_SELECTOR, NEXT_MONTH_HANDLER_ATTRIBUTE)
                .await?;
            if handler.is_none() {
                break;
            }
            self.browser
                .click(CALENDAR_NEXT_MONTH_SELECTOR, self.options.step_timeout)
                .await?;
            month += 1;
        }

        Ok(times)
    }

    async fn walk_month(&self) -> ScrapeResult<Vec<DateTime<Utc>>> {
        let mut days = self.clickable_days().await?;
        let expected = days.len();

        let mut times = Vec::new();
        for position in 0..expected {
            let day = days.get(position).ok_or(ScrapeError::CalendarDrift {
                expected,
                actual: days.len(),
            })?;
            self.browser.click_node(day).await?;
            self.settle().await?;

            times.extend(self.extract_times().await?);

            days = self.clickable_days().await?;
            if days.len() != expected {
                return Err(ScrapeError::CalendarDrift {
                    expected,
                    actual: days.len(),
                });
            }
        }

        Ok(times)
    }

    /// Clickable day links once loading finished, or none if the month has no open days.
    async fn clickable_days(&self) -> ScrapeResult<Vec<B::Node>> {
        let wait = self.options.wait_timeout;
        if !found(
            self.browser
                .wait_absent(LOADING_SPINNER_SELECTOR, wait)
                .await,
        )? {
            return Ok(Vec::new());
        }
        if !found(
            self.browser
                .wait_present(CALENDAR_DAY_LINK_SELECTOR, wait)
                .await,
        )? {
            return Ok(Vec::new());
        }
        Ok(self.browser.query_nodes(CALENDAR_DAY_LINK_SELECTOR).await?)
    }

    async fn extract_times(&self) -> ScrapeResult<Vec<DateTime<Utc>>> {
        let option_selector = time_option_selector(self.appointment_type);
        if !found(
            self.browser
                .wait_present(&option_selector, self.options.wait_timeout)
                .await,
        )? {
            return Ok(Vec::new());
        }

        let html = self.browser.outer_html(TIME_DROPDOWN_SELECTOR).await?;
        parse_time_options(&html, self.appointment_type.id())
    }

    /// Waits for the loading overlay to show and then go away.
    ///
    /// The overlay can come and go between two polls, so not seeing it appear is fine.
    async fn settle(&self) -> ScrapeResult<()> {
        found(
            self.browser
                .wait_present(LOADING_SPINNER_SELECTOR, self.options.wait_timeout)
                .await,
        )?;
        self.browser
            .wait_absent(LOADING_SPINNER_SELECTOR, self.options.step_timeout)
            .await?;
        Ok(())
    }
}
