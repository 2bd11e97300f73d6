//! Scraping, change detection and notification for the appointment monitor.

pub mod browser;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod scrape;
