//! Builds the running monitor from loaded settings.

use std::sync::Arc;

use slotwatch_core::config::{NotifyConfig, Settings};
use slotwatch_db::db::connection::create_pool;
use slotwatch_db::db::migrate::run_pending_migrations;
use slotwatch_db::store::{AppointmentStore, MemoryStore, PgStore};
use slotwatch_service::browser::WebDriverFactory;
use slotwatch_service::monitor::{Monitor, MonitorSettings, Scheduler, SchedulerSettings};
use slotwatch_service::notify::{DiscordWebhook, LogNotifier, Notifier};
use slotwatch_service::scrape::{LocationOrchestrator, ScrapeOptions};

/// ## Summary
/// Opens the configured store. With a database URL, pending migrations are applied and a pooled
/// `PostgreSQL` store is returned; without one, state lives in memory.
///
/// ## Errors
/// Returns an error if migrations fail or the pool cannot be created.
pub async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn AppointmentStore>> {
    let Some(url) = settings.database.url.as_deref() else {
        tracing::warn!("No database configured; appointment state is kept in memory");
        return Ok(Arc::new(MemoryStore::new()));
    };

    run_pending_migrations(url).await?;
    let pool = create_pool(url, u32::from(settings.database.max_connections)).await?;
    tracing::info!("Database connection pool created.");
    Ok(Arc::new(PgStore::new(pool)))
}

/// Discord delivery when a webhook is configured, the log otherwise.
#[must_use]
pub fn notifier(config: &NotifyConfig) -> Arc<dyn Notifier> {
    match config.discord_webhook.as_deref() {
        Some(url) => Arc::new(DiscordWebhook::new(url, config.username.as_str())),
        None => {
            tracing::warn!("No Discord webhook configured; notifications only go to the log");
            Arc::new(LogNotifier)
        }
    }
}

#[must_use]
pub fn scrape_options(settings: &Settings) -> ScrapeOptions {
    ScrapeOptions {
        wait_timeout: settings.browser.wait_timeout(),
        step_timeout: settings.monitor.timeout(),
    }
}

/// ## Summary
/// Wires store, notifier and browser sessions into a ready-to-run scheduler.
///
/// ## Errors
/// Returns an error if the store cannot be opened.
pub async fn build_scheduler(settings: &Settings) -> anyhow::Result<Scheduler<WebDriverFactory>> {
    let store = open_store(settings).await?;
    let orchestrator = LocationOrchestrator::new(
        Arc::new(WebDriverFactory::new(&settings.browser)),
        scrape_options(settings),
    );
    let monitor = Monitor::new(
        store,
        notifier(&settings.notify),
        orchestrator,
        MonitorSettings::from_settings(settings),
    );
    Ok(Scheduler::new(
        monitor,
        SchedulerSettings::from_settings(settings),
    ))
}
