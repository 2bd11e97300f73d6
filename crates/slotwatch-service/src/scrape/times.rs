//! Extraction of appointment times from the day's time dropdown.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::America::New_York;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use slotwatch_core::constants::{
    TIME_OPTION_DATETIME_ATTRIBUTE, TIME_OPTION_ELEMENT, TIME_OPTION_FORMAT,
    TIME_OPTION_TYPE_ID_ATTRIBUTE,
};

use super::error::{ScrapeError, ScrapeResult};

/// ## Summary
/// Parses a `data-datetime` value, which the site writes in Eastern time.
///
/// Returns `None` when the value does not match the site's format or names a local time that
/// does not exist.
#[must_use]
pub fn parse_option_datetime(value: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), TIME_OPTION_FORMAT).ok()?;
    naive
        .and_local_timezone(New_York)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// ## Summary
/// Parses the outer HTML of the time dropdown and returns the start time of every option that
/// belongs to `type_id`, in document order.
///
/// Options with a missing or unparseable `data-datetime` are logged and skipped.
///
/// ## Errors
/// Returns `ScrapeError::Markup` if the fragment cannot be tokenized.
#[tracing::instrument(skip(html), fields(html_len = html.len()))]
pub fn parse_time_options(html: &str, type_id: u32) -> ScrapeResult<Vec<DateTime<Utc>>> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let wanted = type_id.to_string();
    let mut times = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e))
                if e.local_name().as_ref() == TIME_OPTION_ELEMENT.as_bytes() =>
            {
                let attrs = option_attributes(e)?;
                if attrs.type_id.as_deref() != Some(wanted.as_str()) {
                    continue;
                }
                let Some(raw) = attrs.datetime else {
                    tracing::warn!("Time option has no datetime attribute");
                    continue;
                };
                match parse_option_datetime(&raw) {
                    Some(time) => times.push(time),
                    None => tracing::error!(datetime = %raw, "Failed to parse appointment time"),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScrapeError::Markup(e.to_string())),
            _ => {}
        }
    }

    Ok(times)
}

#[derive(Default)]
struct OptionAttributes {
    type_id: Option<String>,
    datetime: Option<String>,
}

fn option_attributes(e: &BytesStart<'_>) -> ScrapeResult<OptionAttributes> {
    let mut attrs = OptionAttributes::default();
    for attr in e.html_attributes() {
        let attr = attr.map_err(|err| ScrapeError::Markup(err.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|err| ScrapeError::Markup(err.to_string()))?;
        match attr.key.local_name().as_ref() {
            k if k == TIME_OPTION_TYPE_ID_ATTRIBUTE.as_bytes() => {
                attrs.type_id = Some(value.to_owned());
            }
            k if k == TIME_OPTION_DATETIME_ATTRIBUTE.as_bytes() => {
                attrs.datetime = Some(value.to_owned());
            }
            _ => {}
        }
    }
    Ok(attrs)
}
