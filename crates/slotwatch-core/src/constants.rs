//! Fixed facts about the booking site: URLs, selectors, attribute names and formats.

/// Entry point of the booking flow.
pub const BOOKING_URL: &str = "https://skiptheline.ncdot.gov/";

/// Prefix shared by appointment type and location tiles; the tile's `data-id` completes it.
pub const QFLOW_ITEM_SELECTOR_PREFIX: &str = "div.QflowObjectItem[data-id=\"";
pub const QFLOW_ITEM_SELECTOR_SUFFIX: &str = "\"]";

pub const MAKE_APPOINTMENT_BUTTON_SELECTOR: &str = "button#cmdMakeAppt";
pub const LOADING_SPINNER_SELECTOR: &str = "div.blockUI";

pub const CALENDAR_DAY_SELECTOR: &str = "td[data-handler=\"selectDay\"]";
pub const CALENDAR_DAY_LINK_SELECTOR: &str =
    const_str::concat!(CALENDAR_DAY_SELECTOR, " > a.ui-state-default");
pub const CALENDAR_NEXT_MONTH_SELECTOR: &str = "a.ui-datepicker-next";

pub const TIME_DROPDOWN_SELECTOR: &str = "div.AppointmentTime select";

/// Class carried by location tiles that can currently be booked.
pub const LOCATION_AVAILABLE_CLASS: &str = "Active-Unit";

pub const CLASS_ATTRIBUTE: &str = "class";
pub const NEXT_MONTH_HANDLER_ATTRIBUTE: &str = "data-handler";
pub const TIME_OPTION_ELEMENT: &str = "option";
pub const TIME_OPTION_DATETIME_ATTRIBUTE: &str = "data-datetime";
pub const TIME_OPTION_TYPE_ID_ATTRIBUTE: &str = "data-appointmenttypeid";

/// `chrono` pattern for `data-datetime` values such as `1/2/2006 3:04:05 PM`.
pub const TIME_OPTION_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Maximum number of appointments spelled out in one location's message.
pub const MAX_ENTRIES_PER_MESSAGE: usize = 10;
