/// Format used by a single-date picker that also edits the time of day
pub const DATE_TIME_FORMAT: &str = "YYYY/MM/DD HH:mm:ss";
/// Format used by a picker that only edits the time of day
pub const TIME_FORMAT: &str = "HH:mm:ss";
/// Format used by the month-only picker
pub const MONTH_FORMAT: &str = "MM/YYYY";
/// Format used by the year-only picker
pub const YEAR_FORMAT: &str = "YYYY";
/// Format used by range and multiple selection
pub const DATE_FORMAT: &str = "YYYY/MM/DD";

/// Calendar system used when none is configured
pub const DEFAULT_CALENDAR: &str = "gregorian";
/// Locale used when none is configured
pub const DEFAULT_LOCALE: &str = "en";
/// Locales rendered right-to-left
pub const RTL_LOCALES: [&str; 2] = ["fa", "ar"];

/// Month window width used whenever the configured one is unusable
pub const DEFAULT_MONTH_COUNT: u8 = 1;

/// Wall-clock components of the first instant of a day
pub const START_OF_DAY: (u32, u32, u32, u32) = (0, 0, 0, 0);
/// Wall-clock components of the last representable instant of a day
pub const END_OF_DAY: (u32, u32, u32, u32) = (23, 59, 59, 999);

/// Event name fired on every accepted selection change
pub const CHANGE_EVENT: &str = "change";

/// Prefix of the border class emitted for each occupied anchor
pub const BORDER_CLASS_PREFIX: &str = "rmdp-border-";

/// Western Arabic digits
pub const LATIN_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
/// Extended Arabic-Indic digits used by Persian locales
pub const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
/// Arabic-Indic digits
pub const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];
