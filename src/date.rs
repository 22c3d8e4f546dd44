//! The date-object contract the picker is written against, and a Gregorian
//! adapter backed by `chrono`.

use crate::consts::{END_OF_DAY, START_OF_DAY};
use crate::prelude::*;
use crate::types::{CalendarId, DigitSet, Locale};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Calendar, locale, format and digit set a date is interpreted under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateContext {
    pub calendar: CalendarId,
    pub locale: Locale,
    pub format: Option<String>,
    pub digits: Option<DigitSet>,
}

impl DateContext {
    /// Context that only pins the calendar, leaving locale and format at defaults
    pub fn for_calendar(calendar: CalendarId) -> Self {
        Self {
            calendar,
            ..Self::default()
        }
    }
}

/// Raw input the host may hand over wherever a date is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput<D> {
    /// An already constructed date object, passed through unchanged
    Object(D),
    /// Text understood by the date adapter
    Text(String),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
}

impl<D> DateInput<D> {
    /// Short name of the input kind, used in diagnostics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "date object",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl<D> From<&str> for DateInput<D> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// The externally supplied selected value: nothing, one date, or a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value<D> {
    #[default]
    Empty,
    One(DateInput<D>),
    Many(Vec<DateInput<D>>),
}

impl<D> Value<D> {
    /// Empty values and empty text count as "no value". An empty list does not.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::One(DateInput::Text(text)) => text.is_empty(),
            Self::One(_) | Self::Many(_) => false,
        }
    }

    /// True for the list form, even when the list is empty
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

/// Contract of the date-object abstraction.
///
/// Calendar arithmetic, calendar conversion and formatting live behind this
/// trait. `Ord` must follow chronological order regardless of calendar,
/// locale or format.
pub trait DateObject: Clone + Ord + fmt::Debug {
    /// Current instant under `ctx`
    fn now(ctx: &DateContext) -> Self;

    /// Builds a date from raw input. Objects pass through unchanged; anything
    /// that cannot be interpreted yields an invalid date rather than an error.
    fn from_input(input: &DateInput<Self>, ctx: &DateContext) -> Self;

    fn is_valid(&self) -> bool;

    fn calendar(&self) -> &CalendarId;
    fn locale(&self) -> &Locale;
    fn format(&self) -> Option<&str>;
    fn digits(&self) -> Option<&DigitSet>;

    fn set_calendar(&mut self, calendar: CalendarId);
    fn set_locale(&mut self, locale: Locale);
    fn set_format(&mut self, format: Option<String>);
    fn set_digits(&mut self, digits: Option<DigitSet>);

    fn year(&self) -> i32;

    #[must_use]
    fn to_first_of_month(&self) -> Self;
    #[must_use]
    fn to_last_of_month(&self) -> Self;
    #[must_use]
    fn add_months(&self, months: i32) -> Self;
    #[must_use]
    fn start_of_day(&self) -> Self;
    #[must_use]
    fn end_of_day(&self) -> Self;

    /// Brings calendar, locale, format and digits in line with `ctx`.
    fn sync(&mut self, ctx: &DateContext) {
        if self.calendar() != &ctx.calendar {
            self.set_calendar(ctx.calendar.clone());
        }
        if self.locale() != &ctx.locale {
            self.set_locale(ctx.locale.clone());
        }
        if self.format() != ctx.format.as_deref() {
            self.set_format(ctx.format.clone());
        }
        self.set_digits(ctx.digits);
    }

    /// Whether the date carries exactly the attributes of `ctx`
    fn matches(&self, ctx: &DateContext) -> bool {
        self.calendar() == &ctx.calendar
            && self.locale() == &ctx.locale
            && self.format() == ctx.format.as_deref()
            && self.digits() == ctx.digits.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "Unrecognized date: {}", _0)]
    Unrecognized(String),
    #[display(fmt = "Timestamp out of range: {}", _0)]
    TimestampOutOfRange(i64),
}

impl std::error::Error for DateError {}

/// Text layouts accepted by [`DateValue`], tried in order.
const DATE_TIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];
const DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Gregorian date adapter. An instant of `None` is an invalid date.
#[derive(Debug, Clone)]
pub struct DateValue {
    instant: Option<NaiveDateTime>,
    calendar: CalendarId,
    locale: Locale,
    format: Option<String>,
    digits: Option<DigitSet>,
}

impl DateValue {
    /// Date at `instant`, carrying the attributes of `ctx`
    pub fn new(instant: NaiveDateTime, ctx: &DateContext) -> Self {
        Self::with_instant(Some(instant), ctx)
    }

    /// Midnight of the given day; an impossible day yields an invalid date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        let instant = NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0));
        Self::with_instant(instant, &DateContext::default())
    }

    /// Date that fails `is_valid`, e.g. the result of unparseable input
    pub fn invalid(ctx: &DateContext) -> Self {
        Self::with_instant(None, ctx)
    }

    fn with_instant(instant: Option<NaiveDateTime>, ctx: &DateContext) -> Self {
        Self {
            instant,
            calendar: ctx.calendar.clone(),
            locale: ctx.locale.clone(),
            format: ctx.format.clone(),
            digits: ctx.digits,
        }
    }

    /// Underlying wall-clock instant; `None` for an invalid date
    pub const fn instant(&self) -> Option<NaiveDateTime> {
        self.instant
    }

    /// Parses `text` with the layouts this adapter understands.
    ///
    /// # Errors
    /// Returns `DateError` if the text is empty or matches no layout.
    pub fn parse(text: &str, ctx: &DateContext) -> Result<Self, DateError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        if let Ok(zoned) = chrono::DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::new(zoned.naive_utc(), ctx));
        }

        let instant = DATE_TIME_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
            .or_else(|| {
                DATE_LAYOUTS
                    .iter()
                    .find_map(|layout| NaiveDate::parse_from_str(trimmed, layout).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| DateError::Unrecognized(trimmed.to_owned()))?;

        Ok(Self::new(instant, ctx))
    }

    /// # Errors
    /// Returns `DateError::TimestampOutOfRange` if chrono cannot represent it.
    pub fn from_timestamp_millis(millis: i64, ctx: &DateContext) -> Result<Self, DateError> {
        chrono::DateTime::from_timestamp_millis(millis)
            .map(|dt| Self::new(dt.naive_utc(), ctx))
            .ok_or(DateError::TimestampOutOfRange(millis))
    }

    fn map_instant(&self, f: impl FnOnce(NaiveDateTime) -> Option<NaiveDateTime>) -> Self {
        Self {
            instant: self.instant.and_then(f),
            ..self.clone()
        }
    }

    fn at_time(&self, (h, m, s, ms): (u32, u32, u32, u32)) -> Self {
        self.map_instant(|i| i.date().and_hms_milli_opt(h, m, s, ms))
    }
}

impl DateObject for DateValue {
    fn now(ctx: &DateContext) -> Self {
        Self::new(chrono::Local::now().naive_local(), ctx)
    }

    fn from_input(input: &DateInput<Self>, ctx: &DateContext) -> Self {
        let parsed = match input {
            DateInput::Object(date) => return date.clone(),
            DateInput::Text(text) => Self::parse(text, ctx),
            DateInput::Timestamp(millis) => Self::from_timestamp_millis(*millis, ctx),
        };
        parsed.unwrap_or_else(|err| {
            tracing::trace!(error = %err, "date input not understood");
            Self::invalid(ctx)
        })
    }

    fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    fn calendar(&self) -> &CalendarId {
        &self.calendar
    }

    fn locale(&self) -> &Locale {
        &self.locale
    }

    fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    fn digits(&self) -> Option<&DigitSet> {
        self.digits.as_ref()
    }

    fn set_calendar(&mut self, calendar: CalendarId) {
        self.calendar = calendar;
    }

    fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    fn set_format(&mut self, format: Option<String>) {
        self.format = format;
    }

    fn set_digits(&mut self, digits: Option<DigitSet>) {
        self.digits = digits;
    }

    fn year(&self) -> i32 {
        self.instant.map_or(0, |i| i.year())
    }

    fn to_first_of_month(&self) -> Self {
        self.map_instant(|i| i.with_day(1))
    }

    fn to_last_of_month(&self) -> Self {
        self.map_instant(|i| {
            let first = i.with_day(1)?;
            let next = first.checked_add_months(Months::new(1))?;
            next.checked_sub_days(chrono::Days::new(1))
        })
    }

    fn add_months(&self, months: i32) -> Self {
        let step = Months::new(months.unsigned_abs());
        self.map_instant(|i| {
            if months >= 0 {
                i.checked_add_months(step)
            } else {
                i.checked_sub_months(step)
            }
        })
    }

    fn start_of_day(&self) -> Self {
        self.at_time(START_OF_DAY)
    }

    fn end_of_day(&self) -> Self {
        self.at_time(END_OF_DAY)
    }
}

impl PartialEq for DateValue {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for DateValue {}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // Invalid dates sort first; they never survive into a selection.
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instant {
            Some(instant) => write!(f, "{}", instant.format("%Y-%m-%dT%H:%M:%S%.3f")),
            None => write!(f, "Invalid Date"),
        }
    }
}

impl FromStr for DateValue {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &DateContext::default())
    }
}

impl serde::Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
