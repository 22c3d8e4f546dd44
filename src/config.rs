//! Picker options and their normalization.

use crate::consts::{
    DATE_FORMAT, DATE_TIME_FORMAT, DEFAULT_MONTH_COUNT, MONTH_FORMAT, TIME_FORMAT, YEAR_FORMAT,
};
use crate::date::{DateContext, DateInput, DateObject};
use crate::error::Diagnostic;
use crate::plugins::PluginDescriptor;
use crate::types::{CalendarId, DigitSet, Locale};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU8;

/// Every option the picker recognizes, with its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerOptions {
    pub calendar: CalendarId,
    pub locale: Locale,
    /// Explicit format; wins over every derived format when non-empty
    pub format: Option<String>,
    pub time_picker: bool,
    pub only_time_picker: bool,
    pub only_month_picker: bool,
    pub only_year_picker: bool,
    pub range: bool,
    pub multiple: bool,
    /// Sort a multiple selection ascending
    pub sort: bool,
    /// Hide out-of-bounds dates instead of merely disabling them
    pub only_show_in_range_dates: bool,
    /// Months shown side by side; values above 255 are capped at 255
    pub number_of_months: i64,
    pub digits: Option<DigitSet>,
    pub plugins: Vec<PluginDescriptor>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            calendar: CalendarId::default(),
            locale: Locale::default(),
            format: None,
            time_picker: false,
            only_time_picker: false,
            only_month_picker: false,
            only_year_picker: false,
            range: false,
            multiple: false,
            sort: false,
            only_show_in_range_dates: true,
            number_of_months: i64::from(DEFAULT_MONTH_COUNT),
            digits: None,
            plugins: Vec::new(),
        }
    }
}

/// Derives the single effective format string.
///
/// `None` means the date adapter's own default applies.
pub fn resolve_format(options: &PickerOptions) -> Option<String> {
    if let Some(format) = options.format.as_deref().filter(|f| !f.is_empty()) {
        return Some(format.to_owned());
    }

    let derived = if options.time_picker && !options.range && !options.multiple {
        DATE_TIME_FORMAT
    } else if options.only_time_picker {
        TIME_FORMAT
    } else if options.only_month_picker {
        MONTH_FORMAT
    } else if options.only_year_picker {
        YEAR_FORMAT
    } else if options.range || options.multiple {
        DATE_FORMAT
    } else {
        return None;
    };

    Some(derived.to_owned())
}

impl PickerOptions {
    /// Width of the month window. Non-positive counts and the month/year-only
    /// pickers fall back to a single month; oversized counts are capped.
    pub fn month_count(&self) -> NonZeroU8 {
        let fallback = NonZeroU8::new(DEFAULT_MONTH_COUNT).unwrap_or(NonZeroU8::MIN);
        if self.only_month_picker || self.only_year_picker {
            return fallback;
        }

        let applied = if self.number_of_months > i64::from(u8::MAX) {
            NonZeroU8::MAX
        } else {
            match u8::try_from(self.number_of_months).ok().and_then(NonZeroU8::new) {
                Some(count) => return count,
                None => fallback,
            }
        };

        Diagnostic::MonthCountFallback {
            requested: self.number_of_months,
            applied: applied.get(),
        }
        .report();
        applied
    }

    /// Context every date retained by the picker is synchronized to
    pub fn date_context(&self) -> DateContext {
        DateContext {
            calendar: self.calendar.clone(),
            locale: self.locale.clone(),
            format: resolve_format(self),
            digits: self.digits,
        }
    }
}

/// Accepts only date objects as the initial cursor; anything else is
/// reported and dropped.
pub fn validate_current_date<D: DateObject>(input: Option<DateInput<D>>) -> Option<D> {
    match input? {
        DateInput::Object(date) => Some(date),
        other => {
            Diagnostic::InvalidCurrentDate { kind: other.kind() }.report();
            None
        }
    }
}
