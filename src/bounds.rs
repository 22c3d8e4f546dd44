use crate::date::{DateContext, DateInput, DateObject, Value};
use crate::error::Diagnostic;
use crate::state::{Selection, SelectionState, coerce};
use crate::types::CalendarId;

/// Min/max limits of a picker plus the part of the selection inside them.
///
/// `min` is clamped to the first instant of its day and `max` to the last, so
/// both limits are inclusive whole days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<D> {
    min: Option<D>,
    max: Option<D>,
    in_range: Selection<D>,
}

impl<D: DateObject> Bounds<D> {
    /// Derives the bounds view. Returns `None` when neither limit is set.
    /// A limit that does not yield a valid date counts as unset.
    ///
    /// The value is coerced again under the state's context. With
    /// `only_show_in_range_dates` the list is filtered to the limits;
    /// otherwise the canonical selection is exposed unfiltered. A single
    /// selected date is never filtered here.
    pub fn derive(
        min: Option<&DateInput<D>>,
        max: Option<&DateInput<D>>,
        value: &Value<D>,
        state: &SelectionState<D>,
        only_show_in_range_dates: bool,
    ) -> Option<Self> {
        let min = min
            .and_then(|input| to_bound(input, &state.calendar, "min"))
            .map(|date| date.start_of_day());
        let max = max
            .and_then(|input| to_bound(input, &state.calendar, "max"))
            .map(|date| date.end_of_day());

        if min.is_none() && max.is_none() {
            return None;
        }

        let in_range = if only_show_in_range_dates {
            let selection = coerce(value, &state.context());
            filter_selection(selection, min.as_ref(), max.as_ref())
        } else {
            state.selected.clone()
        };

        Some(Self { min, max, in_range })
    }

    pub const fn min(&self) -> Option<&D> {
        self.min.as_ref()
    }

    pub const fn max(&self) -> Option<&D> {
        self.max.as_ref()
    }

    pub const fn in_range(&self) -> &Selection<D> {
        &self.in_range
    }

    /// Checks if a date lies within both limits
    pub fn contains(&self, date: &D) -> bool {
        within(date, self.min.as_ref(), self.max.as_ref())
    }
}

fn to_bound<D: DateObject>(input: &DateInput<D>, calendar: &CalendarId, side: &'static str) -> Option<D> {
    let date = match input {
        DateInput::Object(date) => {
            let mut date = date.clone();
            date.set_calendar(calendar.clone());
            date
        }
        raw => D::from_input(raw, &DateContext::for_calendar(calendar.clone())),
    };

    if date.is_valid() {
        Some(date)
    } else {
        Diagnostic::InvalidBound { side }.report();
        None
    }
}

fn within<D: DateObject>(date: &D, min: Option<&D>, max: Option<&D>) -> bool {
    min.is_none_or(|min| date >= min) && max.is_none_or(|max| date <= max)
}

fn filter_selection<D: DateObject>(selection: Selection<D>, min: Option<&D>, max: Option<&D>) -> Selection<D> {
    match selection {
        Selection::Many(dates) => Selection::Many(
            dates
                .into_iter()
                .filter(|date| within(date, min, max))
                .collect(),
        ),
        other => other,
    }
}
