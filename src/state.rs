//! Canonical selection state and the reconciler that produces it.
//!
//! [`reconcile`] is a pure function of the previous snapshot and the current
//! inputs. The host calls it whenever a tracked input changes and publishes the
//! result as a new snapshot; snapshots are never edited in place.

use crate::config::PickerOptions;
use crate::date::{DateContext, DateObject, Value};
use crate::error::Diagnostic;
use crate::types::{CalendarId, DigitSet, Locale};
use serde::Serialize;
use std::num::NonZeroU8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Multiple,
    Range,
}

/// The selected date(s).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection<D> {
    #[default]
    None,
    One(D),
    Many(Vec<D>),
}

impl<D> Selection<D> {
    /// True when nothing is selected
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Selected dates in order, borrowed
    pub fn as_slice(&self) -> &[D] {
        match self {
            Self::None => &[],
            Self::One(date) => std::slice::from_ref(date),
            Self::Many(dates) => dates,
        }
    }

    /// Number of selected dates
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Earliest entry in selection order, not chronological order
    pub fn first(&self) -> Option<&D> {
        self.as_slice().first()
    }

    /// Latest entry in selection order
    pub fn last(&self) -> Option<&D> {
        self.as_slice().last()
    }

    /// Selected dates as an owned list
    pub fn into_vec(self) -> Vec<D> {
        match self {
            Self::None => Vec::new(),
            Self::One(date) => vec![date],
            Self::Many(dates) => dates,
        }
    }

    /// Collapses a sequence to its last element
    #[must_use]
    pub fn into_last(self) -> Self {
        match self {
            Self::Many(mut dates) => dates.pop().map_or(Self::None, Self::One),
            other => other,
        }
    }

    fn for_each_mut(&mut self, f: impl FnMut(&mut D)) {
        match self {
            Self::None => {}
            Self::One(date) => std::iter::once(date).for_each(f),
            Self::Many(dates) => dates.iter_mut().for_each(f),
        }
    }
}

/// A transformation that may run at most once.
///
/// Pairs a stateful transformation with the flag that records it ran, so a
/// recomputation fed by its own output does not transform again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppliedFlag(bool);

impl AppliedFlag {
    /// Runs `transform` unless it already ran. Returns whether it ran now.
    pub fn apply_once(&mut self, transform: impl FnOnce()) -> bool {
        if self.0 {
            return false;
        }
        transform();
        self.0 = true;
        true
    }

    /// Whether the transformation already ran
    pub const fn is_applied(self) -> bool {
        self.0
    }
}

/// Picker flags as the rendering layer should honor them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PickerFlags {
    pub time_picker: bool,
    pub only_time_picker: bool,
    pub only_month_picker: bool,
    pub only_year_picker: bool,
}

impl From<&PickerOptions> for PickerFlags {
    fn from(options: &PickerOptions) -> Self {
        Self {
            time_picker: options.time_picker,
            only_time_picker: options.only_time_picker,
            only_month_picker: options.only_month_picker,
            only_year_picker: options.only_year_picker,
        }
    }
}

/// Snapshot consumed by the rendering collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<D> {
    /// Anchors the visible month and year
    pub cursor: D,
    pub selected: Selection<D>,
    pub mode: Mode,
    /// Most recently touched range endpoint
    pub focused: Option<D>,
    pub calendar: CalendarId,
    pub locale: Locale,
    pub format: Option<String>,
    pub digits: Option<DigitSet>,
    pub flags: PickerFlags,
    /// Last external value the state was computed from
    pub value: Value<D>,
    /// First non-empty external value ever observed
    pub initial_value: Option<Value<D>>,
    pub sort_applied: AppliedFlag,
    pub visible_year: i32,
    pub today: D,
}

impl<D: DateObject> SelectionState<D> {
    /// Context every date in this snapshot is synchronized to
    pub fn context(&self) -> DateContext {
        DateContext {
            calendar: self.calendar.clone(),
            locale: self.locale.clone(),
            format: self.format.clone(),
            digits: self.digits,
        }
    }

    /// Whether the snapshot's locale is written right-to-left
    pub fn is_rtl(&self) -> bool {
        self.cursor.locale().is_rtl()
    }
}

/// Everything a recomputation depends on besides the previous snapshot.
#[derive(Debug)]
pub struct SelectionInputs<'a, D> {
    pub value: &'a Value<D>,
    pub options: &'a PickerOptions,
    /// Cursor to start from when there is no previous snapshot
    pub current_date: Option<&'a D>,
}

/// Converts the external value into dates, dropping every invalid entry.
pub fn coerce<D: DateObject>(value: &Value<D>, ctx: &DateContext) -> Selection<D> {
    let accept = |index: usize, date: D| {
        if date.is_valid() {
            Some(date)
        } else {
            Diagnostic::DroppedEntry { index }.report();
            None
        }
    };

    match value {
        Value::Empty => Selection::None,
        Value::One(input) => accept(0, D::from_input(input, ctx)).map_or(Selection::None, Selection::One),
        Value::Many(inputs) => Selection::Many(
            inputs
                .iter()
                .enumerate()
                .filter_map(|(index, input)| accept(index, D::from_input(input, ctx)))
                .collect(),
        ),
    }
}

/// Whether `date` falls in the months shown when `cursor` leads a view of
/// `months` consecutive months.
pub fn in_month_window<D: DateObject>(cursor: &D, months: NonZeroU8, date: &D) -> bool {
    let first = cursor.to_first_of_month().start_of_day();
    let last = cursor
        .add_months(i32::from(months.get()) - 1)
        .to_last_of_month()
        .end_of_day();
    first <= *date && *date <= last
}

/// Computes the next snapshot from the previous one and the current inputs.
pub fn reconcile<D: DateObject>(
    prev: Option<&SelectionState<D>>,
    inputs: &SelectionInputs<'_, D>,
) -> SelectionState<D> {
    let value = inputs.value;
    let options = inputs.options;
    let ctx = options.date_context();
    let months = options.month_count();

    let mut cursor = prev
        .map(|state| state.cursor.clone())
        .or_else(|| inputs.current_date.cloned());
    let mut selected = prev.map_or(Selection::None, |state| state.selected.clone());
    let mut focused = prev.and_then(|state| state.focused.clone());
    let mut sort_applied = prev.map_or_else(AppliedFlag::default, |state| state.sort_applied);
    let initial_value = prev.and_then(|state| state.initial_value.clone());

    if value.is_empty() {
        if initial_value.is_some() {
            selected = Selection::None;
        }
    } else {
        selected = coerce(value, &ctx);

        if let Some(anchor) = selected.first() {
            // A list only keeps the cursor when several months are visible
            let may_keep = !value.is_many() || months.get() > 1;
            let keep = cursor
                .as_ref()
                .is_some_and(|c| may_keep && in_month_window(c, months, anchor));
            if !keep {
                cursor = Some(anchor.clone());
            }
        }
    }

    let mut cursor = cursor.unwrap_or_else(|| D::now(&ctx));
    cursor.sync(&ctx);
    selected.for_each_mut(|date| date.sync(&ctx));
    if let Some(date) = focused.as_mut() {
        date.sync(&ctx);
    }

    let mut flags = PickerFlags::from(options);
    let mode = if options.range {
        Mode::Range
    } else if options.multiple || value.is_many() {
        Mode::Multiple
    } else {
        Mode::Single
    };

    selected = match mode {
        Mode::Single => selected.into_last(),
        Mode::Multiple | Mode::Range => {
            let mut dates = selected.into_vec();

            if mode == Mode::Range && dates.len() > 2 {
                if let Some(last) = dates.pop() {
                    dates.truncate(1);
                    dates.push(last.clone());
                    focused = Some(last);
                }
            }

            if mode == Mode::Range {
                dates.sort();
            } else if options.sort {
                sort_applied.apply_once(|| dates.sort());
            }

            flags.time_picker = false;
            flags.only_time_picker = false;
            Selection::Many(dates)
        }
    };

    let mut today = prev.map_or_else(|| D::now(&ctx), |state| state.today.clone());
    today.sync(&ctx);
    let visible_year = prev.map_or_else(|| cursor.year(), |state| state.visible_year);
    let initial_value = initial_value.or_else(|| (!value.is_empty()).then(|| value.clone()));

    tracing::trace!(?mode, selected = selected.len(), "selection reconciled");

    SelectionState {
        cursor,
        selected,
        mode,
        focused,
        calendar: ctx.calendar,
        locale: ctx.locale,
        format: ctx.format,
        digits: ctx.digits,
        flags,
        value: value.clone(),
        initial_value,
        sort_applied,
        visible_year,
        today,
    }
}
