//! The host-facing picker: owns the published snapshot, tracks which inputs
//! changed and routes user changes to subscribers and the host.

use crate::bounds::Bounds;
use crate::config::{PickerOptions, validate_current_date};
use crate::date::{DateInput, DateObject, DateValue, Value};
use crate::listeners::{ChangeEvent, ListenerRegistry};
use crate::plugins::{SlotLayout, resolve_slots};
use crate::state::{PickerFlags, SelectionInputs, SelectionState, reconcile};
use crate::types::{CalendarId, DigitSet, Locale};
use std::fmt;
use std::num::NonZeroU8;
use std::rc::Rc;

/// Everything the host passes to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerProps<D> {
    pub options: PickerOptions,
    pub value: Value<D>,
    /// Initial cursor; only read when the picker is created
    pub current_date: Option<DateInput<D>>,
    pub min_date: Option<DateInput<D>>,
    pub max_date: Option<DateInput<D>>,
}

impl<D> Default for PickerProps<D> {
    fn default() -> Self {
        Self {
            options: PickerOptions::default(),
            value: Value::Empty,
            current_date: None,
            min_date: None,
            max_date: None,
        }
    }
}

impl<D> From<PickerOptions> for PickerProps<D> {
    fn from(options: PickerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

/// One-shot readiness of the picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    /// A snapshot with a valid cursor exists
    Ready { notified: bool },
}

impl Lifecycle {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    fn mark_ready(&mut self) {
        if *self == Self::Uninitialized {
            *self = Self::Ready { notified: false };
        }
    }

    /// True exactly once, the first time it is asked after becoming ready
    fn take_notification(&mut self) -> bool {
        if *self == (Self::Ready { notified: false }) {
            *self = Self::Ready { notified: true };
            return true;
        }
        false
    }
}

/// Options the selection engine reads; any difference triggers a recompute.
#[derive(PartialEq, Eq)]
struct EngineKey<'a> {
    calendar: &'a CalendarId,
    locale: &'a Locale,
    format: Option<&'a str>,
    flags: PickerFlags,
    range: bool,
    multiple: bool,
    sort: bool,
    number_of_months: i64,
    digits: Option<DigitSet>,
}

impl<'a> From<&'a PickerOptions> for EngineKey<'a> {
    fn from(options: &'a PickerOptions) -> Self {
        Self {
            calendar: &options.calendar,
            locale: &options.locale,
            format: options.format.as_deref(),
            flags: PickerFlags::from(options),
            range: options.range,
            multiple: options.multiple,
            sort: options.sort,
            number_of_months: options.number_of_months,
            digits: options.digits,
        }
    }
}

type HostCallback<D> = Box<dyn FnMut(&ChangeEvent<D>)>;

pub struct DatePicker<D: DateObject = DateValue> {
    props: PickerProps<D>,
    current_date: Option<D>,
    state: Rc<SelectionState<D>>,
    bounds: Option<Bounds<D>>,
    listeners: ListenerRegistry<D>,
    lifecycle: Lifecycle,
    on_change: Option<HostCallback<D>>,
    on_ready: Option<Box<dyn FnMut()>>,
}

impl<D: DateObject> DatePicker<D> {
    pub fn new(props: PickerProps<D>) -> Self {
        let current_date = validate_current_date(props.current_date.clone());
        let state = reconcile(
            None,
            &SelectionInputs {
                value: &props.value,
                options: &props.options,
                current_date: current_date.as_ref(),
            },
        );

        let mut picker = Self {
            props,
            current_date,
            state: Rc::new(state),
            bounds: None,
            listeners: ListenerRegistry::new(),
            lifecycle: Lifecycle::Uninitialized,
            on_change: None,
            on_ready: None,
        };
        picker.settle();
        picker
    }

    /// Replaces the props, recomputing only what depends on changed inputs.
    pub fn set_props(&mut self, props: PickerProps<D>) {
        let value_changed = props.value != self.props.value;
        let engine_dirty =
            value_changed || EngineKey::from(&props.options) != EngineKey::from(&self.props.options);
        let bounds_dirty = value_changed
            || props.min_date != self.props.min_date
            || props.max_date != self.props.max_date
            || props.options.only_show_in_range_dates != self.props.options.only_show_in_range_dates;

        self.props = props;

        if engine_dirty {
            self.recompute();
        } else if bounds_dirty {
            self.derive_bounds();
        }
    }

    pub fn set_value(&mut self, value: Value<D>) {
        if value != self.props.value {
            self.props.value = value;
            self.recompute();
        }
    }

    pub fn set_options(&mut self, options: PickerOptions) {
        let props = PickerProps {
            options,
            ..self.props.clone()
        };
        self.set_props(props);
    }

    pub fn set_bounds(&mut self, min_date: Option<DateInput<D>>, max_date: Option<DateInput<D>>) {
        let props = PickerProps {
            min_date,
            max_date,
            ..self.props.clone()
        };
        self.set_props(props);
    }

    /// Current snapshot
    pub fn state(&self) -> &SelectionState<D> {
        &self.state
    }

    /// Shared handle to the current snapshot; stays valid after later publishes
    pub fn snapshot(&self) -> Rc<SelectionState<D>> {
        Rc::clone(&self.state)
    }

    /// Publishes a snapshot built by a rendering collaborator
    pub fn set_state(&mut self, next: SelectionState<D>) {
        self.publish(next);
    }

    /// Entry point for user interaction.
    ///
    /// Change subscribers run first, then `next_state` is published, then the
    /// host callback runs. `None` as the change means nothing notifiable
    /// happened; the state is still published if given.
    pub fn handle_change(&mut self, change: Option<ChangeEvent<D>>, next_state: Option<SelectionState<D>>) {
        if let Some(event) = &change {
            self.listeners.emit_change(event);
        }

        if let Some(next) = next_state {
            self.publish(next);
        }

        if let (Some(event), Some(callback)) = (&change, self.on_change.as_mut()) {
            callback(event);
        }
    }

    pub fn register_listener(&mut self, event: impl Into<String>, callback: impl FnMut(&ChangeEvent<D>) + 'static) {
        self.listeners.register(event, callback);
    }

    pub fn on_change(&mut self, callback: impl FnMut(&ChangeEvent<D>) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Registers the ready callback. It runs once, as soon as the picker is
    /// ready, even if that already happened.
    pub fn on_ready(&mut self, callback: impl FnMut() + 'static) {
        self.on_ready = Some(Box::new(callback));
        self.notify_ready();
    }

    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub const fn props(&self) -> &PickerProps<D> {
        &self.props
    }

    pub const fn bounds(&self) -> Option<&Bounds<D>> {
        self.bounds.as_ref()
    }

    /// Plugin placement; nothing is placed before the picker is ready.
    pub fn slot_layout(&self) -> Option<SlotLayout> {
        self.lifecycle
            .is_ready()
            .then(|| resolve_slots(&self.props.options.plugins))
    }

    pub fn month_count(&self) -> NonZeroU8 {
        self.props.options.month_count()
    }

    pub fn is_rtl(&self) -> bool {
        self.state.is_rtl()
    }

    fn recompute(&mut self) {
        let next = reconcile(
            Some(self.state.as_ref()),
            &SelectionInputs {
                value: &self.props.value,
                options: &self.props.options,
                current_date: self.current_date.as_ref(),
            },
        );
        self.publish(next);
    }

    fn publish(&mut self, next: SelectionState<D>) {
        self.state = Rc::new(next);
        self.settle();
    }

    /// Brings everything derived from the snapshot up to date
    fn settle(&mut self) {
        self.derive_bounds();

        if self.state.cursor.is_valid() {
            self.lifecycle.mark_ready();
            self.notify_ready();
        }
    }

    fn derive_bounds(&mut self) {
        self.bounds = Bounds::derive(
            self.props.min_date.as_ref(),
            self.props.max_date.as_ref(),
            &self.props.value,
            &self.state,
            self.props.options.only_show_in_range_dates,
        );
    }

    fn notify_ready(&mut self) {
        if let Some(callback) = self.on_ready.as_mut() {
            if self.lifecycle.take_notification() {
                tracing::debug!("date picker ready");
                callback();
            }
        }
    }
}

impl<D: DateObject> fmt::Debug for DatePicker<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("props", &self.props)
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("listeners", &self.listeners)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CHANGE_EVENT, MONTH_FORMAT};
    use crate::date::DateContext;
    use crate::plugins::{PluginDescriptor, Position};
    use crate::state::{Mode, Selection};
    use crate::test_utils::{date, many, one};
    use std::cell::RefCell;
    use tracing_test::traced_test;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, name: &'static str) -> impl FnMut(&ChangeEvent<DateValue>) + 'static {
        let log = Rc::clone(log);
        move |_| log.borrow_mut().push(name.to_owned())
    }

    fn range_props(value: Value<DateValue>) -> PickerProps<DateValue> {
        PickerProps {
            options: PickerOptions {
                range: true,
                ..PickerOptions::default()
            },
            value,
            ..PickerProps::default()
        }
    }

    #[test]
    fn test_new_publishes_first_state() {
        let picker = DatePicker::new(range_props(many([date(2024, 3, 9), date(2024, 3, 2)])));

        assert!(picker.lifecycle().is_ready());
        assert_eq!(picker.state().mode, Mode::Range);
        assert_eq!(
            picker.state().selected,
            Selection::Many(vec![date(2024, 3, 2), date(2024, 3, 9)])
        );
        assert!(picker.bounds().is_none());
    }

    #[test]
    fn test_on_ready_fires_once() {
        let calls = Rc::new(RefCell::new(0));
        let mut picker = DatePicker::new(PickerProps::<DateValue>::default());
        {
            let calls = Rc::clone(&calls);
            picker.on_ready(move || *calls.borrow_mut() += 1);
        }
        picker.set_value(one(date(2024, 1, 1)));
        picker.set_value(Value::Empty);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(picker.lifecycle(), Lifecycle::Ready { notified: true });
    }

    #[test]
    fn test_not_ready_without_valid_cursor() {
        let props = PickerProps {
            current_date: Some(DateInput::Object(DateValue::invalid(&DateContext::default()))),
            options: PickerOptions {
                plugins: vec![PluginDescriptor::at(Position::Left)],
                ..PickerOptions::default()
            },
            ..PickerProps::default()
        };
        let calls = Rc::new(RefCell::new(0));
        let mut picker = DatePicker::new(props);
        {
            let calls = Rc::clone(&calls);
            picker.on_ready(move || *calls.borrow_mut() += 1);
        }

        assert_eq!(picker.lifecycle(), Lifecycle::Uninitialized);
        assert!(picker.slot_layout().is_none());
        assert_eq!(*calls.borrow(), 0);

        picker.set_value(one(date(2024, 1, 1)));
        assert!(picker.lifecycle().is_ready());
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(picker.slot_layout().map(|l| l.assignments.len()), Some(1));
    }

    #[test]
    fn test_change_order() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut picker = DatePicker::new(PickerProps::<DateValue>::default());
        picker.register_listener(CHANGE_EVENT, recorder(&log, "listener 1"));
        picker.register_listener(CHANGE_EVENT, recorder(&log, "listener 2"));
        picker.on_change(recorder(&log, "host"));

        let mut next = picker.state().clone();
        next.selected = Selection::One(date(2024, 8, 8));
        picker.handle_change(Some(ChangeEvent::Selected(date(2024, 8, 8))), Some(next));

        assert_eq!(*log.borrow(), ["listener 1", "listener 2", "host"]);
        assert_eq!(picker.state().selected, Selection::One(date(2024, 8, 8)));
    }

    #[test]
    fn test_clearing_is_notified() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut picker = DatePicker::new(PickerProps::<DateValue>::from(PickerOptions::default()));
        picker.register_listener(CHANGE_EVENT, recorder(&log, "listener"));
        picker.on_change(recorder(&log, "host"));

        picker.handle_change(Some(ChangeEvent::Cleared), None);
        assert_eq!(*log.borrow(), ["listener", "host"]);
    }

    #[test]
    fn test_state_only_change_is_silent() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut picker = DatePicker::new(PickerProps::<DateValue>::default());
        picker.register_listener(CHANGE_EVENT, recorder(&log, "listener"));
        picker.on_change(recorder(&log, "host"));

        let mut next = picker.state().clone();
        next.visible_year = 1990;
        picker.handle_change(None, Some(next));

        assert!(log.borrow().is_empty());
        assert_eq!(picker.state().visible_year, 1990);
    }

    #[test]
    fn test_published_snapshots_are_not_mutated() {
        let mut picker = DatePicker::new(range_props(one(date(2024, 3, 2))));
        let before = picker.snapshot();

        picker.set_value(many([date(2024, 3, 2), date(2024, 3, 5)]));

        assert_eq!(before.selected, Selection::Many(vec![date(2024, 3, 2)]));
        assert_eq!(picker.state().selected.len(), 2);
    }

    #[test]
    fn test_recompute_only_on_tracked_inputs() {
        let mut picker = DatePicker::new(range_props(one(date(2024, 3, 2))));
        let before = picker.snapshot();

        let mut options = picker.props().options.clone();
        options.plugins.push(PluginDescriptor::at(Position::Top));
        options.only_show_in_range_dates = false;
        picker.set_options(options.clone());
        assert!(Rc::ptr_eq(&before, &picker.snapshot()));

        picker.set_value(one(date(2024, 3, 2)));
        assert!(Rc::ptr_eq(&before, &picker.snapshot()));

        options.locale = "fa".into();
        picker.set_options(options);
        assert!(!Rc::ptr_eq(&before, &picker.snapshot()));
        assert!(picker.is_rtl());
    }

    #[test]
    fn test_bounds_follow_value_and_limits() {
        let props = PickerProps {
            options: PickerOptions {
                multiple: true,
                ..PickerOptions::default()
            },
            value: many([date(2024, 1, 1), date(2024, 1, 15), date(2024, 2, 1)]),
            ..PickerProps::default()
        };
        let mut picker = DatePicker::new(props);
        assert!(picker.bounds().is_none());

        picker.set_bounds(
            Some(DateInput::from("2024/01/10")),
            Some(DateInput::from("2024/01/20")),
        );
        let in_range = picker.bounds().map(|b| b.in_range().clone());
        assert_eq!(in_range, Some(Selection::Many(vec![date(2024, 1, 15)])));

        picker.set_value(many([date(2024, 1, 11), date(2024, 1, 12)]));
        assert_eq!(picker.bounds().map(|b| b.in_range().len()), Some(2));
    }

    #[test]
    fn test_month_only_picker_shows_one_month() {
        let props = PickerProps::<DateValue>::from(PickerOptions {
            only_month_picker: true,
            number_of_months: 3,
            ..PickerOptions::default()
        });
        let picker = DatePicker::new(props);
        assert_eq!(picker.month_count().get(), 1);
        assert_eq!(picker.state().format.as_deref(), Some(MONTH_FORMAT));
    }

    #[traced_test]
    #[test]
    fn test_wrong_current_date_is_ignored() {
        let props = PickerProps::<DateValue> {
            current_date: Some(DateInput::Timestamp(0)),
            ..PickerProps::default()
        };
        let picker = DatePicker::new(props);

        assert_ne!(picker.state().cursor, date(1970, 1, 1));
        assert!(picker.lifecycle().is_ready());
        assert!(logs_contain("current date must be a date object, got timestamp"));
    }

    #[test]
    fn test_current_date_seeds_cursor() {
        let props = PickerProps::<DateValue> {
            current_date: Some(DateInput::Object(date(2001, 9, 1))),
            ..PickerProps::default()
        };
        let picker = DatePicker::new(props);
        assert_eq!(picker.state().cursor, date(2001, 9, 1));
        assert_eq!(picker.state().visible_year, 2001);
    }
}
