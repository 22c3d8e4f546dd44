//! Selection state engine for a multi-calendar date picker.
//!
//! The crate turns loosely typed host input (a single date, a list of dates,
//! text or timestamps) into one canonical [`SelectionState`] per render cycle,
//! derives the min/max view from it and resolves where auxiliary panels go.
//! Calendar math is delegated to a [`DateObject`] adapter; [`DateValue`] is
//! the bundled Gregorian one.
//!
//! ```
//! use date_picker_state::{DatePicker, DateValue, PickerOptions, PickerProps, Selection, Value};
//!
//! let props = PickerProps {
//!     options: PickerOptions {
//!         range: true,
//!         ..PickerOptions::default()
//!     },
//!     value: Value::Many(vec!["2024/03/09".into(), "2024/03/02".into()]),
//!     ..PickerProps::default()
//! };
//! let picker = DatePicker::<DateValue>::new(props);
//!
//! let Selection::Many(range) = &picker.state().selected else {
//!     unreachable!()
//! };
//! assert!(range[0] < range[1]);
//! ```

mod bounds;
mod config;
mod consts;
mod date;
mod error;
mod listeners;
mod picker;
mod plugins;
mod prelude;
mod state;
mod types;

#[cfg(test)]
mod test_utils;

pub use bounds::Bounds;
pub use config::{PickerOptions, resolve_format, validate_current_date};
pub use consts::*;
pub use date::{DateContext, DateError, DateInput, DateObject, DateValue, Value};
pub use error::Diagnostic;
pub use listeners::{ChangeEvent, Listener, ListenerRegistry};
pub use picker::{DatePicker, Lifecycle, PickerProps};
pub use plugins::{
    BorderSet, Neighbors, PluginDescriptor, PluginError, Position, SlotAssignment, SlotLayout, resolve_slots,
};
pub use state::{
    AppliedFlag, Mode, PickerFlags, Selection, SelectionInputs, SelectionState, coerce, in_month_window, reconcile,
};
pub use types::{CalendarId, DigitSet, Locale};
