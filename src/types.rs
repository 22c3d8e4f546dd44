use crate::consts::{DEFAULT_CALENDAR, DEFAULT_LOCALE, LATIN_DIGITS, RTL_LOCALES};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a calendar system, e.g. `gregorian` or `persian`.
///
/// The picker never interprets the id itself; it is handed to the date adapter,
/// which owns calendar conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    /// Wraps a calendar id as given; it is not checked against known calendars
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CalendarId {
    fn default() -> Self {
        Self::new(DEFAULT_CALENDAR)
    }
}

impl From<&str> for CalendarId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Locale tag such as `en` or `fa`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Wraps a locale tag as given
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the underlying string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the calendar body is laid out right-to-left for this locale
    pub fn is_rtl(&self) -> bool {
        RTL_LOCALES.contains(&self.0.as_str())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// The ten glyphs used to display the digits 0-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct DigitSet([char; 10]);

impl DigitSet {
    /// Digit set with `digits[n]` standing for the digit `n`
    pub const fn new(digits: [char; 10]) -> Self {
        Self(digits)
    }
}

impl Default for DigitSet {
    fn default() -> Self {
        Self(LATIN_DIGITS)
    }
}

impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PERSIAN_DIGITS;

    #[test]
    fn test_defaults() {
        assert_eq!(CalendarId::default().as_str(), "gregorian");
        assert_eq!(Locale::default().as_str(), "en");
        assert_eq!(DigitSet::default().to_string(), "0123456789");
    }

    #[test]
    fn test_rtl_locales() {
        assert!(Locale::from("fa").is_rtl());
        assert!(Locale::from("ar").is_rtl());
        assert!(!Locale::from("en").is_rtl());
        assert!(!Locale::from("hi").is_rtl());
    }

    #[test]
    fn test_digit_set_display() {
        let persian = DigitSet::new(PERSIAN_DIGITS);
        assert_eq!(persian.to_string(), "۰۱۲۳۴۵۶۷۸۹");
        assert_ne!(persian, DigitSet::default());
    }

    #[test]
    fn test_newtype_serde() {
        let calendar: CalendarId = serde_json::from_str(r#""persian""#).unwrap();
        assert_eq!(calendar, CalendarId::from("persian"));
        assert_eq!(serde_json::to_string(&Locale::from("fa")).unwrap(), r#""fa""#);

        let digits: DigitSet = serde_json::from_str(r#"["0","1","2","3","4","5","6","7","8","9"]"#).unwrap();
        assert_eq!(digits, DigitSet::default());
    }

    #[test]
    fn test_deref_to_string() {
        let locale = Locale::from("fa");
        assert_eq!(locale.len(), 2);
        let raw: String = locale.into();
        assert_eq!(raw, "fa");
    }
}
