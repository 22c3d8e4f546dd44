use crate::consts::PERSIAN_DIGITS;
use crate::date::{DateContext, DateInput, DateValue, Value};
use crate::types::DigitSet;
use chrono::NaiveDate;

/// Midnight of a Gregorian day in the default context
pub fn date(year: i32, month: u32, day: u32) -> DateValue {
    DateValue::from_ymd(year, month, day)
}

pub fn date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateValue {
    let instant = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .expect("valid test date");
    DateValue::new(instant, &DateContext::default())
}

pub fn persian_ctx() -> DateContext {
    DateContext {
        calendar: "persian".into(),
        locale: "fa".into(),
        format: Some("YYYY/MM/DD".to_owned()),
        digits: Some(DigitSet::new(PERSIAN_DIGITS)),
    }
}

pub fn one(date: DateValue) -> Value<DateValue> {
    Value::One(DateInput::Object(date))
}

pub fn many(dates: impl IntoIterator<Item = DateValue>) -> Value<DateValue> {
    Value::Many(dates.into_iter().map(DateInput::Object).collect())
}
