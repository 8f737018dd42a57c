use crate::error::SchedulingError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const HOURS_PER_DAY: u8 = 24;

/// Identity of a bookable one-hour slot.
///
/// Ordering is by date, then hour. The external form is `"<YYYY-MM-DD> <H>:00"`
/// with the hour not zero-padded, e.g. `"2024-05-01 9:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotKey {
    date: NaiveDate,
    hour: u8,
}

impl SlotKey {
    pub fn new(date: NaiveDate, hour: u8) -> Result<Self, SchedulingError> {
        if hour >= HOURS_PER_DAY {
            return Err(SchedulingError::InvalidInput(format!(
                "hour {hour} is outside of 0..=23"
            )));
        }
        Ok(Self { date, hour })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:00", self.date.format(DATE_FORMAT), self.hour)
    }
}

impl FromStr for SlotKey {
    type Err = SchedulingError;

    fn from_str(time: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedulingError::InvalidInput(format!("malformed time '{time}'"));

        let (date, slot) = time.split_once(' ').ok_or_else(invalid)?;
        let hour = slot.strip_suffix(":00").ok_or_else(invalid)?;
        // u8::from_str would also accept a leading '+'
        if hour.is_empty() || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        // chrono also accepts "2024-5-1"; only the zero-padded form is a key
        if date.len() != "YYYY-MM-DD".len() {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())?;

        Self::new(date, hour)
    }
}

impl TryFrom<String> for SlotKey {
    type Error = SchedulingError;

    fn try_from(time: String) -> Result<Self, Self::Error> {
        time.parse()
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "time")]
    pub key: SlotKey,
    #[serde(rename = "name")]
    pub occupant_name: String,
}
