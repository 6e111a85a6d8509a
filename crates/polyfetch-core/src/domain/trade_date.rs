use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const ISO_DATE: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date rendered as zero-padded `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(Date);

impl TradeDate {
    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input, ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for TradeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl FromStr for TradeDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// One end of an aggregate-bars window.
///
/// The provider accepts either a calendar date or a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeBound {
    Date(TradeDate),
    EpochMillis(u64),
}

impl RangeBound {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if let Ok(date) = TradeDate::parse(input) {
            return Ok(Self::Date(date));
        }
        if !input.is_empty() && input.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(millis) = input.parse::<u64>() {
                return Ok(Self::EpochMillis(millis));
            }
        }
        Err(ValidationError::InvalidRangeBound {
            value: input.to_owned(),
        })
    }
}

impl Display for RangeBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => Display::fmt(date, f),
            Self::EpochMillis(millis) => write!(f, "{millis}"),
        }
    }
}

impl FromStr for RangeBound {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
