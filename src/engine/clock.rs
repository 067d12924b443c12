use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A clock-of-day value ("HH:MM", 24-hour). Carries no date component:
/// adding minutes wraps around midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parses an "HH:MM" string.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveTime::parse_from_str(s, "%H:%M").ok().map(ClockTime)
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hours, minutes, 0).map(ClockTime)
    }

    /// Shifts this time forward by `minutes`, wrapping within the 24-hour
    /// clock. No date rollover is modeled.
    pub fn add_minutes(self, minutes: u32) -> Self {
        let (shifted, _) = self.0.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        ClockTime(shifted)
    }

    pub fn minutes_since_midnight(self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClockTime::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {:?}", raw)))
    }
}
