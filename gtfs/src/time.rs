use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FeedError;

/// Seconds since the start of a service day. Hours may go past 23 for trips running after
/// midnight, so 25:30:00 is 01:30 on the next calendar day but still sorts after 23:50:00.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceTime(u32);

impl ServiceTime {
    pub const START_OF_DAY: ServiceTime = ServiceTime(0);

    /// Parses `H+:MM:SS`. Minutes and seconds must be two digits below 60; hours are unbounded.
    pub fn parse(raw: &str) -> Result<Self, FeedError> {
        let malformed = || FeedError::MalformedTime(raw.to_string());

        let parts: Vec<&str> = raw.split(':').collect();
        let [h, m, s] = parts.as_slice() else {
            return Err(malformed());
        };
        if h.is_empty() || m.len() != 2 || s.len() != 2 {
            return Err(malformed());
        }
        let hours = parse_digits(h).ok_or_else(malformed)?;
        let minutes = parse_digits(m).ok_or_else(malformed)?;
        let seconds = parse_digits(s).ok_or_else(malformed)?;
        Self::from_hms(hours, minutes, seconds).ok_or_else(malformed)
    }

    /// None if minutes or seconds aren't below 60, or the total doesn't fit.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        hours
            .checked_mul(3600)
            .and_then(|x| x.checked_add(minutes * 60 + seconds))
            .map(ServiceTime)
    }

    pub fn inner_seconds(self) -> u32 {
        self.0
    }

    /// May exceed 23
    pub fn hours(self) -> u32 {
        self.0 / 3600
    }

    pub fn minutes(self) -> u32 {
        (self.0 / 60) % 60
    }

    pub fn seconds(self) -> u32 {
        self.0 % 60
    }

    /// True for times belonging to the previous service day's overflow, like 24:10:00
    pub fn is_past_midnight(self) -> bool {
        self.hours() >= 24
    }

    /// Renders as `H:MM AM/PM` on the wall clock. This forgets the service day, so 01:30:00 and
    /// 25:30:00 both become "1:30 AM".
    pub fn format_display(self) -> String {
        let hour = self.hours() % 24;
        let ampm = if hour >= 12 { "PM" } else { "AM" };
        let hour12 = match hour % 12 {
            0 => 12,
            x => x,
        };
        format!("{}:{:02} {}", hour12, self.minutes(), ampm)
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl TryFrom<String> for ServiceTime {
    type Error = FeedError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ServiceTime> for String {
    fn from(t: ServiceTime) -> Self {
        t.to_string()
    }
}

/// Reads an `H:MM AM/PM` string produced by `format_display` back into minutes since midnight
/// on the wall clock. Used to order display strings; it knows nothing about service days.
pub fn display_minute_of_day(display: &str) -> Result<u32, FeedError> {
    let malformed = || FeedError::MalformedTime(display.to_string());

    let (clock, ampm) = display.split_once(' ').ok_or_else(malformed)?;
    let (h, m) = clock.split_once(':').ok_or_else(malformed)?;
    let mut hours = parse_digits(h).ok_or_else(malformed)?;
    let minutes = parse_digits(m).ok_or_else(malformed)?;
    if hours == 0 || hours > 12 || minutes >= 60 {
        return Err(malformed());
    }
    match ampm {
        "AM" if hours == 12 => hours = 0,
        "AM" => {}
        "PM" if hours != 12 => hours += 12,
        "PM" => {}
        _ => return Err(malformed()),
    }
    Ok(hours * 60 + minutes)
}

fn parse_digits(x: &str) -> Option<u32> {
    if x.is_empty() || !x.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    x.parse().ok()
}
