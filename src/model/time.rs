//! Time grains, granularities, time zones and intervals.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, Timelike, Utc, Weekday,
};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors raised while parsing or constructing time values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("Unknown granularity '{0}'. Expected one of: all, hour, day, week, month, quarter, year")]
    UnknownGranularity(String),

    #[error("Invalid time zone '{0}'. Expected UTC or an offset like +05:30")]
    InvalidTimeZone(String),

    #[error("Invalid instant '{0}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidInstant(String),

    #[error("Interval '{0}' must be written as <start>/<end>")]
    MalformedInterval(String),

    #[error("Interval end {end} must be after start {start}")]
    EmptyInterval { start: String, end: String },
}

/// Time bucketing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGrain {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeGrain {
    pub const ALL: [TimeGrain; 6] = [
        TimeGrain::Hour,
        TimeGrain::Day,
        TimeGrain::Week,
        TimeGrain::Month,
        TimeGrain::Quarter,
        TimeGrain::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimeGrain::Hour => "hour",
            TimeGrain::Day => "day",
            TimeGrain::Week => "week",
            TimeGrain::Month => "month",
            TimeGrain::Quarter => "quarter",
            TimeGrain::Year => "year",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|g| g.name() == name)
    }

    /// Whether `instant`, viewed in `zone`, falls on a bucket boundary.
    ///
    /// Weeks start on Monday.
    pub fn is_aligned(&self, instant: DateTime<Utc>, zone: TimeZone) -> bool {
        let local = instant.with_timezone(&zone.offset());
        let on_hour = local.minute() == 0 && local.second() == 0 && local.nanosecond() == 0;
        let on_day = on_hour && local.hour() == 0;
        match self {
            TimeGrain::Hour => on_hour,
            TimeGrain::Day => on_day,
            TimeGrain::Week => on_day && local.weekday() == Weekday::Mon,
            TimeGrain::Month => on_day && local.day() == 1,
            TimeGrain::Quarter => on_day && local.day() == 1 && local.month0() % 3 == 0,
            TimeGrain::Year => on_day && local.ordinal() == 1,
        }
    }
}

impl fmt::Display for TimeGrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The time bucketing of a request: everything in one bucket, or a grain
/// optionally tied to a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Granularity {
    All,
    Time {
        grain: TimeGrain,
        zone: Option<TimeZone>,
    },
}

impl Granularity {
    pub fn grain(grain: TimeGrain) -> Self {
        Granularity::Time { grain, zone: None }
    }

    /// Parse `all` or a grain name.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Granularity::All);
        }
        TimeGrain::from_name(trimmed)
            .map(Granularity::grain)
            .ok_or_else(|| TimeError::UnknownGranularity(s.to_string()))
    }

    /// Associate a time zone. `All` has no buckets and is returned unchanged.
    pub fn in_zone(self, zone: TimeZone) -> Self {
        match self {
            Granularity::All => Granularity::All,
            Granularity::Time { grain, .. } => Granularity::Time {
                grain,
                zone: Some(zone),
            },
        }
    }

    pub fn without_zone(self) -> Self {
        match self {
            Granularity::All => Granularity::All,
            Granularity::Time { grain, .. } => Granularity::grain(grain),
        }
    }

    pub fn time_grain(&self) -> Option<TimeGrain> {
        match self {
            Granularity::All => None,
            Granularity::Time { grain, .. } => Some(*grain),
        }
    }

    pub fn zone(&self) -> Option<TimeZone> {
        match self {
            Granularity::All => None,
            Granularity::Time { zone, .. } => *zone,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::All => f.write_str("all"),
            Granularity::Time { grain, zone: None } => write!(f, "{}", grain),
            Granularity::Time {
                grain,
                zone: Some(zone),
            } => write!(f, "{}({})", grain, zone),
        }
    }
}

impl FromStr for Granularity {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::parse(s)
    }
}

impl TryFrom<String> for Granularity {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Granularity::parse(&s)
    }
}

impl Serialize for Granularity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct TimeZone(FixedOffset);

impl TimeZone {
    pub fn utc() -> Self {
        TimeZone(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    pub fn offset_seconds(&self) -> i32 {
        self.0.local_minus_utc()
    }

    /// Parse `UTC`, `GMT`, `Z`, or an offset of the form `+HH:MM`, `+HHMM`, `+HH`.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidTimeZone(s.to_string());
        let trimmed = s.trim();
        if ["UTC", "GMT", "Z"]
            .iter()
            .any(|name| trimmed.eq_ignore_ascii_case(name))
        {
            return Ok(Self::utc());
        }
        if !trimmed.is_ascii() {
            return Err(invalid());
        }

        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some(parts) => parts,
            None if rest.len() == 4 => rest.split_at(2),
            None => (rest, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(TimeZone)
            .ok_or_else(invalid)
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.offset_seconds();
        if seconds == 0 {
            return f.write_str("UTC");
        }
        let sign = if seconds < 0 { '-' } else { '+' };
        let minutes = seconds.abs() / 60;
        write!(f, "{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    }
}

impl FromStr for TimeZone {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeZone::parse(s)
    }
}

impl TryFrom<String> for TimeZone {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TimeZone::parse(&s)
    }
}

impl Serialize for TimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A half-open `[start, end)` time range with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeError> {
        if end <= start {
            return Err(TimeError::EmptyInterval {
                start: format_instant(start),
                end: format_instant(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `<start>/<end>`, reading both sides as local times in `zone`.
    pub fn parse(s: &str, zone: TimeZone) -> Result<Self, TimeError> {
        let (start, end) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| TimeError::MalformedInterval(s.to_string()))?;
        Interval::new(parse_instant(start, zone)?, parse_instant(end, zone)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format_instant(self.start), format_instant(self.end))
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse a date or local date-time in `zone`.
pub fn parse_instant(s: &str, zone: TimeZone) -> Result<DateTime<Utc>, TimeError> {
    let trimmed = s.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TimeError::InvalidInstant(s.to_string()))?;

    naive
        .and_local_timezone(zone.offset())
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| TimeError::InvalidInstant(s.to_string()))
}
