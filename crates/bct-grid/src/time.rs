//! Dataset time labels: CF time decoding and time-window selection.

use crate::{GridError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Which end of a partial timestamp to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

/// Inclusive window of dataset time labels.
///
/// Bounds given with less than second resolution cover the whole period they
/// name: an end of `2015-01-02` includes every time step on that day, an end of
/// `2015-01-02 06:00` every step up to 06:00:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Window from `start` to `end` inclusive; fails if `start` is later.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(GridError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two timestamp strings.
    ///
    /// Accepted forms: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS`
    /// (a `T` may replace the space, fractional seconds are allowed).
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_bound(start, Bound::Lower)?, parse_bound(end, Bound::Upper)?)
    }

    /// Whether `t` lies inside the window, bounds included.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Parse a single timestamp (lower bound of its resolution).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    parse_bound(s, Bound::Lower)
}

fn parse_bound(s: &str, bound: Bound) -> Result<NaiveDateTime> {
    let s = s.trim();

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(match bound {
                Bound::Lower => t,
                Bound::Upper => t + Duration::seconds(60) - Duration::nanoseconds(1),
            });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let start = date.and_time(NaiveTime::MIN);
        return Ok(match bound {
            Bound::Lower => start,
            Bound::Upper => start + Duration::days(1) - Duration::nanoseconds(1),
        });
    }

    Err(GridError::InvalidTimestamp(s.to_string()))
}

/// Decoder for CF-convention time coordinates (`<unit> since <epoch>`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfTimeUnits {
    /// Length of one unit in seconds.
    unit_seconds: f64,
    /// Epoch, normalized to UTC.
    epoch: NaiveDateTime,
}

impl CfTimeUnits {
    /// Parse a `units` attribute such as `seconds since 2015-01-01 00:00:00 +01:00`.
    pub fn parse(units: &str) -> Result<Self> {
        let invalid = || GridError::InvalidTimeUnits(units.to_string());

        let (unit, epoch) = units.trim().split_once(" since ").ok_or_else(invalid)?;
        let unit_seconds = match unit.trim().to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3600.0,
            "days" | "day" | "d" => 86_400.0,
            _ => return Err(invalid()),
        };
        let epoch = parse_epoch(epoch.trim()).ok_or_else(invalid)?;

        Ok(Self {
            unit_seconds,
            epoch,
        })
    }

    /// Epoch of the units, normalized to UTC.
    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    /// Convert a raw time value to a timestamp, rounded to the millisecond.
    pub fn decode(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.unit_seconds * 1000.0).round();
        if millis.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        self.epoch
            .checked_add_signed(Duration::milliseconds(millis as i64))
    }
}

/// Parse a CF epoch, applying an optional UTC offset.
fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.naive_utc());
    }

    let s = s
        .strip_suffix("UTC")
        .or_else(|| s.strip_suffix('Z'))
        .unwrap_or(s)
        .trim()
        .replacen('T', " ", 1);

    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    let offset_seconds = match tokens.last().copied() {
        Some(last) if tokens.len() > 1 && last.starts_with(['+', '-']) => {
            let offset = parse_utc_offset(last)?;
            tokens.pop();
            offset
        }
        _ => 0,
    };

    let date = NaiveDate::parse_from_str(tokens.first()?, "%Y-%m-%d").ok()?;
    let time = match tokens.get(1) {
        None => NaiveTime::MIN,
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            .ok()?,
    };
    if tokens.len() > 2 {
        return None;
    }

    Some(date.and_time(time) - Duration::seconds(offset_seconds))
}

/// Parse `+HH:MM`, `+HHMM`, `+HH` or `+H` into seconds east of UTC.
fn parse_utc_offset(s: &str) -> Option<i64> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let (hours, minutes) = if let Some((h, m)) = digits.split_once(':') {
        (h, m)
    } else if digits.len() == 4 {
        digits.split_at(2)
    } else {
        (digits, "0")
    };

    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }

    Some(sign * (hours * 3600 + minutes * 60))
}

/// Timestamp of an offset in minutes after an origin, rounded to the millisecond.
pub fn minutes_after(origin: NaiveDateTime, minutes: f64) -> Option<NaiveDateTime> {
    if !minutes.is_finite() {
        return None;
    }
    let millis = (minutes * 60_000.0).round();
    if millis.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    origin.checked_add_signed(Duration::milliseconds(millis as i64))
}
