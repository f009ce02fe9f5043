//! The packed date/time structure used by lookup buffers, and its conversion to
//! calendar values.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::Serialize;
use viewbuf_bytes::ByteCursor;
use viewbuf_common::Result;

const NO_TIME: u32 = 0xFFFF_FFFF;
const JULIAN_DAY_MASK: u32 = 0x00FF_FFFF;
const DST_BIT: u32 = 0x8000_0000;

/// Julian day number of the day preceding 0001-01-01 (proleptic Gregorian).
const JULIAN_DAY_BEFORE_CE: i64 = 1_721_425;
const HUNDREDTHS_PER_DAY: u32 = 24 * 60 * 60 * 100;

/// Maximum absolute UTC offset accepted by [`TimeZoneContext`], in minutes.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// The raw 8-byte date/time structure.
///
/// `innards[0]` holds the time of day in hundredths of a second since midnight GMT,
/// or `0xFFFFFFFF` when the value carries no time part. The low 24 bits of
/// `innards[1]` hold the Julian day number, or `0xFFFFFF` when the value carries no
/// date part; the high byte holds the zone and daylight-saving information of the
/// writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TimeDate {
    pub innards: [u32; 2],
}

impl TimeDate {
    /// Encoded size in bytes.
    pub const SIZE: usize = 8;

    #[inline]
    pub const fn new(innards: [u32; 2]) -> TimeDate {
        TimeDate { innards }
    }

    /// Reads a `TimeDate` at the cursor position and advances past it.
    pub fn read_from(cursor: &mut ByteCursor<'_>, element: &str) -> Result<TimeDate> {
        let time = cursor.read::<u32>(element)?;
        let date = cursor.read::<u32>(element)?;
        Ok(TimeDate::new([time, date]))
    }

    #[inline]
    pub fn has_time(&self) -> bool {
        self.innards[0] != NO_TIME
    }

    #[inline]
    pub fn has_date(&self) -> bool {
        self.julian_day() != JULIAN_DAY_MASK
    }

    #[inline]
    pub fn julian_day(&self) -> u32 {
        self.innards[1] & JULIAN_DAY_MASK
    }

    /// Time of day in hundredths of a second since midnight GMT.
    #[inline]
    pub fn hundredths(&self) -> u32 {
        self.innards[0]
    }

    /// Whether the writer observed daylight-saving time.
    #[inline]
    pub fn daylight_saving(&self) -> bool {
        self.innards[1] & DST_BIT != 0
    }

    /// The GMT date part, if present and representable.
    pub fn date(&self) -> Option<NaiveDate> {
        if !self.has_date() {
            return None;
        }
        let days = i64::from(self.julian_day()) - JULIAN_DAY_BEFORE_CE;
        NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)
    }

    /// The GMT time-of-day part, if present and valid.
    pub fn time(&self) -> Option<NaiveTime> {
        if !self.has_time() || self.hundredths() >= HUNDREDTHS_PER_DAY {
            return None;
        }
        let hundredths = self.hundredths();
        NaiveTime::from_num_seconds_from_midnight_opt(
            hundredths / 100,
            (hundredths % 100) * 10_000_000,
        )
    }

    /// The absolute instant, when both the date and time parts are present.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let midnight = self.date()?.and_time(NaiveTime::MIN).and_utc();
        self.time()?;
        let since_midnight = Duration::milliseconds(i64::from(self.hundredths()) * 10);
        Some(midnight + since_midnight)
    }

    /// The absolute instant, presented in the offset of `time_zone`.
    pub fn to_datetime(&self, time_zone: &TimeZoneContext) -> Option<DateTime<FixedOffset>> {
        Some(self.to_utc()?.with_timezone(&time_zone.fixed_offset()))
    }
}

/// Timezone offset and daylight-saving flag supplied by the host clock, applied to
/// every decoded date/time value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TimeZoneContext {
    utc_offset_minutes: i32,
    daylight_saving: bool,
}

impl TimeZoneContext {
    pub const UTC: TimeZoneContext = TimeZoneContext {
        utc_offset_minutes: 0,
        daylight_saving: false,
    };

    /// Creates a context from a standard offset in minutes east of UTC and a
    /// daylight-saving flag, which adds one hour to the standard offset.
    pub fn new(utc_offset_minutes: i32, daylight_saving: bool) -> Result<TimeZoneContext> {
        viewbuf_common::check_arg!(
            utc_offset_minutes,
            utc_offset_minutes.abs() <= MAX_OFFSET_MINUTES
        );
        Ok(TimeZoneContext {
            utc_offset_minutes,
            daylight_saving,
        })
    }

    #[inline]
    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    #[inline]
    pub fn daylight_saving(&self) -> bool {
        self.daylight_saving
    }

    /// Effective offset, including the daylight-saving hour.
    pub fn fixed_offset(&self) -> FixedOffset {
        let minutes = self.utc_offset_minutes + if self.daylight_saving { 60 } else { 0 };
        FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// A decoded date/time value: the raw structure and, when it denotes a complete
/// instant, that instant in the configured offset.
///
/// Values with a missing date or time part keep only their raw structure; use
/// [`TimeDate::date`] and [`TimeDate::time`] to read the partial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateTimeValue {
    raw: TimeDate,
    instant: Option<DateTime<FixedOffset>>,
}

impl DateTimeValue {
    pub fn new(raw: TimeDate, time_zone: &TimeZoneContext) -> DateTimeValue {
        DateTimeValue {
            raw,
            instant: raw.to_datetime(time_zone),
        }
    }

    #[inline]
    pub fn raw(&self) -> TimeDate {
        self.raw
    }

    #[inline]
    pub fn instant(&self) -> Option<DateTime<FixedOffset>> {
        self.instant
    }
}

impl std::fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(instant) = self.instant {
            return f.write_str(&instant.to_rfc3339());
        }
        match (self.raw.date(), self.raw.time()) {
            (Some(date), None) => write!(f, "{date}"),
            (None, Some(time)) => write!(f, "{time}"),
            _ => write!(
                f,
                "timedate({:08x}:{:08x})",
                self.raw.innards[0], self.raw.innards[1]
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone, Timelike};

    use super::*;

    /// 2024-03-15 is Julian day 2460385.
    const JD_2024_03_15: u32 = 2_460_385;

    #[test]
    fn test_complete_value() {
        let hundredths = (13 * 3600 + 45 * 60 + 30) * 100 + 25;
        let raw = TimeDate::new([hundredths, JD_2024_03_15 | DST_BIT]);
        assert!(raw.has_date() && raw.has_time());
        assert!(raw.daylight_saving());

        let utc = raw.to_utc().unwrap();
        assert_eq!(
            utc,
            Utc.with_ymd_and_hms(2024, 3, 15, 13, 45, 30).unwrap() + Duration::milliseconds(250)
        );

        let tz = TimeZoneContext::new(60, true).unwrap();
        let value = DateTimeValue::new(raw, &tz);
        let local = value.instant().unwrap();
        assert_eq!(local.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(local.hour(), 15);
        assert_eq!(local.with_timezone(&Utc), utc);
    }

    #[test]
    fn test_partial_values() {
        let date_only = TimeDate::new([NO_TIME, JD_2024_03_15]);
        assert!(!date_only.has_time());
        assert_eq!(date_only.to_utc(), None);
        let date = date_only.date().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));
        let value = DateTimeValue::new(date_only, &TimeZoneContext::UTC);
        assert_eq!(value.instant(), None);
        assert_eq!(value.to_string(), "2024-03-15");

        let time_only = TimeDate::new([100 * 60, JULIAN_DAY_MASK]);
        assert!(!time_only.has_date());
        assert_eq!(time_only.time().unwrap().minute(), 1);
        assert_eq!(
            DateTimeValue::new(time_only, &TimeZoneContext::UTC).to_string(),
            "00:01:00"
        );
    }

    #[test]
    fn test_unix_epoch() {
        let raw = TimeDate::new([0, 2_440_588]);
        assert_eq!(raw.to_utc().unwrap().timestamp(), 0);
    }

    #[test]
    fn test_time_zone_validation() {
        assert!(TimeZoneContext::new(15 * 60, false).is_err());
        let tz = TimeZoneContext::new(-5 * 60, false).unwrap();
        assert_eq!(tz.fixed_offset().local_minus_utc(), -5 * 3600);
        assert_eq!(TimeZoneContext::default(), TimeZoneContext::UTC);
    }
}
