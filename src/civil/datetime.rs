use core::str::FromStr;

use alloc::string::String;

use crate::{
    calendar::{self, Tm},
    civil::{TimeOfDay, Weekday},
    error::Error,
    tz::TimeZoneSpec,
};

/// A local date and wall clock time, to second precision.
///
/// A `CivilTime` is what a wall clock and calendar show in some time zone.
/// It doesn't know which time zone that is. To get an instant from it, use
/// [`CivilTime::to_utc`] with the zone's [`TimeZoneSpec`].
///
/// Internally this wraps a normalized [`Tm`]. The accessors expose the
/// fields with human conventions. Months and days start at `1`, the day of
/// the year is in `1..=366` and the day of the week is in `1..=7` with
/// Sunday at `1`.
///
/// # Example
///
/// ```
/// use civiltz::civil::{CivilTime, Weekday};
///
/// let ct: CivilTime = "2021-04-01T10:00:00".parse()?;
/// assert_eq!((ct.year(), ct.month(), ct.day()), (2021, 4, 1));
/// assert_eq!(ct.day_of_week(), Weekday::Thursday);
/// assert_eq!(ct.weekday(), 5);
/// assert_eq!(ct.day_of_year(), 91);
/// assert_eq!(ct.to_string(), "2021-04-01 10:00:00");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CivilTime {
    tm: Tm,
}

impl CivilTime {
    /// Creates a new civil time from its fields.
    ///
    /// # Errors
    ///
    /// This returns an error when any field is out of range. The year must
    /// be in `-9999..=9999`, the month in `1..=12`, the day must exist in
    /// that month, the hour must be in `0..=23` and the minute and second
    /// in `0..=59`.
    pub fn new(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<CivilTime, Error> {
        if !(calendar::MIN_YEAR..=calendar::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                calendar::MIN_YEAR,
                calendar::MAX_YEAR,
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", month, 1, 12));
        }
        let max_day = calendar::days_in_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(Error::range("day", day, 1, max_day));
        }
        if !(0..=23).contains(&hour) {
            return Err(Error::range("hour", hour, 0, 23));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::range("minute", minute, 0, 59));
        }
        if !(0..=59).contains(&second) {
            return Err(Error::range("second", second, 0, 59));
        }
        Ok(CivilTime::from_tm(Tm {
            year,
            month,
            day,
            hour,
            minute,
            second,
            wday: 0,
            yday: 0,
        }))
    }

    /// Creates a civil time from broken-down time, normalizing any fields
    /// that are out of range.
    pub fn from_tm(mut tm: Tm) -> CivilTime {
        tm.normalize();
        CivilTime { tm }
    }

    /// Returns the civil time of a UTC instant in a zone with the given
    /// offset (positive west of UTC, as in POSIX).
    pub(crate) fn from_instant(instant: i64, offset: TimeOfDay) -> CivilTime {
        let local = instant.saturating_sub(i64::from(offset.to_seconds()));
        CivilTime { tm: calendar::instant_to_tm(local) }
    }

    /// Parses `YYYY-MM-DD?HH:MM:SS`. See [`calendar::parse_iso`].
    pub fn parse_iso(input: &str) -> Result<CivilTime, Error> {
        calendar::parse_iso(input).map(|tm| CivilTime { tm })
    }

    /// Returns the underlying normalized broken-down time.
    pub fn tm(&self) -> &Tm {
        &self.tm
    }

    pub fn year(&self) -> i32 {
        self.tm.year
    }

    /// The month, in `1..=12`.
    pub fn month(&self) -> i32 {
        self.tm.month
    }

    /// The day of the month, starting at `1`.
    pub fn day(&self) -> i32 {
        self.tm.day
    }

    /// The hour, in `0..=23`.
    pub fn hour(&self) -> i32 {
        self.tm.hour
    }

    pub fn minute(&self) -> i32 {
        self.tm.minute
    }

    pub fn second(&self) -> i32 {
        self.tm.second
    }

    /// The day of the week in `1..=7`, where Sunday is `1`.
    pub fn weekday(&self) -> i32 {
        self.tm.wday + 1
    }

    /// The day of the week.
    pub fn day_of_week(&self) -> Weekday {
        Weekday::from_zero_offset_unchecked(self.tm.wday as i8)
    }

    /// The day of the year, in `1..=366`.
    pub fn day_of_year(&self) -> i32 {
        self.tm.yday + 1
    }

    /// Which occurrence of its weekday this day is within the month, in
    /// `1..=5`. For example, the second Sunday of a month returns `2`.
    pub fn weekday_ordinal(&self) -> i32 {
        (self.tm.day - 1) / 7 + 1
    }

    /// The last day of this civil time's month.
    pub fn last_day_of_month(&self) -> i32 {
        calendar::days_in_month(self.tm.year, self.tm.month)
    }

    /// The wall clock time.
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_tm(&self.tm)
    }

    /// True before noon.
    pub fn is_am(&self) -> bool {
        self.tm.hour < 12
    }

    /// True at or after noon.
    pub fn is_pm(&self) -> bool {
        !self.is_am()
    }

    /// The hour on a 12 hour clock, in `1..=12`.
    pub fn hour12(&self) -> i32 {
        match self.tm.hour % 12 {
            0 => 12,
            hour => hour,
        }
    }

    /// Renders this time as `YYYY-MM-DD<separator>HH:MM:SS`.
    pub fn to_iso_string(&self, separator: char) -> String {
        self.tm.to_iso_string(separator)
    }

    /// Returns this civil time moved by the given number of days, with the
    /// time of day replaced when `hms` is given.
    pub(crate) fn with_days(&self, days: i32, hms: Option<TimeOfDay>) -> Tm {
        let mut tm = self.tm;
        tm.day += days;
        if let Some(hms) = hms {
            hms.apply_to(&mut tm);
        }
        tm.normalize();
        tm
    }

    /// Resolves this local time to a UTC instant in the given zone.
    ///
    /// Every local time maps to exactly one instant, even around DST
    /// transitions:
    ///
    /// * A local time skipped by a transition (the "gap" when clocks spring
    /// forward) resolves to the transition instant itself. That is the first
    /// local time after the gap.
    /// * A local time that occurs twice (the "fold" when clocks fall back)
    /// resolves to the later of the two instants. For ordinary zones, that
    /// is the standard time interpretation.
    ///
    /// An invalid spec is treated as UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::{calendar, civil::CivilTime, tz::TimeZoneSpec};
    ///
    /// let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0,M11.1.0");
    ///
    /// // 02:30 doesn't exist on 2021-03-14. Clocks jump to 03:00 EDT.
    /// let ct = CivilTime::parse_iso("2021-03-14 02:30:00")?;
    /// let utc = ct.to_utc(&spec);
    /// assert_eq!(calendar::time_to_string(utc, 'T'), "2021-03-14T07:00:00");
    ///
    /// // 01:30 happens twice on 2021-11-07. The second time is in EST.
    /// let ct = CivilTime::parse_iso("2021-11-07 01:30:00")?;
    /// let utc = ct.to_utc(&spec);
    /// assert_eq!(calendar::time_to_string(utc, 'T'), "2021-11-07T06:30:00");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_utc(&self, spec: &TimeZoneSpec) -> i64 {
        let local = calendar::tm_to_instant(&self.tm);
        if !spec.is_valid() {
            return local;
        }
        let as_std = local + i64::from(spec.std_offset().to_seconds());
        if !spec.has_dst() {
            return as_std;
        }
        let as_dst = local + i64::from(spec.dst_offset().to_seconds());
        let std_fits = !spec.is_dst_at(as_std);
        let dst_fits = spec.is_dst_at(as_dst);
        let instant = match (std_fits, dst_fits) {
            (true, true) => as_std.max(as_dst),
            (true, false) => as_std,
            (false, true) => as_dst,
            (false, false) => {
                let (lo, hi) = (as_std.min(as_dst), as_std.max(as_dst));
                transition_within(spec, lo, hi).unwrap_or(hi)
            }
        };
        trace!(
            "resolved local time {} to {instant} \
             (standard fits: {std_fits}, DST fits: {dst_fits})",
            self,
        );
        instant
    }
}

/// Returns the transition instant `t` with `lo < t <= hi`, if one exists.
fn transition_within(spec: &TimeZoneSpec, lo: i64, hi: i64) -> Option<i64> {
    let year = spec.std_local_year(lo);
    (year - 1..=year + 1)
        .filter_map(|year| spec.transitions(year))
        .flat_map(|(dst, std)| [dst, std])
        .find(|&t| lo < t && t <= hi)
}

impl From<Tm> for CivilTime {
    fn from(tm: Tm) -> CivilTime {
        CivilTime::from_tm(tm)
    }
}

impl FromStr for CivilTime {
    type Err = Error;

    fn from_str(input: &str) -> Result<CivilTime, Error> {
        CivilTime::parse_iso(input)
    }
}

impl core::fmt::Display for CivilTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.to_iso_string(' '))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CivilTime {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CivilTime {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<CivilTime, D::Error> {
        use serde::de;

        struct CivilTimeVisitor;

        impl<'de> de::Visitor<'de> for CivilTimeVisitor {
            type Value = CivilTime;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a datetime string like `2021-03-14 02:00:00`")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<CivilTime, E> {
                CivilTime::parse_iso(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(CivilTimeVisitor)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for CivilTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> CivilTime {
        CivilTime { tm: Tm::arbitrary(g) }
    }
}
