use core::str::FromStr;

use crate::{
    calendar::Tm,
    error::{civil::Error as E, Error},
    util::parse::Cursor,
};

/// The largest number of hours a time of day may have.
///
/// POSIX limits transition times to `0..=24`, but the IANA v3 extension
/// widens this to `-167..=167` so that rules like "the Saturday before the
/// last Sunday" can be written as a transition time on that Sunday.
const MAX_HOUR: i16 = 167;

/// The largest absolute number of seconds representable by a `TimeOfDay`.
const MAX_SECONDS: i32 = MAX_HOUR as i32 * 3600 + 59 * 60 + 59;

/// A signed time of day, to second precision.
///
/// A `TimeOfDay` does double duty. It is a wall clock time (where it is
/// usually in the range `0:00:00..=23:59:59`) and it is a signed duration
/// from midnight used for UTC offsets and DST transition times. The hour
/// may therefore be negative and may exceed 23.
///
/// When negative, the sign applies to the whole value. That is, `-5:30:00`
/// is five and a half hours before midnight, not four and a half.
///
/// # Parsing and printing
///
/// The `Display` impl prints `[-]H:MM:SS`, for example `2:00:00` or
/// `-5:00:00`. [`TimeOfDay::parse`] and [`TimeOfDay::parse_strict`] accept
/// `[+|-]H[:M[:S]]` where each field has one or more digits. Zero padding
/// is optional.
///
/// ```
/// use civiltz::civil::TimeOfDay;
///
/// let t: TimeOfDay = "2:30".parse()?;
/// assert_eq!(t.to_string(), "2:30:00");
/// assert_eq!(t.to_seconds(), 9000);
///
/// let t: TimeOfDay = "-0:30".parse()?;
/// assert_eq!(t.to_string(), "-0:30:00");
/// assert_eq!(t.to_seconds(), -1800);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct TimeOfDay {
    hour: i16,
    minute: i8,
    second: i8,
}

impl TimeOfDay {
    /// Midnight, or a zero offset.
    pub const ZERO: TimeOfDay = TimeOfDay { hour: 0, minute: 0, second: 0 };

    /// Creates a new time of day from its components.
    ///
    /// A negative `hour` makes the entire value negative. To create a
    /// negative value with a zero hour component, use
    /// [`TimeOfDay::from_seconds`].
    ///
    /// # Errors
    ///
    /// This returns an error when `hour` is not in `-167..=167`, or when
    /// either `minute` or `second` is not in `0..=59`.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::civil::TimeOfDay;
    ///
    /// let t = TimeOfDay::new(-5, 0, 0)?;
    /// assert_eq!(t.to_seconds(), -18000);
    ///
    /// assert!(TimeOfDay::new(1, 60, 0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(hour: i16, minute: i8, second: i8) -> Result<TimeOfDay, Error> {
        if !(-MAX_HOUR <= hour && hour <= MAX_HOUR) {
            return Err(Error::range("hour", hour, -MAX_HOUR, MAX_HOUR));
        }
        if !(0 <= minute && minute <= 59) {
            return Err(Error::range("minute", minute, 0, 59));
        }
        if !(0 <= second && second <= 59) {
            return Err(Error::range("second", second, 0, 59));
        }
        Ok(TimeOfDay { hour, minute, second })
    }

    /// Creates a new time of day in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics when any component is out of the ranges documented on
    /// [`TimeOfDay::new`].
    pub const fn constant(hour: i16, minute: i8, second: i8) -> TimeOfDay {
        if !(-MAX_HOUR <= hour && hour <= MAX_HOUR) {
            panic!("invalid hour");
        }
        if !(0 <= minute && minute <= 59) {
            panic!("invalid minute");
        }
        if !(0 <= second && second <= 59) {
            panic!("invalid second");
        }
        TimeOfDay { hour, minute, second }
    }

    /// Creates a time of day from a signed number of seconds since
    /// midnight.
    ///
    /// Values beyond `±167:59:59` are clamped.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::civil::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::from_seconds(3661).to_string(), "1:01:01");
    /// assert_eq!(TimeOfDay::from_seconds(-1800).to_string(), "-0:30:00");
    /// ```
    pub fn from_seconds(seconds: i32) -> TimeOfDay {
        let seconds = seconds.clamp(-MAX_SECONDS, MAX_SECONDS);
        let negative = seconds < 0;
        let abs = seconds.unsigned_abs();
        let mut hour = (abs / 3600) as i16;
        let mut minute = (abs % 3600 / 60) as i8;
        let mut second = (abs % 60) as i8;
        if negative {
            // The sign lives on the most significant non-zero component.
            if hour != 0 {
                hour = -hour;
            } else if minute != 0 {
                minute = -minute;
            } else {
                second = -second;
            }
        }
        TimeOfDay { hour, minute, second }
    }

    /// Returns this value as a signed number of seconds since midnight.
    pub fn to_seconds(self) -> i32 {
        let abs = i32::from(self.hour.unsigned_abs()) * 3600
            + i32::from(self.minute.unsigned_abs()) * 60
            + i32::from(self.second.unsigned_abs());
        if self.is_negative() {
            -abs
        } else {
            abs
        }
    }

    /// Returns true when this value is before midnight.
    pub fn is_negative(self) -> bool {
        self.hour < 0 || self.minute < 0 || self.second < 0
    }

    /// Returns the unsigned hour component, combine with
    /// [`TimeOfDay::is_negative`] for the sign.
    pub fn hour(self) -> i16 {
        self.hour.abs()
    }

    /// Returns the unsigned minute component.
    pub fn minute(self) -> i8 {
        self.minute.abs()
    }

    /// Returns the unsigned second component.
    pub fn second(self) -> i8 {
        self.second.abs()
    }

    /// Parses a time of day, returning midnight when the input is malformed.
    ///
    /// Use [`TimeOfDay::parse_strict`] (or `FromStr`) to find out why a
    /// string doesn't parse.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::civil::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse("2:00").to_seconds(), 7200);
    /// assert_eq!(TimeOfDay::parse("nope"), TimeOfDay::ZERO);
    /// ```
    pub fn parse(input: &str) -> TimeOfDay {
        match TimeOfDay::parse_strict(input) {
            Ok(time) => time,
            Err(_err) => {
                debug!("ignoring malformed time of day {input:?}: {_err}");
                TimeOfDay::ZERO
            }
        }
    }

    /// Parses a time of day in `[+|-]H[:M[:S]]` form.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is empty, has a field that
    /// isn't made of digits or is out of range, or has trailing input.
    pub fn parse_strict(input: &str) -> Result<TimeOfDay, Error> {
        if input.is_empty() {
            return Err(Error::from(E::EmptyTimeOfDay));
        }
        let cursor = Cursor::new(input);
        let time = parse_hms(&cursor, MAX_HOUR)?;
        if let Some(found) = cursor.maybe_byte() {
            return Err(Error::from(E::TrailingTimeOfDay { found }));
        }
        Ok(time)
    }

    /// Extracts the wall clock time from broken-down time.
    pub fn from_tm(tm: &Tm) -> TimeOfDay {
        let seconds = i64::from(tm.hour) * 3600
            + i64::from(tm.minute) * 60
            + i64::from(tm.second);
        let max = i64::from(MAX_SECONDS);
        TimeOfDay::from_seconds(seconds.clamp(-max, max) as i32)
    }

    /// Overwrites the wall clock fields of `tm` with this time of day.
    ///
    /// A negative value produces negative fields, which denote a time on
    /// the previous day once `tm` is normalized.
    pub fn apply_to(self, tm: &mut Tm) {
        let (hour, minute, second) = self.signed_components();
        tm.hour = hour;
        tm.minute = minute;
        tm.second = second;
    }

    /// Adds this (signed) value to the wall clock fields of `tm`.
    ///
    /// The fields of `tm` may be out of range afterwards. Call
    /// [`Tm::normalize`] to fix them up.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::{calendar::Tm, civil::TimeOfDay};
    ///
    /// let mut tm = Tm { year: 2021, month: 3, day: 14, hour: 1, ..Tm::default() };
    /// TimeOfDay::parse("-2:00").adjust_tm(&mut tm);
    /// assert_eq!(tm.hour, -1);
    /// tm.normalize();
    /// assert_eq!((tm.day, tm.hour), (13, 23));
    /// ```
    pub fn adjust_tm(self, tm: &mut Tm) {
        let (hour, minute, second) = self.signed_components();
        tm.hour += hour;
        tm.minute += minute;
        tm.second += second;
    }

    fn signed_components(self) -> (i32, i32, i32) {
        let sign = if self.is_negative() { -1 } else { 1 };
        (
            sign * i32::from(self.hour()),
            sign * i32::from(self.minute()),
            sign * i32::from(self.second()),
        )
    }
}

/// Parses `[+|-]H[:M[:S]]` from the current position of the cursor.
///
/// Upon success, the cursor is positioned immediately after the time. The
/// caller decides whether anything may follow it.
pub(crate) fn parse_hms(
    cursor: &Cursor<'_>,
    max_hour: i16,
) -> Result<TimeOfDay, Error> {
    let sign = i32::from(cursor.parse_optional_sign()?);
    let hour = cursor.parse_number_upto("hour", 3)?;
    if hour > i32::from(max_hour) {
        return Err(Error::range("hour", hour, 0, max_hour));
    }
    let (mut minute, mut second) = (0, 0);
    if cursor.maybe_byte() == Some(b':') {
        if !cursor.bump() {
            return Err(Error::from(E::IncompleteTime { missing: "minutes" }));
        }
        minute = cursor.parse_number_upto("minute", 2)?;
        if minute > 59 {
            return Err(Error::range("minute", minute, 0, 59));
        }
        if cursor.maybe_byte() == Some(b':') {
            if !cursor.bump() {
                return Err(Error::from(E::IncompleteTime {
                    missing: "seconds",
                }));
            }
            second = cursor.parse_number_upto("second", 2)?;
            if second > 59 {
                return Err(Error::range("second", second, 0, 59));
            }
        }
    }
    Ok(TimeOfDay::from_seconds(sign * (hour * 3600 + minute * 60 + second)))
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(input: &str) -> Result<TimeOfDay, Error> {
        TimeOfDay::parse_strict(input)
    }
}

impl core::fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl core::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}:{:02}:{:02}", self.hour(), self.minute(), self.second())
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &TimeOfDay) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &TimeOfDay) -> core::cmp::Ordering {
        self.to_seconds().cmp(&other.to_seconds())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TimeOfDay {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TimeOfDay {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<TimeOfDay, D::Error> {
        use serde::de;

        struct TimeOfDayVisitor;

        impl<'de> de::Visitor<'de> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a time of day string like `2:00:00`")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<TimeOfDay, E> {
                TimeOfDay::parse_strict(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(TimeOfDayVisitor)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for TimeOfDay {
    fn arbitrary(g: &mut quickcheck::Gen) -> TimeOfDay {
        let seconds = i32::arbitrary(g);
        TimeOfDay::from_seconds(seconds % (MAX_SECONDS + 1))
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = TimeOfDay>> {
        alloc::boxed::Box::new(
            self.to_seconds().shrink().map(TimeOfDay::from_seconds),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn parse_forms() {
        let p = |s: &str| TimeOfDay::parse_strict(s).unwrap().to_string();
        assert_eq!(p("2"), "2:00:00");
        assert_eq!(p("2:0"), "2:00:00");
        assert_eq!(p("02:30"), "2:30:00");
        assert_eq!(p("2:30:15"), "2:30:15");
        assert_eq!(p("+5"), "5:00:00");
        assert_eq!(p("-5"), "-5:00:00");
        assert_eq!(p("-0:30"), "-0:30:00");
        assert_eq!(p("-0:00:01"), "-0:00:01");
        assert_eq!(p("167:59:59"), "167:59:59");
        assert_eq!(p("-0"), "0:00:00");
    }

    #[test]
    fn parse_errors() {
        let e = |s: &str| TimeOfDay::parse_strict(s).unwrap_err();
        insta::assert_snapshot!(
            e(""),
            @"expected time of day in `H[:MM[:SS]]` form, but found empty input",
        );
        insta::assert_snapshot!(
            e("x"),
            @"expected one or more digits for hour, but found `x`",
        );
        insta::assert_snapshot!(
            e("2:"),
            @"incomplete time of day, expected minutes after `:`",
        );
        insta::assert_snapshot!(
            e("2:60"),
            @"parameter 'minute' with value 60 is not in the required range of 0..=59",
        );
        insta::assert_snapshot!(
            e("168"),
            @"parameter 'hour' with value 168 is not in the required range of 0..=167",
        );
        insta::assert_snapshot!(
            e("2:00x"),
            @"parsed time of day, but found unexpected trailing `x`",
        );
        insta::assert_snapshot!(
            e("-"),
            @"expected digit after sign, but found end of input",
        );
        assert!(e("").is_invalid_parameter());
        assert!(e("2:60").is_range());
    }

    #[test]
    fn tolerant_parse_defaults_to_zero() {
        let _ = env_logger::try_init();

        assert_eq!(TimeOfDay::parse("garbage"), TimeOfDay::ZERO);
        assert_eq!(TimeOfDay::parse(""), TimeOfDay::ZERO);
        assert_eq!(TimeOfDay::parse("25:61"), TimeOfDay::ZERO);
        assert_eq!(TimeOfDay::parse("1:30").to_seconds(), 5400);
    }

    #[test]
    fn seconds() {
        assert_eq!(TimeOfDay::new(-5, 30, 0).unwrap().to_seconds(), -19800);
        assert_eq!(TimeOfDay::from_seconds(-19800).to_string(), "-5:30:00");
        assert_eq!(TimeOfDay::from_seconds(i32::MAX).to_string(), "167:59:59");
        assert_eq!(
            TimeOfDay::from_seconds(i32::MIN).to_string(),
            "-167:59:59",
        );
        assert!(TimeOfDay::new(-1, 0, 0).unwrap() < TimeOfDay::ZERO);
        assert!(TimeOfDay::constant(23, 0, 0) > TimeOfDay::constant(2, 0, 0));
    }

    #[test]
    fn tm_interop() {
        let mut tm = Tm { year: 2021, month: 3, day: 14, ..Tm::default() };
        TimeOfDay::constant(13, 5, 9).apply_to(&mut tm);
        assert_eq!((tm.hour, tm.minute, tm.second), (13, 5, 9));
        assert_eq!(TimeOfDay::from_tm(&tm), TimeOfDay::constant(13, 5, 9));

        TimeOfDay::constant(12, 0, 0).adjust_tm(&mut tm);
        assert_eq!(tm.hour, 25);
        tm.normalize();
        assert_eq!(tm.to_iso_string(' '), "2021-03-15 01:05:09");

        TimeOfDay::from_seconds(-60).apply_to(&mut tm);
        tm.normalize();
        assert_eq!(tm.to_iso_string(' '), "2021-03-14 23:59:00");
    }

    quickcheck::quickcheck! {
        fn prop_seconds_roundtrip(time: TimeOfDay) -> bool {
            TimeOfDay::from_seconds(time.to_seconds()) == time
        }

        fn prop_display_parses(time: TimeOfDay) -> bool {
            TimeOfDay::parse_strict(&time.to_string()).ok() == Some(time)
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_string() {
        let time = TimeOfDay::from_seconds(-18000);
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"-5:00:00\"");
        let got: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(got, time);
        assert!(serde_json::from_str::<TimeOfDay>("\"5:99\"").is_err());
    }
}
