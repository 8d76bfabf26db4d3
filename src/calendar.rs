/*!
Proleptic Gregorian calendar arithmetic on plain integers.

This module is the foundation that everything else in this crate is built
on. It converts between Unix timestamps (seconds since `1970-01-01T00:00:00Z`,
ignoring leap seconds) and broken-down calendar fields, represented by
[`Tm`].

All conversions are total over the supported range of years, `-9999..=9999`.
Inputs outside of that range are clamped to it rather than rejected.

# Example

```
use civiltz::calendar::{self, Tm};

let tm = calendar::parse_iso("2021-03-14 02:30:00")?;
assert_eq!(tm.wday, 0); // a Sunday
assert_eq!(calendar::tm_to_instant(&tm), 1615689000);
assert_eq!(calendar::time_to_string(1615689000, 'T'), "2021-03-14T02:30:00");

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use alloc::{format, string::String};

use crate::{
    error::{civil::Error as E, Error},
    util::parse::Cursor,
};

/// The minimum supported Unix timestamp, `-9999-01-01T00:00:00Z`.
pub const MIN_INSTANT: i64 = -377_705_116_800;

/// The maximum supported Unix timestamp, `9999-12-31T23:59:59Z`.
pub const MAX_INSTANT: i64 = 253_402_300_799;

/// The minimum supported year.
pub const MIN_YEAR: i32 = -9999;

/// The maximum supported year.
pub const MAX_YEAR: i32 = 9999;

const SECONDS_PER_DAY: i64 = 86_400;

/// Broken-down calendar time, in the style of C's `struct tm`.
///
/// Unlike C's `struct tm`, the year is not offset from 1900 and the month
/// is one based (`1..=12`). The day of the week is zero based starting at
/// Sunday (`0..=6`) and the day of the year is zero based (`0..=365`).
///
/// A `Tm` is a passive bag of fields. It may temporarily hold out-of-range
/// values (for example, after adding days to `day`). Call
/// [`Tm::normalize`] to bring every field back into its canonical range.
/// Functions that consume a `Tm`, like [`tm_to_instant`], accept
/// out-of-range fields and interpret them the way C's `timegm` does.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Tm {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub wday: i32,
    pub yday: i32,
}

impl Default for Tm {
    /// Returns the Unix epoch, `1970-01-01 00:00:00`, which was a Thursday.
    fn default() -> Tm {
        Tm {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            wday: 4,
            yday: 0,
        }
    }
}

impl Tm {
    /// Brings every field into its canonical range, carrying overflow into
    /// the next larger unit. `wday` and `yday` are recomputed from the
    /// date and their prior values are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::calendar::Tm;
    ///
    /// let mut tm = Tm { year: 2021, month: 12, day: 32, ..Tm::default() };
    /// tm.normalize();
    /// assert_eq!((tm.year, tm.month, tm.day), (2022, 1, 1));
    /// assert_eq!(tm.wday, 6);
    /// ```
    pub fn normalize(&mut self) {
        *self = instant_to_tm(tm_to_instant(self));
    }

    /// Renders this time as `YYYY-MM-DD<separator>HH:MM:SS`.
    ///
    /// Fields are rendered as they are, without normalization.
    pub fn to_iso_string(&self, separator: char) -> String {
        let year = if self.year < 0 {
            format!("-{:04}", self.year.unsigned_abs())
        } else {
            format!("{:04}", self.year)
        };
        format!(
            "{year}-{:02}-{:02}{separator}{:02}:{:02}:{:02}",
            self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Return the number of days in the given month (`1..=12`).
///
/// Months outside of `1..=12` are treated as 31 day months.
#[inline]
pub const fn days_in_month(year: i32, month: i32) -> i32 {
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else if 1 <= month && month <= 12 {
        30 | (month ^ month >> 3)
    } else {
        31
    }
}

/// Converts a Gregorian date to days since the Unix epoch.
///
/// The date must be valid and in the supported range of years.
///
/// This is Neri-Schneider. There's no branching or divisions.
#[inline]
#[allow(non_upper_case_globals, non_snake_case)]
pub const fn days_from_civil(year: i32, month: i32, day: i32) -> i64 {
    const s: u32 = 82;
    const K: u32 = 719468 + 146097 * s;
    const L: u32 = 400 * s;

    let year = year as u32;
    let month = month as u32;
    let day = day as u32;

    let J = month <= 2;
    let Y = year.wrapping_add(L).wrapping_sub(J as u32);
    let M = if J { month + 12 } else { month };
    let D = day.wrapping_sub(1);
    let C = Y / 100;

    let y_star = 1461 * Y / 4 - C + C / 4;
    let m_star = (979 * M - 2919) / 32;
    let N = y_star + m_star + D;

    let N_U = N.wrapping_sub(K);
    N_U as i32 as i64
}

/// Converts days since the Unix epoch to a Gregorian `(year, month, day)`.
///
/// The number of days must correspond to a date in the supported range of
/// years.
///
/// This is Neri-Schneider. There's no branching or divisions.
#[inline]
#[allow(non_upper_case_globals, non_snake_case)]
pub const fn civil_from_days(days: i64) -> (i32, i32, i32) {
    const s: u32 = 82;
    const K: u32 = 719468 + 146097 * s;
    const L: u32 = 400 * s;

    let N_U = days as i32 as u32;
    let N = N_U.wrapping_add(K);

    let N_1 = 4 * N + 3;
    let C = N_1 / 146097;
    let N_C = (N_1 % 146097) / 4;

    let N_2 = 4 * N_C + 3;
    let P_2 = 2939745 * (N_2 as u64);
    let Z = (P_2 / 4294967296) as u32;
    let N_Y = (P_2 % 4294967296) as u32 / 2939745 / 4;
    let Y = 100 * C + Z;

    let N_3 = 2141 * N_Y + 197913;
    let M = N_3 / 65536;
    let D = (N_3 % 65536) / 2141;

    let J = N_Y >= 306;
    let year = Y.wrapping_sub(L).wrapping_add(J as u32) as i32;
    let month = (if J { M - 12 } else { M }) as i32;
    let day = (D + 1) as i32;
    (year, month, day)
}

/// Returns the day of the week for the given number of days since the Unix
/// epoch, with `0` corresponding to Sunday.
#[inline]
pub const fn weekday_of(days: i64) -> i32 {
    // 1970-01-01 was a Thursday.
    (days + 4).rem_euclid(7) as i32
}

/// Converts broken-down UTC time to a Unix timestamp.
///
/// This has the semantics of C's `timegm`: fields outside of their normal
/// ranges are carried into the next unit (so `day: 0` means the last day
/// of the previous month) and `wday`/`yday` are ignored.
pub fn tm_to_instant(tm: &Tm) -> i64 {
    let mut year = i64::from(tm.year);
    let mut month0 = i64::from(tm.month) - 1;
    year += month0.div_euclid(12);
    month0 = month0.rem_euclid(12);
    // Keep the day arithmetic below from wrapping. Anything this far out
    // is clamped again when converted back.
    let year = year.clamp(i64::from(MIN_YEAR) - 1, i64::from(MAX_YEAR) + 1);
    let days = days_from_civil(year as i32, month0 as i32 + 1, 1)
        + (i64::from(tm.day) - 1);
    days * SECONDS_PER_DAY
        + i64::from(tm.hour) * 3600
        + i64::from(tm.minute) * 60
        + i64::from(tm.second)
}

/// Converts a Unix timestamp to broken-down UTC time.
///
/// Timestamps outside of [`MIN_INSTANT`]`..=`[`MAX_INSTANT`] are clamped.
pub fn instant_to_tm(instant: i64) -> Tm {
    let instant = instant.clamp(MIN_INSTANT, MAX_INSTANT);
    let days = instant.div_euclid(SECONDS_PER_DAY);
    let secs = instant.rem_euclid(SECONDS_PER_DAY) as i32;
    let (year, month, day) = civil_from_days(days);
    Tm {
        year,
        month,
        day,
        hour: secs / 3600,
        minute: secs % 3600 / 60,
        second: secs % 60,
        wday: weekday_of(days),
        yday: (days - days_from_civil(year, 1, 1)) as i32,
    }
}

/// Parses `YYYY-MM-DD?HH:MM:SS` into broken-down time.
///
/// `?` may be any single byte that isn't an ASCII digit (typically `T` or
/// a space). The year may be preceded by a sign. Anything after the seconds
/// is ignored, which permits trailing fractional seconds or offsets that
/// this crate has no use for.
///
/// The `wday` and `yday` fields of the returned value are filled in.
///
/// # Errors
///
/// This returns an error when the input is shorter than the fixed format,
/// when a field is not made of digits, or when a field is out of range
/// (for example, February 30).
///
/// # Example
///
/// ```
/// use civiltz::calendar;
///
/// let tm = calendar::parse_iso("2021-11-07T01:30:00Z")?;
/// assert_eq!((tm.year, tm.month, tm.day), (2021, 11, 7));
/// assert_eq!((tm.hour, tm.minute, tm.second), (1, 30, 0));
///
/// assert!(calendar::parse_iso("2021-02-30 00:00:00").is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_iso(input: &str) -> Result<Tm, Error> {
    let cursor = Cursor::new(input);
    let sign = cursor.parse_optional_sign()?;
    let len = cursor.remaining().len();
    if len < 19 {
        return Err(Error::from(E::IsoTooShort { len }));
    }
    let year = cursor.parse_number_exact("year", 4)? * i32::from(sign);
    expect_separator(&cursor, b'-')?;
    let month = cursor.parse_number_exact("month", 2)?;
    expect_separator(&cursor, b'-')?;
    let day = cursor.parse_number_exact("day", 2)?;
    match cursor.maybe_byte() {
        Some(b'0'..=b'9') => return Err(Error::from(E::IsoDigitSeparator)),
        _ => {
            cursor.bump();
        }
    }
    let hour = cursor.parse_number_exact("hour", 2)?;
    expect_separator(&cursor, b':')?;
    let minute = cursor.parse_number_exact("minute", 2)?;
    expect_separator(&cursor, b':')?;
    let second = cursor.parse_number_exact("second", 2)?;

    if !(1..=12).contains(&month) {
        return Err(Error::range("month", month, 1, 12));
    }
    let max_day = days_in_month(year, month);
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
    let mut tm = Tm { year, month, day, hour, minute, second, wday: 0, yday: 0 };
    tm.normalize();
    Ok(tm)
}

fn expect_separator(cursor: &Cursor<'_>, expected: u8) -> Result<(), Error> {
    let found = cursor.maybe_byte();
    if found != Some(expected) {
        return Err(Error::from(E::IsoExpectedSeparator { expected, found }));
    }
    cursor.bump();
    Ok(())
}

/// Parses `YYYY-MM-DD?HH:MM:SS`, interpreted as UTC, into a Unix timestamp.
///
/// See [`parse_iso`] for the accepted format.
pub fn string_to_time(input: &str) -> Result<i64, Error> {
    parse_iso(input).map(|tm| tm_to_instant(&tm))
}

/// Renders a Unix timestamp as UTC `YYYY-MM-DD<separator>HH:MM:SS`.
///
/// # Example
///
/// ```
/// use civiltz::calendar;
///
/// assert_eq!(calendar::time_to_string(0, ' '), "1970-01-01 00:00:00");
/// assert_eq!(
///     calendar::time_to_string(1609526756, 'T'),
///     "2021-01-01T18:45:56",
/// );
/// ```
pub fn time_to_string(instant: i64, separator: char) -> String {
    instant_to_tm(instant).to_iso_string(separator)
}

/// Renders every field of a `Tm` for debugging.
pub fn format_tm(tm: &Tm) -> String {
    format!(
        "year={} month={} day={} hour={} minute={} second={} \
         wday={} yday={}",
        tm.year,
        tm.month,
        tm.day,
        tm.hour,
        tm.minute,
        tm.second,
        tm.wday,
        tm.yday,
    )
}

#[cfg(test)]
impl quickcheck::Arbitrary for Tm {
    fn arbitrary(g: &mut quickcheck::Gen) -> Tm {
        let instant = i64::arbitrary(g);
        let span = MAX_INSTANT - MIN_INSTANT + 1;
        instant_to_tm(MIN_INSTANT + instant.rem_euclid(span))
    }
}
