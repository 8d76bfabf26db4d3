/*!
Support for `strftime` style formatting.

A format string is copied to the output, except for conversion
specifications. These start with a `%` followed by one directive byte.
The supported directives are:

| Directive | Example | Description |
| --------- | ------- | ----------- |
| `%%` | `%` | A literal `%`. |
| `%A`, `%a` | `Sunday`, `Sun` | The full and abbreviated weekday. |
| `%B`, `%b`, `%h` | `June`, `Jun`, `Jun` | The full and abbreviated month name. |
| `%C` | `20` | The century of the year. |
| `%c` | `Sun Jul 14 17:31:59 2024` | Equivalent to `%a %b %e %H:%M:%S %Y`. |
| `%D` | `07/14/24` | Equivalent to `%m/%d/%y`. |
| `%d`, `%e` | `01`, ` 1` | The day of the month. `%d` is zero padded, `%e` is space padded. |
| `%F` | `2024-07-14` | Equivalent to `%Y-%m-%d`. |
| `%H` | `08` | The hour in a 24 hour clock. Zero padded. |
| `%I` | `08` | The hour in a 12 hour clock. Zero padded. |
| `%j` | `001` | The day of the year, in `1..=366`. Zero padded to 3 digits. |
| `%k` | ` 8` | The hour in a 24 hour clock. Space padded. |
| `%l` | ` 8` | The hour in a 12 hour clock. Space padded. |
| `%M` | `04` | The minute. Zero padded. |
| `%m` | `01` | The month. Zero padded. |
| `%n`, `%t` | | A newline and a tab. |
| `%p` | `AM` | Whether the time is in the AM or PM. |
| `%R` | `23:30` | Equivalent to `%H:%M`. |
| `%r` | `08:30:00 AM` | Equivalent to `%I:%M:%S %p`. |
| `%S` | `59` | The second. Zero padded. |
| `%s` | `1737396540` | A Unix timestamp, in seconds. |
| `%T` | `23:30:59` | Equivalent to `%H:%M:%S`. |
| `%u` | `7` | The day of the week, with Monday at `1`. |
| `%w` | `0` | The day of the week, with Sunday at `0`. |
| `%Y` | `2024` | The year, zero padded to at least 4 digits. |
| `%y` | `24` | The year modulo 100. Zero padded. |
| `%Z` | `EDT` | The time zone abbreviation. |
| `%z` | `-04:00` | The offset from UTC, positive east. |

Unlike C's `%z`, the offset is always rendered with a colon.

Any other directive, or a `%` at the end of the format string, is an
error.
*/

use alloc::string::String;

use crate::{
    calendar::{self, Tm},
    civil::{CivilTime, Weekday},
    error::{fmt::Error as E, Error},
    tz::TimeConverter,
};

/// Formats a broken down time with a `strftime` style format string.
///
/// Anything that converts into a [`BrokenDownTime`] can be formatted,
/// including [`CivilTime`] and [`&TimeConverter`](TimeConverter).
///
/// # Errors
///
/// This returns an error when the format string has an unrecognized
/// directive or ends with a `%`.
///
/// # Example
///
/// ```
/// use civiltz::{civil::CivilTime, fmt::strtime};
///
/// let ct: CivilTime = "2024-07-14 17:31:59".parse()?;
/// assert_eq!(strtime::format("%A, %B %e", ct)?, "Sunday, July 14");
/// assert_eq!(strtime::format("%l:%M %p", ct)?, " 5:31 PM");
///
/// // Flags and widths aren't supported.
/// assert!(strtime::format("%-d", ct).is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn format(
    format: &str,
    broken_down_time: impl Into<BrokenDownTime>,
) -> Result<String, Error> {
    let broken_down_time: BrokenDownTime = broken_down_time.into();

    let mut buf = String::new();
    broken_down_time.format(format, &mut buf)?;
    Ok(buf)
}

/// A broken down time, along with the offset and abbreviation of its
/// zone, ready to be formatted.
///
/// By default, the zone is UTC. Converting from a [`TimeConverter`] uses the
/// zone in effect at the converter's instant.
#[derive(Clone, Debug)]
pub struct BrokenDownTime {
    tm: Tm,
    /// Seconds east of UTC.
    offset: i32,
    tzabbrev: String,
}

impl BrokenDownTime {
    /// Sets the offset rendered by `%z`, in seconds east of UTC. This is
    /// also used to compute `%s`.
    pub fn with_offset(self, seconds: i32) -> BrokenDownTime {
        BrokenDownTime { offset: seconds, ..self }
    }

    /// Sets the abbreviation rendered by `%Z`.
    pub fn with_tzabbrev(self, abbrev: &str) -> BrokenDownTime {
        BrokenDownTime { tzabbrev: String::from(abbrev), ..self }
    }

    pub fn tm(&self) -> &Tm {
        &self.tm
    }

    /// The Unix timestamp of this time, taking the offset into account.
    pub fn timestamp(&self) -> i64 {
        calendar::tm_to_instant(&self.tm) - i64::from(self.offset)
    }

    /// Formats this broken down time into the given writer.
    ///
    /// # Errors
    ///
    /// This returns an error when the format string is invalid or when
    /// writing fails.
    pub fn format<W: core::fmt::Write>(
        &self,
        format: &str,
        mut wtr: W,
    ) -> Result<(), Error> {
        let mut formatter = Formatter { fmt: format, tm: self, wtr: &mut wtr };
        formatter.format()
    }
}

impl From<Tm> for BrokenDownTime {
    fn from(mut tm: Tm) -> BrokenDownTime {
        tm.normalize();
        BrokenDownTime { tm, offset: 0, tzabbrev: String::from("UTC") }
    }
}

impl From<CivilTime> for BrokenDownTime {
    fn from(ct: CivilTime) -> BrokenDownTime {
        BrokenDownTime::from(*ct.tm())
    }
}

impl<'a> From<&'a TimeConverter> for BrokenDownTime {
    fn from(conv: &'a TimeConverter) -> BrokenDownTime {
        BrokenDownTime {
            tm: *conv.local().tm(),
            offset: conv.utc_offset_seconds(),
            tzabbrev: String::from(conv.zone_name()),
        }
    }
}

struct Formatter<'f, 't, 'w, W> {
    fmt: &'f str,
    tm: &'t BrokenDownTime,
    wtr: &'w mut W,
}

impl<'f, 't, 'w, W: core::fmt::Write> Formatter<'f, 't, 'w, W> {
    fn format(&mut self) -> Result<(), Error> {
        while !self.fmt.is_empty() {
            let fmt = self.fmt;
            let Some(percent) = fmt.find('%') else {
                self.write_str(fmt)?;
                break;
            };
            self.write_str(&fmt[..percent])?;
            let rest = &fmt[percent + 1..];
            let Some(&directive) = rest.as_bytes().first() else {
                return Err(E::UnexpectedEndAfterPercent.into());
            };
            // Every directive is ASCII, so slicing past it is fine once
            // it has been recognized.
            self.format_one(directive)?;
            self.fmt = &rest[1..];
        }
        Ok(())
    }

    fn format_one(&mut self, directive: u8) -> Result<(), Error> {
        let bdt = self.tm;
        let tm = &bdt.tm;
        match directive {
            b'%' => self.write_str("%"),
            b'A' => self.write_str(weekday(tm).long_name()),
            b'a' => self.write_str(weekday(tm).short_name()),
            b'B' => self.write_str(month_name_full(tm.month)),
            b'b' | b'h' => self.write_str(month_name_abbrev(tm.month)),
            b'C' => self.write_int(b'0', 2, tm.year.div_euclid(100)),
            b'c' => self.format_nested("%a %b %e %H:%M:%S %Y"),
            b'D' => self.format_nested("%m/%d/%y"),
            b'd' => self.write_int(b'0', 2, tm.day),
            b'e' => self.write_int(b' ', 2, tm.day),
            b'F' => self.format_nested("%Y-%m-%d"),
            b'H' => self.write_int(b'0', 2, tm.hour),
            b'I' => self.write_int(b'0', 2, hour12(tm)),
            b'j' => self.write_int(b'0', 3, tm.yday + 1),
            b'k' => self.write_int(b' ', 2, tm.hour),
            b'l' => self.write_int(b' ', 2, hour12(tm)),
            b'M' => self.write_int(b'0', 2, tm.minute),
            b'm' => self.write_int(b'0', 2, tm.month),
            b'n' => self.write_str("\n"),
            b'p' => self.write_str(if tm.hour < 12 { "AM" } else { "PM" }),
            b'R' => self.format_nested("%H:%M"),
            b'r' => self.format_nested("%I:%M:%S %p"),
            b'S' => self.write_int(b'0', 2, tm.second),
            b's' => self.write_int(b'0', 1, bdt.timestamp()),
            b'T' => self.format_nested("%H:%M:%S"),
            b't' => self.write_str("\t"),
            b'u' => {
                self.write_int(b'0', 1, weekday(tm).to_monday_one_offset())
            }
            b'w' => self.write_int(b'0', 1, tm.wday),
            b'Y' => self.write_int(b'0', 4, tm.year),
            b'y' => self.write_int(b'0', 2, tm.year.rem_euclid(100)),
            b'Z' => self.write_str(&bdt.tzabbrev),
            b'z' => self.fmt_offset(),
            unk => Err(E::UnknownDirective { directive: unk }.into()),
        }
    }

    /// Formats one of the directives defined in terms of other directives.
    fn format_nested(&mut self, fmt: &'static str) -> Result<(), Error> {
        let mut nested = Formatter { fmt, tm: self.tm, wtr: &mut *self.wtr };
        nested.format()
    }

    /// %z
    fn fmt_offset(&mut self) -> Result<(), Error> {
        let offset = self.tm.offset;
        self.write_str(if offset < 0 { "-" } else { "+" })?;
        let seconds = offset.unsigned_abs();
        self.write_int(b'0', 2, seconds / 3600)?;
        self.write_str(":")?;
        self.write_int(b'0', 2, seconds % 3600 / 60)
    }

    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.wtr.write_str(s).map_err(|_| E::WriteFailed.into())
    }

    /// Writes an integer padded to `width` with `pad`, which is either
    /// `b'0'` or `b' '`. With zero padding, the sign doesn't count toward
    /// the width.
    fn write_int(
        &mut self,
        pad: u8,
        width: usize,
        n: impl Into<i64>,
    ) -> Result<(), Error> {
        let n: i64 = n.into();
        let abs = n.unsigned_abs();
        let result = if pad == b'0' {
            if n < 0 {
                write!(self.wtr, "-{abs:0width$}")
            } else {
                write!(self.wtr, "{abs:0width$}")
            }
        } else {
            write!(self.wtr, "{n:width$}")
        };
        result.map_err(|_| E::WriteFailed.into())
    }
}

fn weekday(tm: &Tm) -> Weekday {
    Weekday::from_zero_offset_unchecked(tm.wday.rem_euclid(7) as i8)
}

fn hour12(tm: &Tm) -> i32 {
    match tm.hour % 12 {
        0 => 12,
        hour => hour,
    }
}

/// Returns the "full" month name.
fn month_name_full(month: i32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

/// Returns an abbreviated month name.
fn month_name_abbrev(month: i32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::tz::TimeZoneSpec;

    use super::*;

    fn civil(s: &str) -> CivilTime {
        CivilTime::parse_iso(s).unwrap()
    }

    #[test]
    fn every_directive() {
        let ct = civil("2021-03-04 09:05:09");
        insta::assert_snapshot!(
            format("%a|%A|%b|%B|%C|%d|%D|%e|%F|%h|%H|%I|%j|%k|%l", ct).unwrap(),
            @"Thu|Thursday|Mar|March|20|04|03/04/21| 4|2021-03-04|Mar|09|09|063| 9| 9",
        );
        insta::assert_snapshot!(
            format("%m|%M|%p|%r|%R|%S|%T|%u|%w|%y|%Y|%Z|%z|%%", ct).unwrap(),
            @"03|05|AM|09:05:09 AM|09:05|09|09:05:09|4|4|21|2021|UTC|+00:00|%",
        );
        insta::assert_snapshot!(
            format("%c", ct).unwrap(),
            @"Thu Mar  4 09:05:09 2021",
        );
        assert_eq!(format("a%nb%tc", ct).unwrap(), "a\nb\tc");
    }

    #[test]
    fn afternoon_and_midnight() {
        let ct = civil("2024-07-14 17:31:59");
        assert_eq!(format("%I %l %p %u %w", ct).unwrap(), "05  5 PM 7 0");
        let ct = civil("2024-07-14 00:00:00");
        assert_eq!(format("%I %k %r", ct).unwrap(), "12  0 12:00:00 AM");
    }

    #[test]
    fn years() {
        let ct = civil("0099-01-01 00:00:00");
        assert_eq!(format("%Y %y %C", ct).unwrap(), "0099 99 00");
        let ct = civil("-0044-03-15 00:00:00");
        assert_eq!(format("%Y %y %C", ct).unwrap(), "-0044 56 -01");
        let ct = civil("9999-12-31 23:59:59");
        assert_eq!(format("%Y %j", ct).unwrap(), "9999 365");
    }

    #[test]
    fn timestamps_and_offsets() {
        assert_eq!(format("%s", civil("1970-01-01 00:00:00")).unwrap(), "0");
        assert_eq!(
            format("%s", civil("2021-01-01 00:00:00")).unwrap(),
            "1609459200",
        );
        assert_eq!(format("%s", civil("1969-12-31 23:59:59")).unwrap(), "-1");

        let bdt = BrokenDownTime::from(civil("2021-01-01 00:00:00"))
            .with_offset(-(4 * 3600 + 30 * 60))
            .with_tzabbrev("VET");
        assert_eq!(bdt.timestamp(), 1609459200 + 16200);
        let mut out = String::new();
        bdt.format("%z %Z", &mut out).unwrap();
        assert_eq!(out, "-04:30 VET");

        let bdt = BrokenDownTime::from(civil("2021-01-01 00:00:00"))
            .with_offset(5 * 3600 + 45 * 60);
        assert_eq!(format("%z", bdt).unwrap(), "+05:45");
    }

    #[test]
    fn from_converter() {
        let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0,M11.1.0");
        let t = calendar::string_to_time("2021-07-04T16:00:00").unwrap();
        let mut conv = TimeConverter::new().with_config(spec).with_time(t);
        conv.convert();
        assert_eq!(
            format("%F %T %Z %z %s", &conv).unwrap(),
            "2021-07-04 12:00:00 EDT -04:00 1625414400",
        );
    }

    #[test]
    fn literal_text() {
        let ct = civil("2021-03-04 09:05:09");
        assert_eq!(format("", ct).unwrap(), "");
        assert_eq!(format("no directives", ct).unwrap(), "no directives");
        assert_eq!(format("été %H", ct).unwrap(), "été 09");
    }

    #[test]
    fn errors() {
        let ct = civil("2021-03-04 09:05:09");
        insta::assert_snapshot!(
            format("%Q", ct).unwrap_err(),
            @"found unrecognized directive `%Q`",
        );
        insta::assert_snapshot!(
            format("abc %", ct).unwrap_err(),
            @"invalid format string, expected directive after `%`",
        );
        insta::assert_snapshot!(
            format("%é", ct).unwrap_err(),
            @r"found unrecognized directive `%\xC3`",
        );
        let err = format("%H%", ct).unwrap_err();
        assert!(err.to_string().contains("after `%`"));
    }
}
