/*!
Support for POSIX `TZ` strings.

A POSIX time zone string describes a standard time, an optional daylight
saving time and the rules for switching between the two, for example
`EST5EDT,M3.2.0,M11.1.0`. See the [POSIX documentation for the `TZ`
environment variable][posix-env] for the full grammar. This crate supports
the grammar with one exception: DST transition rules must use the
`Mm.w.d[/time]` form. The Julian day forms `Jn` and `n` are rejected.

Transition times may use the IANA v3 extension, which permits negative
hours and hours beyond `24`.

Offsets in a POSIX string are "backwards" from how offsets are usually
written: `EST5` means five hours *behind* UTC. [`TimeZoneSpec`] keeps this
convention for its offsets. That is, offsets are added to local time to
get UTC.

[posix-env]: https://pubs.opengroup.org/onlinepubs/9799919799/basedefs/V1_chap08.html#tag_08_03
*/

use core::str::FromStr;

use alloc::string::String;

use crate::{
    calendar,
    civil::{time::parse_hms, TimeOfDay},
    error::{tz::Error as E, Error, ErrorContext},
    tz::rule::{parse_rule, TransitionRule},
    util::parse::Cursor,
};

/// The maximum length of an abbreviation, in bytes.
const MAX_ABBREVIATION_LEN: usize = 30;

/// The transition time used when a rule doesn't specify one.
const DEFAULT_RULE_TIME: TimeOfDay = TimeOfDay::constant(2, 0, 0);

/// A parsed POSIX time zone specification.
///
/// This is the configuration used by a
/// [`TimeConverter`](crate::tz::TimeConverter). It is produced by parsing a
/// POSIX `TZ` string, either tolerantly with [`TimeZoneSpec::parse`] or
/// strictly with [`TimeZoneSpec::parse_strict`] (and `FromStr`).
///
/// A spec that failed to parse is *invalid*. An invalid spec behaves as
/// UTC with no DST everywhere in this crate, so a bad configuration string
/// degrades gracefully instead of failing. The fields that were parsed
/// before the failure are still available through the accessors, which is
/// useful for diagnostics.
///
/// # Example
///
/// ```
/// use civiltz::tz::TimeZoneSpec;
///
/// let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0,M11.1.0");
/// assert!(spec.is_valid());
/// assert!(spec.has_dst());
/// assert_eq!(spec.std_name(), "EST");
/// assert_eq!(spec.std_offset().to_seconds(), 5 * 3600);
/// assert_eq!(spec.dst_offset().to_seconds(), 4 * 3600);
///
/// let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0");
/// assert!(!spec.is_valid());
/// assert!(spec.is_z());
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct TimeZoneSpec {
    std_name: String,
    std_offset: TimeOfDay,
    dst_name: String,
    dst_offset: TimeOfDay,
    dst_start: Option<TransitionRule>,
    std_start: Option<TransitionRule>,
    valid: bool,
}

impl TimeZoneSpec {
    /// Returns the spec for UTC, equivalent to parsing `UTC0`.
    pub fn utc() -> TimeZoneSpec {
        TimeZoneSpec {
            std_name: String::from("UTC"),
            valid: true,
            ..TimeZoneSpec::default()
        }
    }

    /// Parses a POSIX `TZ` string, never failing.
    ///
    /// Parsing proceeds left to right and stops at the first error. The
    /// returned spec is then marked invalid (so it behaves as UTC), but
    /// the components parsed before the error are kept. The error is
    /// logged at `debug` level when the `logging` feature is enabled.
    ///
    /// Input following a complete string, such as the trailing newline
    /// of a line read from a file, is ignored (and logged). Use
    /// [`TimeZoneSpec::parse_strict`] to reject it.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::tz::TimeZoneSpec;
    ///
    /// let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0,M11.1.0\n");
    /// assert!(spec.is_valid());
    /// assert!(spec.has_dst());
    /// assert!(TimeZoneSpec::parse_strict("EST5EDT,M3.2.0,M11.1.0\n").is_err());
    /// ```
    pub fn parse(input: &str) -> TimeZoneSpec {
        let mut spec = TimeZoneSpec::default();
        let trimmed =
            input.trim_end_matches(|c: char| c.is_ascii_whitespace());
        let parser = Parser::new(trimmed);
        match parser.parse_prefix_into(&mut spec) {
            Ok(()) => {
                // Every byte of a complete string is ASCII.
                let _rest = input.get(parser.pos()..).unwrap_or("");
                if !_rest.is_empty() {
                    debug!(
                        "ignoring trailing input {_rest:?} after POSIX \
                         time zone string {input:?}",
                    );
                }
                spec.valid = true;
            }
            Err(_err) => {
                debug!("invalid POSIX time zone string {input:?}: {_err}");
                spec.valid = false;
            }
        }
        spec
    }

    /// Parses a POSIX `TZ` string, returning an error when it is invalid.
    ///
    /// # Errors
    ///
    /// This returns an error when the input doesn't match the POSIX `TZ`
    /// grammar (restricted to `Mm.w.d` rules), when a component is out of
    /// range or when there is trailing input.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::tz::TimeZoneSpec;
    ///
    /// let spec = TimeZoneSpec::parse_strict("CET-1CEST,M3.5.0,M10.5.0/3")?;
    /// assert_eq!(spec.dst_offset().to_seconds(), -2 * 3600);
    ///
    /// let err = TimeZoneSpec::parse_strict("CET-1CEST,M3.5.0,").unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "failed to parse end of DST transition rule: \
    ///      expected `M` at the beginning of a transition rule, \
    ///      but found end of input",
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse_strict(input: &str) -> Result<TimeZoneSpec, Error> {
        let mut spec = TimeZoneSpec::default();
        Parser::new(input).parse_into(&mut spec)?;
        spec.valid = true;
        Ok(spec)
    }

    /// The abbreviation for standard time, e.g., `EST`.
    pub fn std_name(&self) -> &str {
        &self.std_name
    }

    /// The standard time offset, positive west of UTC.
    pub fn std_offset(&self) -> TimeOfDay {
        self.std_offset
    }

    /// The abbreviation for DST, e.g., `EDT`. This is empty when the spec
    /// has no DST.
    pub fn dst_name(&self) -> &str {
        &self.dst_name
    }

    /// The DST offset, positive west of UTC. When the string names a DST
    /// abbreviation without an offset, this is one hour ahead of standard
    /// time.
    pub fn dst_offset(&self) -> TimeOfDay {
        self.dst_offset
    }

    /// The rule for the transition from standard time to DST.
    pub fn dst_start(&self) -> Option<TransitionRule> {
        self.dst_start
    }

    /// The rule for the transition from DST back to standard time.
    pub fn std_start(&self) -> Option<TransitionRule> {
        self.std_start
    }

    /// Whether the string this spec came from parsed successfully.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether this spec observes DST. This requires a valid spec with
    /// both transition rules.
    pub fn has_dst(&self) -> bool {
        self.valid && self.dst_start.is_some() && self.std_start.is_some()
    }

    /// Whether this spec behaves as UTC: it is either invalid, or it has no
    /// DST and a zero offset.
    pub fn is_z(&self) -> bool {
        !self.valid || (!self.has_dst() && self.std_offset == TimeOfDay::ZERO)
    }

    /// Returns the UTC instants of the DST start and standard time start
    /// transitions in the given year, or `None` when this spec has no DST.
    ///
    /// The DST start is computed with the standard offset in effect, and
    /// the standard time start with the DST offset in effect.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::{calendar, tz::TimeZoneSpec};
    ///
    /// let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0,M11.1.0");
    /// let (dst, std) = spec.transitions(2021).unwrap();
    /// assert_eq!(calendar::time_to_string(dst, 'T'), "2021-03-14T07:00:00");
    /// assert_eq!(calendar::time_to_string(std, 'T'), "2021-11-07T06:00:00");
    /// ```
    pub fn transitions(&self, year: i32) -> Option<(i64, i64)> {
        if !self.has_dst() {
            return None;
        }
        let dst_start = self.dst_start?.calculate(year, self.std_offset);
        let std_start = self.std_start?.calculate(year, self.dst_offset);
        Some((dst_start, std_start))
    }

    /// Returns the year used to select transitions for an instant: the
    /// year of that instant in standard local time.
    pub(crate) fn std_local_year(&self, instant: i64) -> i32 {
        let offset = i64::from(self.std_offset.to_seconds());
        calendar::instant_to_tm(instant.saturating_sub(offset)).year
    }

    /// Returns whether DST is in effect at the given UTC instant.
    ///
    /// This is always false for specs without DST, including invalid ones.
    pub fn is_dst_at(&self, instant: i64) -> bool {
        let year = self.std_local_year(instant);
        let Some((dst_start, std_start)) = self.transitions(year) else {
            return false;
        };
        if dst_start < std_start {
            dst_start <= instant && instant < std_start
        } else {
            !(std_start <= instant && instant < dst_start)
        }
    }

    /// Returns the offset in effect at the given UTC instant, positive west
    /// of UTC. This is zero for invalid specs.
    pub fn offset_at(&self, instant: i64) -> TimeOfDay {
        if !self.valid {
            TimeOfDay::ZERO
        } else if self.is_dst_at(instant) {
            self.dst_offset
        } else {
            self.std_offset
        }
    }

    /// Returns the abbreviation in effect at the given UTC instant. This
    /// is `UTC` for invalid specs.
    pub fn name_at(&self, instant: i64) -> &str {
        if !self.valid {
            "UTC"
        } else if self.is_dst_at(instant) {
            &self.dst_name
        } else {
            &self.std_name
        }
    }
}

impl FromStr for TimeZoneSpec {
    type Err = Error;

    fn from_str(input: &str) -> Result<TimeZoneSpec, Error> {
        TimeZoneSpec::parse_strict(input)
    }
}

/// Renders the spec as a normalized POSIX `TZ` string.
///
/// Offsets and transition times use the shortest form, default DST offsets
/// and default transition times are omitted, and abbreviations containing
/// anything other than ASCII letters are quoted. The output of a valid spec
/// parses back to an equal spec.
impl core::fmt::Display for TimeZoneSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{}{}",
            Abbreviation(&self.std_name),
            CompactTime(self.std_offset),
        )?;
        if self.dst_name.is_empty() {
            return Ok(());
        }
        write!(f, "{}", Abbreviation(&self.dst_name))?;
        let default_dst_offset =
            TimeOfDay::from_seconds(self.std_offset.to_seconds() - 3600);
        if self.dst_offset != default_dst_offset {
            write!(f, "{}", CompactTime(self.dst_offset))?;
        }
        if let (Some(start), Some(end)) = (self.dst_start, self.std_start) {
            write!(f, ",{},{}", CompactRule(start), CompactRule(end))?;
        }
        Ok(())
    }
}

struct Abbreviation<'a>(&'a str);

impl<'a> core::fmt::Display for Abbreviation<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0.bytes().all(|b| b.is_ascii_alphabetic()) {
            f.write_str(self.0)
        } else {
            write!(f, "<{}>", self.0)
        }
    }
}

/// Prints `[-]h[:mm[:ss]]`, dropping trailing zero components.
struct CompactTime(TimeOfDay);

impl core::fmt::Display for CompactTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let t = self.0;
        if t.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}", t.hour())?;
        if t.minute() != 0 || t.second() != 0 {
            write!(f, ":{:02}", t.minute())?;
            if t.second() != 0 {
                write!(f, ":{:02}", t.second())?;
            }
        }
        Ok(())
    }
}

struct CompactRule(TransitionRule);

impl core::fmt::Display for CompactRule {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let r = self.0;
        write!(
            f,
            "M{}.{}.{}",
            r.month(),
            r.week(),
            r.weekday().to_sunday_zero_offset(),
        )?;
        if r.time() != DEFAULT_RULE_TIME {
            write!(f, "/{}", CompactTime(r.time()))?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TimeZoneSpec {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TimeZoneSpec {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<TimeZoneSpec, D::Error> {
        use serde::de;

        struct TimeZoneSpecVisitor;

        impl<'de> de::Visitor<'de> for TimeZoneSpecVisitor {
            type Value = TimeZoneSpec;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a POSIX time zone string")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<TimeZoneSpec, E> {
                TimeZoneSpec::parse_strict(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(TimeZoneSpecVisitor)
    }
}

/// A parser for POSIX time zone strings.
///
/// Each routine assumes the cursor is positioned at the first byte of the
/// component it parses and, upon success, leaves it immediately after
/// that component.
#[derive(Debug)]
struct Parser<'s> {
    cursor: Cursor<'s>,
}

impl<'s> Parser<'s> {
    fn new(input: &'s str) -> Parser<'s> {
        Parser { cursor: Cursor::new(input) }
    }

    /// Parses the entire input into `spec`, filling in its fields as they
    /// are parsed. On error, the fields parsed so far are kept.
    ///
    /// This does not touch `spec.valid`.
    fn parse_into(&self, spec: &mut TimeZoneSpec) -> Result<(), Error> {
        self.parse_prefix_into(spec)?;
        if let Some(found) = self.cursor.maybe_byte() {
            return Err(Error::from(E::TrailingInput { found }));
        }
        Ok(())
    }

    /// Like `parse_into`, but stops after a complete `TZ` string without
    /// looking at what follows it.
    fn parse_prefix_into(&self, spec: &mut TimeZoneSpec) -> Result<(), Error> {
        spec.std_name =
            self.parse_abbreviation().context(E::FailedStdAbbreviation)?;
        spec.std_offset =
            self.parse_offset().context(E::FailedStdOffset)?;
        if matches!(
            self.cursor.maybe_byte(),
            Some(b) if b.is_ascii_alphabetic() || b == b'<',
        ) {
            self.parse_dst(spec)?;
        }
        Ok(())
    }

    /// Returns the position just after the last parsed byte.
    fn pos(&self) -> usize {
        self.cursor.pos()
    }

    /// Parses the DST abbreviation, its optional offset and its optional
    /// transition rules.
    fn parse_dst(&self, spec: &mut TimeZoneSpec) -> Result<(), Error> {
        spec.dst_name =
            self.parse_abbreviation().context(E::FailedDstAbbreviation)?;
        // The default is one hour ahead of standard time.
        spec.dst_offset =
            TimeOfDay::from_seconds(spec.std_offset.to_seconds() - 3600);
        if self.cursor.is_done() {
            return Ok(());
        }
        if self.cursor.maybe_byte() != Some(b',') {
            spec.dst_offset =
                self.parse_offset().context(E::FailedDstOffset)?;
            if self.cursor.is_done() {
                return Ok(());
            }
        }
        let found = self.cursor.maybe_byte();
        if found != Some(b',') {
            return Err(Error::from(E::ExpectedCommaAfterDst { found }));
        }
        if !self.cursor.bump() {
            return Err(Error::from(E::TrailingComma));
        }
        spec.dst_start =
            Some(parse_rule(&self.cursor).context(E::FailedRuleStart)?);
        if self.cursor.maybe_byte() != Some(b',') {
            return Err(Error::from(E::ExpectedSecondRule));
        }
        self.cursor.bump();
        spec.std_start =
            Some(parse_rule(&self.cursor).context(E::FailedRuleEnd)?);
        Ok(())
    }

    /// Parses a quoted or unquoted abbreviation of 3 to 30 bytes.
    fn parse_abbreviation(&self) -> Result<String, Error> {
        if self.cursor.maybe_byte() == Some(b'<') {
            self.cursor.bump();
            let name = self.parse_name(|b| {
                b.is_ascii_alphanumeric() || b == b'+' || b == b'-'
            })?;
            let found = self.cursor.maybe_byte();
            if found != Some(b'>') {
                return Err(Error::from(E::ExpectedEndQuote { found }));
            }
            self.cursor.bump();
            Ok(name)
        } else {
            self.parse_name(|b| b.is_ascii_alphabetic())
        }
    }

    fn parse_name(&self, allowed: impl Fn(u8) -> bool) -> Result<String, Error> {
        let start = self.cursor.pos();
        while let Some(byte) = self.cursor.maybe_byte() {
            if !allowed(byte) {
                break;
            }
            if self.cursor.pos() - start >= MAX_ABBREVIATION_LEN {
                return Err(Error::from(E::AbbreviationTooLong {
                    max: MAX_ABBREVIATION_LEN,
                }));
            }
            self.cursor.bump();
        }
        let name = self.cursor.since(start);
        if name.len() < 3 {
            return Err(Error::from(E::AbbreviationTooShort { len: name.len() }));
        }
        // Every allowed byte is ASCII.
        Ok(name.iter().map(|&b| char::from(b)).collect())
    }

    /// Parses `[+|-]hh[:mm[:ss]]` where the hour is at most 24.
    fn parse_offset(&self) -> Result<TimeOfDay, Error> {
        parse_hms(&self.cursor, 24)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for TimeZoneSpec {
    fn arbitrary(g: &mut quickcheck::Gen) -> TimeZoneSpec {
        const NAMES: &[&str] =
            &["EST", "EDT", "CET", "CEST", "AEST", "+0330", "-03", "UTC"];

        fn name(g: &mut quickcheck::Gen) -> String {
            String::from(*g.choose(NAMES).unwrap_or(&"UTC"))
        }

        fn offset(g: &mut quickcheck::Gen) -> TimeOfDay {
            let half_hours = i32::from(i8::arbitrary(g)) % 49;
            TimeOfDay::from_seconds(half_hours * 1800)
        }

        let mut spec = TimeZoneSpec {
            std_name: name(g),
            std_offset: offset(g),
            valid: true,
            ..TimeZoneSpec::default()
        };
        if bool::arbitrary(g) {
            spec.dst_name = name(g);
            spec.dst_offset = offset(g);
            if bool::arbitrary(g) {
                spec.dst_start = Some(TransitionRule::arbitrary(g));
                spec.std_start = Some(TransitionRule::arbitrary(g));
            }
        }
        spec
    }
}
