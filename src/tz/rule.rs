use core::str::FromStr;

use crate::{
    calendar::{self, Tm},
    civil::{time::parse_hms, TimeOfDay, Weekday},
    error::{tz::Error as E, Error},
    util::parse::Cursor,
};

/// The transition time used when a rule doesn't specify one.
const DEFAULT_TIME: TimeOfDay = TimeOfDay::constant(2, 0, 0);

/// A DST transition rule in POSIX `Mm.w.d[/time]` form.
///
/// A rule names a day relative to a month, for example "the second Sunday
/// in March" (`M3.2.0`), and a local wall clock time on that day at which
/// the transition happens (`2:00:00` when omitted).
///
/// The week is in `1..=5`, where `5` means "the last such weekday in the
/// month," regardless of whether the month has four or five of them.
///
/// Julian day forms (`Jn` and `n`) are not supported.
///
/// # Example
///
/// ```
/// use civiltz::{civil::TimeOfDay, tz::TransitionRule};
///
/// let rule: TransitionRule = "M3.2.0".parse()?;
/// assert_eq!(rule.date_in(2021), (3, 14));
/// assert_eq!(rule.to_string(), "M3.2.0/2:00:00");
///
/// // 2am in a zone 5 hours behind UTC is 7am UTC.
/// let utc = rule.calculate(2021, TimeOfDay::parse("5"));
/// assert_eq!(utc, 1615705200);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TransitionRule {
    month: i8,
    week: i8,
    weekday: Weekday,
    time: TimeOfDay,
}

impl TransitionRule {
    /// Creates a new transition rule.
    ///
    /// # Errors
    ///
    /// This returns an error when `month` is not in `1..=12` or when
    /// `week` is not in `1..=5`.
    pub fn new(
        month: i8,
        week: i8,
        weekday: Weekday,
        time: TimeOfDay,
    ) -> Result<TransitionRule, Error> {
        if !(1 <= month && month <= 12) {
            return Err(Error::range("month", month, 1, 12));
        }
        if !(1 <= week && week <= 5) {
            return Err(Error::range("week", week, 1, 5));
        }
        Ok(TransitionRule { month, week, weekday, time })
    }

    /// Parses a rule in `Mm.w.d[/time]` form. The entire input must be a
    /// rule.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is not a valid rule or has
    /// trailing input.
    pub fn parse(input: &str) -> Result<TransitionRule, Error> {
        let cursor = Cursor::new(input);
        let rule = parse_rule(&cursor)?;
        if let Some(found) = cursor.maybe_byte() {
            return Err(Error::from(E::TrailingInput { found }));
        }
        Ok(rule)
    }

    /// The month of the transition, in `1..=12`.
    pub fn month(&self) -> i8 {
        self.month
    }

    /// The week of the month, in `1..=5`. `5` means the last week.
    pub fn week(&self) -> i8 {
        self.week
    }

    /// The day of the week of the transition.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// The local wall clock time of the transition. This may be negative
    /// or beyond `24:00:00`.
    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns the `(month, day)` this rule selects in the given year.
    pub fn date_in(&self, year: i32) -> (i32, i32) {
        let year = year.clamp(calendar::MIN_YEAR, calendar::MAX_YEAR);
        let month = i32::from(self.month);
        let first =
            calendar::weekday_of(calendar::days_from_civil(year, month, 1));
        let target = i32::from(self.weekday.to_sunday_zero_offset());
        let mut day = 1 + (target - first).rem_euclid(7);
        day += 7 * (i32::from(self.week) - 1);
        if day > calendar::days_in_month(year, month) {
            // Only possible for week 5, which means "last."
            day -= 7;
        }
        (month, day)
    }

    /// Returns the UTC instant at which this rule takes effect in `year`.
    ///
    /// `utc_offset_hint` is the offset in effect just before the
    /// transition, using the POSIX sign convention. That is, it is positive
    /// for zones west of Greenwich and is added to local time to get UTC.
    pub fn calculate(&self, year: i32, utc_offset_hint: TimeOfDay) -> i64 {
        let (month, day) = self.date_in(year);
        let year = year.clamp(calendar::MIN_YEAR, calendar::MAX_YEAR);
        let midnight = calendar::days_from_civil(year, month, day) * 86_400;
        let instant = midnight
            + i64::from(self.time.to_seconds())
            + i64::from(utc_offset_hint.to_seconds());
        trace!(
            "rule {} in {year} with offset hint {utc_offset_hint} \
             is at {instant}",
            self,
        );
        instant
    }

    /// Like [`TransitionRule::calculate`], but also returns the UTC
    /// broken-down form of the instant.
    pub fn calculate_tm(
        &self,
        year: i32,
        utc_offset_hint: TimeOfDay,
    ) -> (i64, Tm) {
        let instant = self.calculate(year, utc_offset_hint);
        (instant, calendar::instant_to_tm(instant))
    }
}

/// Parses a `Mm.w.d[/time]` rule from the current position of the cursor.
///
/// Upon success, the cursor is positioned immediately after the rule.
pub(crate) fn parse_rule(
    cursor: &Cursor<'_>,
) -> Result<TransitionRule, Error> {
    match cursor.maybe_byte() {
        Some(b'M') => {}
        Some(b'J' | b'0'..=b'9') => {
            return Err(Error::from(E::UnsupportedJulianDay))
        }
        found => return Err(Error::from(E::ExpectedRuleMonth { found })),
    }
    cursor.bump();
    let month = cursor.parse_number_upto("month", 2)?;
    if !(1..=12).contains(&month) {
        return Err(Error::range("month", month, 1, 12));
    }
    expect_dot(cursor, "month")?;
    let week = cursor.parse_number_exact("week", 1)?;
    if !(1..=5).contains(&week) {
        return Err(Error::range("week", week, 1, 5));
    }
    expect_dot(cursor, "week")?;
    let weekday = cursor.parse_number_exact("weekday", 1)?;
    let weekday = Weekday::from_sunday_zero_offset(weekday as i8)?;
    let mut time = DEFAULT_TIME;
    if cursor.maybe_byte() == Some(b'/') {
        if !cursor.bump() {
            return Err(Error::from(E::ExpectedTimeAfterSlash));
        }
        time = parse_hms(cursor, 167)?;
    }
    Ok(TransitionRule { month: month as i8, week: week as i8, weekday, time })
}

fn expect_dot(cursor: &Cursor<'_>, after: &'static str) -> Result<(), Error> {
    let found = cursor.maybe_byte();
    if found != Some(b'.') {
        return Err(Error::from(E::ExpectedDot { after, found }));
    }
    cursor.bump();
    Ok(())
}

impl FromStr for TransitionRule {
    type Err = Error;

    fn from_str(input: &str) -> Result<TransitionRule, Error> {
        TransitionRule::parse(input)
    }
}

impl core::fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "M{}.{}.{}/{}",
            self.month,
            self.week,
            self.weekday.to_sunday_zero_offset(),
            self.time,
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TransitionRule {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TransitionRule {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<TransitionRule, D::Error> {
        use serde::de;

        struct TransitionRuleVisitor;

        impl<'de> de::Visitor<'de> for TransitionRuleVisitor {
            type Value = TransitionRule;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a transition rule string like `M3.2.0/2`")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<TransitionRule, E> {
                TransitionRule::parse(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(TransitionRuleVisitor)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for TransitionRule {
    fn arbitrary(g: &mut quickcheck::Gen) -> TransitionRule {
        let month = (u8::arbitrary(g) % 12 + 1) as i8;
        let week = (u8::arbitrary(g) % 5 + 1) as i8;
        let weekday = Weekday::arbitrary(g);
        let hour = (u8::arbitrary(g) % 25) as i32;
        let time = TimeOfDay::from_seconds(hour * 3600);
        TransitionRule { month, week, weekday, time }
    }
}
