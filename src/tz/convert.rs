use alloc::string::String;

use crate::{
    calendar::{self, Tm},
    civil::{CivilTime, TimeOfDay, Weekday},
    error::Error,
    fmt,
    tz::TimeZoneSpec,
};

/// The number of days a forward search may look ahead before it gives up
/// on finding a better candidate. A time of day is always less than a
/// week in magnitude, so eight days always reaches a later instant.
const MAX_LOOKAHEAD_DAYS: i32 = 8;

/// Where an instant falls relative to the DST transitions of its year.
///
/// For zones where DST starts earlier in the year than it ends (the
/// northern hemisphere), the year is split into `BeforeDst`, `InDst` and
/// `AfterDst`. For zones where the order is reversed (the southern
/// hemisphere), DST spans the new year and the split is `BeforeStandard`,
/// `InStandard` and `AfterStandard`. Zones without DST are always `NoDst`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Position {
    /// Standard time, before DST starts this year.
    BeforeDst,
    /// Daylight saving time.
    InDst,
    /// Standard time, after DST ended this year.
    AfterDst,
    /// Daylight saving time, before it ends this year.
    BeforeStandard,
    /// Standard time.
    InStandard,
    /// Daylight saving time, after it started again this year.
    AfterStandard,
    /// The zone has no DST.
    NoDst,
}

impl Position {
    /// Returns true when this position is in daylight saving time.
    pub fn is_dst(self) -> bool {
        matches!(
            self,
            Position::InDst | Position::BeforeStandard | Position::AfterStandard
        )
    }
}

/// Converts between UTC instants and local civil time in one zone, and
/// navigates local time.
///
/// A converter holds a [`TimeZoneSpec`], a UTC instant (in seconds since
/// the Unix epoch) and everything derived from the two: the local
/// [`CivilTime`], the [`Position`] relative to this year's transitions and
/// the transition instants themselves. The derived state is refreshed by
/// [`TimeConverter::convert`], which every navigation operation calls for
/// you.
///
/// Navigation operations move the converter forward in local time. For
/// example, [`TimeConverter::next_day`] moves to the same wall clock time
/// on the next day, regardless of any DST transition in between. Local
/// times that don't exist or that occur twice are resolved as in
/// [`CivilTime::to_utc`]. Every `next_*` operation moves strictly forward,
/// except near the end of the supported range: targets past
/// [`calendar::MAX_INSTANT`] are clamped to it, so a converter already there
/// stays put.
///
/// # Example
///
/// ```
/// use civiltz::{calendar, civil::TimeOfDay, tz::{Position, TimeConverter, TimeZoneSpec}};
///
/// let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0/2:00:00,M11.1.0/2:00:00");
/// let start = calendar::string_to_time("2021-03-13T17:00:00")?;
/// let mut conv = TimeConverter::new().with_config(spec).with_time(start);
/// conv.convert();
/// assert_eq!(conv.local().to_string(), "2021-03-13 12:00:00");
/// assert_eq!(conv.position(), Position::BeforeDst);
///
/// // Noon the next day is only 23 hours later.
/// conv.next_day(None);
/// assert_eq!(conv.local().to_string(), "2021-03-14 12:00:00");
/// assert_eq!(conv.time() - start, 23 * 60 * 60);
/// assert_eq!(conv.zone_name(), "EDT");
///
/// conv.next_local_time(TimeOfDay::constant(8, 30, 0));
/// assert_eq!(conv.local().to_string(), "2021-03-15 08:30:00");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct TimeConverter {
    config: TimeZoneSpec,
    time: i64,
    local: CivilTime,
    position: Position,
    dst_start: i64,
    dst_start_utc: Tm,
    std_start: i64,
    std_start_utc: Tm,
}

impl TimeConverter {
    /// Creates a converter at the Unix epoch.
    ///
    /// The zone is the process-wide default set with [`crate::tz::set_default`]
    /// when the `std` feature is enabled, and UTC otherwise.
    pub fn new() -> TimeConverter {
        #[cfg(feature = "std")]
        let config = crate::tz::default();
        #[cfg(not(feature = "std"))]
        let config = TimeZoneSpec::utc();

        let mut conv = TimeConverter {
            config,
            time: 0,
            local: CivilTime::default(),
            position: Position::NoDst,
            dst_start: 0,
            dst_start_utc: Tm::default(),
            std_start: 0,
            std_start_utc: Tm::default(),
        };
        conv.convert();
        conv
    }

    /// Sets the zone. Call [`TimeConverter::convert`] to refresh the local
    /// time.
    pub fn with_config(mut self, config: TimeZoneSpec) -> TimeConverter {
        self.config = config;
        self
    }

    /// Sets the UTC instant. Call [`TimeConverter::convert`] to refresh the
    /// local time.
    pub fn with_time(mut self, time: i64) -> TimeConverter {
        self.time = time;
        self
    }

    /// Sets the UTC instant to the current system time. Call
    /// [`TimeConverter::convert`] to refresh the local time.
    #[cfg(feature = "std")]
    pub fn with_current_time(self) -> TimeConverter {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(dur) => i64::try_from(dur.as_secs()).unwrap_or(i64::MAX),
            Err(err) => {
                i64::try_from(err.duration().as_secs()).map_or(i64::MIN, |s| -s)
            }
        };
        self.with_time(now)
    }

    /// Recomputes the local time, position and transition instants from
    /// the current config and UTC instant.
    ///
    /// Instants outside of the supported range are clamped to it first.
    pub fn convert(&mut self) -> &mut TimeConverter {
        let clamped =
            self.time.clamp(calendar::MIN_INSTANT, calendar::MAX_INSTANT);
        if clamped != self.time {
            debug!(
                "clamped instant {} to supported range, got {clamped}",
                self.time,
            );
            self.time = clamped;
        }

        let year = self.config.std_local_year(self.time);
        let Some((dst_start, std_start)) = self.config.transitions(year) else {
            self.position = Position::NoDst;
            self.dst_start = 0;
            self.dst_start_utc = Tm::default();
            self.std_start = 0;
            self.std_start_utc = Tm::default();
            let offset = if self.config.is_valid() {
                self.config.std_offset()
            } else {
                TimeOfDay::ZERO
            };
            self.local = CivilTime::from_instant(self.time, offset);
            return self;
        };

        let t = self.time;
        let (mut dst_start, mut std_start) = (dst_start, std_start);
        self.position = classify(t, dst_start, std_start);
        // In DST, "this year" is the year on the DST wall clock. Around the
        // new year in a southern zone that's a year ahead of standard time.
        if self.position.is_dst() {
            let dst_offset = i64::from(self.config.dst_offset().to_seconds());
            let dst_year =
                calendar::instant_to_tm(t.saturating_sub(dst_offset)).year;
            if dst_year != year {
                if let Some((start, end)) = self.config.transitions(dst_year) {
                    let position = classify(t, start, end);
                    if position.is_dst() {
                        self.position = position;
                        (dst_start, std_start) = (start, end);
                    }
                }
            }
        }
        self.dst_start = dst_start;
        self.dst_start_utc = calendar::instant_to_tm(dst_start);
        self.std_start = std_start;
        self.std_start_utc = calendar::instant_to_tm(std_start);
        let offset = if self.position.is_dst() {
            self.config.dst_offset()
        } else {
            self.config.std_offset()
        };
        self.local = CivilTime::from_instant(t, offset);
        self
    }

    /// The UTC instant, in seconds since the Unix epoch.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// The local civil time at [`TimeConverter::time`].
    pub fn local(&self) -> &CivilTime {
        &self.local
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn config(&self) -> &TimeZoneSpec {
        &self.config
    }

    /// The instant DST starts this year, or `0` for zones without DST.
    ///
    /// "This year" is the year on the local wall clock. While DST is in
    /// effect across the new year, as in southern zones, the transitions
    /// switch to the new year at local midnight.
    pub fn dst_start(&self) -> i64 {
        self.dst_start
    }

    /// [`TimeConverter::dst_start`] broken down in UTC.
    pub fn dst_start_utc(&self) -> &Tm {
        &self.dst_start_utc
    }

    /// The instant standard time starts this year, or `0` for zones
    /// without DST.
    pub fn std_start(&self) -> i64 {
        self.std_start
    }

    /// [`TimeConverter::std_start`] broken down in UTC.
    pub fn std_start_utc(&self) -> &Tm {
        &self.std_start_utc
    }

    pub fn is_dst(&self) -> bool {
        self.position.is_dst()
    }

    pub fn is_standard_time(&self) -> bool {
        !self.is_dst()
    }

    /// The abbreviation in effect, like `EST` or `EDT`. Invalid configs
    /// are reported as `UTC`.
    pub fn zone_name(&self) -> &str {
        if !self.config.is_valid() {
            "UTC"
        } else if self.is_dst() {
            self.config.dst_name()
        } else {
            self.config.std_name()
        }
    }

    /// The offset from UTC in effect, in seconds. Unlike POSIX offsets,
    /// this is positive east of UTC, so it is `-14400` for EDT.
    pub fn utc_offset_seconds(&self) -> i32 {
        let offset = if !self.config.is_valid() {
            TimeOfDay::ZERO
        } else if self.is_dst() {
            self.config.dst_offset()
        } else {
            self.config.std_offset()
        };
        -offset.to_seconds()
    }

    /// The last day of the local month.
    pub fn last_day_of_month(&self) -> i32 {
        self.local.last_day_of_month()
    }

    /// Renders the local time in the style of `asctime`, like
    /// `Fri Jan  1 18:45:56 2021`.
    pub fn time_str(&self) -> String {
        // The default format only has valid directives.
        self.format(fmt::DEFAULT).unwrap_or_default()
    }

    /// Renders the local time with a `strftime` style format string. See
    /// [`crate::fmt::strtime`] for the supported directives.
    ///
    /// # Errors
    ///
    /// This returns an error when the format string contains an unknown
    /// directive or ends with a `%`.
    pub fn format(&self, format: &str) -> Result<String, Error> {
        fmt::strtime::format(format, self)
    }

    /// Moves to the same local time (or `hms`, when given) on the next day.
    ///
    /// Like all `next_*` operations, the target is clamped to
    /// [`calendar::MAX_INSTANT`].
    pub fn next_day(&mut self, hms: Option<TimeOfDay>) {
        self.advance_days(1, hms);
    }

    /// Moves to [`TimeConverter::next_day`], or to the next DST transition
    /// if that comes first.
    pub fn next_day_or_time_change(&mut self, hms: Option<TimeOfDay>) {
        let next_day = self.forward_candidate(1, hms);
        let target = match self.next_transition() {
            Some(change) if change < next_day => change,
            _ => next_day,
        };
        self.set_time(target);
    }

    /// Moves to the next given weekday, one to seven days ahead.
    pub fn next_day_of_week(
        &mut self,
        weekday: Weekday,
        hms: Option<TimeOfDay>,
    ) {
        let days = match weekday.since(self.local.day_of_week()) {
            0 => 7,
            days => i32::from(days),
        };
        self.advance_days(days, hms);
    }

    /// Moves to the next day from Monday through Friday.
    pub fn next_weekday(&mut self, hms: Option<TimeOfDay>) {
        self.next_day_where(|wd| !wd.is_weekend(), hms);
    }

    /// Moves to the next Saturday or Sunday.
    pub fn next_weekend_day(&mut self, hms: Option<TimeOfDay>) {
        self.next_day_where(Weekday::is_weekend, hms);
    }

    /// Moves to the given day of this month, or of next month when that
    /// day has already passed.
    ///
    /// A day of `0` is the last day of the month, `-1` the day before
    /// that, and so on.
    ///
    /// This returns `false`, leaving the converter untouched, when the day
    /// doesn't exist in the target month.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::{calendar, tz::{TimeConverter, TimeZoneSpec}};
    ///
    /// let t = calendar::string_to_time("2021-01-31T12:00:00")?;
    /// let mut conv = TimeConverter::new()
    ///     .with_config(TimeZoneSpec::utc())
    ///     .with_time(t);
    /// conv.convert();
    ///
    /// // There's no February 30th.
    /// assert!(!conv.next_day_of_month(30, None));
    /// assert!(conv.next_day_of_month(0, None));
    /// assert_eq!(conv.local().to_string(), "2021-02-28 12:00:00");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn next_day_of_month(
        &mut self,
        day: i32,
        hms: Option<TimeOfDay>,
    ) -> bool {
        self.next_in_month(|year, month| resolve_day(year, month, day), hms)
    }

    /// Moves to the given day of next month. Days count as in
    /// [`TimeConverter::next_day_of_month`].
    ///
    /// This returns `false`, leaving the converter untouched, when the day
    /// doesn't exist next month.
    pub fn next_day_of_next_month(
        &mut self,
        day: i32,
        hms: Option<TimeOfDay>,
    ) -> bool {
        let (year, month) = month_after(self.local.year(), self.local.month());
        let Some(day) = resolve_day(year, month, day) else { return false };
        let target = self.resolve(self.local_on(year, month, day, hms));
        self.set_time(target);
        true
    }

    /// Moves to the `ordinal`-th (in `1..=5`) given weekday of this month,
    /// or of next month when that day has already passed.
    ///
    /// This returns `false`, leaving the converter untouched, when the
    /// target month doesn't have that many of the weekday, or when the
    /// ordinal is out of range.
    pub fn next_day_of_week_ordinal(
        &mut self,
        weekday: Weekday,
        ordinal: i32,
        hms: Option<TimeOfDay>,
    ) -> bool {
        if !(1..=5).contains(&ordinal) {
            return false;
        }
        self.next_in_month(
            |year, month| nth_weekday(year, month, weekday, ordinal),
            hms,
        )
    }

    /// Moves to the next occurrence of the given local time of day.
    ///
    /// Days on which that time doesn't exist, because clocks skip over it,
    /// are passed over.
    pub fn next_local_time(&mut self, hms: TimeOfDay) {
        let mut first = None;
        for days in 0..=MAX_LOOKAHEAD_DAYS {
            let t = self.resolve(self.local.with_days(days, Some(hms)));
            if t <= self.time {
                continue;
            }
            let reads = CivilTime::from_instant(t, self.config.offset_at(t));
            if reads.time_of_day() == hms {
                self.set_time(t);
                return;
            }
            first.get_or_insert(t);
        }
        if let Some(t) = first {
            self.set_time(t);
        }
    }

    /// Moves to the given local time of day today. Unlike the `next_*`
    /// operations, this may move backwards.
    pub fn at_local_time(&mut self, hms: TimeOfDay) {
        let target = self.resolve(self.local.with_days(0, Some(hms)));
        self.set_time(target);
    }

    fn set_time(&mut self, time: i64) {
        self.time = time;
        self.convert();
    }

    fn resolve(&self, tm: Tm) -> i64 {
        CivilTime::from_tm(tm).to_utc(&self.config)
    }

    /// Returns the local date `year-month-day` with either the current
    /// time of day or `hms`.
    fn local_on(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hms: Option<TimeOfDay>,
    ) -> Tm {
        let mut tm = *self.local.tm();
        tm.year = year;
        tm.month = month;
        tm.day = day;
        if let Some(hms) = hms {
            hms.apply_to(&mut tm);
        }
        tm
    }

    /// Returns the instant `days` days ahead in local time, or the first
    /// day after that which is later than now.
    fn forward_candidate(&self, days: i32, hms: Option<TimeOfDay>) -> i64 {
        let mut t = self.time;
        for extra in 0..=MAX_LOOKAHEAD_DAYS {
            t = self.resolve(self.local.with_days(days + extra, hms));
            if t > self.time {
                break;
            }
        }
        t
    }

    fn advance_days(&mut self, days: i32, hms: Option<TimeOfDay>) {
        let target = self.forward_candidate(days, hms);
        self.set_time(target);
    }

    fn next_day_where(
        &mut self,
        mut predicate: impl FnMut(Weekday) -> bool,
        hms: Option<TimeOfDay>,
    ) {
        let today = self.local.day_of_week();
        let days = (1..=7)
            .find(|&days| predicate(today.wrapping_add(days)))
            .map_or(1, |days| days as i32);
        self.advance_days(days, hms);
    }

    /// Moves to the day picked by `pick` in this month, or in next month
    /// when this month's pick has passed.
    fn next_in_month(
        &mut self,
        pick: impl Fn(i32, i32) -> Option<i32>,
        hms: Option<TimeOfDay>,
    ) -> bool {
        let (year, month) = (self.local.year(), self.local.month());
        let Some(day) = pick(year, month) else { return false };
        let target = self.resolve(self.local_on(year, month, day, hms));
        if target > self.time {
            self.set_time(target);
            return true;
        }
        let (year, month) = month_after(year, month);
        let Some(day) = pick(year, month) else { return false };
        let target = self.resolve(self.local_on(year, month, day, hms));
        self.set_time(target);
        true
    }

    /// Returns the first transition strictly after now.
    fn next_transition(&self) -> Option<i64> {
        let year = self.config.std_local_year(self.time);
        (year..=year + 1)
            .filter_map(|year| self.config.transitions(year))
            .flat_map(|(dst, std)| [dst.min(std), dst.max(std)])
            .find(|&t| t > self.time)
    }
}

impl Default for TimeConverter {
    fn default() -> TimeConverter {
        TimeConverter::new()
    }
}

fn month_after(year: i32, month: i32) -> (i32, i32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Resolves a day of the month where `0` and below count back from the
/// last day.
fn resolve_day(year: i32, month: i32, day: i32) -> Option<i32> {
    let last = calendar::days_in_month(year, month);
    let day = if day <= 0 { last + day } else { day };
    (1..=last).contains(&day).then_some(day)
}

/// Places `t` relative to one year's pair of transitions.
fn classify(t: i64, dst_start: i64, std_start: i64) -> Position {
    if dst_start < std_start {
        if t < dst_start {
            Position::BeforeDst
        } else if t < std_start {
            Position::InDst
        } else {
            Position::AfterDst
        }
    } else if t < std_start {
        Position::BeforeStandard
    } else if t < dst_start {
        Position::InStandard
    } else {
        Position::AfterStandard
    }
}

fn nth_weekday(
    year: i32,
    month: i32,
    weekday: Weekday,
    ordinal: i32,
) -> Option<i32> {
    let first = calendar::weekday_of(calendar::days_from_civil(year, month, 1));
    let target = i32::from(weekday.to_sunday_zero_offset());
    let day = 1 + (target - first).rem_euclid(7) + 7 * (ordinal - 1);
    (day <= calendar::days_in_month(year, month)).then_some(day)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    const EASTERN: &str = "EST5EDT,M3.2.0/2:00:00,M11.1.0/2:00:00";
    const SYDNEY: &str = "AEST-10AEDT,M10.1.0,M4.1.0/3";

    fn at(spec: &str, utc: &str) -> TimeConverter {
        let t = calendar::string_to_time(utc).unwrap();
        let mut conv = TimeConverter::new()
            .with_config(TimeZoneSpec::parse(spec))
            .with_time(t);
        conv.convert();
        conv
    }

    fn utc(s: &str) -> i64 {
        calendar::string_to_time(s).unwrap()
    }

    fn hms(s: &str) -> TimeOfDay {
        TimeOfDay::parse_strict(s).unwrap()
    }

    #[test]
    fn spring_forward() {
        let conv = at(EASTERN, "2021-03-14T06:59:00");
        assert_eq!(conv.local().to_string(), "2021-03-14 01:59:00");
        assert_eq!(conv.position(), Position::BeforeDst);
        assert!(conv.is_standard_time());
        assert_eq!(conv.zone_name(), "EST");
        assert_eq!(conv.utc_offset_seconds(), -5 * 3600);

        let conv = at(EASTERN, "2021-03-14T07:00:00");
        assert_eq!(conv.local().to_string(), "2021-03-14 03:00:00");
        assert_eq!(conv.position(), Position::InDst);
        assert!(conv.is_dst());
        assert_eq!(conv.zone_name(), "EDT");
        assert_eq!(conv.utc_offset_seconds(), -4 * 3600);
    }

    #[test]
    fn fall_back() {
        let conv = at(EASTERN, "2021-11-07T05:59:59");
        assert_eq!(conv.local().to_string(), "2021-11-07 01:59:59");
        assert_eq!(conv.position(), Position::InDst);
        let conv = at(EASTERN, "2021-11-07T06:00:00");
        assert_eq!(conv.local().to_string(), "2021-11-07 01:00:00");
        assert_eq!(conv.position(), Position::AfterDst);
    }

    #[test]
    fn cached_transitions_follow_dst_new_year() {
        // 23:30 on New Year's Eve in Sydney is still 2021.
        let conv = at(SYDNEY, "2021-12-31T12:30:00");
        assert_eq!(conv.local().to_string(), "2021-12-31 23:30:00");
        assert_eq!(conv.position(), Position::AfterStandard);
        assert_eq!(conv.dst_start(), utc("2021-10-02T16:00:00"));
        assert_eq!(conv.std_start(), utc("2021-04-03T16:00:00"));

        // Half past midnight is 2022, even though standard time says 2021.
        let conv = at(SYDNEY, "2021-12-31T13:30:00");
        assert_eq!(conv.local().to_string(), "2022-01-01 00:30:00");
        assert_eq!(conv.position(), Position::BeforeStandard);
        assert!(conv.is_dst());
        assert_eq!(conv.dst_start(), utc("2022-10-01T16:00:00"));
        assert_eq!(conv.std_start(), utc("2022-04-02T16:00:00"));
        assert_eq!(conv.dst_start_utc().year, 2022);
    }

    #[test]
    fn navigation_stops_at_max_instant() {
        let mut conv = TimeConverter::new()
            .with_config(TimeZoneSpec::parse(EASTERN))
            .with_time(calendar::MAX_INSTANT - 10);
        conv.convert();
        conv.next_day(None);
        assert_eq!(conv.time(), calendar::MAX_INSTANT);

        let mut conv = TimeConverter::new().with_time(calendar::MAX_INSTANT + 1);
        conv.convert();
        assert_eq!(conv.time(), calendar::MAX_INSTANT);
    }

    #[test]
    fn cached_transitions() {
        let conv = at(EASTERN, "2021-06-01T00:00:00");
        assert_eq!(conv.dst_start(), utc("2021-03-14T07:00:00"));
        assert_eq!(conv.std_start(), utc("2021-11-07T06:00:00"));
        assert_eq!(conv.dst_start_utc().hour, 7);
        assert_eq!(conv.std_start_utc().day, 7);

        let conv = at("JST-9", "2021-06-01T00:00:00");
        assert_eq!(conv.position(), Position::NoDst);
        assert_eq!(conv.dst_start(), 0);
        assert_eq!(conv.local().hour(), 9);
    }

    #[test]
    fn southern_positions() {
        let conv = at(SYDNEY, "2021-01-15T00:00:00");
        assert_eq!(conv.position(), Position::BeforeStandard);
        assert!(conv.is_dst());
        assert_eq!(conv.zone_name(), "AEDT");
        assert_eq!(conv.utc_offset_seconds(), 11 * 3600);

        let conv = at(SYDNEY, "2021-07-01T00:00:00");
        assert_eq!(conv.position(), Position::InStandard);
        assert_eq!(conv.zone_name(), "AEST");
        assert_eq!(conv.local().to_string(), "2021-07-01 10:00:00");

        let conv = at(SYDNEY, "2021-12-01T00:00:00");
        assert_eq!(conv.position(), Position::AfterStandard);
        assert!(conv.std_start() < conv.dst_start());
    }

    #[test]
    fn invalid_config_is_utc() {
        let conv = at("5EDT", "2021-06-01T12:00:00");
        assert_eq!(conv.position(), Position::NoDst);
        assert_eq!(conv.zone_name(), "UTC");
        assert_eq!(conv.utc_offset_seconds(), 0);
        assert_eq!(conv.local().to_string(), "2021-06-01 12:00:00");
    }

    #[test]
    fn clamps_out_of_range() {
        let _ = env_logger::try_init();

        let mut conv = TimeConverter::new()
            .with_config(TimeZoneSpec::utc())
            .with_time(i64::MAX);
        conv.convert();
        assert_eq!(conv.time(), calendar::MAX_INSTANT);
        assert_eq!(conv.local().to_string(), "9999-12-31 23:59:59");
    }

    #[test]
    fn next_day_across_transitions() {
        let mut conv = at(EASTERN, "2021-11-06T16:00:00");
        assert_eq!(conv.local().to_string(), "2021-11-06 12:00:00");
        let before = conv.time();
        conv.next_day(None);
        assert_eq!(conv.local().to_string(), "2021-11-07 12:00:00");
        assert_eq!(conv.time() - before, 25 * 3600);

        conv.next_day(Some(hms("2:30")));
        assert_eq!(conv.local().to_string(), "2021-11-08 02:30:00");
    }

    #[test]
    fn next_day_into_gap() {
        let mut conv = at(EASTERN, "2021-03-13T07:30:00");
        assert_eq!(conv.local().to_string(), "2021-03-13 02:30:00");
        conv.next_day(None);
        assert_eq!(conv.time(), utc("2021-03-14T07:00:00"));
        assert_eq!(conv.local().to_string(), "2021-03-14 03:00:00");
    }

    #[test]
    fn next_day_or_time_change() {
        let mut conv = at(EASTERN, "2021-03-13T17:00:00");
        conv.next_day_or_time_change(None);
        assert_eq!(conv.time(), utc("2021-03-14T07:00:00"));
        conv.next_day_or_time_change(None);
        assert_eq!(conv.local().to_string(), "2021-03-15 03:00:00");

        let mut conv = at(EASTERN, "2021-06-01T17:00:00");
        conv.next_day_or_time_change(Some(hms("9")));
        assert_eq!(conv.local().to_string(), "2021-06-02 09:00:00");
    }

    #[test]
    fn weekdays() {
        // 2021-06-04 is a Friday.
        let mut conv = at("UTC0", "2021-06-04T12:00:00");
        conv.next_day_of_week(Weekday::Friday, None);
        assert_eq!(conv.local().to_string(), "2021-06-11 12:00:00");
        conv.next_day_of_week(Weekday::Monday, Some(hms("8")));
        assert_eq!(conv.local().to_string(), "2021-06-14 08:00:00");

        let mut conv = at("UTC0", "2021-06-04T12:00:00");
        conv.next_weekday(None);
        assert_eq!(conv.local().day_of_week(), Weekday::Monday);
        assert_eq!(conv.local().day(), 7);

        let mut conv = at("UTC0", "2021-06-04T12:00:00");
        conv.next_weekend_day(None);
        assert_eq!(conv.local().day_of_week(), Weekday::Saturday);
        conv.next_weekend_day(None);
        assert_eq!(conv.local().day_of_week(), Weekday::Sunday);
        conv.next_weekend_day(None);
        assert_eq!(conv.local().to_string(), "2021-06-12 12:00:00");
    }

    #[test]
    fn days_of_month() {
        let mut conv = at("UTC0", "2021-01-15T12:00:00");
        assert!(conv.next_day_of_month(20, None));
        assert_eq!(conv.local().to_string(), "2021-01-20 12:00:00");
        assert!(conv.next_day_of_month(20, None));
        assert_eq!(conv.local().to_string(), "2021-02-20 12:00:00");
        assert!(conv.next_day_of_month(-1, None));
        assert_eq!(conv.local().to_string(), "2021-02-27 12:00:00");

        let mut conv = at("UTC0", "2021-01-31T12:00:00");
        assert!(conv.next_day_of_month(0, Some(hms("6"))));
        assert_eq!(conv.local().to_string(), "2021-02-28 06:00:00");

        let mut conv = at("UTC0", "2021-01-31T12:00:00");
        assert!(!conv.next_day_of_next_month(29, None));
        assert_eq!(conv.local().to_string(), "2021-01-31 12:00:00");
        assert!(conv.next_day_of_next_month(1, None));
        assert_eq!(conv.local().to_string(), "2021-02-01 12:00:00");
        assert!(conv.next_day_of_next_month(0, None));
        assert_eq!(conv.local().to_string(), "2021-03-31 12:00:00");
    }

    #[test]
    fn weekday_ordinals() {
        // June 2021 has four Fridays, July 2021 has five.
        let mut conv = at("UTC0", "2021-06-01T12:00:00");
        let before = conv.time();
        assert!(!conv.next_day_of_week_ordinal(Weekday::Friday, 5, None));
        assert_eq!(conv.time(), before);
        assert!(!conv.next_day_of_week_ordinal(Weekday::Friday, 0, None));

        assert!(conv.next_day_of_week_ordinal(Weekday::Sunday, 2, None));
        assert_eq!(conv.local().to_string(), "2021-06-13 12:00:00");
        assert!(conv.next_day_of_week_ordinal(Weekday::Friday, 1, None));
        assert_eq!(conv.local().to_string(), "2021-07-02 12:00:00");
        assert!(conv.next_day_of_week_ordinal(Weekday::Friday, 5, None));
        assert_eq!(conv.local().to_string(), "2021-07-30 12:00:00");
    }

    #[test]
    fn local_times() {
        let mut conv = at(EASTERN, "2021-03-13T12:00:00");
        conv.next_local_time(hms("2:30"));
        // 02:30 doesn't exist on the 14th, so it is skipped.
        assert_eq!(conv.local().to_string(), "2021-03-15 02:30:00");

        let mut conv = at(EASTERN, "2021-11-07T04:00:00");
        conv.at_local_time(hms("1:30"));
        assert_eq!(conv.time(), utc("2021-11-07T06:30:00"));
        conv.at_local_time(hms("0:15"));
        assert_eq!(conv.local().to_string(), "2021-11-07 00:15:00");

        let mut conv = at("UTC0", "2021-06-01T12:00:00");
        conv.next_local_time(hms("12"));
        assert_eq!(conv.local().to_string(), "2021-06-02 12:00:00");
        conv.next_local_time(hms("13"));
        assert_eq!(conv.local().to_string(), "2021-06-02 13:00:00");
    }

    #[test]
    fn output() {
        let conv = at(EASTERN, "2021-01-01T23:45:56");
        assert_eq!(conv.time_str(), "Fri Jan  1 18:45:56 2021");
        assert_eq!(
            conv.format(fmt::ISO8601_FULL).unwrap(),
            "2021-01-01T18:45:56-05:00",
        );
        assert_eq!(conv.format("%H %Z").unwrap(), "18 EST");
        assert!(conv.format("%Q").is_err());
        assert_eq!(conv.last_day_of_month(), 31);
    }

    quickcheck::quickcheck! {
        fn prop_next_ops_move_forward(t: i32, which: u8, hour: u8) -> bool {
            let mut conv = TimeConverter::new()
                .with_config(TimeZoneSpec::parse(EASTERN))
                .with_time(i64::from(t));
            conv.convert();
            let before = conv.time();
            let hms = Some(TimeOfDay::from_seconds(i32::from(hour % 24) * 3600));
            match which % 6 {
                0 => conv.next_day(hms),
                1 => conv.next_day_or_time_change(hms),
                2 => conv.next_day_of_week(Weekday::Sunday, hms),
                3 => conv.next_weekday(hms),
                4 => conv.next_weekend_day(hms),
                _ => conv.next_local_time(hms.unwrap_or_default()),
            }
            conv.time() > before
        }

        fn prop_local_matches_offset(t: i32) -> bool {
            let mut conv = TimeConverter::new()
                .with_config(TimeZoneSpec::parse(SYDNEY))
                .with_time(i64::from(t));
            conv.convert();
            let local = calendar::tm_to_instant(conv.local().tm());
            local - conv.time() == i64::from(conv.utc_offset_seconds())
                && conv.is_dst() == conv.config().is_dst_at(conv.time())
        }
    }
}
