use crate::error::Error;

/// A representation for the day of the week.
///
/// The default representation follows POSIX transition rules and C's
/// `struct tm`, that is, zero based starting at Sunday. Use
/// [`Weekday::to_sunday_one_offset`] for the one based numbering used by
/// [`CivilTime::weekday`](crate::civil::CivilTime::weekday).
///
/// # Example
///
/// ```
/// use civiltz::civil::Weekday;
///
/// let wd = Weekday::from_sunday_zero_offset(6)?;
/// assert_eq!(wd, Weekday::Saturday);
/// assert!(wd.is_weekend());
/// assert_eq!(wd.next(), Weekday::Sunday);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Convert an offset to a structured `Weekday`.
    ///
    /// The offset should be from Sunday. That is, Sunday is `0`, Monday is
    /// `1` and so on.
    ///
    /// # Errors
    ///
    /// This returns an error when `offset` is not in the range `0..=6`.
    pub fn from_sunday_zero_offset(offset: i8) -> Result<Weekday, Error> {
        let weekday = match offset {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            6 => Weekday::Saturday,
            _ => return Err(Error::range("weekday", offset, 0, 6)),
        };
        Ok(weekday)
    }

    /// Convert an offset to a structured `Weekday`.
    ///
    /// The offset should be from Sunday, one based. That is, Sunday is `1`,
    /// Monday is `2` and so on.
    ///
    /// # Errors
    ///
    /// This returns an error when `offset` is not in the range `1..=7`.
    pub fn from_sunday_one_offset(offset: i8) -> Result<Weekday, Error> {
        if !(1 <= offset && offset <= 7) {
            return Err(Error::range("weekday", offset, 1, 7));
        }
        Weekday::from_sunday_zero_offset(offset - 1)
    }

    /// Returns this weekday as an offset from Sunday, with Sunday at `0`.
    pub fn to_sunday_zero_offset(self) -> i8 {
        self as i8
    }

    /// Returns this weekday as an offset from Sunday, with Sunday at `1`.
    pub fn to_sunday_one_offset(self) -> i8 {
        self.to_sunday_zero_offset() + 1
    }

    /// Returns this weekday as an offset from Monday, with Monday at `1`
    /// and Sunday at `7`. This is the ISO 8601 numbering.
    pub fn to_monday_one_offset(self) -> i8 {
        match self {
            Weekday::Sunday => 7,
            wd => wd.to_sunday_zero_offset(),
        }
    }

    /// Returns the next weekday, wrapping around at the end of the week.
    pub fn next(self) -> Weekday {
        self.wrapping_add(1)
    }

    /// Returns the previous weekday, wrapping around at the beginning of
    /// the week.
    pub fn previous(self) -> Weekday {
        self.wrapping_add(-1)
    }

    /// Adds the given number of days to this weekday, wrapping around
    /// within the week.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::civil::Weekday;
    ///
    /// assert_eq!(Weekday::Friday.wrapping_add(3), Weekday::Monday);
    /// assert_eq!(Weekday::Friday.wrapping_add(-5), Weekday::Sunday);
    /// ```
    pub fn wrapping_add(self, days: i64) -> Weekday {
        let offset = (i64::from(self.to_sunday_zero_offset()) + days)
            .rem_euclid(7) as i8;
        Weekday::from_zero_offset_unchecked(offset)
    }

    /// Returns the number of days from `other` to `self`, in `0..=6`.
    ///
    /// # Example
    ///
    /// ```
    /// use civiltz::civil::Weekday;
    ///
    /// assert_eq!(Weekday::Monday.since(Weekday::Friday), 3);
    /// assert_eq!(Weekday::Friday.since(Weekday::Friday), 0);
    /// ```
    pub fn since(self, other: Weekday) -> i8 {
        (self.to_sunday_zero_offset() - other.to_sunday_zero_offset())
            .rem_euclid(7)
    }

    /// Returns true for Saturday and Sunday.
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// Returns the English three letter abbreviation, e.g., `Sun`.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sun",
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }

    /// Returns the full English name, e.g., `Sunday`.
    pub fn long_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Like `from_sunday_zero_offset`, but for callers that have already
    /// reduced the offset modulo 7.
    pub(crate) fn from_zero_offset_unchecked(offset: i8) -> Weekday {
        match offset.rem_euclid(7) {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }
}

impl core::fmt::Display for Weekday {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.long_name())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Weekday {
    fn arbitrary(g: &mut quickcheck::Gen) -> Weekday {
        Weekday::from_zero_offset_unchecked(i8::arbitrary(g))
    }
}
