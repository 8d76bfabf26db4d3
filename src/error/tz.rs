use crate::{error, util::escape::MaybeByte};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    AbbreviationTooLong { max: usize },
    AbbreviationTooShort { len: usize },
    ExpectedCommaAfterDst { found: Option<u8> },
    ExpectedDot { after: &'static str, found: Option<u8> },
    ExpectedEndQuote { found: Option<u8> },
    ExpectedRuleMonth { found: Option<u8> },
    ExpectedSecondRule,
    ExpectedTimeAfterSlash,
    FailedDstAbbreviation,
    FailedDstOffset,
    FailedRuleEnd,
    FailedRuleStart,
    FailedStdAbbreviation,
    FailedStdOffset,
    TrailingComma,
    TrailingInput { found: u8 },
    UnsupportedJulianDay,
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Tz(err).into()
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            AbbreviationTooLong { max } => write!(
                f,
                "expected abbreviation with at most {max} bytes, \
                 but found a longer abbreviation",
            ),
            AbbreviationTooShort { len } => write!(
                f,
                "expected abbreviation with 3 or more bytes, \
                 but found abbreviation with {len} bytes",
            ),
            ExpectedCommaAfterDst { found } => write!(
                f,
                "after parsing DST abbreviation and offset, \
                 found {found} but expected a `,`",
                found = MaybeByte(found),
            ),
            ExpectedDot { after, found } => write!(
                f,
                "expected `.` after {after} in transition rule, \
                 but found {found}",
                found = MaybeByte(found),
            ),
            ExpectedEndQuote { found } => write!(
                f,
                "expected end-of-quoted abbreviation `>` character, \
                 but found {found}",
                found = MaybeByte(found),
            ),
            ExpectedRuleMonth { found } => write!(
                f,
                "expected `M` at the beginning of a transition rule, \
                 but found {found}",
                found = MaybeByte(found),
            ),
            ExpectedSecondRule => f.write_str(
                "expected `,` followed by the end of the DST rule \
                 after parsing the start of the DST rule",
            ),
            ExpectedTimeAfterSlash => f.write_str(
                "expected time specification after `/` \
                 in transition rule",
            ),
            FailedDstAbbreviation => {
                f.write_str("failed to parse DST abbreviation")
            }
            FailedDstOffset => f.write_str("failed to parse DST offset"),
            FailedRuleEnd => {
                f.write_str("failed to parse end of DST transition rule")
            }
            FailedRuleStart => {
                f.write_str("failed to parse start of DST transition rule")
            }
            FailedStdAbbreviation => {
                f.write_str("failed to parse standard abbreviation")
            }
            FailedStdOffset => f.write_str("failed to parse standard offset"),
            TrailingComma => f.write_str(
                "found end of string after a trailing `,` \
                 in POSIX time zone string",
            ),
            TrailingInput { found } => write!(
                f,
                "expected end of input, but found trailing {found}",
                found = MaybeByte(Some(found)),
            ),
            UnsupportedJulianDay => f.write_str(
                "Julian day transition rules (`Jn` and `n`) \
                 are not supported, only `Mm.w.d` rules are",
            ),
        }
    }
}
