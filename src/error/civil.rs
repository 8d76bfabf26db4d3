use crate::{error, util::escape::MaybeByte};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    EmptyTimeOfDay,
    ExpectedDigitAfterSign,
    ExpectedDigits { what: &'static str, found: Option<u8> },
    IncompleteTime { missing: &'static str },
    IsoDigitSeparator,
    IsoExpectedSeparator { expected: u8, found: Option<u8> },
    IsoTooShort { len: usize },
    TooManyDigits { what: &'static str, max: usize },
    TrailingTimeOfDay { found: u8 },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Civil(err).into()
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
            EmptyTimeOfDay => f.write_str(
                "expected time of day in `H[:MM[:SS]]` form, \
                 but found empty input",
            ),
            ExpectedDigitAfterSign => {
                f.write_str("expected digit after sign, but found end of input")
            }
            ExpectedDigits { what, found } => write!(
                f,
                "expected one or more digits for {what}, \
                 but found {found}",
                found = MaybeByte(found),
            ),
            IncompleteTime { missing } => write!(
                f,
                "incomplete time of day, expected {missing} after `:`",
            ),
            IsoDigitSeparator => f.write_str(
                "expected a non-digit separator between date and time",
            ),
            IsoExpectedSeparator { expected, found } => write!(
                f,
                "expected `{expected}` separator, but found {found}",
                expected = char::from(expected),
                found = MaybeByte(found),
            ),
            IsoTooShort { len } => write!(
                f,
                "expected datetime in `YYYY-MM-DD HH:MM:SS` form with \
                 at least 19 bytes, but found {len} bytes",
            ),
            TooManyDigits { what, max } => write!(
                f,
                "expected at most {max} digits for {what}, \
                 but found more",
            ),
            TrailingTimeOfDay { found } => write!(
                f,
                "parsed time of day, but found unexpected trailing {found}",
                found = MaybeByte(Some(found)),
            ),
        }
    }
}
