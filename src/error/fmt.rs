use crate::{error, util::escape::Byte};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    UnexpectedEndAfterPercent,
    UnknownDirective { directive: u8 },
    WriteFailed,
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Fmt(err).into()
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
            UnexpectedEndAfterPercent => f.write_str(
                "invalid format string, expected directive after `%`",
            ),
            UnknownDirective { directive } => write!(
                f,
                "found unrecognized directive `%{directive}`",
                directive = Byte(directive),
            ),
            WriteFailed => f.write_str("failed to write formatted output"),
        }
    }
}
