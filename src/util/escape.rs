/*!
Provides convenience routines for escaping raw bytes in error messages.
*/

/// Provides a convenient `Display` implementation for a `u8`.
///
/// The byte is treated as ASCII and emitted in a human readable form. If the
/// byte isn't printable ASCII, then it's emitted as a hex escape sequence.
#[derive(Clone, Copy)]
pub(crate) struct Byte(pub(crate) u8);

impl core::fmt::Display for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0 == b' ' {
            return write!(f, " ");
        }
        for (i, b) in core::ascii::escape_default(self.0).enumerate() {
            // capitalize \xab to \xAB
            let b = if i >= 2 { b.to_ascii_uppercase() } else { b };
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "\"")?;
        core::fmt::Display::fmt(self, f)?;
        write!(f, "\"")?;
        Ok(())
    }
}

/// Displays an optional byte, where `None` means the input ended.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MaybeByte(pub(crate) Option<u8>);

impl core::fmt::Display for MaybeByte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.0 {
            None => f.write_str("end of input"),
            Some(byte) => write!(f, "`{}`", Byte(byte)),
        }
    }
}
