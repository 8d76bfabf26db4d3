/*!
A tiny byte cursor shared by the hand written parsers in this crate.

Both the POSIX `TZ` parser and the time-of-day parser are strictly left to
right and only ever look at the current byte. The cursor position lives in
a `Cell` so that parsing routines can take `&self`.
*/

use crate::error::{civil::Error as E, Error};

#[derive(Debug)]
pub(crate) struct Cursor<'s> {
    input: &'s [u8],
    pos: core::cell::Cell<usize>,
}

impl<'s> Cursor<'s> {
    pub(crate) fn new<B: ?Sized + AsRef<[u8]>>(input: &'s B) -> Cursor<'s> {
        Cursor { input: input.as_ref(), pos: core::cell::Cell::new(0) }
    }

    /// Parses an unsigned integer with at least 1 and at most `n` digits.
    ///
    /// Upon success, the cursor is positioned immediately after the last
    /// digit.
    pub(crate) fn parse_number_upto(
        &self,
        what: &'static str,
        n: usize,
    ) -> Result<i32, Error> {
        debug_assert!(n >= 1 && n <= 9, "numbers must have 1..=9 digits");
        let mut number: i32 = 0;
        for i in 0..n {
            match self.maybe_byte() {
                Some(byte @ b'0'..=b'9') => {
                    number = number * 10 + i32::from(byte - b'0');
                    self.bump();
                }
                found if i == 0 => {
                    return Err(Error::from(E::ExpectedDigits { what, found }))
                }
                _ => break,
            }
        }
        if matches!(self.maybe_byte(), Some(b'0'..=b'9')) {
            return Err(Error::from(E::TooManyDigits { what, max: n }));
        }
        Ok(number)
    }

    /// Parses an unsigned integer with exactly `n` digits.
    pub(crate) fn parse_number_exact(
        &self,
        what: &'static str,
        n: usize,
    ) -> Result<i32, Error> {
        debug_assert!(n >= 1 && n <= 9, "numbers must have 1..=9 digits");
        let mut number: i32 = 0;
        for _ in 0..n {
            match self.maybe_byte() {
                Some(byte @ b'0'..=b'9') => {
                    number = number * 10 + i32::from(byte - b'0');
                    self.bump();
                }
                found => {
                    return Err(Error::from(E::ExpectedDigits { what, found }))
                }
            }
        }
        Ok(number)
    }

    /// Parses an optional sign. `-1` is returned for `-` and `1` for `+` or
    /// when there is no sign at all.
    ///
    /// When a sign is present, this guarantees that another byte follows
    /// it.
    pub(crate) fn parse_optional_sign(&self) -> Result<i8, Error> {
        let sign = match self.maybe_byte() {
            Some(b'-') => -1,
            Some(b'+') => 1,
            _ => return Ok(1),
        };
        if !self.bump() {
            return Err(Error::from(E::ExpectedDigitAfterSign));
        }
        Ok(sign)
    }

    /// Bump the cursor to the next byte.
    ///
    /// If the end of the input has been reached, then `false` is returned.
    pub(crate) fn bump(&self) -> bool {
        if self.is_done() {
            return false;
        }
        self.pos.set(self.pos() + 1);
        !self.is_done()
    }

    /// Returns true if the next call to `bump` would return false.
    pub(crate) fn is_done(&self) -> bool {
        self.pos() >= self.input.len()
    }

    /// Return the byte at the current position of the cursor. If the input
    /// has been exhausted, then this returns `None`.
    pub(crate) fn maybe_byte(&self) -> Option<u8> {
        self.input.get(self.pos()).copied()
    }

    /// Return the current byte offset of the cursor.
    pub(crate) fn pos(&self) -> usize {
        self.pos.get()
    }

    /// Returns the bytes in `start..current position`.
    pub(crate) fn since(&self, start: usize) -> &'s [u8] {
        &self.input[start..self.pos()]
    }

    /// Returns the remaining bytes of the input, including the current one.
    pub(crate) fn remaining(&self) -> &'s [u8] {
        &self.input[self.pos()..]
    }
}
