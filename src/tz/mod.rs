/*!
Time zones described by POSIX `TZ` strings, and conversion between UTC
instants and local time in them.

* [`TransitionRule`] is one DST transition, like "the second Sunday of
March at 02:00".
* [`TimeZoneSpec`] is a parsed POSIX `TZ` string like
`EST5EDT,M3.2.0,M11.1.0`.
* [`TimeConverter`] converts an instant to local time in a zone and
navigates local time.

With the `std` feature, a process-wide default zone can be installed with
[`set_default`]. It is used by [`TimeConverter::new`].
*/

#[cfg(feature = "std")]
pub use self::config::{default, set_default};
pub use self::{
    convert::{Position, TimeConverter},
    posix::TimeZoneSpec,
    rule::TransitionRule,
};

#[cfg(feature = "std")]
mod config;
mod convert;
mod posix;
pub(crate) mod rule;
