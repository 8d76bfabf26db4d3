/*!
Civil time in zones described by POSIX `TZ` strings.

This crate converts between UTC instants and local wall clock time in a
time zone given as a POSIX `TZ` string, like `EST5EDT,M3.2.0,M11.1.0`.
It is self-contained: no time zone database is consulted, and the rules in
the string are used for every year.

The pieces are:

* [`calendar`] provides proleptic Gregorian calendar arithmetic on UTC
instants and broken-down time ([`calendar::Tm`]).
* [`civil`] provides [`TimeOfDay`](civil::TimeOfDay),
[`Weekday`](civil::Weekday) and [`CivilTime`](civil::CivilTime), a local
date and time.
* [`tz`] provides the parsed POSIX string,
[`TimeZoneSpec`](tz::TimeZoneSpec), and
[`TimeConverter`](tz::TimeConverter), which converts an instant to local
time and navigates local time ("same time tomorrow", "the last day of the
month" and so on).
* [`fmt`] provides `strftime` style formatting.

# Example

```
use civiltz::{calendar, civil::TimeOfDay, tz::{TimeConverter, TimeZoneSpec}};

let spec: TimeZoneSpec = "EST5EDT,M3.2.0,M11.1.0".parse()?;
let t = calendar::string_to_time("2021-03-14T06:59:00")?;
let mut conv = TimeConverter::new().with_config(spec).with_time(t);
conv.convert();
assert_eq!(conv.time_str(), "Sun Mar 14 01:59:00 2021");

// One minute later, clocks jump forward an hour.
conv = conv.with_time(t + 60);
conv.convert();
assert_eq!(conv.format("%T %Z")?, "03:00:00 EDT");

// Every day at 09:15, local time.
conv.next_local_time(TimeOfDay::constant(9, 15, 0));
assert_eq!(conv.format("%F %T %z")?, "2021-03-14 09:15:00 -04:00");

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **std** (enabled by default) - Enables `std::error::Error` for
[`Error`] and the process-wide default zone, [`tz::set_default`].
* **alloc** (enabled by `std`) - Heap allocation is always used, for
errors and zone abbreviations. This feature only forwards to `serde`.
* **logging** - Emits log messages via the [`log`](https://docs.rs/log)
crate, for example when a tolerant parse fails.
* **serde** - Implements `Serialize` and `Deserialize` for
[`TimeOfDay`](civil::TimeOfDay), [`CivilTime`](civil::CivilTime),
[`TransitionRule`](tz::TransitionRule) and
[`TimeZoneSpec`](tz::TimeZoneSpec), using their string representations.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
// This adds Cargo feature annotations to items in the rustdoc output.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

#[cfg(any(test, feature = "std"))]
extern crate std;

// Errors and zone abbreviations allocate, so there is no core-only mode.
extern crate alloc;

pub use crate::error::Error;

#[macro_use]
mod logging;

pub mod calendar;
pub mod civil;
mod error;
pub mod fmt;
pub mod tz;
mod util;
