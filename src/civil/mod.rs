/*!
Civil ("wall clock") times that are not tied to any particular instant.

This module provides three types:

* [`TimeOfDay`] is a signed hours, minutes and seconds value. It is used
both for wall clock times and for UTC offsets.
* [`Weekday`] is a day of the week.
* [`CivilTime`] is a local date and time as shown by a wall clock in some
time zone, together with the resolution from local time back to UTC.
*/

pub use self::{datetime::CivilTime, time::TimeOfDay, weekday::Weekday};

mod datetime;
pub(crate) mod time;
mod weekday;
