use std::sync::{PoisonError, RwLock};

use crate::tz::TimeZoneSpec;

static DEFAULT: RwLock<Option<TimeZoneSpec>> = RwLock::new(None);

/// Sets the zone used by [`TimeConverter::new`](crate::tz::TimeConverter::new).
///
/// This is process-wide. It is meant to be called once at startup, for
/// example with the contents of a configuration file or the `TZ`
/// environment variable.
///
/// # Example
///
/// ```
/// use civiltz::tz::{self, TimeZoneSpec};
///
/// tz::set_default(TimeZoneSpec::parse("EST5EDT,M3.2.0,M11.1.0"));
/// assert_eq!(tz::default().std_name(), "EST");
/// ```
pub fn set_default(spec: TimeZoneSpec) {
    debug!("setting default time zone to {spec}");
    let mut default = DEFAULT.write().unwrap_or_else(PoisonError::into_inner);
    *default = Some(spec);
}

/// Returns the zone set with [`set_default`], or UTC when none was set.
pub fn default() -> TimeZoneSpec {
    let default = DEFAULT.read().unwrap_or_else(PoisonError::into_inner);
    default.clone().unwrap_or_else(TimeZoneSpec::utc)
}
