/*!
Formatting of civil times.

The only formatting supported is [`strftime`](strtime) style, via
[`strtime::format`]. The format strings commonly needed are available as
constants in this module.

# Example

```
use civiltz::{civil::CivilTime, fmt};

let ct: CivilTime = "2021-01-01 18:45:56".parse()?;
assert_eq!(fmt::strtime::format(fmt::DEFAULT, ct)?, "Fri Jan  1 18:45:56 2021");
assert_eq!(
    fmt::strtime::format(fmt::ISO8601_FULL, ct)?,
    "2021-01-01T18:45:56+00:00",
);

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod strtime;

/// The format used by `asctime`, like `Fri Jan  1 18:45:56 2021`.
pub const DEFAULT: &str = "%a %b %e %H:%M:%S %Y";

/// An ISO 8601 datetime with its offset, like `2021-01-01T18:45:56-05:00`.
pub const ISO8601_FULL: &str = "%Y-%m-%dT%H:%M:%S%z";
