#![no_main]

use civiltz::tz::{TimeConverter, TimeZoneSpec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, i64)| {
    let (posix_tz_string, time) = data;
    // None of this should ever panic.
    let spec = TimeZoneSpec::parse(posix_tz_string);
    if let Ok(strict) = TimeZoneSpec::parse_strict(posix_tz_string) {
        assert_eq!(strict, spec);
        let reparsed = TimeZoneSpec::parse_strict(&strict.to_string());
        assert_eq!(reparsed.ok(), Some(strict));
    }
    let mut conv = TimeConverter::new().with_config(spec).with_time(time);
    conv.convert();
    conv.next_day(None);
    let _ = conv.local().to_utc(conv.config());
});
