use civiltz::{
    calendar,
    civil::{CivilTime, TimeOfDay},
    tz::{Position, TimeConverter},
};

use crate::{converter, utc};

const EASTERN: &str = "EST5EDT,M3.2.0/2:00:00,M11.1.0/2:00:00";
const SYDNEY: &str = "AEST-10AEDT,M10.1.0,M4.1.0/3";

fn moved(conv: &TimeConverter, time: i64) -> TimeConverter {
    let mut conv = conv.clone().with_time(time);
    conv.convert();
    conv
}

#[test]
fn spring_forward_skips_an_hour() {
    let conv = converter(EASTERN, "2021-03-14 06:59:00");
    assert_eq!(conv.local().to_string(), "2021-03-14 01:59:00");
    assert_eq!(conv.position(), Position::BeforeDst);
    assert!(conv.is_standard_time());
    assert_eq!(conv.zone_name(), "EST");
    assert_eq!(conv.utc_offset_seconds(), -5 * 60 * 60);

    let conv = moved(&conv, utc("2021-03-14 07:00:00"));
    assert_eq!(conv.local().to_string(), "2021-03-14 03:00:00");
    assert_eq!(conv.position(), Position::InDst);
    assert_eq!(conv.zone_name(), "EDT");
    assert_eq!(conv.utc_offset_seconds(), -4 * 60 * 60);

    let start = utc("2021-03-14 05:00:00");
    for minute in 0..(4 * 60) {
        let conv = moved(&conv, start + minute * 60);
        let local = conv.local();
        assert!(
            !(local.day() == 14 && local.hour() == 2),
            "{} reads as skipped local time {}",
            conv.time(),
            local,
        );
    }
}

#[test]
fn fall_back_repeats_an_hour() {
    let conv = converter(EASTERN, "2021-11-07 05:30:00");
    assert_eq!(conv.local().to_string(), "2021-11-07 01:30:00");
    assert_eq!(conv.position(), Position::InDst);

    let conv = moved(&conv, utc("2021-11-07 06:30:00"));
    assert_eq!(conv.local().to_string(), "2021-11-07 01:30:00");
    assert_eq!(conv.position(), Position::AfterDst);

    // The repeated time resolves to its second occurrence.
    let mut conv = converter(EASTERN, "2021-11-07 04:00:00");
    conv.at_local_time(TimeOfDay::constant(1, 30, 0));
    assert_eq!(conv.time(), utc("2021-11-07 06:30:00"));
    assert_eq!(conv.zone_name(), "EST");
}

#[test]
fn to_utc_round_trips_every_hour() {
    for spec in [EASTERN, SYDNEY, "CET-1CEST,M3.5.0,M10.5.0/3"] {
        let conv = converter(spec, "2021-01-01 00:00:00");
        let start = conv.time();
        for hour in 0..(366 * 24) {
            let conv = moved(&conv, start + hour * 3600);
            let back = conv.local().to_utc(conv.config());
            if back != conv.time() {
                // Only the DST reading of a repeated hour maps elsewhere.
                assert!(conv.is_dst(), "{spec}: {}", conv.local());
                assert_eq!(back, conv.time() + 3600, "{spec}: {}", conv.local());
            }
        }
    }
}

#[test]
fn to_utc_never_lands_in_gap() {
    let conv = converter(EASTERN, "2021-03-14 00:00:00");
    for minute in 0..60 {
        let local = CivilTime::new(2021, 3, 14, 2, minute, 0).unwrap();
        let t = local.to_utc(conv.config());
        assert_eq!(t, utc("2021-03-14 07:00:00"));
        let conv = moved(&conv, t);
        assert_eq!(conv.local().to_string(), "2021-03-14 03:00:00");
    }
}

#[test]
fn southern_hemisphere_ordering() {
    let conv = converter(SYDNEY, "2021-06-01 00:00:00");
    assert!(conv.std_start() < conv.dst_start());
    assert_eq!(
        calendar::time_to_string(conv.std_start(), ' '),
        "2021-04-03 16:00:00",
    );
    assert_eq!(
        calendar::time_to_string(conv.dst_start(), ' '),
        "2021-10-02 16:00:00",
    );
    assert_eq!(conv.std_start_utc().month, 4);
    assert_eq!(conv.dst_start_utc().month, 10);

    let positions = [
        ("2021-01-01 00:00:00", Position::BeforeStandard, "AEDT"),
        ("2021-04-03 15:59:59", Position::BeforeStandard, "AEDT"),
        ("2021-04-03 16:00:00", Position::InStandard, "AEST"),
        ("2021-10-02 15:59:59", Position::InStandard, "AEST"),
        ("2021-10-02 16:00:00", Position::AfterStandard, "AEDT"),
        ("2021-12-31 12:59:59", Position::AfterStandard, "AEDT"),
    ];
    for (time, position, name) in positions {
        let conv = moved(&conv, utc(time));
        assert_eq!(conv.position(), position, "{time}");
        assert_eq!(conv.zone_name(), name, "{time}");
    }
}

#[test]
fn zones_without_dst() {
    let conv = converter("<+0530>-5:30", "2021-06-01 00:00:00");
    assert_eq!(conv.position(), Position::NoDst);
    assert_eq!(conv.local().to_string(), "2021-06-01 05:30:00");
    assert_eq!(conv.utc_offset_seconds(), 19800);
    assert_eq!(conv.zone_name(), "+0530");
    assert_eq!(conv.dst_start(), 0);

    // Garbage degrades to UTC.
    let conv = converter("garbage,,", "2021-06-01 00:00:00");
    assert!(!conv.config().is_valid());
    assert!(conv.config().is_z());
    assert_eq!(conv.zone_name(), "UTC");
    assert_eq!(conv.local().to_string(), "2021-06-01 00:00:00");
}

#[test]
fn zone_read_from_a_line_keeps_its_rules() {
    let line = "EST5EDT,M3.2.0/2:00:00,M11.1.0/2:00:00\n";
    let conv = converter(line, "2021-07-01 16:00:00");
    assert!(conv.config().is_valid());
    assert_eq!(conv.local().to_string(), "2021-07-01 12:00:00");
    assert_eq!(conv.zone_name(), "EDT");
    assert_eq!(conv.position(), Position::InDst);
}

#[test]
fn iso_round_trips() -> crate::Result {
    for time in [
        0,
        -1,
        951_782_400,
        1_615_705_200,
        calendar::MIN_INSTANT,
        calendar::MAX_INSTANT,
    ] {
        let s = calendar::time_to_string(time, 'T');
        assert_eq!(calendar::string_to_time(&s)?, time, "{s}");
    }
    assert_eq!(calendar::time_to_string(951_782_400, ' '), "2000-02-29 00:00:00");
    Ok(())
}

#[test]
fn output_formats() -> crate::Result {
    let conv = converter(EASTERN, "2021-01-01 23:45:56");
    assert_eq!(conv.time_str(), "Fri Jan  1 18:45:56 2021");
    assert_eq!(
        conv.format(civiltz::fmt::ISO8601_FULL)?,
        "2021-01-01T18:45:56-05:00",
    );
    let conv = moved(&conv, utc("2021-07-04 16:00:00"));
    assert_eq!(conv.format("%Y-%m-%d %H:%M:%S %Z")?, "2021-07-04 12:00:00 EDT");
    Ok(())
}
