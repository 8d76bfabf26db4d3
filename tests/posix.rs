use civiltz::{
    civil::{TimeOfDay, Weekday},
    tz::{TimeZoneSpec, TransitionRule},
};

const REAL_WORLD: &[&str] = &[
    "EST5EDT,M3.2.0,M11.1.0",
    "CST6CDT,M3.2.0/2:00:00,M11.1.0/2:00:00",
    "CET-1CEST,M3.5.0,M10.5.0/3",
    "GMT0BST,M3.5.0/1,M10.5.0",
    "AEST-10AEDT,M10.1.0,M4.1.0/3",
    "NZST-12NZDT,M9.5.0,M4.1.0/3",
    "IST-2IDT,M3.4.4/26,M10.5.0",
    "<-02>2<-01>,M3.5.0/-1,M10.5.0/0",
    "<+1030>-10:30<+11>-11,M10.1.0,M4.1.0",
    "<+0545>-5:45",
    "MST7",
];

#[test]
fn real_world_strings_parse() -> crate::Result {
    for &s in REAL_WORLD {
        let spec = TimeZoneSpec::parse_strict(s)?;
        assert!(spec.is_valid(), "{s}");
        assert_eq!(TimeZoneSpec::parse(s), spec, "{s}");
        let reparsed: TimeZoneSpec = spec.to_string().parse()?;
        assert_eq!(reparsed, spec, "{s} rendered as {spec}");
    }
    Ok(())
}

#[test]
fn components() -> crate::Result {
    let spec: TimeZoneSpec = "IST-2IDT,M3.4.4/26,M10.5.0".parse()?;
    assert_eq!(spec.std_name(), "IST");
    assert_eq!(spec.std_offset().to_seconds(), -7200);
    assert_eq!(spec.dst_name(), "IDT");
    assert_eq!(spec.dst_offset().to_seconds(), -10800);
    let start = spec.dst_start().unwrap();
    assert_eq!(start.weekday(), Weekday::Thursday);
    assert_eq!(start.time(), TimeOfDay::new(26, 0, 0)?);
    // The Friday after the fourth Thursday of March 2021, at 02:00.
    assert_eq!(start.date_in(2021), (3, 25));
    let (dst, _) = spec.transitions(2021).unwrap();
    assert_eq!(
        civiltz::calendar::time_to_string(dst, ' '),
        "2021-03-26 00:00:00",
    );

    let rule = TransitionRule::new(10, 5, Weekday::Sunday, TimeOfDay::ZERO)?;
    assert_eq!(spec.std_start(), Some(TransitionRule::parse("M10.5.0")?));
    assert_ne!(spec.std_start(), Some(rule));
    Ok(())
}

#[test]
fn utc_like_specs() {
    assert!(TimeZoneSpec::utc().is_z());
    assert!(TimeZoneSpec::parse("UTC0").is_z());
    assert!(TimeZoneSpec::parse("").is_z());
    assert!(!TimeZoneSpec::parse("").is_valid());
    assert!(!TimeZoneSpec::parse("JST-9").is_z());
    assert!(!TimeZoneSpec::parse("GMT0BST,M3.5.0/1,M10.5.0").is_z());
}

#[test]
fn strict_and_tolerant_agree() {
    for s in ["EST", "EST5EDT,", "EST5EDT,M3.2.0", "EST5EDT,J60,J300", "E5"] {
        let tolerant = TimeZoneSpec::parse(s);
        assert!(!tolerant.is_valid(), "{s}");
        assert!(TimeZoneSpec::parse_strict(s).is_err(), "{s}");
    }
    // The prefix parsed before the error is kept.
    let spec = TimeZoneSpec::parse("EST5EDT,M3.2.0");
    assert_eq!(spec.std_name(), "EST");
    assert_eq!(spec.std_offset().to_seconds(), 18000);
    assert_eq!(spec.dst_name(), "EDT");
    assert!(!spec.has_dst());
}

#[test]
fn time_of_day_forms() {
    assert_eq!(TimeOfDay::parse("2").to_string(), "2:00:00");
    assert_eq!(TimeOfDay::parse("-3:30").to_seconds(), -12600);
    assert_eq!(TimeOfDay::parse("+167:59:59").to_seconds(), 604799);
    assert_eq!(TimeOfDay::parse("nope"), TimeOfDay::ZERO);
    assert!(TimeOfDay::parse_strict("1:2:3:4").is_err());
}

#[cfg(feature = "serde")]
#[test]
fn serde_in_structs() {
    #[derive(serde::Deserialize, serde::Serialize)]
    struct Config {
        zone: TimeZoneSpec,
        wake: TimeOfDay,
    }

    let json = r#"{"zone":"CET-1CEST,M3.5.0,M10.5.0/3","wake":"7:30:00"}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.zone.dst_name(), "CEST");
    assert_eq!(config.wake.to_seconds(), 27000);
    let back = serde_json::to_string(&config).unwrap();
    let again: Config = serde_json::from_str(&back).unwrap();
    assert_eq!(again.zone, config.zone);

    let bad = r#"{"zone":"CET-1CEST,","wake":"7:30:00"}"#;
    assert!(serde_json::from_str::<Config>(bad).is_err());
}
