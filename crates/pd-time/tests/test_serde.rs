//! Serialization tests, compiled only with the `serde` feature.

#![cfg(feature = "serde")]

use chrono::Utc;
use pd_time::{Delta, Moment, Parts, UtcMoment};

#[test]
fn moment_serializes_as_rfc3339() {
    let m = Moment::from_timestamp_in(1234567890.0, Utc).unwrap();
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, "\"2009-02-13T23:31:30Z\"");
    let back: UtcMoment = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn delta_and_parts_serialize_fieldwise() {
    let delta = Delta::new().months(1).days(-5);
    let json = serde_json::to_value(delta).unwrap();
    assert_eq!(json["months"], 1);
    assert_eq!(json["days"], -5);
    assert_eq!(serde_json::from_value::<Delta>(json).unwrap(), delta);

    let parts = Parts::ymd(2009, 2, 14).hms(0, 31, 30);
    let json = serde_json::to_string(&parts).unwrap();
    assert_eq!(serde_json::from_str::<Parts>(&json).unwrap(), parts);
}
