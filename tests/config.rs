//! Strategy parsing and run option tests.

use std::time::Duration;

use stillsift::{CancellationToken, RunOptions, SiftError, Strategy};

// ── Strategy::parse ────────────────────────────────────────────────

#[test]
fn parse_recognised_strategy_names() {
    let max = Strategy::parse("max_screenshots", Some(25), None).unwrap();
    assert_eq!(max, Strategy::MaxPerFolder { cap: 25 });

    let timed = Strategy::parse("time_based", None, Some(2.5)).unwrap();
    assert_eq!(
        timed,
        Strategy::TimeBased {
            interval: Duration::from_secs_f64(2.5)
        }
    );
}

#[test]
fn unknown_strategy_name_is_fatal() {
    let result = Strategy::parse("smart_scenes", Some(10), Some(5.0));
    match result {
        Err(SiftError::InvalidStrategy(name)) => assert_eq!(name, "smart_scenes"),
        other => panic!("expected InvalidStrategy, got {other:?}"),
    }
}

#[test]
fn strategy_names_are_exact() {
    // No case folding or aliases; the contract is two exact names.
    assert!(Strategy::parse("MAX_SCREENSHOTS", Some(10), None).is_err());
    assert!(Strategy::parse("timebased", None, Some(1.0)).is_err());
}

#[test]
fn missing_or_zero_cap_is_rejected() {
    assert!(matches!(
        Strategy::parse("max_screenshots", None, None),
        Err(SiftError::InvalidCap)
    ));
    assert!(matches!(
        Strategy::parse("max_screenshots", Some(0), None),
        Err(SiftError::InvalidCap)
    ));
}

#[test]
fn bad_intervals_are_rejected() {
    // 1e300 is finite and positive but does not fit in a Duration; it must
    // come back as an error rather than panic during conversion.
    for interval in [
        None,
        Some(0.0),
        Some(-1.5),
        Some(f64::NAN),
        Some(f64::INFINITY),
        Some(1e300),
    ] {
        assert!(
            matches!(
                Strategy::parse("time_based", None, interval),
                Err(SiftError::InvalidInterval)
            ),
            "interval {interval:?} should be rejected",
        );
    }
}

#[test]
fn strategy_display_names_round_trip() {
    let strategy = Strategy::MaxPerFolder { cap: 3 };
    assert_eq!(strategy.name(), "max_screenshots");
    assert!(Strategy::parse(strategy.name(), Some(3), None).is_ok());

    let strategy = Strategy::TimeBased {
        interval: Duration::from_secs(1),
    };
    assert_eq!(strategy.name(), "time_based");
}

// ── RunOptions ─────────────────────────────────────────────────────

#[test]
fn options_defaults() {
    let options = RunOptions::new();
    let debug = format!("{options:?}");
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn options_batch_size_clamps_zero() {
    let options = RunOptions::new().with_batch_size(0);
    let debug = format!("{options:?}");
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn cancellation_token_is_shared_across_clones() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}
