//! Allocation-plan properties for both strategies.

use std::time::Duration;

use stillsift::{SamplePoint, SiftError, SkipReason, Strategy, VideoDescriptor, allocate};

fn video(name: &str, seconds: f64, frame_count: u64) -> VideoDescriptor {
    VideoDescriptor::new(name, Duration::from_secs_f64(seconds), frame_count)
}

fn frame_indices(points: &[SamplePoint]) -> Vec<u64> {
    points
        .iter()
        .map(|point| match point {
            SamplePoint::Frame(number) => *number,
            SamplePoint::Timestamp(_) => panic!("expected frame indices"),
        })
        .collect()
}

fn timestamps(points: &[SamplePoint]) -> Vec<f64> {
    points
        .iter()
        .map(|point| match point {
            SamplePoint::Timestamp(timestamp) => timestamp.as_secs_f64(),
            SamplePoint::Frame(_) => panic!("expected timestamps"),
        })
        .collect()
}

// ── max_screenshots ────────────────────────────────────────────────

#[test]
fn proportional_split_matches_duration_shares() {
    // 20s + 10s with a budget of 12: 8 + 4, spending the cap exactly.
    let videos = vec![video("a.mp4", 20.0, 600), video("b.mp4", 10.0, 300)];
    let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 12 }).unwrap();

    assert_eq!(plan.allocations[0].points.len(), 8);
    assert_eq!(plan.allocations[1].points.len(), 4);
    assert_eq!(plan.total_points(), 12);
}

#[test]
fn total_points_never_exceed_cap() {
    let cases: Vec<(Vec<VideoDescriptor>, u64)> = vec![
        (vec![video("a.mp4", 7.3, 219), video("b.mp4", 11.9, 357)], 5),
        (
            vec![
                video("a.mp4", 100.0, 2400),
                video("b.mp4", 33.3, 999),
                video("c.mp4", 0.5, 12),
            ],
            17,
        ),
        (vec![video("one.mkv", 59.9, 1437)], 1),
        (
            vec![
                video("a.mp4", 10.0, 240),
                video("b.mp4", 10.0, 240),
                video("c.mp4", 10.0, 240),
                video("d.mp4", 10.0, 240),
            ],
            3,
        ),
    ];

    for (videos, cap) in cases {
        let plan = allocate(&videos, &Strategy::MaxPerFolder { cap }).unwrap();
        assert!(
            plan.total_points() as u64 <= cap,
            "{} points allocated against a cap of {cap}",
            plan.total_points(),
        );
    }
}

#[test]
fn sequences_are_strictly_increasing_and_start_at_zero() {
    let videos = vec![
        video("a.mp4", 45.0, 1080),
        video("b.mp4", 30.0, 720),
        video("c.mp4", 15.0, 360),
    ];
    let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 18 }).unwrap();

    for allocation in &plan.allocations {
        let indices = frame_indices(&allocation.points);
        if indices.is_empty() {
            continue;
        }
        assert_eq!(indices[0], 0, "first sample point must be frame 0");
        assert!(
            indices.windows(2).all(|pair| pair[0] < pair[1]),
            "sample points must be strictly increasing: {indices:?}",
        );
    }
}

#[test]
fn indices_stay_below_frame_count() {
    let videos = vec![video("a.mp4", 60.0, 100), video("b.mp4", 60.0, 1000)];
    let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 40 }).unwrap();

    for (allocation, descriptor) in plan.allocations.iter().zip(&videos) {
        for index in frame_indices(&allocation.points) {
            assert!(index < descriptor.frame_count);
        }
    }
}

#[test]
fn zero_share_video_gets_exactly_zero_points() {
    // 1s of a 61s folder at cap 10: share = floor(10/61) = 0. No pity
    // screenshot.
    let videos = vec![video("long.mp4", 60.0, 1800), video("blip.mp4", 1.0, 30)];
    let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 10 }).unwrap();

    assert!(plan.allocations[1].points.is_empty());
    assert_eq!(plan.allocations[1].skipped, Some(SkipReason::ZeroShare));
    assert_eq!(plan.skipped_count(), 1);
}

#[test]
fn short_video_yields_fewer_points_than_its_share() {
    // One 3-frame video with the whole budget: step degenerates to 1 and
    // only 3 points exist. Reported, not an error.
    let videos = vec![video("tiny.mp4", 10.0, 3)];
    let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 8 }).unwrap();

    assert_eq!(frame_indices(&plan.allocations[0].points), vec![0, 1, 2]);
    assert!(plan.allocations[0].skipped.is_none());
}

#[test]
fn empty_folder_is_an_empty_input_error() {
    let result = allocate(&[], &Strategy::MaxPerFolder { cap: 10 });
    assert!(matches!(result, Err(SiftError::EmptyInput)));
}

#[test]
fn zero_total_duration_is_an_empty_input_error() {
    let videos = vec![video("broken.mp4", 0.0, 100)];
    let result = allocate(&videos, &Strategy::MaxPerFolder { cap: 10 });
    assert!(matches!(result, Err(SiftError::EmptyInput)));
}

#[test]
fn zero_cap_is_rejected() {
    let videos = vec![video("a.mp4", 10.0, 300)];
    let result = allocate(&videos, &Strategy::MaxPerFolder { cap: 0 });
    assert!(matches!(result, Err(SiftError::InvalidCap)));
}

// ── time_based ─────────────────────────────────────────────────────

#[test]
fn videos_shorter_than_interval_are_skipped() {
    let videos = vec![video("blip.mp4", 2.0, 48)];
    let plan = allocate(
        &videos,
        &Strategy::TimeBased {
            interval: Duration::from_secs(3),
        },
    )
    .unwrap();

    assert!(plan.allocations[0].points.is_empty());
    assert_eq!(
        plan.allocations[0].skipped,
        Some(SkipReason::ShorterThanInterval)
    );
}

#[test]
fn timestamps_are_respaced_across_the_full_duration() {
    // 10s at a 3s interval: k = 3 samples at 0, 10/3, 20/3 — not 0, 3, 6.
    let videos = vec![video("a.mp4", 10.0, 300)];
    let plan = allocate(
        &videos,
        &Strategy::TimeBased {
            interval: Duration::from_secs(3),
        },
    )
    .unwrap();

    let times = timestamps(&plan.allocations[0].points);
    assert_eq!(times.len(), 3);
    assert!((times[0] - 0.0).abs() < 1e-9);
    assert!((times[1] - 10.0 / 3.0).abs() < 1e-9);
    assert!((times[2] - 20.0 / 3.0).abs() < 1e-9);
}

#[test]
fn time_based_has_no_folder_cap() {
    // Each qualifying video contributes independently.
    let videos = vec![
        video("a.mp4", 100.0, 2400),
        video("b.mp4", 100.0, 2400),
        video("c.mp4", 100.0, 2400),
    ];
    let plan = allocate(
        &videos,
        &Strategy::TimeBased {
            interval: Duration::from_secs(1),
        },
    )
    .unwrap();

    assert_eq!(plan.total_points(), 300);
}

#[test]
fn duration_equal_to_interval_yields_one_point() {
    let videos = vec![video("a.mp4", 3.0, 72)];
    let plan = allocate(
        &videos,
        &Strategy::TimeBased {
            interval: Duration::from_secs(3),
        },
    )
    .unwrap();

    assert_eq!(timestamps(&plan.allocations[0].points), vec![0.0]);
}

// ── Both strategies ────────────────────────────────────────────────

#[test]
fn allocation_is_deterministic() {
    let videos = vec![
        video("a.mp4", 17.7, 531),
        video("b.mp4", 42.1, 1263),
        video("c.mp4", 3.14, 94),
    ];

    for strategy in [
        Strategy::MaxPerFolder { cap: 13 },
        Strategy::TimeBased {
            interval: Duration::from_secs_f64(2.5),
        },
    ] {
        let first = allocate(&videos, &strategy).unwrap();
        let second = allocate(&videos, &strategy).unwrap();
        assert_eq!(first, second, "plans differ across runs for {strategy}");
    }
}

#[test]
fn plan_preserves_input_order() {
    let videos = vec![
        video("zebra.mp4", 10.0, 300),
        video("aardvark.mp4", 20.0, 600),
    ];
    let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 9 }).unwrap();

    assert_eq!(plan.allocations[0].video, videos[0].path);
    assert_eq!(plan.allocations[1].video, videos[1].path);
}
