//! Property-based tests for timecode arithmetic and segmentation.

use databurn_core::burnin::{assemble, TimelineConfig};
use databurn_core::models::{total_frames, FrameReading};
use databurn_core::timecode::{FrameRate, Timecode};
use databurn_core::writers::{write_edl, write_fcpxml, EdlOptions, FcpxmlOptions};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn frame_rate() -> impl Strategy<Value = FrameRate> {
    prop_oneof![
        Just(FrameRate::FILM),
        Just(FrameRate::PAL),
        Just(FrameRate::NTSC_NDF),
        (1u32..=100).prop_map(|fps| FrameRate::new(fps).unwrap()),
    ]
}

fn timecode_fields() -> impl Strategy<Value = (FrameRate, u32, u32, u32, u32)> {
    frame_rate().prop_flat_map(|fps| (Just(fps), 0u32..100, 0u32..60, 0u32..60, 0..fps.get()))
}

/// One frame's reading: maybe a timecode (as total frames), maybe one of a
/// few filenames.
fn reading_parts() -> impl Strategy<Value = (Option<u64>, Option<u8>)> {
    (
        prop::option::of(0u64..500_000),
        prop::option::of(0u8..4),
    )
}

fn readings(parts: &[(Option<u64>, Option<u8>)], fps: FrameRate) -> Vec<FrameReading> {
    parts
        .iter()
        .enumerate()
        .map(|(i, (tc, name))| {
            FrameReading::new(
                i as u64,
                "",
                tc.map(|total| Timecode::from_frames(total, fps)),
                name.map(|n| format!("clip_{}.mov", n)),
            )
        })
        .collect()
}

// =============================================================================
// Timecode
// =============================================================================

proptest! {
    /// Formatting then parsing returns the same timecode.
    #[test]
    fn parse_format_roundtrip((fps, h, m, s, f) in timecode_fields()) {
        let tc = Timecode::new(h, m, s, f, fps).unwrap();
        let text = tc.to_string();
        prop_assert_eq!(Timecode::parse(&text, fps).unwrap(), tc);
        prop_assert_eq!(text.len(), 11);
    }

    /// Adding then subtracting the same count is the identity.
    #[test]
    fn add_frames_inverse(
        (fps, h, m, s, f) in timecode_fields(),
        n in -100_000_000i64..100_000_000,
    ) {
        let tc = Timecode::new(h, m, s, f, fps).unwrap();
        prop_assert_eq!(tc.add_frames(n, fps).add_frames(-n, fps), tc);
    }

    /// Total-frame conversion is lossless for every valid timecode.
    #[test]
    fn frames_roundtrip((fps, h, m, s, f) in timecode_fields()) {
        let tc = Timecode::new(h, m, s, f, fps).unwrap();
        prop_assert_eq!(Timecode::from_frames(tc.to_frames(fps), fps), tc);
    }
}

// =============================================================================
// Segmentation
// =============================================================================

proptest! {
    /// Segments partition the frames exactly.
    #[test]
    fn segments_partition_frames(parts in prop::collection::vec(reading_parts(), 0..200)) {
        let config = TimelineConfig::default();
        let assembly = assemble(&readings(&parts, config.fps), &config);

        prop_assert_eq!(total_frames(&assembly.segments), parts.len() as u64);
        prop_assert_eq!(assembly.resolved.len(), parts.len());
        prop_assert!(assembly.segments.iter().all(|s| s.frame_count > 0));
    }

    /// Segments are contiguous on the timeline from the configured base.
    #[test]
    fn segments_are_contiguous(
        parts in prop::collection::vec(reading_parts(), 1..200),
        fps in frame_rate(),
    ) {
        let config = TimelineConfig::with_fps(fps);
        let assembly = assemble(&readings(&parts, fps), &config);
        let segments = &assembly.segments;

        prop_assert_eq!(segments[0].timeline_start, config.timeline_base);
        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].timeline_end, pair[1].timeline_start);
            // Adjacent runs never share a name.
            prop_assert_ne!(&pair[0].filename, &pair[1].filename);
        }
        let last = &segments[segments.len() - 1];
        prop_assert_eq!(
            last.timeline_end,
            config.timeline_base.add_frames(parts.len() as i64, fps)
        );
    }

    /// The same readings always serialize to the same bytes.
    #[test]
    fn output_is_idempotent(parts in prop::collection::vec(reading_parts(), 0..100)) {
        let config = TimelineConfig::default();
        let input = readings(&parts, config.fps);

        let first = assemble(&input, &config);
        let second = assemble(&input, &config);

        let edl = EdlOptions::default();
        let xml = FcpxmlOptions::default();
        prop_assert_eq!(write_edl(&first.segments, &edl), write_edl(&second.segments, &edl));
        prop_assert_eq!(
            write_fcpxml(&first.segments, &xml),
            write_fcpxml(&second.segments, &xml)
        );
    }
}
