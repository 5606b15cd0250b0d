//! Folding URI lines into finalized segments and variants.

use chrono::Duration;

use crate::model::ParsedPlaylist;
use crate::state::SharedState;
use crate::vars;
use crate::warning::{ParseWarning, Reporter};

/// Finalize the entity accumulated so far with the URI line that closes it:
/// a variant stream on multivariant playlists, a media segment otherwise.
pub(crate) fn handle_uri(
    raw_uri: &str,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let uri = vars::substitute_if_enabled(raw_uri, &playlist.define, shared, reporter);
    let resolved_uri = vars::resolve_or_fallback(&uri, shared, reporter);

    if shared.is_multivariant {
        let mut variant = std::mem::take(&mut shared.current_variant);
        variant.uri = uri;
        variant.resolved_uri = resolved_uri;
        playlist.variant_streams.push(variant);
        return;
    }

    let mut segment = std::mem::take(&mut shared.current_segment);
    segment.uri = uri;
    segment.resolved_uri = resolved_uri;

    if let Some(target) = playlist.target_duration {
        if segment.duration > target as f64 {
            reporter.warn(ParseWarning::DurationExceedsTarget {
                duration: segment.duration,
                target,
            });
        }
    }

    segment.encryption = shared.current_key.clone();
    segment.map = shared.current_map.clone();
    // An explicit byte range makes the carried bitrate meaningless for this
    // segment: it measures the whole resource.
    if segment.byte_range.is_none() {
        segment.bitrate = shared.current_bitrate;
    }

    match playlist.segments.last() {
        Some(previous) => {
            segment.media_sequence = previous.media_sequence + 1;
            segment.discontinuity_sequence =
                previous.discontinuity_sequence + u64::from(segment.is_discontinuity);
            segment.start_time = previous.end_time;
            if segment.program_date_time_start.is_none() {
                if let Some(previous_start) = previous.program_date_time_start {
                    segment.program_date_time_start =
                        Some(previous_start + millis(previous.duration));
                }
            }
        }
        None => {
            segment.media_sequence = playlist.media_sequence;
            segment.discontinuity_sequence = playlist.discontinuity_sequence;
            segment.start_time = shared.base_time;
        }
    }
    segment.end_time = segment.start_time + segment.duration;
    if let Some(start) = segment.program_date_time_start {
        segment.program_date_time_end = Some(start + millis(segment.duration));
    }

    playlist.segments.push(segment);
}

fn millis(seconds: f64) -> Duration {
    Duration::milliseconds((seconds * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;

    #[test]
    fn sequences_and_times_chain_between_segments() {
        let mut playlist = ParsedPlaylist::default();
        let mut shared = SharedState::default();
        let reporter = Reporter::default();

        shared.current_segment = Segment {
            duration: 5.0,
            ..Default::default()
        };
        handle_uri("a.ts", &mut playlist, &mut shared, &reporter);

        shared.current_segment = Segment {
            duration: 4.0,
            is_discontinuity: true,
            ..Default::default()
        };
        handle_uri("b.ts", &mut playlist, &mut shared, &reporter);

        let [first, second] = &playlist.segments[..] else {
            panic!("expected two segments");
        };
        assert_eq!(first.media_sequence, 0);
        assert_eq!(second.media_sequence, 1);
        assert_eq!(first.discontinuity_sequence, 0);
        assert_eq!(second.discontinuity_sequence, 1);
        assert_eq!(first.end_time, 5.0);
        assert_eq!(second.start_time, 5.0);
        assert_eq!(second.end_time, 9.0);
    }

    #[test]
    fn program_date_time_extrapolates_forward() {
        let mut playlist = ParsedPlaylist::default();
        let mut shared = SharedState::default();
        let reporter = Reporter::default();

        let start = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00.000Z").unwrap();
        shared.current_segment = Segment {
            duration: 6.006,
            program_date_time_start: Some(start),
            ..Default::default()
        };
        handle_uri("a.ts", &mut playlist, &mut shared, &reporter);

        shared.current_segment = Segment {
            duration: 6.0,
            ..Default::default()
        };
        handle_uri("b.ts", &mut playlist, &mut shared, &reporter);

        let expected = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:06.006Z").unwrap();
        assert_eq!(playlist.segments[0].program_date_time_end, Some(expected));
        assert_eq!(playlist.segments[1].program_date_time_start, Some(expected));
        assert_eq!(
            playlist.segments[1].program_date_time_end,
            Some(chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:12.006Z").unwrap())
        );
    }

    #[test]
    fn carried_bitrate_skips_segments_with_byte_ranges() {
        let mut playlist = ParsedPlaylist::default();
        let mut shared = SharedState::default();
        let reporter = Reporter::default();

        shared.current_bitrate = Some(8000);
        shared.current_segment = Segment {
            duration: 4.0,
            ..Default::default()
        };
        handle_uri("plain.ts", &mut playlist, &mut shared, &reporter);

        shared.current_segment = Segment {
            duration: 4.0,
            byte_range: Some(crate::model::ByteRange { start: 0, end: 999 }),
            ..Default::default()
        };
        handle_uri("ranged.ts", &mut playlist, &mut shared, &reporter);

        assert_eq!(playlist.segments[0].bitrate, Some(8000));
        assert_eq!(playlist.segments[1].bitrate, None);
    }
}
