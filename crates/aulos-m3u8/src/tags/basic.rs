//! Empty and value tags: playlist headers and per-segment value state.

use crate::attrs;
use crate::model::{ParsedPlaylist, PlaylistType};
use crate::state::SharedState;
use crate::warning::{ParseWarning, Reporter};

pub(super) fn m3u(playlist: &mut ParsedPlaylist, _shared: &mut SharedState) {
    playlist.m3u = true;
}

pub(super) fn independent_segments(playlist: &mut ParsedPlaylist, _shared: &mut SharedState) {
    playlist.independent_segments = true;
}

pub(super) fn end_list(playlist: &mut ParsedPlaylist, _shared: &mut SharedState) {
    playlist.end_list = true;
}

pub(super) fn i_frames_only(playlist: &mut ParsedPlaylist, _shared: &mut SharedState) {
    playlist.i_frames_only = true;
}

pub(super) fn discontinuity(_playlist: &mut ParsedPlaylist, shared: &mut SharedState) {
    shared.current_segment.is_discontinuity = true;
}

pub(super) fn gap(_playlist: &mut ParsedPlaylist, shared: &mut SharedState) {
    shared.current_segment.is_gap = true;
}

pub(super) fn version(
    value: &str,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(version) = attrs::parse_u32("EXT-X-VERSION", value, reporter) {
        playlist.version = Some(version);
    }
}

pub(super) fn target_duration(
    value: &str,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(duration) = attrs::parse_u64("EXT-X-TARGETDURATION", value, reporter) {
        playlist.target_duration = Some(duration);
    }
}

pub(super) fn media_sequence(
    value: &str,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(sequence) = attrs::parse_u64("EXT-X-MEDIA-SEQUENCE", value, reporter) {
        playlist.media_sequence = sequence;
    }
}

pub(super) fn discontinuity_sequence(
    value: &str,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(sequence) = attrs::parse_u64("EXT-X-DISCONTINUITY-SEQUENCE", value, reporter) {
        playlist.discontinuity_sequence = sequence;
    }
}

pub(super) fn playlist_type(
    value: &str,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    match PlaylistType::from_value(value) {
        Some(parsed) => playlist.playlist_type = Some(parsed),
        None => reporter.warn(ParseWarning::UnparsableValue {
            tag: "EXT-X-PLAYLIST-TYPE",
            value: value.to_string(),
        }),
    }
}

pub(super) fn allow_cache(
    value: &str,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    match value {
        "YES" => playlist.allow_cache = true,
        "NO" => playlist.allow_cache = false,
        other => reporter.warn(ParseWarning::UnparsableValue {
            tag: "EXT-X-ALLOW-CACHE",
            value: other.to_string(),
        }),
    }
}

/// `EXTINF:duration[,title]`.
pub(super) fn ext_inf(
    value: &str,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let (duration, title) = match value.split_once(',') {
        Some((duration, title)) => (duration, title),
        None => (value, ""),
    };
    let Some(duration) = attrs::parse_f64("EXTINF", duration.trim(), reporter) else {
        return;
    };

    shared.current_segment.duration = duration;
    let title = title.trim();
    shared.current_segment.title = (!title.is_empty()).then(|| title.to_string());
}

/// `EXT-X-BYTERANGE:length[@offset]`; a missing offset continues the
/// previous segment's range.
pub(super) fn byte_range(
    value: &str,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let fallback = match playlist.segments.last().and_then(|s| s.byte_range) {
        Some(previous) => Some(previous.end + 1),
        None => {
            if !value.contains('@') {
                reporter.warn(ParseWarning::FallbackApplied {
                    tag: "EXT-X-BYTERANGE",
                    detail: "no previous byte range to continue, assuming offset 0",
                });
            }
            Some(0)
        }
    };

    if let Some(range) = attrs::parse_byte_range("EXT-X-BYTERANGE", value, fallback, reporter) {
        shared.current_segment.byte_range = Some(range);
    }
}

/// `EXT-X-BITRATE`: kbit/s, carried forward until replaced.
pub(super) fn bitrate(
    value: &str,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(bitrate) = attrs::parse_u64("EXT-X-BITRATE", value, reporter) {
        shared.current_bitrate = Some(bitrate);
    }
}

pub(super) fn program_date_time(
    value: &str,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(date) = attrs::parse_date("EXT-X-PROGRAM-DATE-TIME", value, reporter) {
        shared.current_segment.program_date_time_start = Some(date);
    }
}
