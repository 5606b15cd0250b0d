//! Attribute tags specific to media playlists, including low-latency
//! delivery and daterange annotations.

use crate::attrs::{self, AttributeMap};
use crate::model::{
    DateRange, EncryptionMethod, HintRange, Key, MapInfo, ParsedPlaylist, PartInf, PartialSegment,
    PreloadHint, RenditionReport, ServerControl, Skip, Start,
};
use crate::state::SharedState;
use crate::vars;
use crate::warning::{ParseWarning, Reporter};

pub(super) fn start(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    let Some(time_offset) =
        attrs::parse_f64("EXT-X-START", &attributes["TIME-OFFSET"], reporter)
    else {
        return;
    };
    playlist.start = Some(Start {
        time_offset,
        precise: attributes
            .get("PRECISE")
            .is_some_and(|v| attrs::parse_yes_no(v)),
    });
}

pub(super) fn part_inf(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    let Some(part_target) =
        attrs::parse_f64("EXT-X-PART-INF", &attributes["PART-TARGET"], reporter)
    else {
        return;
    };
    playlist.part_inf = Some(PartInf { part_target });
}

pub(super) fn server_control(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    let mut control = ServerControl::default();
    if let Some(value) = attributes.get("CAN-SKIP-UNTIL") {
        control.can_skip_until = attrs::parse_f64("EXT-X-SERVER-CONTROL", value, reporter);
    }
    if let Some(value) = attributes.get("HOLD-BACK") {
        control.hold_back = attrs::parse_f64("EXT-X-SERVER-CONTROL", value, reporter);
    }
    if let Some(value) = attributes.get("PART-HOLD-BACK") {
        control.part_hold_back = attrs::parse_f64("EXT-X-SERVER-CONTROL", value, reporter);
    }
    control.can_skip_dateranges = attributes
        .get("CAN-SKIP-DATERANGES")
        .is_some_and(|v| attrs::parse_yes_no(v));
    control.can_block_reload = attributes
        .get("CAN-BLOCK-RELOAD")
        .is_some_and(|v| attrs::parse_yes_no(v));
    playlist.server_control = Some(control);
}

/// Build a [`Key`] from `EXT-X-KEY`-shaped attributes. Shared with
/// `EXT-X-SESSION-KEY`. Returns `None` when a non-NONE method has no URI.
pub(super) fn parse_key(
    tag: &'static str,
    attributes: &AttributeMap,
    shared: &SharedState,
    reporter: &Reporter,
) -> Option<Key> {
    let method = EncryptionMethod::from_attribute(&attributes["METHOD"]);

    let uri = attributes.get("URI").cloned();
    if uri.is_none() && method != EncryptionMethod::None {
        reporter.warn(ParseWarning::MissingRequiredAttribute {
            tag: tag.to_string(),
            attribute: "URI",
        });
        return None;
    }
    let resolved_uri = uri
        .as_deref()
        .map(|uri| vars::resolve_or_fallback(uri, shared, reporter));

    let iv = attributes
        .get("IV")
        .and_then(|value| attrs::parse_iv(tag, value, reporter));
    let key_format = attributes
        .get("KEYFORMAT")
        .cloned()
        .unwrap_or_else(|| "identity".to_string());
    let key_format_versions = match attributes.get("KEYFORMATVERSIONS") {
        Some(value) => value
            .split('/')
            .filter_map(|version| attrs::parse_u32(tag, version, reporter))
            .collect(),
        None => vec![1],
    };

    Some(Key {
        method,
        uri,
        resolved_uri,
        iv,
        key_format,
        key_format_versions,
    })
}

pub(super) fn key(
    attributes: &AttributeMap,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(key) = parse_key("EXT-X-KEY", attributes, shared, reporter) {
        shared.current_key = Some(key);
    }
}

pub(super) fn map(
    attributes: &AttributeMap,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let uri = attributes["URI"].clone();
    let resolved_uri = vars::resolve_or_fallback(&uri, shared, reporter);
    let byte_range = attributes.get("BYTERANGE").and_then(|value| {
        attrs::parse_byte_range("EXT-X-MAP", value, Some(0), reporter)
    });

    shared.current_map = Some(MapInfo {
        uri,
        resolved_uri,
        byte_range,
    });
}

/// `EXT-X-PART`: a partial segment of the segment under construction.
pub(super) fn part(
    attributes: &AttributeMap,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let Some(duration) = attrs::parse_f64("EXT-X-PART", &attributes["DURATION"], reporter) else {
        return;
    };

    let uri = attributes["URI"].clone();
    let resolved_uri = vars::resolve_or_fallback(&uri, shared, reporter);

    // A BYTERANGE without an offset continues the previous part's range.
    let fallback_offset = shared
        .current_segment
        .parts
        .last()
        .and_then(|part| part.byte_range)
        .map(|range| range.end + 1);
    let byte_range = attributes.get("BYTERANGE").and_then(|value| {
        attrs::parse_byte_range("EXT-X-PART", value, fallback_offset, reporter)
    });

    shared.current_segment.parts.push(PartialSegment {
        uri,
        resolved_uri,
        duration,
        independent: attributes
            .get("INDEPENDENT")
            .is_some_and(|v| attrs::parse_yes_no(v)),
        byte_range,
        is_gap: attributes.get("GAP").is_some_and(|v| attrs::parse_yes_no(v)),
    });
}

pub(super) fn skip(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    let Some(skipped_segments) =
        attrs::parse_u64("EXT-X-SKIP", &attributes["SKIPPED-SEGMENTS"], reporter)
    else {
        return;
    };

    // Removed daterange IDs are tab-separated; an absent attribute means
    // none were removed.
    let recently_removed_dateranges = attributes
        .get("RECENTLY-REMOVED-DATERANGES")
        .map(|value| value.split('\t').map(str::to_string).collect())
        .unwrap_or_default();

    playlist.skip = Some(Skip {
        skipped_segments,
        recently_removed_dateranges,
    });
}

pub(super) fn date_range(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    _shared: &mut SharedState,
    reporter: &Reporter,
) {
    const TAG: &str = "EXT-X-DATERANGE";

    let mut range = DateRange {
        id: attributes["ID"].clone(),
        class: attributes.get("CLASS").cloned(),
        start_date: None,
        cue: attributes.get("CUE").cloned(),
        end_date: None,
        duration: None,
        planned_duration: None,
        end_on_next: attributes
            .get("END-ON-NEXT")
            .is_some_and(|v| attrs::parse_yes_no(v)),
        scte35_cmd: None,
        scte35_out: None,
        scte35_in: None,
        client_attributes: Default::default(),
    };

    if let Some(value) = attributes.get("START-DATE") {
        range.start_date = attrs::parse_date(TAG, value, reporter);
    }
    if let Some(value) = attributes.get("END-DATE") {
        range.end_date = attrs::parse_date(TAG, value, reporter);
    }
    if let Some(value) = attributes.get("DURATION") {
        range.duration = attrs::parse_f64(TAG, value, reporter);
    }
    if let Some(value) = attributes.get("PLANNED-DURATION") {
        range.planned_duration = attrs::parse_f64(TAG, value, reporter);
    }
    if let Some(value) = attributes.get("SCTE35-CMD") {
        range.scte35_cmd = attrs::parse_hex_bytes(TAG, value, reporter);
    }
    if let Some(value) = attributes.get("SCTE35-OUT") {
        range.scte35_out = attrs::parse_hex_bytes(TAG, value, reporter);
    }
    if let Some(value) = attributes.get("SCTE35-IN") {
        range.scte35_in = attrs::parse_hex_bytes(TAG, value, reporter);
    }
    for (name, value) in attributes {
        if name.starts_with("X-") {
            range
                .client_attributes
                .insert(name.clone(), value.clone());
        }
    }

    playlist.date_ranges.push(range);
}

/// `EXT-X-PRELOAD-HINT`: where the next part or map will appear.
pub(super) fn preload_hint(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    const TAG: &str = "EXT-X-PRELOAD-HINT";

    let uri = attributes["URI"].clone();
    let resolved_uri = vars::resolve_or_fallback(&uri, shared, reporter);

    let byterange_start = attributes
        .get("BYTERANGE-START")
        .and_then(|value| attrs::parse_u64(TAG, value, reporter));
    let byterange_length = attributes
        .get("BYTERANGE-LENGTH")
        .and_then(|value| attrs::parse_u64(TAG, value, reporter));
    let range = match (byterange_start, byterange_length) {
        (None, None) => None,
        (Some(start), None) => Some(HintRange::OpenEnded { start }),
        (start, Some(length)) => {
            let start = start.unwrap_or(0);
            Some(HintRange::Bounded(crate::model::ByteRange {
                start,
                end: (start + length).saturating_sub(1),
            }))
        }
    };

    let hint = PreloadHint {
        uri,
        resolved_uri,
        range,
    };
    match attributes["TYPE"].as_str() {
        "PART" => playlist.preload_hints.part = Some(hint),
        "MAP" => playlist.preload_hints.map = Some(hint),
        other => reporter.warn(ParseWarning::UnparsableValue {
            tag: TAG,
            value: other.to_string(),
        }),
    }
}

pub(super) fn rendition_report(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    const TAG: &str = "EXT-X-RENDITION-REPORT";

    let uri = attributes["URI"].clone();
    let resolved_uri = vars::resolve_or_fallback(&uri, shared, reporter);

    playlist.rendition_reports.push(RenditionReport {
        uri,
        resolved_uri,
        last_msn: attributes
            .get("LAST-MSN")
            .and_then(|value| attrs::parse_u64(TAG, value, reporter)),
        last_part: attributes
            .get("LAST-PART")
            .and_then(|value| attrs::parse_u64(TAG, value, reporter)),
    });
}
