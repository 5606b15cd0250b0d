//! Attribute tags specific to multivariant playlists, plus session-level
//! tags that may appear in either playlist kind.

use crate::attrs::{self, AttributeMap};
use crate::model::{
    ContentSteering, HdcpLevel, MediaType, ParsedPlaylist, Rendition, SessionData, VariantStream,
};
use crate::state::SharedState;
use crate::tags::media::parse_key;
use crate::vars;
use crate::warning::{ParseWarning, Reporter};

/// Split a quoted `CODECS`-style list into its comma-separated entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fill the attributes shared between `EXT-X-STREAM-INF` and
/// `EXT-X-I-FRAME-STREAM-INF` into a variant.
fn fill_variant(
    tag: &'static str,
    attributes: &AttributeMap,
    variant: &mut VariantStream,
    reporter: &Reporter,
) {
    if let Some(bandwidth) = attrs::parse_u64(tag, &attributes["BANDWIDTH"], reporter) {
        variant.bandwidth = bandwidth;
    }
    if let Some(value) = attributes.get("AVERAGE-BANDWIDTH") {
        variant.average_bandwidth = attrs::parse_u64(tag, value, reporter);
    }
    if let Some(value) = attributes.get("SCORE") {
        variant.score = attrs::parse_f64(tag, value, reporter);
    }
    if let Some(value) = attributes.get("CODECS") {
        variant.codecs = split_list(value);
    }
    if let Some(value) = attributes.get("SUPPLEMENTAL-CODECS") {
        variant.supplemental_codecs = split_list(value);
    }
    if let Some(value) = attributes.get("RESOLUTION") {
        variant.resolution = attrs::parse_resolution(tag, value, reporter);
    }
    if let Some(value) = attributes.get("FRAME-RATE") {
        variant.frame_rate = attrs::parse_f64(tag, value, reporter);
    }
    if let Some(value) = attributes.get("HDCP-LEVEL") {
        variant.hdcp_level = HdcpLevel::from_attribute(value);
        if variant.hdcp_level.is_none() {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.clone(),
            });
        }
    }
    variant.video_range = attributes.get("VIDEO-RANGE").cloned();
    variant.audio = attributes.get("AUDIO").cloned();
    variant.video = attributes.get("VIDEO").cloned();
    variant.subtitles = attributes.get("SUBTITLES").cloned();
    variant.closed_captions = attributes.get("CLOSED-CAPTIONS").cloned();
    variant.pathway_id = attributes.get("PATHWAY-ID").cloned();
    variant.stable_variant_id = attributes.get("STABLE-VARIANT-ID").cloned();
}

/// `EXT-X-STREAM-INF`: starts a variant; the next URI line finalizes it.
pub(super) fn stream_inf(
    attributes: &AttributeMap,
    _playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    shared.is_multivariant = true;
    let mut variant = VariantStream::default();
    fill_variant("EXT-X-STREAM-INF", attributes, &mut variant, reporter);
    shared.current_variant = variant;
}

/// `EXT-X-I-FRAME-STREAM-INF`: a complete variant carrying its URI as an
/// attribute; no URI line follows.
pub(super) fn i_frame_stream_inf(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let mut variant = VariantStream::default();
    fill_variant(
        "EXT-X-I-FRAME-STREAM-INF",
        attributes,
        &mut variant,
        reporter,
    );
    variant.uri = attributes["URI"].clone();
    variant.resolved_uri = vars::resolve_or_fallback(&variant.uri, shared, reporter);
    playlist.i_frame_playlists.push(variant);
}

/// `EXT-X-MEDIA`: one rendition appended to its group.
pub(super) fn media(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let Some(media_type) = MediaType::from_attribute(&attributes["TYPE"]) else {
        reporter.warn(ParseWarning::UnparsableValue {
            tag: "EXT-X-MEDIA",
            value: attributes["TYPE"].clone(),
        });
        return;
    };

    let uri = attributes.get("URI").cloned();
    let resolved_uri = uri
        .as_deref()
        .map(|uri| vars::resolve_or_fallback(uri, shared, reporter));
    let group_id = attributes["GROUP-ID"].clone();

    let rendition = Rendition {
        media_type,
        group_id: group_id.clone(),
        name: attributes["NAME"].clone(),
        uri,
        resolved_uri,
        language: attributes.get("LANGUAGE").cloned(),
        assoc_language: attributes.get("ASSOC-LANGUAGE").cloned(),
        is_default: attributes
            .get("DEFAULT")
            .is_some_and(|v| attrs::parse_yes_no(v)),
        autoselect: attributes
            .get("AUTOSELECT")
            .is_some_and(|v| attrs::parse_yes_no(v)),
        forced: attributes
            .get("FORCED")
            .is_some_and(|v| attrs::parse_yes_no(v)),
        instream_id: attributes.get("INSTREAM-ID").cloned(),
        characteristics: attributes.get("CHARACTERISTICS").cloned(),
        channels: attributes.get("CHANNELS").cloned(),
        stable_rendition_id: attributes.get("STABLE-RENDITION-ID").cloned(),
    };

    playlist
        .rendition_groups
        .group_mut(media_type)
        .entry(group_id)
        .or_default()
        .push(rendition);
}

/// `EXT-X-SESSION-DATA`, keyed by `DATA-ID`; later entries replace earlier
/// ones with the same id.
pub(super) fn session_data(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let data_id = attributes["DATA-ID"].clone();
    let uri = attributes.get("URI").cloned();
    let resolved_uri = uri
        .as_deref()
        .map(|uri| vars::resolve_or_fallback(uri, shared, reporter));

    playlist.session_data.insert(
        data_id.clone(),
        SessionData {
            data_id,
            value: attributes.get("VALUE").cloned(),
            uri,
            resolved_uri,
            language: attributes.get("LANGUAGE").cloned(),
        },
    );
}

pub(super) fn session_key(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(key) = parse_key("EXT-X-SESSION-KEY", attributes, shared, reporter) {
        playlist.session_key = Some(key);
    }
}

pub(super) fn content_steering(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    let server_uri = attributes["SERVER-URI"].clone();
    let resolved_server_uri = vars::resolve_or_fallback(&server_uri, shared, reporter);
    playlist.content_steering = Some(ContentSteering {
        server_uri,
        resolved_server_uri,
        pathway_id: attributes.get("PATHWAY-ID").cloned(),
    });
}
