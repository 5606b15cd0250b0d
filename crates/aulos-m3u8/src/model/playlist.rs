//! The parsed playlist aggregate and its playlist-level companion types.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset};

use super::segment::{ByteRange, Key, Segment};
use super::variant::{RenditionGroups, VariantStream};

/// `EXT-X-PLAYLIST-TYPE` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistType {
    /// The playlist cannot change.
    Vod,
    /// The playlist is append only.
    Event,
}

impl PlaylistType {
    pub(crate) fn from_value(value: &str) -> Option<Self> {
        match value {
            "VOD" => Some(Self::Vod),
            "EVENT" => Some(Self::Event),
            _ => None,
        }
    }
}

/// `EXT-X-START`: preferred playback start point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Start {
    /// Offset in seconds; negative values are from the end.
    pub time_offset: f64,
    pub precise: bool,
}

/// `EXT-X-PART-INF`: advertised partial-segment target duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartInf {
    /// Upper bound on partial segment duration, in seconds.
    pub part_target: f64,
}

/// `EXT-X-SERVER-CONTROL`: delivery directives for low-latency clients.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ServerControl {
    pub can_skip_until: Option<f64>,
    pub can_skip_dateranges: bool,
    pub can_block_reload: bool,
    pub hold_back: Option<f64>,
    pub part_hold_back: Option<f64>,
}

/// `EXT-X-SKIP`: a server-applied delta update.
#[derive(Debug, Clone, PartialEq)]
pub struct Skip {
    /// Number of segments replaced by the skip tag.
    pub skipped_segments: u64,
    /// IDs of dateranges removed since the last full playlist.
    pub recently_removed_dateranges: Vec<String>,
}

/// Byte range of a preload hint. Open-ended when only a start is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintRange {
    Bounded(ByteRange),
    OpenEnded { start: u64 },
}

/// One `EXT-X-PRELOAD-HINT` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadHint {
    pub uri: String,
    pub resolved_uri: String,
    pub range: Option<HintRange>,
}

/// Preload hints keyed by their `TYPE` attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreloadHints {
    pub part: Option<PreloadHint>,
    pub map: Option<PreloadHint>,
}

/// One `EXT-X-RENDITION-REPORT` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenditionReport {
    pub uri: String,
    pub resolved_uri: String,
    /// Last media sequence number of the reported rendition.
    pub last_msn: Option<u64>,
    /// Last partial segment index of the reported rendition.
    pub last_part: Option<u64>,
}

/// One `EXT-X-SESSION-DATA` entry, keyed in the playlist by `DATA-ID`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub data_id: String,
    pub value: Option<String>,
    pub uri: Option<String>,
    pub resolved_uri: Option<String>,
    pub language: Option<String>,
}

/// `EXT-X-CONTENT-STEERING`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSteering {
    pub server_uri: String,
    pub resolved_server_uri: String,
    pub pathway_id: Option<String>,
}

/// `EXT-X-DATERANGE`: a time range annotation, typically ad markers.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub id: String,
    pub class: Option<String>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub cue: Option<String>,
    pub end_date: Option<DateTime<FixedOffset>>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    pub planned_duration: Option<f64>,
    pub end_on_next: bool,
    pub scte35_cmd: Option<Vec<u8>>,
    pub scte35_out: Option<Vec<u8>>,
    pub scte35_in: Option<Vec<u8>>,
    /// All attributes whose name starts with `X-`, unparsed.
    pub client_attributes: BTreeMap<String, String>,
}

/// Variable scopes populated by `EXT-X-DEFINE`.
///
/// Substitution looks names up in `name`, then `import`, then `query_param`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Define {
    pub name: HashMap<String, String>,
    pub import: HashMap<String, String>,
    pub query_param: HashMap<String, String>,
}

impl Define {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.import.is_empty() && self.query_param.is_empty()
    }
}

/// A fully parsed playlist, multivariant or media.
///
/// Populated incrementally while parsing and handed to the caller by
/// [`crate::Parser::parse_full`] or [`crate::Parser::done`]. Either
/// `segments` or `variant_streams` is populated, not both (a playlist mixing
/// the two is tolerated but malformed).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPlaylist {
    /// Whether the leading `#EXTM3U` was seen.
    pub m3u: bool,
    pub version: Option<u32>,
    pub independent_segments: bool,
    pub start: Option<Start>,
    pub end_list: bool,
    pub i_frames_only: bool,
    pub playlist_type: Option<PlaylistType>,
    /// Upper bound on segment duration, in seconds.
    pub target_duration: Option<u64>,
    /// Media sequence number of the first segment.
    pub media_sequence: u64,
    /// Discontinuity sequence number of the first segment.
    pub discontinuity_sequence: u64,
    /// `false` when the playlist contains `#EXT-X-ALLOW-CACHE:NO`
    /// (HLS v3, deprecated in v7).
    pub allow_cache: bool,
    pub part_inf: Option<PartInf>,
    pub server_control: Option<ServerControl>,
    pub skip: Option<Skip>,
    pub preload_hints: PreloadHints,
    pub rendition_reports: Vec<RenditionReport>,
    pub define: Define,
    pub session_key: Option<Key>,
    pub session_data: BTreeMap<String, SessionData>,
    pub content_steering: Option<ContentSteering>,
    /// Media-playlist body, in order of appearance.
    pub segments: Vec<Segment>,
    pub date_ranges: Vec<DateRange>,
    /// Multivariant-playlist body, in order of appearance.
    pub variant_streams: Vec<VariantStream>,
    pub i_frame_playlists: Vec<VariantStream>,
    pub rendition_groups: RenditionGroups,
    /// Opaque storage mutated only by caller-supplied custom-tag handlers.
    pub custom: serde_json::Map<String, serde_json::Value>,
}

impl Default for ParsedPlaylist {
    fn default() -> Self {
        Self {
            m3u: false,
            version: None,
            independent_segments: false,
            start: None,
            end_list: false,
            i_frames_only: false,
            playlist_type: None,
            target_duration: None,
            media_sequence: 0,
            discontinuity_sequence: 0,
            allow_cache: true,
            part_inf: None,
            server_control: None,
            skip: None,
            preload_hints: PreloadHints::default(),
            rendition_reports: Vec::new(),
            define: Define::default(),
            session_key: None,
            session_data: BTreeMap::new(),
            content_steering: None,
            segments: Vec::new(),
            date_ranges: Vec::new(),
            variant_streams: Vec::new(),
            i_frame_playlists: Vec::new(),
            rendition_groups: RenditionGroups::default(),
            custom: serde_json::Map::new(),
        }
    }
}

impl ParsedPlaylist {
    /// True when any `EXT-X-STREAM-INF` was seen.
    pub fn is_multivariant(&self) -> bool {
        !self.variant_streams.is_empty()
    }

    /// Sum of all segment durations, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}
