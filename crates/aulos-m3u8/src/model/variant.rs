//! Multivariant-playlist types: variant streams and rendition groups.

use std::collections::BTreeMap;

/// Pixel dimensions from a `RESOLUTION` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// `HDCP-LEVEL` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdcpLevel {
    None,
    Type0,
    Type1,
}

impl HdcpLevel {
    pub(crate) fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "NONE" => Some(Self::None),
            "TYPE-0" => Some(Self::Type0),
            "TYPE-1" => Some(Self::Type1),
            _ => None,
        }
    }
}

/// One variant stream from `EXT-X-STREAM-INF` (or an I-frame playlist from
/// `EXT-X-I-FRAME-STREAM-INF`, which carries its URI as an attribute).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantStream {
    /// URI of the media playlist, after variable substitution.
    pub uri: String,
    /// URI resolved against the base URL (raw value when resolution failed).
    pub resolved_uri: String,
    /// Peak bandwidth in bits per second.
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub score: Option<f64>,
    /// Individual codec strings from the `CODECS` attribute.
    pub codecs: Vec<String>,
    pub supplemental_codecs: Vec<String>,
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<f64>,
    pub hdcp_level: Option<HdcpLevel>,
    pub video_range: Option<String>,
    /// `GROUP-ID` of the associated audio rendition group.
    pub audio: Option<String>,
    /// `GROUP-ID` of the associated video rendition group.
    pub video: Option<String>,
    /// `GROUP-ID` of the associated subtitles rendition group.
    pub subtitles: Option<String>,
    /// `GROUP-ID` of the associated closed-captions group, or `NONE`.
    pub closed_captions: Option<String>,
    pub pathway_id: Option<String>,
    pub stable_variant_id: Option<String>,
}

/// The `TYPE` of an `EXT-X-MEDIA` rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
    Subtitles,
    ClosedCaptions,
}

impl MediaType {
    pub(crate) fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "AUDIO" => Some(Self::Audio),
            "VIDEO" => Some(Self::Video),
            "SUBTITLES" => Some(Self::Subtitles),
            "CLOSED-CAPTIONS" => Some(Self::ClosedCaptions),
            _ => None,
        }
    }
}

/// An alternate rendition from `EXT-X-MEDIA`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    pub media_type: MediaType,
    pub group_id: String,
    /// Human-readable name; unique within the group.
    pub name: String,
    pub uri: Option<String>,
    pub resolved_uri: Option<String>,
    pub language: Option<String>,
    pub assoc_language: Option<String>,
    pub is_default: bool,
    pub autoselect: bool,
    pub forced: bool,
    /// `INSTREAM-ID`, required for closed captions.
    pub instream_id: Option<String>,
    pub characteristics: Option<String>,
    pub channels: Option<String>,
    pub stable_rendition_id: Option<String>,
}

/// Renditions grouped by media type, then `GROUP-ID`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenditionGroups {
    pub audio: BTreeMap<String, Vec<Rendition>>,
    pub video: BTreeMap<String, Vec<Rendition>>,
    pub subtitles: BTreeMap<String, Vec<Rendition>>,
    pub closed_captions: BTreeMap<String, Vec<Rendition>>,
}

impl RenditionGroups {
    /// The group map for one media type.
    pub fn group(&self, media_type: MediaType) -> &BTreeMap<String, Vec<Rendition>> {
        match media_type {
            MediaType::Audio => &self.audio,
            MediaType::Video => &self.video,
            MediaType::Subtitles => &self.subtitles,
            MediaType::ClosedCaptions => &self.closed_captions,
        }
    }

    pub(crate) fn group_mut(
        &mut self,
        media_type: MediaType,
    ) -> &mut BTreeMap<String, Vec<Rendition>> {
        match media_type {
            MediaType::Audio => &mut self.audio,
            MediaType::Video => &mut self.video,
            MediaType::Subtitles => &mut self.subtitles,
            MediaType::ClosedCaptions => &mut self.closed_captions,
        }
    }
}
