//! Media-playlist segment types.

use chrono::{DateTime, FixedOffset};

/// An inclusive byte range within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte of the range.
    pub start: u64,
    /// Last byte of the range (inclusive).
    pub end: u64,
}

/// Supported HLS encryption methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionMethod {
    /// No encryption.
    None,
    /// AES-128 CBC encryption of the whole segment.
    Aes128,
    /// Sample-based AES encryption.
    SampleAes,
    /// Sample-based AES in counter mode.
    SampleAesCtr,
    /// Any other method, stored as a raw string.
    Other(String),
}

impl EncryptionMethod {
    pub(crate) fn from_attribute(value: &str) -> Self {
        match value {
            "NONE" => Self::None,
            "AES-128" => Self::Aes128,
            "SAMPLE-AES" => Self::SampleAes,
            "SAMPLE-AES-CTR" => Self::SampleAesCtr,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A parsed `EXT-X-KEY` or `EXT-X-SESSION-KEY`.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// The encryption method that applies from this point on.
    pub method: EncryptionMethod,
    /// The URI of the encryption key. Absent when METHOD is NONE.
    pub uri: Option<String>,
    /// The key URI resolved against the base URL, when resolution succeeded.
    pub resolved_uri: Option<String>,
    /// The initialization vector, if specified.
    pub iv: Option<[u8; 16]>,
    /// The key format. Defaults to `identity`.
    pub key_format: String,
    /// The key format versions. Defaults to `[1]`.
    pub key_format_versions: Vec<u32>,
}

/// Media initialization section from `EXT-X-MAP`.
///
/// Carries forward across segments until replaced by another MAP tag.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    /// URI of the initialization section, as written in the playlist.
    pub uri: String,
    /// The URI resolved against the base URL (raw value when resolution
    /// failed).
    pub resolved_uri: String,
    /// Byte range of the initialization section within its resource.
    pub byte_range: Option<ByteRange>,
}

/// A partial segment from `EXT-X-PART` (low-latency delivery).
#[derive(Debug, Clone, PartialEq)]
pub struct PartialSegment {
    pub uri: String,
    pub resolved_uri: String,
    /// Duration in seconds.
    pub duration: f64,
    /// True when the part starts at an independent frame.
    pub independent: bool,
    pub byte_range: Option<ByteRange>,
    pub is_gap: bool,
}

/// One media segment, fully derived once its URI line is seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    /// URI as written in the playlist, after variable substitution.
    pub uri: String,
    /// URI resolved against the base URL (raw value when resolution failed).
    pub resolved_uri: String,
    /// Duration in seconds from `EXTINF`.
    pub duration: f64,
    /// Optional title from `EXTINF`.
    pub title: Option<String>,
    pub byte_range: Option<ByteRange>,
    /// Bitrate in kbit/s carried forward from `EXT-X-BITRATE`. Only applied
    /// to segments without an explicit byte range.
    pub bitrate: Option<u64>,
    pub is_discontinuity: bool,
    pub is_gap: bool,
    /// Encryption in effect for this segment.
    pub encryption: Option<Key>,
    /// Initialization section in effect for this segment.
    pub map: Option<MapInfo>,
    /// Partial segments announced ahead of this segment.
    pub parts: Vec<PartialSegment>,
    /// Wall-clock time of the first sample, from `EXT-X-PROGRAM-DATE-TIME`
    /// or extrapolated from the previous segment.
    pub program_date_time_start: Option<DateTime<FixedOffset>>,
    /// `program_date_time_start` plus the segment duration.
    pub program_date_time_end: Option<DateTime<FixedOffset>>,
    /// Media sequence number, derived from the previous segment or the
    /// playlist's `EXT-X-MEDIA-SEQUENCE`.
    pub media_sequence: u64,
    /// Discontinuity sequence number, incremented at each discontinuity.
    pub discontinuity_sequence: u64,
    /// Presentation start offset in seconds from the beginning of the parse
    /// (plus the caller-supplied base time).
    pub start_time: f64,
    /// `start_time` plus `duration`.
    pub end_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encryption_method_from_attribute() {
        assert_eq!(
            EncryptionMethod::from_attribute("AES-128"),
            EncryptionMethod::Aes128
        );
        assert_eq!(
            EncryptionMethod::from_attribute("NONE"),
            EncryptionMethod::None
        );
        assert_eq!(
            EncryptionMethod::from_attribute("FAIRPLAY"),
            EncryptionMethod::Other("FAIRPLAY".to_string())
        );
    }
}
