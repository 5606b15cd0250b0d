//! Transient working set threaded through every tag processor.

use url::Url;

use crate::model::{Define, Key, MapInfo, Segment, VariantStream};

/// Mutable context carried across lines during one parse.
///
/// Owned by the parser for the duration of a parse and reset afterwards.
/// Tag processors mutate it freely; custom-tag handlers observe it read-only.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    /// The segment under construction; finalized by the next URI line.
    pub current_segment: Segment,
    /// The variant under construction; finalized by the next URI line.
    pub current_variant: VariantStream,
    /// Encryption in effect, carried forward across segments until replaced.
    pub current_key: Option<Key>,
    /// Initialization section in effect, carried forward until replaced.
    pub current_map: Option<MapInfo>,
    /// Bitrate in effect, applied to segments without an explicit byte range.
    pub current_bitrate: Option<u64>,
    /// Base URL for URI resolution and QUERYPARAM variables.
    pub base_url: Option<Url>,
    /// Offset added to the first segment's start time, in seconds.
    pub base_time: f64,
    /// Caller-supplied variable scope resolved by `EXT-X-DEFINE:IMPORT`.
    pub base_define: Option<Define>,
    /// Set once any variable is defined; enables the substitution pass.
    pub has_variables_for_substitution: bool,
    /// Set once any `EXT-X-STREAM-INF` is seen.
    pub is_multivariant: bool,
}

impl SharedState {
    pub(crate) fn new(base_url: Option<Url>, base_define: Option<Define>, base_time: f64) -> Self {
        Self {
            base_url,
            base_time,
            base_define,
            ..Self::default()
        }
    }

    /// Reset to defaults once a parse completes.
    pub(crate) fn clean(&mut self) {
        *self = Self::default();
    }
}
