//! Typed playlist model.

mod playlist;
mod segment;
mod variant;

pub use playlist::{
    ContentSteering, DateRange, Define, HintRange, ParsedPlaylist, PartInf, PlaylistType,
    PreloadHint, PreloadHints, RenditionReport, ServerControl, SessionData, Skip, Start,
};
pub use segment::{ByteRange, EncryptionMethod, Key, MapInfo, PartialSegment, Segment};
pub use variant::{HdcpLevel, MediaType, Rendition, RenditionGroups, Resolution, VariantStream};
