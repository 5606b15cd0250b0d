#![forbid(unsafe_code)]

//! Streaming parser for HLS playlists (M3U8), multivariant and media.
//!
//! The input is consumed one character at a time, so playlists can be fed
//! whole or in arbitrarily-split chunks; a chunk may end in the middle of a
//! tag name or a quoted attribute value. The output is a typed
//! [`ParsedPlaylist`] with per-segment sequence numbers, timeline offsets,
//! and program-date-time extrapolation already derived.
//!
//! Malformed input never fails a parse: the offending tag is skipped, a
//! [`ParseWarning`] goes to the caller's warning callback, and the rest of
//! the playlist is still returned.
//!
//! ```
//! use aulos_m3u8::{ParseOptions, Parser, ParserOptions};
//!
//! let parser = Parser::new(ParserOptions::new());
//! let playlist = parser.parse_full(
//!     "#EXTM3U\n\
//!      #EXT-X-TARGETDURATION:6\n\
//!      #EXTINF:5.0,\n\
//!      a.ts\n\
//!      #EXT-X-ENDLIST\n",
//!     &ParseOptions::new(),
//! );
//! assert_eq!(playlist.segments[0].uri, "a.ts");
//! assert_eq!(playlist.segments[0].end_time, 5.0);
//! ```

mod assemble;
mod attrs;
mod config;
mod model;
mod parser;
mod scan;
mod state;
mod tags;
mod vars;
mod warning;

pub use attrs::AttributeMap;
pub use config::{
    AttributeTransform, CustomTag, CustomTagHandler, ParseOptions, ParserOptions, ValueTransform,
};
pub use model::{
    ByteRange, ContentSteering, DateRange, Define, EncryptionMethod, HdcpLevel, HintRange, Key,
    MapInfo, MediaType, ParsedPlaylist, PartInf, PartialSegment, PlaylistType, PreloadHint,
    PreloadHints, Rendition, RenditionGroups, RenditionReport, Resolution, Segment, ServerControl,
    SessionData, Skip, Start, VariantStream,
};
pub use parser::Parser;
pub use state::SharedState;
pub use warning::{ParseWarning, WarnHandler};
