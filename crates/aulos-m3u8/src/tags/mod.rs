//! Per-tag processors and the dispatch table.
//!
//! Each known tag maps to one processor. Attribute processors declare the
//! attributes they cannot run without; the dispatcher checks those, applies
//! the caller's transforms and variable substitution, and only then lets the
//! processor touch the playlist. A failed check skips the single tag, never
//! the parse.

mod basic;
mod define;
mod media;
mod multivariant;

use tracing::debug;

use crate::attrs::AttributeMap;
use crate::config::{CustomTag, ParserOptions};
use crate::model::ParsedPlaylist;
use crate::state::SharedState;
use crate::vars;
use crate::warning::{ParseWarning, Reporter};

type EmptyFn = fn(&mut ParsedPlaylist, &mut SharedState);
type ValueFn = fn(&str, &mut ParsedPlaylist, &mut SharedState, &Reporter);
type AttrFn = fn(&AttributeMap, &mut ParsedPlaylist, &mut SharedState, &Reporter);

/// A registry entry: how one tag is processed.
#[derive(Clone, Copy)]
enum TagProcessor {
    /// Tag with no body.
    Empty(EmptyFn),
    /// Tag whose body is a bare value.
    Value(ValueFn),
    /// Tag whose body is an attribute list; `required` names abort
    /// processing when absent.
    Attributes {
        required: &'static [&'static str],
        run: AttrFn,
    },
}

fn lookup(key: &str) -> Option<TagProcessor> {
    use TagProcessor::{Attributes, Empty, Value};

    Some(match key {
        "EXTM3U" => Empty(basic::m3u),
        "EXT-X-INDEPENDENT-SEGMENTS" => Empty(basic::independent_segments),
        "EXT-X-ENDLIST" => Empty(basic::end_list),
        "EXT-X-I-FRAMES-ONLY" => Empty(basic::i_frames_only),
        "EXT-X-DISCONTINUITY" => Empty(basic::discontinuity),
        "EXT-X-GAP" => Empty(basic::gap),

        "EXT-X-VERSION" => Value(basic::version),
        "EXT-X-TARGETDURATION" => Value(basic::target_duration),
        "EXT-X-MEDIA-SEQUENCE" => Value(basic::media_sequence),
        "EXT-X-DISCONTINUITY-SEQUENCE" => Value(basic::discontinuity_sequence),
        "EXT-X-PLAYLIST-TYPE" => Value(basic::playlist_type),
        "EXT-X-ALLOW-CACHE" => Value(basic::allow_cache),
        "EXTINF" => Value(basic::ext_inf),
        "EXT-X-BYTERANGE" => Value(basic::byte_range),
        "EXT-X-BITRATE" => Value(basic::bitrate),
        "EXT-X-PROGRAM-DATE-TIME" => Value(basic::program_date_time),

        "EXT-X-START" => Attributes {
            required: &["TIME-OFFSET"],
            run: media::start,
        },
        "EXT-X-PART-INF" => Attributes {
            required: &["PART-TARGET"],
            run: media::part_inf,
        },
        "EXT-X-SERVER-CONTROL" => Attributes {
            required: &[],
            run: media::server_control,
        },
        "EXT-X-KEY" => Attributes {
            required: &["METHOD"],
            run: media::key,
        },
        "EXT-X-MAP" => Attributes {
            required: &["URI"],
            run: media::map,
        },
        "EXT-X-PART" => Attributes {
            required: &["URI", "DURATION"],
            run: media::part,
        },
        "EXT-X-SKIP" => Attributes {
            required: &["SKIPPED-SEGMENTS"],
            run: media::skip,
        },
        "EXT-X-DATERANGE" => Attributes {
            required: &["ID"],
            run: media::date_range,
        },
        "EXT-X-PRELOAD-HINT" => Attributes {
            required: &["TYPE", "URI"],
            run: media::preload_hint,
        },
        "EXT-X-RENDITION-REPORT" => Attributes {
            required: &["URI"],
            run: media::rendition_report,
        },

        "EXT-X-MEDIA" => Attributes {
            required: &["TYPE", "GROUP-ID", "NAME"],
            run: multivariant::media,
        },
        "EXT-X-STREAM-INF" => Attributes {
            required: &["BANDWIDTH"],
            run: multivariant::stream_inf,
        },
        "EXT-X-I-FRAME-STREAM-INF" => Attributes {
            required: &["BANDWIDTH", "URI"],
            run: multivariant::i_frame_stream_inf,
        },
        "EXT-X-SESSION-DATA" => Attributes {
            required: &["DATA-ID"],
            run: multivariant::session_data,
        },
        "EXT-X-SESSION-KEY" => Attributes {
            required: &["METHOD"],
            run: multivariant::session_key,
        },
        "EXT-X-CONTENT-STEERING" => Attributes {
            required: &["SERVER-URI"],
            run: multivariant::content_steering,
        },

        "EXT-X-DEFINE" => Attributes {
            required: &[],
            run: define::define,
        },

        _ => return None,
    })
}

/// Dispatch one recognized tag: ignore list, registry, custom handlers,
/// unsupported-tag warning, in that order.
pub(crate) fn dispatch(
    key: &str,
    value: Option<String>,
    attributes: Option<AttributeMap>,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    options: &ParserOptions,
    reporter: &Reporter,
) {
    if options.ignore_tags.contains(key) {
        reporter.warn(ParseWarning::IgnoredTag {
            tag: key.to_string(),
        });
        return;
    }

    match lookup(key) {
        Some(TagProcessor::Empty(run)) => run(playlist, shared),
        Some(TagProcessor::Value(run)) => {
            let value = match &options.transform_value {
                Some(transform) => transform(key, value),
                None => value,
            };
            match value {
                Some(value) => run(&value, playlist, shared, reporter),
                None => reporter.warn(ParseWarning::MissingTagValue {
                    tag: key.to_string(),
                }),
            }
        }
        Some(TagProcessor::Attributes { required, run }) => {
            let mut attributes = attributes.unwrap_or_default();
            if let Some(transform) = &options.transform_attributes {
                attributes = transform(key, attributes);
            }
            if shared.has_variables_for_substitution {
                for value in attributes.values_mut() {
                    *value = vars::substitute(value, &playlist.define, reporter);
                }
            }
            for &attribute in required {
                if !attributes.contains_key(attribute) {
                    reporter.warn(ParseWarning::MissingRequiredAttribute {
                        tag: key.to_string(),
                        attribute,
                    });
                    return;
                }
            }
            run(&attributes, playlist, shared, reporter);
        }
        None => match options.custom_tags.get(key) {
            Some(handler) => {
                debug!(tag = %key, "custom tag handler");
                let tag = CustomTag {
                    key,
                    value: value.as_deref(),
                    attributes: attributes.as_ref(),
                };
                handler(tag, &mut playlist.custom, shared);
            }
            None => reporter.warn(ParseWarning::UnsupportedTag {
                tag: key.to_string(),
            }),
        },
    }
}
