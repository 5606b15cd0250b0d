//! Character-level scanner for the line structure of an M3U8 document.
//!
//! The scanner accepts one character per call and emits at most one
//! structural event per call, so input may be split anywhere, including in
//! the middle of a tag name or a quoted attribute value. State is retained
//! between calls; the caller injects a synthetic trailing newline through
//! [`Scanner::finish`] so the last line is recognized even without one.

use crate::attrs::{self, AttributeMap, TagBody};

/// A structural event recognized in the input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanEvent {
    /// A `#EXT…` tag line. Exactly one of `value` and `attributes` is set
    /// when the tag carried a body.
    Tag {
        key: String,
        value: Option<String>,
        attributes: Option<AttributeMap>,
    },
    /// A non-comment, non-blank line: a URI.
    Uri(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// At the start of input or just after a newline.
    LineStart,
    /// Inside a `#` line that cannot be an HLS tag.
    Comment,
    /// Accumulating a tag name after `#`.
    TagName,
    /// Accumulating a tag body after the first `:`.
    TagBody { quoted: bool },
    /// Accumulating a URI line.
    Uri,
}

#[derive(Debug)]
pub(crate) struct Scanner {
    state: State,
    name: String,
    body: String,
}

impl Scanner {
    pub(crate) fn new() -> Self {
        Self {
            state: State::LineStart,
            name: String::new(),
            body: String::new(),
        }
    }

    /// Feed one character, possibly completing a line.
    pub(crate) fn push_char(&mut self, ch: char) -> Option<ScanEvent> {
        // Lines may end in CRLF; the carriage return carries no structure.
        if ch == '\r' {
            return None;
        }

        match self.state {
            State::LineStart => match ch {
                '\n' => None,
                '#' => {
                    self.state = State::TagName;
                    self.name.clear();
                    None
                }
                ch if ch.is_whitespace() => None,
                ch => {
                    self.state = State::Uri;
                    self.body.clear();
                    self.body.push(ch);
                    None
                }
            },
            State::Comment => {
                if ch == '\n' {
                    self.state = State::LineStart;
                }
                None
            }
            State::TagName => match ch {
                '\n' => {
                    self.state = State::LineStart;
                    if self.name.starts_with("EXT") {
                        Some(ScanEvent::Tag {
                            key: std::mem::take(&mut self.name),
                            value: None,
                            attributes: None,
                        })
                    } else {
                        None
                    }
                }
                ':' => {
                    if self.name.starts_with("EXT") {
                        self.state = State::TagBody { quoted: false };
                        self.body.clear();
                    } else {
                        self.state = State::Comment;
                    }
                    None
                }
                ch => {
                    self.name.push(ch);
                    // Anything that cannot grow into an `EXT` prefix is a
                    // comment; stop accumulating as early as possible.
                    let viable = if self.name.len() < 3 {
                        "EXT".starts_with(self.name.as_str())
                    } else {
                        self.name.starts_with("EXT")
                    };
                    if !viable {
                        self.state = State::Comment;
                        self.name.clear();
                    }
                    None
                }
            },
            State::TagBody { quoted } => match ch {
                // A newline terminates the tag even inside an unbalanced
                // quote; the body is handed off as-is.
                '\n' => {
                    self.state = State::LineStart;
                    let key = std::mem::take(&mut self.name);
                    let body = std::mem::take(&mut self.body);
                    let (value, attributes) = match attrs::classify_body(&body) {
                        TagBody::Value(value) => (Some(value), None),
                        TagBody::Attributes(map) => (None, Some(map)),
                    };
                    Some(ScanEvent::Tag {
                        key,
                        value,
                        attributes,
                    })
                }
                '"' => {
                    self.state = State::TagBody { quoted: !quoted };
                    self.body.push('"');
                    None
                }
                ch => {
                    self.body.push(ch);
                    None
                }
            },
            State::Uri => {
                if ch == '\n' {
                    self.state = State::LineStart;
                    let line = std::mem::take(&mut self.body);
                    Some(ScanEvent::Uri(line.trim().to_string()))
                } else {
                    self.body.push(ch);
                    None
                }
            }
        }
    }

    /// Inject the synthetic trailing newline at end of input.
    pub(crate) fn finish(&mut self) -> Option<ScanEvent> {
        self.push_char('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<ScanEvent> {
        let mut scanner = Scanner::new();
        let mut events: Vec<ScanEvent> = input
            .chars()
            .filter_map(|ch| scanner.push_char(ch))
            .collect();
        events.extend(scanner.finish());
        events
    }

    #[test]
    fn recognizes_tags_uris_and_skips_comments() {
        let events = scan("#EXTM3U\n# a comment\n#EXT-X-VERSION:6\nsegment0.ts\n\n");
        assert_eq!(
            events,
            vec![
                ScanEvent::Tag {
                    key: "EXTM3U".to_string(),
                    value: None,
                    attributes: None,
                },
                ScanEvent::Tag {
                    key: "EXT-X-VERSION".to_string(),
                    value: Some("6".to_string()),
                    attributes: None,
                },
                ScanEvent::Uri("segment0.ts".to_string()),
            ]
        );
    }

    #[test]
    fn last_line_without_newline_is_emitted() {
        assert_eq!(
            scan("#EXTM3U\nsegment.ts"),
            vec![
                ScanEvent::Tag {
                    key: "EXTM3U".to_string(),
                    value: None,
                    attributes: None,
                },
                ScanEvent::Uri("segment.ts".to_string()),
            ]
        );
    }

    #[test]
    fn crlf_line_endings_are_transparent() {
        assert_eq!(scan("#EXT-X-ENDLIST\r\n"), scan("#EXT-X-ENDLIST\n"));
        assert_eq!(scan("seg.ts\r\n"), vec![ScanEvent::Uri("seg.ts".to_string())]);
    }

    #[test]
    fn attribute_bodies_are_split_with_quotes_respected() {
        let events = scan("#EXT-X-STREAM-INF:BANDWIDTH=1200000,CODECS=\"avc1,mp4a\"\n");
        let ScanEvent::Tag {
            key,
            value,
            attributes,
        } = &events[0]
        else {
            panic!("expected a tag event");
        };
        assert_eq!(key, "EXT-X-STREAM-INF");
        assert_eq!(*value, None);
        let attributes = attributes.as_ref().unwrap();
        assert_eq!(attributes["BANDWIDTH"], "1200000");
        assert_eq!(attributes["CODECS"], "avc1,mp4a");
    }

    #[test]
    fn colons_inside_the_body_stay_in_the_value() {
        let events = scan("#EXT-X-PROGRAM-DATE-TIME:2010-02-19T14:54:23.031+08:00\n");
        assert_eq!(
            events,
            vec![ScanEvent::Tag {
                key: "EXT-X-PROGRAM-DATE-TIME".to_string(),
                value: Some("2010-02-19T14:54:23.031+08:00".to_string()),
                attributes: None,
            }]
        );
    }

    #[test]
    fn hash_lines_without_ext_prefix_are_comments() {
        assert!(scan("#Enjoy this comment\n").is_empty());
        assert!(scan("#E\n").is_empty());
        assert!(scan("#\n").is_empty());
        // An unknown EXT-prefixed name is still a tag; the dispatcher warns.
        assert_eq!(scan("#EXT-X-UNKNOWN\n").len(), 1);
    }

    #[test]
    fn chunk_boundaries_never_change_events() {
        let input = "#EXT-X-KEY:METHOD=AES-128,URI=\"https://k,ey.example/1\"\nseg.ts\n";
        let whole = scan(input);

        for split in 1..input.len() {
            if !input.is_char_boundary(split) {
                continue;
            }
            let mut scanner = Scanner::new();
            let mut events = Vec::new();
            for part in [&input[..split], &input[split..]] {
                events.extend(part.chars().filter_map(|ch| scanner.push_char(ch)));
            }
            events.extend(scanner.finish());
            assert_eq!(events, whole, "split at {split}");
        }
    }
}
