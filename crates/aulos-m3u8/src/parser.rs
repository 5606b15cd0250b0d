//! The parser façade: one-shot and progressive driving of the scanner.

use tracing::trace;

use crate::assemble;
use crate::config::{ParseOptions, ParserOptions};
use crate::model::ParsedPlaylist;
use crate::scan::{ScanEvent, Scanner};
use crate::state::SharedState;
use crate::tags;
use crate::warning::Reporter;

/// Everything that lives for the duration of one parse.
#[derive(Debug)]
struct Machine {
    scanner: Scanner,
    playlist: ParsedPlaylist,
    shared: SharedState,
}

impl Machine {
    fn new(options: &ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(),
            playlist: ParsedPlaylist::default(),
            shared: SharedState::new(
                options.base_url.clone(),
                options.base_define.clone(),
                options.base_time,
            ),
        }
    }

    fn feed(&mut self, chunk: &str, options: &ParserOptions, reporter: &Reporter) {
        for ch in chunk.chars() {
            if let Some(event) = self.scanner.push_char(ch) {
                self.handle(event, options, reporter);
            }
        }
    }

    fn handle(&mut self, event: ScanEvent, options: &ParserOptions, reporter: &Reporter) {
        match event {
            ScanEvent::Tag {
                key,
                value,
                attributes,
            } => {
                trace!(tag = %key, "tag recognized");
                tags::dispatch(
                    &key,
                    value,
                    attributes,
                    &mut self.playlist,
                    &mut self.shared,
                    options,
                    reporter,
                );
            }
            ScanEvent::Uri(uri) => {
                trace!(%uri, "uri recognized");
                assemble::handle_uri(&uri, &mut self.playlist, &mut self.shared, reporter);
            }
        }
    }

    /// Recognize the pending line, reset the working set, and hand the
    /// playlist over.
    fn finish(mut self, options: &ParserOptions, reporter: &Reporter) -> ParsedPlaylist {
        if let Some(event) = self.scanner.finish() {
            self.handle(event, options, reporter);
        }
        self.shared.clean();
        self.playlist
    }
}

/// A reusable playlist parser.
///
/// Drive it either with one call to [`parse_full`](Parser::parse_full), or
/// incrementally with any number of [`push`](Parser::push) calls followed by
/// [`done`](Parser::done). Chunks may split the input anywhere. Input
/// problems never fail the parse; they surface through the warning callback
/// in [`ParserOptions`].
///
/// ```
/// use aulos_m3u8::{ParseOptions, Parser, ParserOptions};
///
/// let parser = Parser::new(ParserOptions::new());
/// let playlist = parser.parse_full(
///     "#EXTM3U\n#EXTINF:5.0,\nsegment.ts\n#EXT-X-ENDLIST\n",
///     &ParseOptions::new(),
/// );
/// assert_eq!(playlist.segments.len(), 1);
/// assert!(playlist.end_list);
/// ```
#[derive(Debug)]
pub struct Parser {
    options: ParserOptions,
    reporter: Reporter,
    machine: Option<Machine>,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        let reporter = Reporter::new(options.on_warning.clone());
        Self {
            options,
            reporter,
            machine: None,
        }
    }

    /// Parse a complete playlist in one call.
    ///
    /// Independent of any progressive parse in flight on the same parser.
    pub fn parse_full(&self, text: &str, options: &ParseOptions) -> ParsedPlaylist {
        let mut machine = Machine::new(options);
        machine.feed(text, &self.options, &self.reporter);
        machine.finish(&self.options, &self.reporter)
    }

    /// Feed one chunk of a progressive parse.
    ///
    /// The first push after construction (or after [`done`](Parser::done))
    /// starts a new parse with the given options; subsequent pushes keep the
    /// original options.
    pub fn push(&mut self, chunk: &str, options: &ParseOptions) {
        let machine = self
            .machine
            .get_or_insert_with(|| Machine::new(options));
        machine.feed(chunk, &self.options, &self.reporter);
    }

    /// Finish a progressive parse and take the playlist.
    ///
    /// The parser is ready for a fresh parse afterwards. Calling this
    /// without a preceding push yields an empty playlist.
    pub fn done(&mut self) -> ParsedPlaylist {
        match self.machine.take() {
            Some(machine) => machine.finish(&self.options, &self.reporter),
            None => ParsedPlaylist::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_VOD: &str = "#EXTM3U\n\
        #EXT-X-TARGETDURATION:6\n\
        #EXTINF:5.0,\n\
        a.ts\n\
        #EXTINF:5.0,\n\
        b.ts\n\
        #EXT-X-ENDLIST\n";

    #[test]
    fn progressive_equals_full() {
        let full = Parser::new(ParserOptions::new())
            .parse_full(MINIMAL_VOD, &ParseOptions::new());

        let mut progressive = Parser::new(ParserOptions::new());
        for chunk in MINIMAL_VOD.as_bytes().chunks(3) {
            progressive.push(std::str::from_utf8(chunk).unwrap(), &ParseOptions::new());
        }
        assert_eq!(progressive.done(), full);
    }

    #[test]
    fn push_after_done_starts_a_new_parse() {
        let mut parser = Parser::new(ParserOptions::new());
        parser.push(MINIMAL_VOD, &ParseOptions::new());
        let first = parser.done();
        assert_eq!(first.segments.len(), 2);

        parser.push("#EXTM3U\n#EXTINF:4.0,\nonly.ts\n", &ParseOptions::new());
        let second = parser.done();
        assert_eq!(second.segments.len(), 1);
        assert_eq!(second.segments[0].uri, "only.ts");
    }

    #[test]
    fn done_without_pushes_is_an_empty_playlist() {
        let mut parser = Parser::new(ParserOptions::new());
        assert_eq!(parser.done(), ParsedPlaylist::default());
    }
}
