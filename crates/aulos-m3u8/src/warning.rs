#![forbid(unsafe_code)]

use std::sync::Arc;

use thiserror::Error;

/// A diagnostic produced while parsing a playlist.
///
/// Input problems never abort a parse. Each warning identifies the item that
/// was skipped or the fallback that was applied; the surrounding playlist is
/// still returned in full.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseWarning {
    /// A `#EXT...` tag not known to the registry and without a custom handler.
    #[error("skipping unsupported tag: {tag}")]
    UnsupportedTag { tag: String },

    /// A tag listed in [`crate::ParserOptions::ignore_tags`].
    #[error("skipping ignored tag: {tag}")]
    IgnoredTag { tag: String },

    /// A value tag whose value was absent (or nulled by the value transform).
    #[error("skipping {tag}: no tag value")]
    MissingTagValue { tag: String },

    /// An attribute tag missing one of its required attributes.
    #[error("skipping {tag}: missing required attribute {attribute}")]
    MissingRequiredAttribute { tag: String, attribute: &'static str },

    /// A value or attribute that could not be coerced to its expected type,
    /// including unknown enumerated values.
    #[error("skipping {tag}: unparsable value \"{value}\"")]
    UnparsableValue { tag: &'static str, value: String },

    /// A default was substituted for a missing or unusable input.
    #[error("{tag}: {detail}")]
    FallbackApplied {
        tag: &'static str,
        detail: &'static str,
    },

    /// A URI could not be resolved against the base URL; the raw value is
    /// kept as the resolved form.
    #[error("failed to resolve uri \"{uri}\" against base url")]
    UriResolveFailed { uri: String },

    /// A `{$NAME}` reference with no matching definition; the literal text is
    /// left in place.
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// A segment longer than the declared target duration. Informational.
    #[error("segment duration {duration}s exceeds target duration {target}s")]
    DurationExceedsTarget { duration: f64, target: u64 },
}

/// Callback receiving every [`ParseWarning`] as it is produced.
pub type WarnHandler = Arc<dyn Fn(&ParseWarning) + Send + Sync>;

/// Routes warnings to `tracing` and the optional caller callback.
#[derive(Clone, Default)]
pub(crate) struct Reporter {
    handler: Option<WarnHandler>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("handler", &self.handler.as_ref().map(|_| "WarnHandler"))
            .finish()
    }
}

impl Reporter {
    pub(crate) fn new(handler: Option<WarnHandler>) -> Self {
        Self { handler }
    }

    pub(crate) fn warn(&self, warning: ParseWarning) {
        tracing::warn!(%warning, "playlist diagnostic");
        if let Some(handler) = &self.handler {
            handler(&warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages_name_the_tag() {
        let warning = ParseWarning::MissingRequiredAttribute {
            tag: "EXT-X-KEY".to_string(),
            attribute: "URI",
        };
        assert_eq!(
            warning.to_string(),
            "skipping EXT-X-KEY: missing required attribute URI"
        );
    }

    #[test]
    fn reporter_invokes_handler() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = Reporter::new(Some(Arc::new(move |warning: &ParseWarning| {
            sink.lock().unwrap().push(warning.clone());
        })));

        reporter.warn(ParseWarning::UnsupportedTag {
            tag: "EXT-X-NOPE".to_string(),
        });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], ParseWarning::UnsupportedTag { .. }));
    }
}
