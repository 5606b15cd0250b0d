//! `EXT-X-DEFINE`: inline, imported, and query-parameter variables.

use crate::attrs::AttributeMap;
use crate::model::ParsedPlaylist;
use crate::state::SharedState;
use crate::vars;
use crate::warning::{ParseWarning, Reporter};

/// Exactly one of `NAME`, `IMPORT`, or `QUERYPARAM` selects the variant.
/// Any successful definition enables the substitution pass for the rest of
/// the parse.
pub(super) fn define(
    attributes: &AttributeMap,
    playlist: &mut ParsedPlaylist,
    shared: &mut SharedState,
    reporter: &Reporter,
) {
    if let Some(name) = attributes.get("NAME") {
        match attributes.get("VALUE") {
            Some(value) => {
                playlist
                    .define
                    .name
                    .insert(name.clone(), value.clone());
                shared.has_variables_for_substitution = true;
            }
            None => reporter.warn(ParseWarning::MissingRequiredAttribute {
                tag: "EXT-X-DEFINE".to_string(),
                attribute: "VALUE",
            }),
        }
    } else if let Some(name) = attributes.get("IMPORT") {
        let imported = shared
            .base_define
            .as_ref()
            .and_then(|scope| vars::lookup_variable(scope, name))
            .map(str::to_string);
        match imported {
            Some(value) => {
                playlist.define.import.insert(name.clone(), value);
                shared.has_variables_for_substitution = true;
            }
            None => reporter.warn(ParseWarning::UndefinedVariable { name: name.clone() }),
        }
    } else if let Some(name) = attributes.get("QUERYPARAM") {
        let value = shared.base_url.as_ref().and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        });
        match value {
            Some(value) => {
                playlist.define.query_param.insert(name.clone(), value);
                shared.has_variables_for_substitution = true;
            }
            None => reporter.warn(ParseWarning::UndefinedVariable { name: name.clone() }),
        }
    } else {
        reporter.warn(ParseWarning::MissingRequiredAttribute {
            tag: "EXT-X-DEFINE".to_string(),
            attribute: "NAME",
        });
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::attrs::AttributeMap;
    use crate::model::Define;

    #[test]
    fn import_resolves_across_all_base_scopes() {
        let mut base = Define::default();
        base.query_param
            .insert("token".to_string(), "abc123".to_string());

        let mut playlist = ParsedPlaylist::default();
        let mut shared = SharedState {
            base_define: Some(base),
            ..Default::default()
        };
        let reporter = Reporter::default();

        let attributes = AttributeMap::from([("IMPORT".to_string(), "token".to_string())]);
        define(&attributes, &mut playlist, &mut shared, &reporter);

        assert_eq!(playlist.define.import["token"], "abc123");
        assert!(shared.has_variables_for_substitution);
    }

    #[test]
    fn queryparam_reads_the_base_url() {
        let mut playlist = ParsedPlaylist::default();
        let mut shared = SharedState {
            base_url: Some(Url::parse("https://cdn.example/v.m3u8?session=xyz").unwrap()),
            ..Default::default()
        };
        let reporter = Reporter::default();

        let attributes =
            AttributeMap::from([("QUERYPARAM".to_string(), "session".to_string())]);
        define(&attributes, &mut playlist, &mut shared, &reporter);

        assert_eq!(playlist.define.query_param["session"], "xyz");
        assert!(shared.has_variables_for_substitution);
    }

    #[test]
    fn unresolvable_import_warns_and_defines_nothing() {
        let mut playlist = ParsedPlaylist::default();
        let mut shared = SharedState::default();
        let reporter = Reporter::default();

        let attributes = AttributeMap::from([("IMPORT".to_string(), "ghost".to_string())]);
        define(&attributes, &mut playlist, &mut shared, &reporter);

        assert!(playlist.define.is_empty());
        assert!(!shared.has_variables_for_substitution);
    }
}
