//! `{$NAME}` variable substitution and URI resolution.

use url::Url;

use crate::model::Define;
use crate::state::SharedState;
use crate::warning::{ParseWarning, Reporter};

/// Look a variable up across the scopes of one [`Define`], in the order
/// name, import, query parameter.
pub(crate) fn lookup_variable<'a>(define: &'a Define, name: &str) -> Option<&'a str> {
    define
        .name
        .get(name)
        .or_else(|| define.import.get(name))
        .or_else(|| define.query_param.get(name))
        .map(String::as_str)
}

/// Replace every `{$NAME}` occurrence with its defined value.
///
/// Unknown names warn once per occurrence and are left literal; a reference
/// is never partially replaced.
pub(crate) fn substitute(input: &str, define: &Define, reporter: &Reporter) -> String {
    if !input.contains("{$") {
        return input.to_string();
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("{$") {
        output.push_str(&rest[..start]);
        let reference = &rest[start..];
        match reference.find('}') {
            Some(close) => {
                let name = &reference[2..close];
                match lookup_variable(define, name) {
                    Some(value) => output.push_str(value),
                    None => {
                        reporter.warn(ParseWarning::UndefinedVariable {
                            name: name.to_string(),
                        });
                        output.push_str(&reference[..=close]);
                    }
                }
                rest = &reference[close + 1..];
            }
            // Unterminated reference; keep the tail literal.
            None => {
                output.push_str(reference);
                return output;
            }
        }
    }
    output.push_str(rest);
    output
}

/// Substitute variables in `input` when any have been defined.
pub(crate) fn substitute_if_enabled(
    input: &str,
    define: &Define,
    shared: &SharedState,
    reporter: &Reporter,
) -> String {
    if shared.has_variables_for_substitution {
        substitute(input, define, reporter)
    } else {
        input.to_string()
    }
}

/// RFC 3986 resolution of `uri` against an optional base.
///
/// `None` signals the caller to fall back to the raw value.
pub(crate) fn resolve(uri: &str, base: Option<&Url>) -> Option<String> {
    match base {
        Some(base) => base.join(uri).ok().map(String::from),
        None => Url::parse(uri).ok().map(String::from),
    }
}

/// Resolve `uri`, falling back to the raw value when resolution fails.
///
/// A failed join against a present base URL warns; with no base URL the raw
/// value is kept silently (relative URIs cannot resolve without one).
pub(crate) fn resolve_or_fallback(uri: &str, shared: &SharedState, reporter: &Reporter) -> String {
    match resolve(uri, shared.base_url.as_ref()) {
        Some(resolved) => resolved,
        None => {
            if shared.base_url.is_some() {
                reporter.warn(ParseWarning::UriResolveFailed {
                    uri: uri.to_string(),
                });
            }
            uri.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn define_with(name: &str, value: &str) -> Define {
        let mut define = Define::default();
        define.name.insert(name.to_string(), value.to_string());
        define
    }

    #[test]
    fn replaces_known_variables() {
        let define = define_with("host", "https://cdn.example");
        let reporter = Reporter::default();
        assert_eq!(
            substitute("{$host}/a.ts", &define, &reporter),
            "https://cdn.example/a.ts"
        );
    }

    #[test]
    fn unknown_variables_stay_literal() {
        let define = Define::default();
        let reporter = Reporter::default();
        assert_eq!(substitute("{$nope}/a.ts", &define, &reporter), "{$nope}/a.ts");
    }

    #[test]
    fn unterminated_reference_stays_literal() {
        let define = define_with("x", "y");
        let reporter = Reporter::default();
        assert_eq!(substitute("a{$x", &define, &reporter), "a{$x");
    }

    #[test]
    fn scope_order_prefers_name_over_import() {
        let mut define = define_with("v", "from-name");
        define
            .import
            .insert("v".to_string(), "from-import".to_string());
        assert_eq!(lookup_variable(&define, "v"), Some("from-name"));
        define.name.clear();
        assert_eq!(lookup_variable(&define, "v"), Some("from-import"));
    }

    #[test]
    fn resolves_relative_uris_against_base() {
        let base = Url::parse("https://example.com/videos/main.m3u8").unwrap();
        assert_eq!(
            resolve("seg1.ts", Some(&base)).as_deref(),
            Some("https://example.com/videos/seg1.ts")
        );
        assert_eq!(resolve("seg1.ts", None), None);
        assert_eq!(
            resolve("https://other.example/seg1.ts", None).as_deref(),
            Some("https://other.example/seg1.ts")
        );
    }
}
