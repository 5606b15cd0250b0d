//! Attribute-list lexing and typed coercion of attribute values.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::model::{ByteRange, Resolution};
use crate::warning::{ParseWarning, Reporter};

/// Attribute names mapped to their unquoted string values.
///
/// Ordered map so that iteration (and therefore warning order) is
/// deterministic.
pub type AttributeMap = BTreeMap<String, String>;

/// A classified tag body: either a bare value or an attribute list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TagBody {
    Value(String),
    Attributes(AttributeMap),
}

/// Classify a tag body without backtracking.
///
/// The body is an attribute list iff an unquoted `=` appears before the first
/// unquoted `,` (or before end of line when there is no comma). Everything
/// else is a bare value: `EXTINF:5.0,title` has its first `=`-free token
/// before the comma, `EXT-X-BYTERANGE:1000@0` has no `=` at all.
pub(crate) fn classify_body(body: &str) -> TagBody {
    let mut quoted = false;
    let mut first_equals = None;
    let mut first_comma = None;

    for (index, ch) in body.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '=' if !quoted && first_equals.is_none() => first_equals = Some(index),
            ',' if !quoted && first_comma.is_none() => first_comma = Some(index),
            _ => {}
        }
    }

    let is_attribute_list = match (first_equals, first_comma) {
        (Some(equals), Some(comma)) => equals < comma,
        (Some(_), None) => true,
        (None, _) => false,
    };

    if is_attribute_list {
        TagBody::Attributes(split_attribute_list(body))
    } else {
        TagBody::Value(body.to_string())
    }
}

/// Split an attribute list into a key/value map, honoring quoted strings.
///
/// Commas and equals signs inside quotes are ordinary characters. A single
/// surrounding pair of double quotes is stripped from each value; hex values
/// (`0x…`) stay strings at this layer.
pub(crate) fn split_attribute_list(body: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut quoted = false;
    let mut in_value = false;

    for ch in body.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                if in_value {
                    value.push('"');
                } else {
                    key.push('"');
                }
            }
            '=' if !quoted && !in_value => in_value = true,
            ',' if !quoted && in_value => {
                commit(&mut attributes, &mut key, &mut value);
                in_value = false;
            }
            ch => {
                if in_value {
                    value.push(ch);
                } else {
                    key.push(ch);
                }
            }
        }
    }
    commit(&mut attributes, &mut key, &mut value);

    attributes
}

fn commit(attributes: &mut AttributeMap, key: &mut String, value: &mut String) {
    let name = key.trim().to_string();
    if !name.is_empty() {
        attributes.insert(name, unquote(value.trim()));
    }
    key.clear();
    value.clear();
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

pub(crate) fn parse_u64(tag: &'static str, value: &str, reporter: &Reporter) -> Option<u64> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.to_string(),
            });
            None
        }
    }
}

pub(crate) fn parse_u32(tag: &'static str, value: &str, reporter: &Reporter) -> Option<u32> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.to_string(),
            });
            None
        }
    }
}

pub(crate) fn parse_f64(tag: &'static str, value: &str, reporter: &Reporter) -> Option<f64> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.to_string(),
            });
            None
        }
    }
}

/// `YES` is true, anything else is false.
pub(crate) fn parse_yes_no(value: &str) -> bool {
    value == "YES"
}

pub(crate) fn parse_resolution(
    tag: &'static str,
    value: &str,
    reporter: &Reporter,
) -> Option<Resolution> {
    let parsed = value.split_once('x').and_then(|(width, height)| {
        Some(Resolution {
            width: width.parse().ok()?,
            height: height.parse().ok()?,
        })
    });
    if parsed.is_none() {
        reporter.warn(ParseWarning::UnparsableValue {
            tag,
            value: value.to_string(),
        });
    }
    parsed
}

pub(crate) fn parse_date(
    tag: &'static str,
    value: &str,
    reporter: &Reporter,
) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.to_string(),
            });
            None
        }
    }
}

/// Parse a `0x…` hexadecimal attribute value into bytes.
pub(crate) fn parse_hex_bytes(
    tag: &'static str,
    value: &str,
    reporter: &Reporter,
) -> Option<Vec<u8>> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if digits.is_empty() || digits.len() % 2 != 0 || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        reporter.warn(ParseWarning::UnparsableValue {
            tag,
            value: value.to_string(),
        });
        return None;
    }

    let bytes = digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16).unwrap_or(0) as u8;
            let lo = (pair[1] as char).to_digit(16).unwrap_or(0) as u8;
            (hi << 4) | lo
        })
        .collect();
    Some(bytes)
}

/// Parse a 128-bit initialization vector.
pub(crate) fn parse_iv(tag: &'static str, value: &str, reporter: &Reporter) -> Option<[u8; 16]> {
    let bytes = parse_hex_bytes(tag, value, reporter)?;
    match <[u8; 16]>::try_from(bytes) {
        Ok(iv) => Some(iv),
        Err(_) => {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.to_string(),
            });
            None
        }
    }
}

/// Parse a `length[@offset]` byte-range body. The fallback offset is used
/// when the body carries none.
pub(crate) fn parse_byte_range(
    tag: &'static str,
    value: &str,
    fallback_offset: Option<u64>,
    reporter: &Reporter,
) -> Option<ByteRange> {
    let (length, offset) = match value.split_once('@') {
        Some((length, offset)) => (length, Some(offset)),
        None => (value, None),
    };

    let length: u64 = match length.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            reporter.warn(ParseWarning::UnparsableValue {
                tag,
                value: value.to_string(),
            });
            return None;
        }
    };
    let start = match offset {
        Some(offset) => match offset.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                reporter.warn(ParseWarning::UnparsableValue {
                    tag,
                    value: value.to_string(),
                });
                return None;
            }
        },
        None => fallback_offset?,
    };

    Some(ByteRange {
        start,
        end: (start + length).saturating_sub(1),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn splits_simple_attribute_list() {
        let attributes = split_attribute_list("BANDWIDTH=1280000,RESOLUTION=854x480");
        assert_eq!(attributes["BANDWIDTH"], "1280000");
        assert_eq!(attributes["RESOLUTION"], "854x480");
    }

    #[test]
    fn quoted_commas_do_not_split() {
        let attributes =
            split_attribute_list("CODECS=\"avc1.42c01e,mp4a.40.2\",BANDWIDTH=1280000");
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["CODECS"], "avc1.42c01e,mp4a.40.2");
    }

    #[test]
    fn quoted_equals_is_ordinary() {
        let attributes = split_attribute_list("URI=\"key.php?r=52&x=1\",METHOD=AES-128");
        assert_eq!(attributes["URI"], "key.php?r=52&x=1");
        assert_eq!(attributes["METHOD"], "AES-128");
    }

    #[rstest]
    #[case("1000@0", Some(0), Some(ByteRange { start: 0, end: 999 }))]
    #[case("1000", Some(1000), Some(ByteRange { start: 1000, end: 1999 }))]
    #[case("1000", None, None)]
    #[case("junk@0", Some(0), None)]
    fn byte_range_offsets(
        #[case] value: &str,
        #[case] fallback: Option<u64>,
        #[case] expected: Option<ByteRange>,
    ) {
        let reporter = Reporter::default();
        assert_eq!(
            parse_byte_range("EXT-X-BYTERANGE", value, fallback, &reporter),
            expected
        );
    }

    #[rstest]
    #[case("")]
    #[case("5.0,title")]
    #[case("5.0,a=b")]
    #[case("1000@0")]
    fn body_without_leading_equals_is_a_value(#[case] body: &str) {
        assert_eq!(classify_body(body), TagBody::Value(body.to_string()));
    }

    #[test]
    fn body_with_leading_equals_is_an_attribute_list() {
        assert!(matches!(
            classify_body("METHOD=NONE"),
            TagBody::Attributes(_)
        ));
        assert!(matches!(
            classify_body("TYPE=PART,URI=\"a.mp4\""),
            TagBody::Attributes(_)
        ));
    }

    #[test]
    fn hex_parsing() {
        let reporter = Reporter::default();
        assert_eq!(
            parse_hex_bytes("EXT-X-DATERANGE", "0xFC30", &reporter),
            Some(vec![0xfc, 0x30])
        );
        assert_eq!(parse_hex_bytes("EXT-X-DATERANGE", "0xF", &reporter), None);
        assert_eq!(
            parse_iv(
                "EXT-X-KEY",
                "0x00000000000000000000000000000001",
                &reporter
            ),
            Some([
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1
            ])
        );
    }
}
