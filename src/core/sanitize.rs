use html_escape::decode_html_entities;
use serde_json::{Map, Value};

/// Encodes the five XML-special characters using named entities. The
/// apostrophe and quote must come out as `&apos;`/`&quot;`, not the
/// numeric forms, so downstream consumers see stable text.
fn encode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode-then-encode: prior escaping is normalized back to raw
/// characters before re-encoding, so applying this twice equals applying
/// it once.
pub fn sanitize_str(s: &str) -> String {
    encode_entities(&decode_html_entities(s))
}

/// Recursively sanitizes a context value. Mapping keys are untouched;
/// sequence order is preserved; non-string scalars pass through.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_str(s)),
        Value::Object(map) => Value::Object(sanitize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

pub fn sanitize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), sanitize(v))).collect()
}

/// Recursively decodes HTML entities without re-encoding. Used for
/// `meta` values, which are returned to callers as plain text.
pub fn unescape(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(decode_html_entities(s).into_owned()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), unescape(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(unescape).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_plain_text() {
        assert_eq!(
            sanitize_str("O'Brien & Co. <VIP>"),
            "O&apos;Brien &amp; Co. &lt;VIP&gt;"
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_str("O'Brien & Co. <VIP>");
        assert_eq!(sanitize_str(&once), once);

        let value = json!({
            "name": "a < b",
            "nested": {"quote": "\"hi\""},
            "list": ["it's", 42, true, null]
        });
        let once = sanitize(&value);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitize_normalizes_prior_escaping() {
        // Already-escaped input must not double-escape.
        assert_eq!(sanitize_str("&amp;"), "&amp;");
        assert_eq!(sanitize_str("&lt;tag&gt;"), "&lt;tag&gt;");
        assert_eq!(sanitize_str("&apos;"), "&apos;");
    }

    #[test]
    fn test_sanitize_recurses_and_keeps_structure() {
        let value = json!({
            "person": {"name": "O'Brien"},
            "tags": ["<a>", "b & c"],
            "count": 3,
            "active": false
        });
        let got = sanitize(&value);
        assert_eq!(
            got,
            json!({
                "person": {"name": "O&apos;Brien"},
                "tags": ["&lt;a&gt;", "b &amp; c"],
                "count": 3,
                "active": false
            })
        );
    }

    #[test]
    fn test_sanitize_leaves_keys_untouched() {
        let value = json!({"a & b": "x & y"});
        let got = sanitize(&value);
        assert_eq!(got, json!({"a & b": "x &amp; y"}));
    }

    #[test]
    fn test_unescape_recurses() {
        let value = json!({
            "title": "Offer &amp; Contract",
            "notes": ["&lt;draft&gt;", {"q": "&quot;x&quot;"}]
        });
        assert_eq!(
            unescape(&value),
            json!({
                "title": "Offer & Contract",
                "notes": ["<draft>", {"q": "\"x\""}]
            })
        );
    }
}
