use crate::core::sanitize::unescape;
use crate::domain::model::{LayoutGroup, PlaceholderDescriptor, TemplateMetadata, RESERVED_DIRECTIVES};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Shapes the captures of a `meta` directive pass. Only the first call
/// counts; it is expected to hold a sequence of mappings, later keys
/// overwriting earlier ones. Values come back entity-unescaped. Anything
/// malformed degrades to an empty map.
pub fn meta_from_captures(captured: &[Value]) -> TemplateMetadata {
    let mut meta = Map::new();
    if let Some(Value::Array(entries)) = captured.first() {
        for entry in entries {
            if let Value::Object(map) = entry {
                for (key, value) in map {
                    meta.insert(key.clone(), value.clone());
                }
            }
        }
    }
    match unescape(&Value::Object(meta)) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Flattens the captures of an `options` directive pass: every captured
/// argument that is a sequence contributes its mapping elements in
/// encounter order. Non-sequences and non-mappings are dropped.
pub fn options_from_captures(captured: &[Value]) -> Vec<Map<String, Value>> {
    let mut flat = Vec::new();
    for item in captured {
        if let Value::Array(entries) = item {
            for entry in entries {
                if let Value::Object(map) = entry {
                    flat.push(map.clone());
                }
            }
        }
    }
    flat
}

/// Shapes the captures of a `layout` directive pass. Only the first call
/// counts; each mapping element turns into one `{group, rows}` pair per
/// key, order preserved.
pub fn layout_from_captures(captured: &[Value]) -> Vec<LayoutGroup> {
    let mut layout = Vec::new();
    if let Some(Value::Array(entries)) = captured.first() {
        for entry in entries {
            if let Value::Object(map) = entry {
                for (group, rows) in map {
                    layout.push(LayoutGroup {
                        group: group.clone(),
                        rows: rows.clone(),
                    });
                }
            }
        }
    }
    layout
}

/// Merges the template's free variables (minus the directive names) with
/// its options entries into placeholder descriptors. Output order follows
/// the placeholder set's iteration; callers needing stable order sort by
/// name.
pub fn merge_descriptors(
    placeholders: &HashSet<String>,
    options: &[Map<String, Value>],
) -> Vec<PlaceholderDescriptor> {
    // Last entry wins on duplicate names.
    let by_name: HashMap<&str, &Map<String, Value>> = options
        .iter()
        .filter_map(|opt| opt.get("name").and_then(Value::as_str).map(|n| (n, opt)))
        .collect();

    placeholders
        .iter()
        .filter(|name| !RESERVED_DIRECTIVES.contains(&name.as_str()))
        .map(|name| match by_name.get(name.as_str()) {
            Some(entry) => descriptor_from_entry(name, entry),
            None => PlaceholderDescriptor::string(name.clone()),
        })
        .collect()
}

/// Shallow copy of an options entry with `name` forced and the type
/// defaulting applied: a non-empty `values` sequence without an explicit
/// type means `enum`, everything else falls back to `string`.
fn descriptor_from_entry(name: &str, entry: &Map<String, Value>) -> PlaceholderDescriptor {
    let mut extra = (*entry).clone();
    extra.shift_remove("name");

    let explicit_kind = extra
        .shift_remove("type")
        .and_then(|v| v.as_str().map(str::to_owned))
        .filter(|k| !k.is_empty());

    let values = match extra.get("values") {
        Some(Value::Array(items)) => {
            let items = items.clone();
            extra.shift_remove("values");
            Some(items)
        }
        _ => None,
    };

    let kind = match explicit_kind {
        Some(kind) => kind,
        None if values.as_ref().is_some_and(|v| !v.is_empty()) => "enum".to_string(),
        None => "string".to_string(),
    };

    PlaceholderDescriptor {
        name: name.to_string(),
        kind,
        values,
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_meta_merges_later_over_earlier() {
        let captured = vec![json!([
            {"title": "First", "author": "A"},
            {"title": "Second"}
        ])];
        let meta = meta_from_captures(&captured);
        assert_eq!(meta.get("title"), Some(&json!("Second")));
        assert_eq!(meta.get("author"), Some(&json!("A")));
    }

    #[test]
    fn test_meta_only_first_call_counts() {
        let captured = vec![json!([{"a": 1}]), json!([{"b": 2}])];
        let meta = meta_from_captures(&captured);
        assert_eq!(meta.get("a"), Some(&json!(1)));
        assert!(meta.get("b").is_none());
    }

    #[test]
    fn test_meta_is_entity_unescaped() {
        let captured = vec![json!([{"title": "Offer &amp; Contract"}])];
        let meta = meta_from_captures(&captured);
        assert_eq!(meta.get("title"), Some(&json!("Offer & Contract")));
    }

    #[test]
    fn test_meta_degrades_to_empty_on_malformed_payload() {
        assert!(meta_from_captures(&[]).is_empty());
        assert!(meta_from_captures(&[json!("not a list")]).is_empty());
        assert!(meta_from_captures(&[json!(["not a map"])]).is_empty());
    }

    #[test]
    fn test_options_flatten_in_encounter_order() {
        let captured = vec![
            json!([{"name": "a"}, {"name": "b"}]),
            json!("ignored"),
            json!([{"name": "c"}]),
        ];
        let options = options_from_captures(&captured);
        let got: Vec<&str> = options
            .iter()
            .map(|o| o.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_layout_transforms_single_key_mappings() {
        let captured = vec![json!([{"Header": ["a", "b"]}, {"Body": ["c"]}])];
        let layout = layout_from_captures(&captured);
        assert_eq!(
            layout,
            vec![
                LayoutGroup {
                    group: "Header".to_string(),
                    rows: json!(["a", "b"])
                },
                LayoutGroup {
                    group: "Body".to_string(),
                    rows: json!(["c"])
                },
            ]
        );
    }

    #[test]
    fn test_layout_degrades_to_empty() {
        assert!(layout_from_captures(&[]).is_empty());
        assert!(layout_from_captures(&[json!(42)]).is_empty());
    }

    #[test]
    fn test_merge_applies_explicit_type() {
        let options = vec![object(json!({"name": "age", "type": "number"}))];
        let got = merge_descriptors(&names(&["age"]), &options);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "age");
        assert_eq!(got[0].kind, "number");
        assert!(got[0].values.is_none());
    }

    #[test]
    fn test_merge_defaults_unknown_placeholder_to_string() {
        let got = merge_descriptors(&names(&["notes"]), &[]);
        assert_eq!(got, vec![PlaceholderDescriptor::string("notes")]);
    }

    #[test]
    fn test_merge_defaults_values_without_type_to_enum() {
        let options = vec![object(json!({"name": "color", "values": ["red", "blue"]}))];
        let got = merge_descriptors(&names(&["color"]), &options);
        assert_eq!(got[0].kind, "enum");
        assert_eq!(got[0].values, Some(vec![json!("red"), json!("blue")]));
    }

    #[test]
    fn test_merge_empty_values_fall_back_to_string() {
        let options = vec![object(json!({"name": "color", "values": []}))];
        let got = merge_descriptors(&names(&["color"]), &options);
        assert_eq!(got[0].kind, "string");
    }

    #[test]
    fn test_merge_excludes_reserved_directive_names() {
        let got = merge_descriptors(&names(&["meta", "options", "layout", "real"]), &[]);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "real");
    }

    #[test]
    fn test_merge_keeps_free_form_keys() {
        let options = vec![object(json!({
            "name": "salary",
            "type": "number",
            "label": "Monthly salary",
            "required": true
        }))];
        let got = merge_descriptors(&names(&["salary"]), &options);
        assert_eq!(got[0].extra.get("label"), Some(&json!("Monthly salary")));
        assert_eq!(got[0].extra.get("required"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_ignores_options_without_matching_placeholder() {
        let options = vec![object(json!({"name": "ghost", "type": "number"}))];
        let got = merge_descriptors(&names(&["real"]), &options);
        assert_eq!(got, vec![PlaceholderDescriptor::string("real")]);
    }

    #[test]
    fn test_merge_last_option_entry_wins_on_duplicate_names() {
        let options = vec![
            object(json!({"name": "age", "type": "string"})),
            object(json!({"name": "age", "type": "number"})),
        ];
        let got = merge_descriptors(&names(&["age"]), &options);
        assert_eq!(got[0].kind, "number");
    }
}
