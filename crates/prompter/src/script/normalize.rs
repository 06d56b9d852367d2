use serde_json::Value;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Turn a loaded document into display text.
///
/// Priority: `paragraphs` sequence, then `text` string, then a `lines`
/// sequence (or a bare sequence), then the value's string form. Never fails;
/// a missing or null document yields an empty string.
pub fn normalize(doc: Option<&Value>) -> String {
    let Some(doc) = doc else {
        return String::new();
    };
    match doc {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_items(items),
        Value::Object(map) => {
            if let Some(Value::Array(paragraphs)) = map.get("paragraphs") {
                return join_items(paragraphs);
            }
            if let Some(Value::String(text)) = map.get("text") {
                return text.clone();
            }
            if let Some(Value::Array(lines)) = map.get("lines") {
                return join_items(lines);
            }
            doc.to_string()
        }
        other => other.to_string(),
    }
}

/// Display name carried by the document itself, if any.
pub fn document_title(doc: &Value) -> Option<&str> {
    let map = doc.as_object()?;
    ["title", "name"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paragraphs_join_with_blank_line() {
        let doc = json!({ "paragraphs": ["a", "b"] });
        assert_eq!(normalize(Some(&doc)), "a\n\nb");
    }

    #[test]
    fn test_text_used_verbatim() {
        let doc = json!({ "text": "hello" });
        assert_eq!(normalize(Some(&doc)), "hello");
    }

    #[test]
    fn test_bare_sequence_is_lines() {
        let doc = json!(["x", "y"]);
        assert_eq!(normalize(Some(&doc)), "x\n\ny");
    }

    #[test]
    fn test_missing_and_null_are_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some(&Value::Null)), "");
    }

    #[test]
    fn test_paragraphs_win_over_text() {
        let doc = json!({ "text": "ignored", "paragraphs": ["kept"] });
        assert_eq!(normalize(Some(&doc)), "kept");
    }

    #[test]
    fn test_lines_field() {
        let doc = json!({ "lines": ["one", "two", "three"] });
        assert_eq!(normalize(Some(&doc)), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_malformed_document_is_stringified() {
        let doc = json!({ "paragraphs": "not a list" });
        assert_eq!(normalize(Some(&doc)), r#"{"paragraphs":"not a list"}"#);
        assert_eq!(normalize(Some(&json!(42))), "42");
        assert_eq!(normalize(Some(&json!(true))), "true");
    }

    #[test]
    fn test_non_string_items_are_stringified() {
        let doc = json!({ "paragraphs": ["a", 1, null] });
        assert_eq!(normalize(Some(&doc)), "a\n\n1\n\n");
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title(&json!({ "title": " Intro " })), Some("Intro"));
        assert_eq!(document_title(&json!({ "name": "Outro" })), Some("Outro"));
        assert_eq!(document_title(&json!({ "title": "" })), None);
        assert_eq!(document_title(&json!(["x"])), None);
    }
}
