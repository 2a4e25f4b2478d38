//! Parse LLM output into a place candidate

use crate::error::ExtractorError;
use matjip_domain::{Category, PlaceCandidate};
use serde_json::{Map, Value};
use tracing::warn;

/// Locate the first balanced `{...}` span in free-form model output
///
/// Scans from a `{`, tracking nesting depth and skipping braces that appear
/// inside JSON string literals, and stops at the closing brace that returns
/// the depth to zero. If a `{` is never closed (a stray brace in the lead-in
/// text), scanning restarts at the next `{`. Trailing text, including further
/// objects, is ignored. Returns `None` when no `{` opens a balanced span.
///
/// # Examples
///
/// ```
/// use matjip_extractor::find_json_object;
///
/// let raw = r#"Here you go: {"name": "A", "tags": {"x": "}"}} and {"other": 1}"#;
/// assert_eq!(find_json_object(raw), Some(r#"{"name": "A", "tags": {"x": "}"}}"#));
/// assert_eq!(find_json_object(r#"hmm :-{ ok: {"a": 1}"#), Some(r#"{"a": 1}"#));
/// assert_eq!(find_json_object("no json here"), None);
/// ```
pub fn find_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find('{') {
        let start = search_from + found;
        if let Some(len) = balanced_len(&text[start..]) {
            return Some(&text[start..start + len]);
        }
        search_from = start + 1;
    }

    None
}

/// Byte length of the balanced span opening at the start of `text`
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse raw model output into a [`PlaceCandidate`]
///
/// `name` and `address` are copied verbatim (missing or non-string values
/// become empty strings). `category` is accepted only when it names a member
/// of [`Category`]; anything else becomes `default_category`.
pub fn parse_candidate(
    response: &str,
    default_category: Category,
) -> Result<PlaceCandidate, ExtractorError> {
    let span = find_json_object(response).ok_or_else(|| {
        ExtractorError::UnparseableResponse("no JSON object found".to_string())
    })?;

    let json: Value = serde_json::from_str(span)?;
    let obj = json.as_object().ok_or_else(|| {
        ExtractorError::UnparseableResponse("expected a JSON object".to_string())
    })?;

    Ok(PlaceCandidate {
        name: string_field(obj, "name"),
        address: string_field(obj, "address"),
        category: category_field(obj, default_category),
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn category_field(obj: &Map<String, Value>, default_category: Category) -> Category {
    let label = match obj.get("category").and_then(Value::as_str) {
        Some(label) if !label.trim().is_empty() => label,
        _ => return default_category,
    };

    Category::parse(label).unwrap_or_else(|| {
        warn!(
            "Model returned category '{}' outside the enumeration, using '{}'",
            label, default_category
        );
        default_category
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        let response = r#"{"name": "도미노피자", "address": "서울 마포구 양화로 160", "category": "fast_food"}"#;
        let candidate = parse_candidate(response, Category::Other).unwrap();

        assert_eq!(candidate.name, "도미노피자");
        assert_eq!(candidate.address, "서울 마포구 양화로 160");
        assert_eq!(candidate.category, Category::FastFood);
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let response = r#"Here you go: {"name": "A", "address": "B", "category": "cafe"} thanks"#;
        let candidate = parse_candidate(response, Category::Other).unwrap();
        assert_eq!(candidate.name, "A");
        assert_eq!(candidate.address, "B");
        assert_eq!(candidate.category, Category::Cafe);
    }

    #[test]
    fn test_unclosed_brace_in_lead_in() {
        let response = r#"Found it :-{ here you go: {"name": "A", "address": "B"}"#;
        let candidate = parse_candidate(response, Category::Other).unwrap();
        assert_eq!(candidate.name, "A");
        assert_eq!(candidate.address, "B");

        let response = r#"{see below {"name": "C", "address": "D", "category": "bar"}"#;
        let candidate = parse_candidate(response, Category::Other).unwrap();
        assert_eq!(candidate.name, "C");
        assert_eq!(candidate.category, Category::Bar);
    }

    #[test]
    fn test_parse_markdown_wrapped() {
        let response = "```json\n{\"name\": \"A\", \"address\": \"B\"}\n```";
        let candidate = parse_candidate(response, Category::Other).unwrap();
        assert_eq!(candidate.name, "A");
    }

    #[test]
    fn test_missing_fields_default() {
        let candidate = parse_candidate("{}", Category::Korean).unwrap();
        assert_eq!(candidate.name, "");
        assert_eq!(candidate.address, "");
        assert_eq!(candidate.category, Category::Korean);
    }

    #[test]
    fn test_non_string_fields_default() {
        let response = r#"{"name": 42, "address": null, "category": ["cafe"]}"#;
        let candidate = parse_candidate(response, Category::Other).unwrap();
        assert_eq!(candidate.name, "");
        assert_eq!(candidate.address, "");
        assert_eq!(candidate.category, Category::Other);
    }

    #[test]
    fn test_empty_category_defaults() {
        let response = r#"{"name": "A", "address": "B", "category": "  "}"#;
        let candidate = parse_candidate(response, Category::Bar).unwrap();
        assert_eq!(candidate.category, Category::Bar);
    }

    #[test]
    fn test_unknown_category_is_coerced() {
        let response = r#"{"name": "A", "address": "B", "category": "steakhouse"}"#;
        let candidate = parse_candidate(response, Category::Other).unwrap();
        assert_eq!(candidate.category, Category::Other);
    }

    #[test]
    fn test_no_object_is_unparseable() {
        let result = parse_candidate("I could not find a restaurant.", Category::Other);
        assert!(matches!(result, Err(ExtractorError::UnparseableResponse(_))));
    }

    #[test]
    fn test_invalid_json_is_unparseable() {
        let result = parse_candidate("{name: 'A'}", Category::Other);
        assert!(matches!(result, Err(ExtractorError::UnparseableResponse(_))));
    }

    #[test]
    fn test_unclosed_object_is_unparseable() {
        let result = parse_candidate(r#"{"name": "A", "address": "B""#, Category::Other);
        assert!(matches!(result, Err(ExtractorError::UnparseableResponse(_))));
    }

    #[test]
    fn test_scanner_stops_at_depth_zero() {
        let raw = r#"{"name": "A"} then {"name": "B"}"#;
        assert_eq!(find_json_object(raw), Some(r#"{"name": "A"}"#));
    }

    #[test]
    fn test_scanner_handles_nesting() {
        let raw = r#"x {"a": {"b": {"c": 1}}, "d": 2} y }"#;
        assert_eq!(find_json_object(raw), Some(r#"{"a": {"b": {"c": 1}}, "d": 2}"#));
    }

    #[test]
    fn test_scanner_ignores_braces_in_strings() {
        let raw = r#"{"name": "Cafe {Brace}", "memo": "closing } inside"}"#;
        assert_eq!(find_json_object(raw), Some(raw));
    }

    #[test]
    fn test_scanner_handles_escaped_quotes() {
        let raw = r#"{"name": "The \"Best\" } Place"} trailing"#;
        assert_eq!(find_json_object(raw), Some(r#"{"name": "The \"Best\" } Place"}"#));
    }

    #[test]
    fn test_scanner_handles_multibyte_text() {
        let raw = "결과: {\"name\": \"을지로 노가리\"} 입니다";
        assert_eq!(find_json_object(raw), Some("{\"name\": \"을지로 노가리\"}"));
    }

    #[test]
    fn test_scanner_without_close() {
        assert_eq!(find_json_object("{ never closed"), None);
        assert_eq!(find_json_object(""), None);
    }
}
