use serde::de::DeserializeOwned;

use crate::foundation::error::{AdError, AdResult};

/// Locate the first complete JSON object in a model answer.
///
/// Models wrap JSON in prose or markdown fences. The object runs from the first `{` to its
/// matching `}`; braces inside string literals do not count, and anything after is ignored.
pub fn extract_json_object(text: &str) -> AdResult<&str> {
    let start = text
        .find('{')
        .ok_or_else(|| AdError::parse("model answer contains no JSON object"))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    Err(AdError::parse("model answer contains an unterminated JSON object"))
}

pub fn parse_json_object<T: DeserializeOwned>(text: &str) -> AdResult<T> {
    let body = extract_json_object(text)?;
    serde_json::from_str(body).map_err(|e| AdError::parse(format!("model JSON mismatch: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Answer {
        a: u32,
    }

    #[test]
    fn strips_fences_and_prose() {
        let raw = "Sure! Here you go:\n```json\n{\"a\": 3}\n```\nAnything else?";
        assert_eq!(extract_json_object(raw).unwrap(), "{\"a\": 3}");
        assert_eq!(parse_json_object::<Answer>(raw).unwrap(), Answer { a: 3 });
    }

    #[test]
    fn nested_objects_keep_outer_braces() {
        let raw = "{\"a\": 1, \"b\": {\"c\": 2}}";
        assert_eq!(extract_json_object(raw).unwrap(), raw);
    }

    #[test]
    fn trailing_prose_with_braces_is_ignored() {
        let raw = "{\"a\": 4} Note: {x} is optional }";
        assert_eq!(extract_json_object(raw).unwrap(), "{\"a\": 4}");
        assert_eq!(parse_json_object::<Answer>(raw).unwrap(), Answer { a: 4 });
    }

    #[test]
    fn braces_inside_strings_do_not_close_the_object() {
        let raw = r#"{"a": 5, "note": "use } and \" { freely"} trailing"#;
        assert_eq!(
            extract_json_object(raw).unwrap(),
            r#"{"a": 5, "note": "use } and \" { freely"}"#
        );
        assert_eq!(parse_json_object::<Answer>(raw).unwrap(), Answer { a: 5 });
    }

    #[test]
    fn missing_or_broken_json_is_a_parse_error() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(AdError::Parse(_))
        ));
        assert!(matches!(extract_json_object("} {"), Err(AdError::Parse(_))));
        assert!(matches!(
            extract_json_object("{\"a\": {\"b\": 1}"),
            Err(AdError::Parse(_))
        ));
        assert!(matches!(
            parse_json_object::<Answer>("{\"a\": \"nope\"}"),
            Err(AdError::Parse(_))
        ));
    }
}
