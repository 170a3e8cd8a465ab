//! Recovers a JSON payload from raw model text.
//!
//! Fallback chain, first success wins:
//! 1. the raw text as-is
//! 2. a ```` ```json ```` … ```` ``` ```` fence, stripped by its fixed-width markers
//! 3. any triple-backtick fence, with or without a language tag
//!
//! Markers are only removed after they have been seen at both ends, so unfenced
//! JSON is never trimmed.

use serde::de::IgnoredAny;

use crate::generation::error::GenerationError;

const JSON_FENCE_OPEN: &str = "```json";
const FENCE: &str = "```";

pub fn extract(raw_text: &str) -> Result<&str, GenerationError> {
    if is_json(raw_text) {
        return Ok(raw_text);
    }

    let text = raw_text.trim().trim_start_matches('\u{feff}').trim_start();

    let candidate = strip_json_fence(text)
        .filter(|c| is_json(c))
        .or_else(|| strip_any_fence(text).filter(|c| is_json(c)));

    candidate.ok_or_else(|| GenerationError::Extraction {
        raw: raw_text.to_string(),
    })
}

fn is_json(candidate: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(candidate).is_ok()
}

/// Tier 2: exact ```` ```json ```` opener and ```` ``` ```` closer.
fn strip_json_fence(text: &str) -> Option<&str> {
    if text.len() < JSON_FENCE_OPEN.len() + FENCE.len()
        || !text.starts_with(JSON_FENCE_OPEN)
        || !text.ends_with(FENCE)
    {
        return None;
    }
    Some(text[JSON_FENCE_OPEN.len()..text.len() - FENCE.len()].trim())
}

/// Tier 3: any fence. Drops an info string such as `JSON` or `javascript`.
fn strip_any_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix(FENCE)?.strip_suffix(FENCE)?;
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    Some(body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"{"title": "Guitar", "milestones": []}"#;
    const ARRAY: &str = r#"[{"title": "a", "link": "https://example.com"}]"#;

    #[test]
    fn test_unfenced_json_is_returned_untouched() {
        assert_eq!(extract(PLAN).unwrap(), PLAN);
        assert_eq!(extract(ARRAY).unwrap(), ARRAY);
    }

    #[test]
    fn test_short_unfenced_json_is_not_sliced() {
        // A fixed 7/3 slice would turn this into garbage.
        let s = r#"{"a":1}"#;
        assert_eq!(extract(s).unwrap(), s);
    }

    #[test]
    fn test_surrounding_whitespace_is_accepted_as_is() {
        let s = format!("\n  {PLAN}\n");
        assert_eq!(extract(&s).unwrap(), s);
    }

    #[test]
    fn test_json_tagged_fence() {
        let fenced = format!("```json\n{PLAN}\n```");
        assert_eq!(extract(&fenced).unwrap(), PLAN);
    }

    #[test]
    fn test_bare_fence() {
        let fenced = format!("```\n{PLAN}\n```");
        assert_eq!(extract(&fenced).unwrap(), PLAN);
    }

    #[test]
    fn test_fence_with_other_tag() {
        let fenced = format!("```JSON\n{ARRAY}\n```");
        assert_eq!(extract(&fenced).unwrap(), ARRAY);

        let fenced = format!("```javascript\n{PLAN}\n```");
        assert_eq!(extract(&fenced).unwrap(), PLAN);
    }

    #[test]
    fn test_fence_without_newlines() {
        let fenced = format!("```json{PLAN}```");
        assert_eq!(extract(&fenced).unwrap(), PLAN);
    }

    #[test]
    fn test_fence_with_outer_whitespace() {
        let fenced = format!("\n\n```json\n{PLAN}\n```\n");
        assert_eq!(extract(&fenced).unwrap(), PLAN);
    }

    #[test]
    fn test_unterminated_fence_fails() {
        let raw = format!("```json\n{PLAN}");
        let err = extract(&raw).unwrap_err();
        assert!(matches!(err, GenerationError::Extraction { raw: r } if r == raw));
    }

    #[test]
    fn test_prose_fails_with_raw_text() {
        let raw = "I'm sorry, I can't help with that.";
        match extract(raw).unwrap_err() {
            GenerationError::Extraction { raw: r } => assert_eq!(r, raw),
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_fence_fails() {
        assert!(extract("```").is_err());
        assert!(extract("``````").is_err());
        assert!(extract("").is_err());
    }
}
