//! Structural validation of recovered JSON against the three output schemas.
//!
//! Reports the first violation with a path such as `milestones[2].sub_goals`.
//! Counts are exact. Nothing is padded, truncated or coerced.

use reqwest::Url;
use serde_json::{Map, Value};

use crate::generation::error::GenerationError;
use crate::generation::models::{
    ArticleFeed, ArticleLink, ContentType, LearningPlan, MaterialKind, Milestone,
    Terminology, VideoFeed, VideoItem, ARTICLE_COUNT, MILESTONE_COUNT, SUB_GOAL_COUNT,
    TERMINOLOGY_COUNT,
};
use crate::search_client::is_video_provider_link;

type Object = Map<String, Value>;

/// A document type that can be checked and built from untyped JSON.
pub trait ContentSchema: Sized {
    const CONTENT_TYPE: ContentType;

    fn from_json(value: &Value) -> Result<Self, GenerationError>;
}

/// Validates `candidate_json` against the schema selected at runtime. Pipelines know
/// their type statically and call `validate_as` directly.
#[cfg(test)]
pub(crate) fn validate(
    candidate_json: &str,
    content_type: ContentType,
) -> Result<crate::generation::models::ParsedContent, GenerationError> {
    match content_type {
        ContentType::LearningPlan => validate_as::<LearningPlan>(candidate_json).map(Into::into),
        ContentType::VideoFeed => validate_as::<VideoFeed>(candidate_json).map(Into::into),
        ContentType::ArticleFeed => validate_as::<ArticleFeed>(candidate_json).map(Into::into),
    }
}

pub fn validate_as<T: ContentSchema>(candidate_json: &str) -> Result<T, GenerationError> {
    let value: Value = serde_json::from_str(candidate_json)
        .map_err(|e| GenerationError::validation("$", format!("invalid JSON: {e}")))?;
    T::from_json(&value)
}

impl ContentSchema for LearningPlan {
    const CONTENT_TYPE: ContentType = ContentType::LearningPlan;

    fn from_json(value: &Value) -> Result<Self, GenerationError> {
        let root = object(value, "")?;
        let title = text(root, "title", "")?;

        let terms = field(root, "terminology", "")?;
        let terminology = exact_array(terms, "terminology", TERMINOLOGY_COUNT)?
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<Terminology, GenerationError> {
                let path = index_path("terminology", i);
                let entry = object(entry, &path)?;
                Ok(Terminology {
                    term: text(entry, "term", &path)?,
                    description: text(entry, "description", &path)?,
                })
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;

        let goals = field(root, "milestones", "")?;
        let milestones = exact_array(goals, "milestones", MILESTONE_COUNT)?
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<Milestone, GenerationError> {
                let path = index_path("milestones", i);
                let entry = object(entry, &path)?;
                let main_goal = text(entry, "main_goal", &path)?;

                let goals_path = field_path(&path, "sub_goals");
                let raw_goals = field(entry, "sub_goals", &path)?;
                let sub_goals = exact_array(raw_goals, &goals_path, SUB_GOAL_COUNT)?
                    .iter()
                    .enumerate()
                    .map(|(j, goal)| non_blank(goal, &index_path(&goals_path, j)))
                    .collect::<Result<Vec<_>, GenerationError>>()?;

                Ok(Milestone {
                    main_goal,
                    sub_goals,
                })
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;

        Ok(LearningPlan {
            title,
            terminology,
            milestones,
        })
    }
}

impl ContentSchema for VideoFeed {
    const CONTENT_TYPE: ContentType = ContentType::VideoFeed;

    /// Shape only. Whether `materials` matches the search results is checked by the pipeline.
    fn from_json(value: &Value) -> Result<Self, GenerationError> {
        let root = object(value, "")?;
        let title = text(root, "title", "")?;
        let description = text(root, "description", "")?;

        let materials = array(field(root, "materials", "")?, "materials")?
            .iter()
            .enumerate()
            .map(|(i, item)| -> Result<VideoItem, GenerationError> {
                let path = index_path("materials", i);
                let item = object(item, &path)?;

                let kind = string(field(item, "type", &path)?, &field_path(&path, "type"))?;
                if kind != "video" {
                    return Err(GenerationError::validation(
                        field_path(&path, "type"),
                        format!("expected \"video\", found \"{kind}\""),
                    ));
                }

                let title = string(field(item, "title", &path)?, &field_path(&path, "title"))?;
                let (link, _) = link(item, "link", &path)?;

                Ok(VideoItem {
                    kind: MaterialKind::Video,
                    title,
                    link,
                })
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;

        Ok(VideoFeed {
            title,
            description,
            materials,
        })
    }
}

impl ContentSchema for ArticleFeed {
    const CONTENT_TYPE: ContentType = ContentType::ArticleFeed;

    fn from_json(value: &Value) -> Result<Self, GenerationError> {
        let links = exact_array(value, "", ARTICLE_COUNT)?
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<ArticleLink, GenerationError> {
                let path = index_path("", i);
                let entry = object(entry, &path)?;
                let title = text(entry, "title", &path)?;
                let (link, url) = link(entry, "link", &path)?;

                if is_video_provider_link(&url) {
                    return Err(GenerationError::validation(
                        field_path(&path, "link"),
                        "video links are not allowed in article results",
                    ));
                }

                Ok(ArticleLink { title, link })
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;

        Ok(ArticleFeed(links))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Path-qualified accessors. The root path is the empty string, shown as `$`.
// ────────────────────────────────────────────────────────────────────────────

fn shown(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &str, value: &Value) -> GenerationError {
    GenerationError::validation(
        shown(path),
        format!("expected {expected}, found {}", type_name(value)),
    )
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Object, GenerationError> {
    value.as_object().ok_or_else(|| mismatch(path, "object", value))
}

fn field<'a>(obj: &'a Object, key: &str, parent: &str) -> Result<&'a Value, GenerationError> {
    obj.get(key)
        .ok_or_else(|| GenerationError::validation(field_path(parent, key), "missing required key"))
}

fn array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, GenerationError> {
    value.as_array().ok_or_else(|| mismatch(path, "array", value))
}

fn exact_array<'a>(
    value: &'a Value,
    path: &str,
    expected: usize,
) -> Result<&'a Vec<Value>, GenerationError> {
    let items = array(value, path)?;
    if items.len() != expected {
        return Err(GenerationError::validation(
            shown(path),
            format!("expected {expected} entries, found {}", items.len()),
        ));
    }
    Ok(items)
}

fn string(value: &Value, path: &str) -> Result<String, GenerationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(path, "string", value))
}

fn non_blank(value: &Value, path: &str) -> Result<String, GenerationError> {
    let s = string(value, path)?;
    if s.trim().is_empty() {
        return Err(GenerationError::validation(path, "must not be blank"));
    }
    Ok(s)
}

fn text(obj: &Object, key: &str, parent: &str) -> Result<String, GenerationError> {
    non_blank(field(obj, key, parent)?, &field_path(parent, key))
}

/// Absolute http(s) URL. Returns the original string alongside the parsed form.
fn link(obj: &Object, key: &str, parent: &str) -> Result<(String, Url), GenerationError> {
    let path = field_path(parent, key);
    let raw = string(field(obj, key, parent)?, &path)?;
    let url = Url::parse(&raw)
        .map_err(|e| GenerationError::validation(&path, format!("invalid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(GenerationError::validation(
            &path,
            format!("expected an http(s) URL, found \"{raw}\""),
        ));
    }
    Ok((raw, url))
}
