//! Typed documents produced by the generation pipelines.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search_client::{watch_url, SearchHit};

/// Terminology entries in a learning plan.
pub const TERMINOLOGY_COUNT: usize = 5;
/// Milestones in a learning plan.
pub const MILESTONE_COUNT: usize = 5;
/// Sub-goals per milestone.
pub const SUB_GOAL_COUNT: usize = 5;
/// Links in an article feed.
pub const ARTICLE_COUNT: usize = 5;

/// Selects which pipeline and schema applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    LearningPlan,
    VideoFeed,
    ArticleFeed,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::LearningPlan => "learning_plan",
            ContentType::VideoFeed => "video_feed",
            ContentType::ArticleFeed => "article_feed",
        }
    }
}

/// Per-call request. Never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub content_type: ContentType,
    #[serde(rename = "prompt")]
    pub raw_prompt: String,
    /// When present, prompt and output are appended to the user's history.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminology {
    pub term: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub main_goal: String,
    pub sub_goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPlan {
    pub title: String,
    pub terminology: Vec<Terminology>,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub title: String,
    pub link: String,
}

impl From<SearchHit> for VideoItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            kind: MaterialKind::Video,
            link: watch_url(&hit.video_id),
            title: hit.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFeed {
    pub title: String,
    pub description: String,
    pub materials: Vec<VideoItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLink {
    pub title: String,
    pub link: String,
}

/// Exactly `ARTICLE_COUNT` links, none pointing at the video provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleFeed(pub Vec<ArticleLink>);

/// Output of `schema::validate` when the content type is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedContent {
    LearningPlan(LearningPlan),
    VideoFeed(VideoFeed),
    ArticleFeed(ArticleFeed),
}

impl From<LearningPlan> for ParsedContent {
    fn from(plan: LearningPlan) -> Self {
        ParsedContent::LearningPlan(plan)
    }
}

impl From<VideoFeed> for ParsedContent {
    fn from(feed: VideoFeed) -> Self {
        ParsedContent::VideoFeed(feed)
    }
}

impl From<ArticleFeed> for ParsedContent {
    fn from(feed: ArticleFeed) -> Self {
        ParsedContent::ArticleFeed(feed)
    }
}
