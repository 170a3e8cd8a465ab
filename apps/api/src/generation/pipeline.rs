//! Content orchestration: one pipeline shape shared by every content type.
//!
//! Flow: Received → [Searched →] Composed → Generated → Extracted → Validated → Done.
//! Any stage failure ends the run in `Failed` with a classified `GenerationError`.
//! No retries, no partial results, no resumption.
//!
//! The only suspension points are the two provider calls (search, generate), each
//! bounded by `Providers::call_timeout`. Dropping the run future (e.g. the client
//! disconnects) drops the in-flight provider request with it.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{Provider, ProviderError, ProviderErrorKind};
use crate::generation::error::GenerationError;
use crate::generation::extractor::extract;
use crate::generation::models::{
    ArticleFeed, ContentType, GenerationRequest, LearningPlan, ParsedContent, VideoFeed, VideoItem,
};
use crate::generation::prompts::{compose_article_feed, compose_learning_plan, compose_video_feed};
use crate::generation::schema::{validate_as, ContentSchema};
use crate::llm_client::{GenerativeClient, RawProviderResponse};
use crate::search_client::{SearchHit, VideoSearchClient};

/// External collaborators shared (read-only) by every pipeline run.
#[derive(Clone)]
pub struct Providers {
    pub llm: Arc<dyn GenerativeClient>,
    pub search: Arc<dyn VideoSearchClient>,
    pub call_timeout: Duration,
    pub video_results: u32,
}

impl Providers {
    async fn generate(&self, prompt: &str) -> Result<RawProviderResponse, GenerationError> {
        bounded(Provider::Generative, self.call_timeout, self.llm.generate(prompt)).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GenerationError> {
        bounded(
            Provider::VideoSearch,
            self.call_timeout,
            self.search.search(query, self.video_results),
        )
        .await
    }
}

async fn bounded<T>(
    provider: Provider,
    limit: Duration,
    call: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, GenerationError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(GenerationError::from),
        Err(_) => Err(ProviderError::new(
            provider,
            ProviderErrorKind::Timeout,
            format!("no response within {}ms", limit.as_millis()),
        )
        .into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Searched,
    Composed,
    Generated,
    Extracted,
    Validated,
    Done,
    Failed,
}

/// Result of a run together with the stages it passed through.
#[derive(Debug)]
pub struct PipelineRun<T> {
    pub stages: Vec<Stage>,
    pub result: Result<T, GenerationError>,
}

struct StageTrace {
    content_type: ContentType,
    stages: Vec<Stage>,
}

impl StageTrace {
    fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            stages: vec![Stage::Received],
        }
    }

    fn advance(&mut self, stage: Stage) {
        debug!(content_type = self.content_type.as_str(), ?stage, "pipeline stage");
        self.stages.push(stage);
    }
}

/// A document type with its own pre-composition step, prompt and post-validation check.
#[async_trait]
pub trait ContentKind: ContentSchema + Send + 'static {
    /// Data gathered before composition and needed again after validation.
    type Context: Send + Sync;

    /// Stage recorded when `prepare` does real work.
    const PREPARE_STAGE: Option<Stage> = None;

    async fn prepare(providers: &Providers, input: &str) -> Result<Self::Context, GenerationError>;

    fn compose(input: &str, context: &Self::Context) -> String;

    fn verify(self, _context: &Self::Context) -> Result<Self, GenerationError> {
        Ok(self)
    }
}

#[async_trait]
impl ContentKind for LearningPlan {
    type Context = ();

    async fn prepare(_providers: &Providers, _input: &str) -> Result<(), GenerationError> {
        Ok(())
    }

    fn compose(input: &str, _: &()) -> String {
        compose_learning_plan(input)
    }
}

#[async_trait]
impl ContentKind for ArticleFeed {
    type Context = ();

    async fn prepare(_providers: &Providers, _input: &str) -> Result<(), GenerationError> {
        Ok(())
    }

    fn compose(input: &str, _: &()) -> String {
        compose_article_feed(input)
    }
}

#[async_trait]
impl ContentKind for VideoFeed {
    /// The search results, in rank order, as the model must echo them.
    type Context = Vec<VideoItem>;

    const PREPARE_STAGE: Option<Stage> = Some(Stage::Searched);

    async fn prepare(
        providers: &Providers,
        query: &str,
    ) -> Result<Vec<VideoItem>, GenerationError> {
        let hits = providers.search(query).await?;
        Ok(hits.into_iter().map(VideoItem::from).collect())
    }

    fn compose(query: &str, videos: &Vec<VideoItem>) -> String {
        compose_video_feed(query, videos)
    }

    fn verify(self, expected: &Vec<VideoItem>) -> Result<Self, GenerationError> {
        if self.materials == *expected {
            return Ok(self);
        }

        let detail = if self.materials.len() != expected.len() {
            format!(
                "expected {} videos, found {}",
                expected.len(),
                self.materials.len()
            )
        } else {
            let index = self
                .materials
                .iter()
                .zip(expected)
                .position(|(got, want)| got != want)
                .unwrap_or_default();
            format!("materials[{index}] does not match search result {index}")
        };
        Err(GenerationError::Integrity(detail))
    }
}

pub struct Pipeline<K> {
    providers: Providers,
    _kind: PhantomData<fn() -> K>,
}

pub type LearningPlanPipeline = Pipeline<LearningPlan>;
pub type VideoFeedPipeline = Pipeline<VideoFeed>;
pub type ArticleFeedPipeline = Pipeline<ArticleFeed>;

impl<K: ContentKind> Pipeline<K> {
    pub fn new(providers: Providers) -> Self {
        Self {
            providers,
            _kind: PhantomData,
        }
    }

    pub async fn run(&self, input: &str) -> Result<K, GenerationError> {
        self.run_traced(input).await.result
    }

    pub async fn run_traced(&self, input: &str) -> PipelineRun<K> {
        let mut trace = StageTrace::new(K::CONTENT_TYPE);
        let result = self.drive(input, &mut trace).await;

        match &result {
            Ok(_) => {
                trace.advance(Stage::Done);
                info!(content_type = K::CONTENT_TYPE.as_str(), "Generation completed");
            }
            Err(e) => {
                let last = trace.stages.last().copied().unwrap_or(Stage::Received);
                warn!(
                    content_type = K::CONTENT_TYPE.as_str(),
                    kind = e.kind(),
                    after = ?last,
                    "Generation failed: {e}"
                );
                trace.advance(Stage::Failed);
            }
        }

        PipelineRun {
            stages: trace.stages,
            result,
        }
    }

    async fn drive(&self, input: &str, trace: &mut StageTrace) -> Result<K, GenerationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(GenerationError::Input("Prompt is required".to_string()));
        }

        let context = K::prepare(&self.providers, input).await?;
        if let Some(stage) = K::PREPARE_STAGE {
            trace.advance(stage);
        }

        let prompt = K::compose(input, &context);
        trace.advance(Stage::Composed);

        let raw = self.providers.generate(&prompt).await?;
        trace.advance(Stage::Generated);

        let candidate = extract(&raw.text)?;
        trace.advance(Stage::Extracted);

        let content = validate_as::<K>(candidate)?;
        trace.advance(Stage::Validated);

        content.verify(&context)
    }
}

/// Entry point for the request layer: picks the pipeline for a content type.
#[derive(Clone)]
pub struct ContentOrchestrator {
    providers: Providers,
}

impl ContentOrchestrator {
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    pub fn learning_plan(&self) -> LearningPlanPipeline {
        Pipeline::new(self.providers.clone())
    }

    pub fn video_feed(&self) -> VideoFeedPipeline {
        Pipeline::new(self.providers.clone())
    }

    pub fn article_feed(&self) -> ArticleFeedPipeline {
        Pipeline::new(self.providers.clone())
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<ParsedContent, GenerationError> {
        let text = request.raw_prompt.as_str();
        match request.content_type {
            ContentType::LearningPlan => self.learning_plan().run(text).await.map(Into::into),
            ContentType::VideoFeed => self.video_feed().run(text).await.map(Into::into),
            ContentType::ArticleFeed => self.article_feed().run(text).await.map(Into::into),
        }
    }
}
