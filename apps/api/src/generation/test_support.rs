//! Scripted providers and in-memory stores shared by pipeline and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{AppError, Provider, ProviderError, ProviderErrorKind};
use crate::generation::pipeline::Providers;
use crate::history::store::HistoryStore;
use crate::llm_client::{GenerativeClient, RawProviderResponse};
use crate::models::user::{NewUser, User};
use crate::search_client::{SearchHit, VideoSearchClient};
use crate::users::store::UserStore;

/// Returns the same reply (or failure) on every call and records the prompts it saw.
pub struct ScriptedLlm {
    reply: Result<String, ProviderErrorKind>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(kind: ProviderErrorKind) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(kind),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<RawProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(RawProviderResponse { text: text.clone() }),
            Err(kind) => Err(ProviderError::new(Provider::Generative, *kind, "scripted failure")),
        }
    }
}

/// Never answers.
pub struct HangingLlm;

#[async_trait]
impl GenerativeClient for HangingLlm {
    async fn generate(&self, _prompt: &str) -> Result<RawProviderResponse, ProviderError> {
        std::future::pending().await
    }
}

pub struct StaticSearch {
    hits: Result<Vec<SearchHit>, ProviderErrorKind>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self {
            hits: Ok(hits),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(kind: ProviderErrorKind) -> Arc<Self> {
        Arc::new(Self {
            hits: Err(kind),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearchClient for StaticSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.hits {
            Ok(hits) => Ok(hits.iter().take(max_results as usize).cloned().collect()),
            Err(kind) => Err(ProviderError::new(Provider::VideoSearch, *kind, "scripted failure")),
        }
    }
}

pub fn providers(
    llm: &Arc<impl GenerativeClient + 'static>,
    search: &Arc<StaticSearch>,
) -> Providers {
    Providers {
        llm: llm.clone(),
        search: search.clone(),
        call_timeout: Duration::from_secs(5),
        video_results: 5,
    }
}

/// `n` hits titled "Video 1".."Video n" with ids "vid1".."vidn".
pub fn hits(n: usize) -> Vec<SearchHit> {
    (1..=n)
        .map(|i| SearchHit {
            title: format!("Video {i}"),
            video_id: format!("vid{i}"),
        })
        .collect()
}

pub fn article_feed_json() -> String {
    json!([
        {"title": "The Perfect Loaf: Beginner's Sourdough", "link": "https://www.theperfectloaf.com/beginners-sourdough-bread/"},
        {"title": "King Arthur: Sourdough Starter", "link": "https://www.kingarthurbaking.com/recipes/sourdough-starter-recipe"},
        {"title": "Serious Eats: Sourdough Guide", "link": "https://www.seriouseats.com/sourdough-bread-recipe"},
        {"title": "Wikipedia: Sourdough", "link": "https://en.wikipedia.org/wiki/Sourdough"},
        {"title": "BBC Good Food: Sourdough", "link": "https://www.bbcgoodfood.com/recipes/sourdough-bread"}
    ])
    .to_string()
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let row = User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            street_address: user.street_address,
            city: user.city,
            state: user.state,
            zip_code: user.zip_code,
            country: user.country,
            terms_and_conditions: user.terms_and_conditions,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(id, row);
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    prompts: Mutex<HashMap<Uuid, Vec<String>>>,
    outputs: Mutex<HashMap<Uuid, Vec<String>>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append_prompt(&self, user_id: Uuid, text: &str) -> Result<(), AppError> {
        self.prompts
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    async fn append_output(&self, user_id: Uuid, text: &str) -> Result<(), AppError> {
        self.outputs
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    async fn prompts(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(self
            .prompts
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn outputs(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// History sink whose writes always fail.
pub struct BrokenHistoryStore;

#[async_trait]
impl HistoryStore for BrokenHistoryStore {
    async fn append_prompt(&self, _user_id: Uuid, _text: &str) -> Result<(), AppError> {
        Err(AppError::Internal(anyhow::anyhow!("history offline")))
    }

    async fn append_output(&self, _user_id: Uuid, _text: &str) -> Result<(), AppError> {
        Err(AppError::Internal(anyhow::anyhow!("history offline")))
    }

    async fn prompts(&self, _user_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(Vec::new())
    }

    async fn outputs(&self, _user_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(Vec::new())
    }
}
