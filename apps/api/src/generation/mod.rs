// Generation core: prompt composition, provider call, JSON recovery, schema
// validation, and the pipelines that sequence them.
// All provider calls go through llm_client / search_client.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod schema;

#[cfg(test)]
pub mod test_support;
