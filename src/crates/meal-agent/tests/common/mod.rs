//! Common test utilities: a scripted chat model and sample catalogs.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog::{Catalog, MenuItem};
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError};
use meal_agent::config::PipelineSettings;
use meal_agent::{AgentMode, MealAgent};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted model outcome.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
    Hang(Duration),
}

/// Chat model that replays a script and records every request.
///
/// Once the script is exhausted it falls back to `decision` for structured
/// requests and `summary` for free-text ones, when those are set.
#[derive(Debug, Default)]
pub struct MockChatModel {
    script: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ChatRequest>>,
    decision: Option<String>,
    summary: Option<String>,
}

impl MockChatModel {
    pub fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    /// Decision JSON followed by a summary text.
    pub fn turn(decision: Value, summary: &str) -> Self {
        Self::scripted(vec![
            Reply::Text(decision.to_string()),
            Reply::Text(summary.to_string()),
        ])
    }

    /// Answers every structured call with `decision` and every other with `summary`.
    pub fn responding(decision: Value, summary: &str) -> Self {
        Self {
            decision: Some(decision.to_string()),
            summary: Some(summary.to_string()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Human message of the n-th call.
    pub fn human_text(&self, call: usize) -> String {
        self.requests()[call]
            .last_human_text()
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        let structured = request.is_structured();
        self.requests.lock().unwrap().push(request);

        let next = self.script.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => reply,
            None => {
                let fallback = if structured { &self.decision } else { &self.summary };
                match fallback {
                    Some(text) => Reply::Text(text.clone()),
                    None => Reply::Fail("script exhausted".to_string()),
                }
            }
        };

        match reply {
            Reply::Text(text) => Ok(ChatResponse::from_text(text)),
            Reply::Fail(message) => Err(LlmError::ProviderError(message)),
            Reply::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(ChatResponse::from_text("too late"))
            }
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

pub fn item(name: &str, description: &str, price: f64, tags: &[&str]) -> MenuItem {
    MenuItem::new(name, description, price, tags.iter().copied()).unwrap()
}

/// Two dishes, the first one vegan.
pub fn basic_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_items(vec![
        item("Salada Vegana", "Folhas, grão-de-bico e tomate", 25.0, &["vegano"]),
        item("Frango Grelhado", "Peito de frango com arroz", 30.0, &["sem gluten"]),
    ]))
}

/// Same dishes, but the vegan salad is also spicy.
pub fn spicy_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_items(vec![
        item("Salada Vegana", "Folhas, grão-de-bico e tomate", 25.0, &["vegano", "picante"]),
        item("Frango Grelhado", "Peito de frango com arroz", 30.0, &["sem gluten"]),
    ]))
}

pub fn agent_with(model: Arc<MockChatModel>, catalog: Arc<Catalog>) -> MealAgent {
    agent_with_settings(model, catalog, PipelineSettings::default())
}

pub fn agent_with_settings(
    model: Arc<MockChatModel>,
    catalog: Arc<Catalog>,
    settings: PipelineSettings,
) -> MealAgent {
    MealAgent::new(model, catalog, AgentMode::Online, settings).unwrap()
}

/// Full search decision; every parameter key present.
pub fn search_decision(
    budget: Option<f64>,
    include: &[&str],
    exclude: &[&str],
    keywords: &[&str],
) -> Value {
    json!({
        "action": "search_catalog",
        "search_params": {
            "budget": budget,
            "include_tags": include,
            "exclude_tags": exclude,
            "required_keywords": keywords,
        },
        "reasoning": "Busca no catálogo",
        "user_intent": "Encontrar um prato",
    })
}

/// Decision for an action without search parameters.
pub fn plain_decision(action: &str) -> Value {
    json!({
        "action": action,
        "search_params": null,
        "reasoning": "Ação direta",
        "user_intent": "Consulta de preço",
    })
}

/// JSON result embedded in a summary bundle.
pub fn bundle_result(bundle: &str) -> Value {
    let (_, tail) = bundle
        .rsplit_once(meal_agent::prompt::RESULT_MARKER)
        .expect("bundle has a result marker");
    let (json, _) = tail
        .rsplit_once(meal_agent::prompt::SUMMARY_CLOSING)
        .expect("bundle has a closing line");
    serde_json::from_str(json.trim()).expect("bundle result is JSON")
}
