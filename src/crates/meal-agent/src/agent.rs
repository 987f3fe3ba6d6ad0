//! The recommendation pipeline.
//!
//! One turn runs:
//!
//! ```text
//! AwaitingDecision → Deciding → Executing → (Relaxing) → Summarizing → Done
//!                        └──────────┴────────────────────────┴──→ Failed
//! ```
//!
//! Both model calls happen on every successful turn. An empty search with
//! effective constraints is retried once with a relaxed filter. Every failure
//! is turned into a polite reply by [`MealAgent::chat`]; callers that need
//! the trace use [`MealAgent::run_turn`].

use crate::config::{AgentConfig, LlmProviderKind, PipelineSettings};
use crate::decision::{decision_schema, Decision, DecisionParser, DECISION_SCHEMA_NAME};
use crate::error::{AgentError, Result};
use crate::offline::OfflineChatModel;
use crate::prompt;
use crate::relax::{relaxed_retry, should_relax};
use crate::result::{execute, FunctionResult};
use catalog::{extract_tags, Catalog, SearchFilter};
use llm::remote::OpenAiClient;
use llm::{ChatModel, ChatRequest, Message, RemoteLlmConfig, ResponseFormat};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Which kind of model backs an agent, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    Online,
    Offline,
}

/// Steps of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    AwaitingDecision,
    Deciding,
    Executing,
    Relaxing,
    Summarizing,
    Done,
    Failed,
}

/// Trace of a completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// States visited, in order.
    pub states: Vec<PipelineState>,
    pub decision: Decision,
    /// Cleaned parameters of the first execution.
    pub params: SearchFilter,
    /// Parameters of the relaxed retry, when one ran.
    pub relaxed_params: Option<SearchFilter>,
    /// Final function result handed to the summary call.
    pub result: FunctionResult,
    pub reply: String,
}

impl TurnReport {
    pub fn relaxed(&self) -> bool {
        self.relaxed_params.is_some()
    }
}

/// Meal recommendation agent.
///
/// Holds a shared, read-only catalog; one agent can serve concurrent turns.
pub struct MealAgent {
    model: Arc<dyn ChatModel>,
    catalog: Arc<Catalog>,
    parser: DecisionParser,
    tags: BTreeSet<String>,
    system_prompt: String,
    settings: PipelineSettings,
    temperature: Option<f32>,
    mode: AgentMode,
}

impl fmt::Debug for MealAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MealAgent")
            .field("model", &self.model.model_name())
            .field("mode", &self.mode)
            .field("catalog_items", &self.catalog.len())
            .field("tags", &self.tags)
            .finish()
    }
}

impl MealAgent {
    /// Build an agent around an existing model and catalog.
    pub fn new(
        model: Arc<dyn ChatModel>,
        catalog: Arc<Catalog>,
        mode: AgentMode,
        settings: PipelineSettings,
    ) -> Result<Self> {
        let parser = DecisionParser::new(settings.strict_schema)?;
        let tags = extract_tags(&catalog);
        let system_prompt = prompt::decision_prompt(&tags);

        Ok(Self {
            model,
            catalog,
            parser,
            tags,
            system_prompt,
            settings,
            temperature: None,
            mode,
        })
    }

    /// Build an agent from configuration, loading the configured catalog.
    ///
    /// Fails with [`AgentError::Configuration`] when the OpenAI provider is
    /// selected without an API key.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::load(&config.catalog.path));
        Self::with_catalog(config, catalog)
    }

    /// Build an agent from configuration with an injected catalog.
    pub fn with_catalog(config: &AgentConfig, catalog: Arc<Catalog>) -> Result<Self> {
        let (model, mode): (Arc<dyn ChatModel>, AgentMode) = match config.llm.provider {
            LlmProviderKind::OpenAi => {
                let api_key = config.llm.api_key.clone().ok_or_else(|| {
                    AgentError::Configuration(
                        "OpenAI API key not configured. Set OPENAI_API_KEY or llm.api_key"
                            .to_string(),
                    )
                })?;

                let mut remote = RemoteLlmConfig::new(
                    api_key,
                    config.llm.api_base.clone(),
                    config.llm.model.clone(),
                )
                .with_timeout(Duration::from_secs(config.llm.timeout_secs));
                if let Some(org) = &config.llm.organization {
                    remote = remote.with_organization(org.clone());
                }

                let client = OpenAiClient::new(remote)
                    .map_err(|e| AgentError::Configuration(e.to_string()))?;
                (Arc::new(client), AgentMode::Online)
            }
            LlmProviderKind::Offline => {
                let model = OfflineChatModel::new(extract_tags(&catalog))?;
                (Arc::new(model), AgentMode::Offline)
            }
        };

        info!(
            model = %model.model_name(),
            mode = ?mode,
            items = catalog.len(),
            "Meal agent ready"
        );

        let mut agent = Self::new(model, catalog, mode, config.agent.clone())?;
        agent.temperature = config.llm.temperature;
        Ok(agent)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    pub fn is_offline(&self) -> bool {
        self.mode == AgentMode::Offline
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Tag vocabulary the model is grounded on.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Answer a request. Never fails: errors become apologies.
    pub async fn chat(&self, user_text: &str) -> String {
        match self.run_turn(user_text).await {
            Ok(report) => report.reply,
            Err(e) => prompt::apology(&e),
        }
    }

    /// Alias of [`MealAgent::chat`].
    pub async fn get_recommendation(&self, user_request: &str) -> String {
        self.chat(user_request).await
    }

    /// Run the full pipeline and return its trace.
    pub async fn run_turn(&self, user_text: &str) -> Result<TurnReport> {
        let mut states = vec![PipelineState::AwaitingDecision];

        match self.drive(user_text, &mut states).await {
            Ok(report) => Ok(report),
            Err(e) => {
                states.push(PipelineState::Failed);
                match &e {
                    AgentError::Transport(inner) => error!(
                        error = %e,
                        retryable = inner.is_retryable(),
                        auth = inner.is_auth_error(),
                        states = ?states,
                        "Turn failed"
                    ),
                    _ => error!(error = %e, states = ?states, "Turn failed"),
                }
                Err(e)
            }
        }
    }

    async fn drive(&self, user_text: &str, states: &mut Vec<PipelineState>) -> Result<TurnReport> {
        info!(request = %user_text, "Turn started");

        states.push(PipelineState::Deciding);
        let raw = self.call_model("decision", self.decision_request(user_text)).await?;
        let decision = self.parser.parse(&raw)?;
        debug!(action = %decision.action, intent = %decision.user_intent, "Decision parsed");

        states.push(PipelineState::Executing);
        let params = decision.cleaned_params();
        let mut result = execute(&self.catalog, decision.action, &params);
        let mut relaxed_params = None;

        if should_relax(decision.action, &params, result.count()) {
            states.push(PipelineState::Relaxing);
            match relaxed_retry(&params) {
                Some(relaxed) => {
                    result = execute(&self.catalog, decision.action, &relaxed);
                    info!(count = result.count(), "Relaxed search finished");
                    relaxed_params = Some(relaxed);
                }
                None => debug!("Relaxation changes nothing, retry skipped"),
            }
        }

        if !result.is_success() {
            warn!(result = %result.to_json(), "Catalog query failed");
        }

        states.push(PipelineState::Summarizing);
        let bundle = prompt::summary_bundle(
            user_text,
            &decision.user_intent,
            decision.action,
            &decision.reasoning,
            &result,
        );
        let reply = self.call_model("summary", self.summary_request(bundle)).await?;

        states.push(PipelineState::Done);
        info!(action = %decision.action, count = result.count(), "Turn finished");

        Ok(TurnReport {
            states: states.clone(),
            decision,
            params,
            relaxed_params,
            result,
            reply,
        })
    }

    fn decision_request(&self, user_text: &str) -> ChatRequest {
        let request = ChatRequest::new(vec![
            Message::system(self.system_prompt.clone()),
            Message::human(user_text),
        ])
        .with_response_format(ResponseFormat::json_schema(
            DECISION_SCHEMA_NAME,
            decision_schema(&self.tags),
        ));
        self.apply_temperature(request)
    }

    fn summary_request(&self, bundle: String) -> ChatRequest {
        let request = ChatRequest::new(vec![
            Message::system(prompt::SUMMARY_INSTRUCTION),
            Message::human(bundle),
        ]);
        self.apply_temperature(request)
    }

    fn apply_temperature(&self, request: ChatRequest) -> ChatRequest {
        match self.temperature {
            Some(t) => request.with_temperature(t),
            None => request,
        }
    }

    /// One bounded model call.
    async fn call_model(&self, stage: &'static str, request: ChatRequest) -> Result<String> {
        debug!(stage, model = %self.model.model_name(), "Calling model");

        let response = tokio::time::timeout(self.settings.request_timeout(), self.model.chat(request))
            .await
            .map_err(|_| AgentError::Timeout {
                stage,
                seconds: self.settings.request_timeout_secs,
            })??;

        Ok(response.text().to_string())
    }
}
