//! Keyword-driven chat model that runs without network access.
//!
//! Decision calls are answered with the same mapping rules the hosted model
//! is prompted with; summary calls render the function result embedded in
//! the bundle. Good enough for demos and for exercising the pipeline end to
//! end without credentials.

use crate::decision::Action;
use crate::error::{AgentError, Result};
use crate::prompt::{RESULT_MARKER, SUMMARY_CLOSING};
use async_trait::async_trait;
use llm::{ChatModel, ChatRequest, ChatResponse};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::debug;

const PROTEIN_KEYWORDS: [&str; 6] = ["frango", "carne", "peixe", "ovo", "tofu", "camarão"];
const VEGETABLE_KEYWORDS: [&str; 3] = ["legumes", "brócolis", "cenoura"];

const CHEAPEST_CUES: [&str; 5] = ["mais barato", "econômico", "economico", "menor preço", "mais em conta"];
const PRICIEST_CUES: [&str; 3] = ["mais caro", "premium", "maior preço"];
const RANGE_CUES: [&str; 3] = ["faixa de preço", "faixa de preco", "preços disponíveis"];

/// Offline stand-in for the hosted model.
#[derive(Debug, Clone)]
pub struct OfflineChatModel {
    tags: BTreeSet<String>,
    budget_pattern: Regex,
}

impl OfflineChatModel {
    /// Create a model that recognizes the given tag vocabulary.
    pub fn new(tags: BTreeSet<String>) -> Result<Self> {
        let budget_pattern = Regex::new(r"(?:r\$\s*|até\s+|ate\s+)(\d+(?:[.,]\d{1,2})?)")
            .map_err(|e| AgentError::Configuration(format!("Invalid budget pattern: {}", e)))?;

        Ok(Self {
            tags,
            budget_pattern,
        })
    }

    /// Decision object for a user request.
    pub fn decide(&self, user_text: &str) -> Value {
        let text = user_text.to_lowercase();

        let action = if contains_any(&text, &CHEAPEST_CUES) {
            Action::GetCheapestItem
        } else if contains_any(&text, &PRICIEST_CUES) {
            Action::GetMostExpensiveItem
        } else if contains_any(&text, &RANGE_CUES) {
            Action::GetPriceRange
        } else {
            Action::SearchCatalog
        };

        if action != Action::SearchCatalog {
            return json!({
                "action": action,
                "search_params": null,
                "reasoning": format!("O pedido corresponde diretamente à ação {}", action),
                "user_intent": user_text.trim(),
            });
        }

        let budget = self.budget(&text);
        let (include, exclude) = self.tag_clauses(&text);
        let keywords = keyword_hints(&text);

        let mut reasons = Vec::new();
        if let Some(budget) = budget {
            reasons.push(format!("orçamento de até R$ {}", format_price(budget)));
        }
        if !include.is_empty() {
            reasons.push(format!("tags {}", include.join(", ")));
        }
        if !exclude.is_empty() {
            reasons.push(format!("sem {}", exclude.join(", ")));
        }
        if !keywords.is_empty() {
            reasons.push(format!("ingredientes {}", keywords.join(", ")));
        }
        let reasoning = if reasons.is_empty() {
            "Busca geral no cardápio".to_string()
        } else {
            format!("Busca com {}", reasons.join("; "))
        };

        json!({
            "action": action,
            "search_params": {
                "budget": budget,
                "include_tags": non_empty(include),
                "exclude_tags": non_empty(exclude),
                "required_keywords": non_empty(keywords),
            },
            "reasoning": reasoning,
            "user_intent": user_text.trim(),
        })
    }

    /// Friendly reply rendered from a summary bundle.
    pub fn summarize(&self, bundle: &str) -> String {
        match extract_result(bundle) {
            Some(result) => render_result(&result),
            None => "Não consegui interpretar o resultado da busca. Tente novamente!".to_string(),
        }
    }

    fn budget(&self, text: &str) -> Option<f64> {
        self.budget_pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
    }

    /// Tags to require and tags to reject, in vocabulary order.
    fn tag_clauses(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for tag in &self.tags {
            let negated = !tag.starts_with("sem ")
                && (text.contains(&format!("sem {}", tag)) || text.contains(&format!("não {}", tag)));

            if negated {
                exclude.push(tag.clone());
            } else if text.contains(tag.as_str()) || self.synonym_mentioned(tag, text) {
                include.push(tag.clone());
            }
        }

        (include, exclude)
    }

    fn synonym_mentioned(&self, tag: &str, text: &str) -> bool {
        if tag == "picante" {
            return text.contains("apimentad");
        }
        match tag.strip_prefix("sem ") {
            Some(restriction) => {
                text.contains(&format!("intolerante a {}", restriction))
                    || text.contains(&format!("intolerante à {}", restriction))
            }
            None => false,
        }
    }
}

#[async_trait]
impl ChatModel for OfflineChatModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        let text = request.last_human_text().unwrap_or_default();

        let reply = if request.is_structured() {
            let decision = self.decide(text);
            debug!(decision = %decision, "Offline decision");
            decision.to_string()
        } else {
            self.summarize(text)
        };

        Ok(ChatResponse::from_text(reply))
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

fn keyword_hints(text: &str) -> Vec<String> {
    let mut keywords: Vec<&str> = Vec::new();
    if text.contains("proteína") || text.contains("proteina") {
        keywords.extend(PROTEIN_KEYWORDS);
    }
    if text.contains("arroz") {
        keywords.push("arroz");
    }
    if text.contains("legumes") {
        keywords.extend(VEGETABLE_KEYWORDS);
    }

    let mut seen = BTreeSet::new();
    keywords
        .into_iter()
        .filter(|k| seen.insert(*k))
        .map(str::to_string)
        .collect()
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

/// The result JSON of a summary bundle.
///
/// User text and reasoning precede the JSON and may repeat the marker, so
/// every occurrence is tried until one is followed by valid JSON.
fn extract_result(bundle: &str) -> Option<Value> {
    let body = bundle.rsplit_once(SUMMARY_CLOSING).map_or(bundle, |(body, _)| body);

    body.match_indices(RESULT_MARKER).find_map(|(at, marker)| {
        let json = &body[at + marker.len()..];
        serde_json::from_str(json.trim()).ok()
    })
}

fn render_result(result: &Value) -> String {
    if let Some(error) = result.get("error").and_then(Value::as_str) {
        return format!("Não consegui consultar o cardápio: {}. Tente novamente!", error);
    }

    if let Some(items) = result.get("results").and_then(Value::as_array) {
        if items.is_empty() {
            return "Não encontrei pratos que atendam ao seu pedido. Que tal ajustar o orçamento ou as restrições?"
                .to_string();
        }
        let lines: Vec<String> = items.iter().map(render_item).collect();
        let noun = if items.len() == 1 { "opção" } else { "opções" };
        return format!("Encontrei {} {} para você:\n{}", items.len(), noun, lines.join("\n"));
    }

    match result.get("result") {
        Some(Value::Null) | None => "O cardápio está vazio no momento.".to_string(),
        Some(summary) if summary.get("min_price").is_some() => render_range(summary),
        Some(item) => format!("Minha sugestão:\n{}", render_item(item)),
    }
}

fn render_item(item: &Value) -> String {
    let name = item.get("nome").and_then(Value::as_str).unwrap_or("?");
    let price = item.get("preco").and_then(Value::as_f64).unwrap_or_default();
    let description = item.get("descricao").and_then(Value::as_str).unwrap_or_default();

    if description.is_empty() {
        format!("- {} (R$ {})", name, format_price(price))
    } else {
        format!("- {} (R$ {}): {}", name, format_price(price), description)
    }
}

fn render_range(summary: &Value) -> String {
    let field = |key: &str| summary.get(key).and_then(Value::as_f64).unwrap_or_default();
    let total = summary.get("total_items").and_then(Value::as_u64).unwrap_or_default();

    if total == 0 {
        return "O cardápio está vazio no momento.".to_string();
    }
    format!(
        "Os preços vão de R$ {} a R$ {}, com média de R$ {} ({} pratos).",
        format_price(field("min_price")),
        format_price(field("max_price")),
        format_price(field("avg_price")),
        total
    )
}

/// `25.5` → `25,50`
fn format_price(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}
