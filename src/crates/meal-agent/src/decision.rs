//! Decision contract between the model and the pipeline.
//!
//! The model classifies each request into an [`Action`] plus optional
//! search parameters. The object is requested under a strict JSON schema
//! ([`decision_schema`]) and re-validated here before anything runs, since
//! the provider's guarantee is outside our control.

use crate::error::{AgentError, Result};
use catalog::SearchFilter;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Schema name reported to the provider.
pub const DECISION_SCHEMA_NAME: &str = "meal_recommendation_decision";

const PARAM_KEYS: [&str; 4] = ["budget", "include_tags", "exclude_tags", "required_keywords"];

/// Catalog operation selected by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SearchCatalog,
    GetCheapestItem,
    GetMostExpensiveItem,
    GetPriceRange,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::SearchCatalog,
        Action::GetCheapestItem,
        Action::GetMostExpensiveItem,
        Action::GetPriceRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SearchCatalog => "search_catalog",
            Action::GetCheapestItem => "get_cheapest_item",
            Action::GetMostExpensiveItem => "get_most_expensive_item",
            Action::GetPriceRange => "get_price_range",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search parameters exactly as the model produced them.
///
/// `None` and empty lists mean "not constrained"; see [`SearchParams::clean`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub include_tags: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_tags: Option<Vec<String>>,
    #[serde(default)]
    pub required_keywords: Option<Vec<String>>,
}

impl SearchParams {
    /// Keep only effectively-set constraints.
    ///
    /// Null values and empty lists are dropped. Tags are trimmed and
    /// lowercased to match catalog tags; blank entries are removed.
    pub fn clean(&self) -> SearchFilter {
        SearchFilter {
            budget: self.budget,
            include_tags: clean_list(self.include_tags.as_deref(), catalog::item::normalize_tag),
            exclude_tags: clean_list(self.exclude_tags.as_deref(), catalog::item::normalize_tag),
            required_keywords: clean_list(self.required_keywords.as_deref(), |k| k.trim().to_string()),
        }
    }
}

fn clean_list(values: Option<&[String]>, normalize: fn(&str) -> String) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// A validated model decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    #[serde(default)]
    pub search_params: Option<SearchParams>,
    pub reasoning: String,
    pub user_intent: String,
}

impl Decision {
    /// Cleaned filter for `search_catalog`; empty for other actions.
    pub fn cleaned_params(&self) -> SearchFilter {
        match (self.action, &self.search_params) {
            (Action::SearchCatalog, Some(params)) => params.clean(),
            _ => SearchFilter::default(),
        }
    }
}

/// Schema sent to the provider with the decision request.
///
/// Follows the strict structured-output rules: every property is listed as
/// required, optional values are nullable and no extra keys are allowed.
/// When the catalog has tags, tag lists are restricted to that vocabulary.
pub fn decision_schema(vocabulary: &BTreeSet<String>) -> Value {
    let tag_items = if vocabulary.is_empty() {
        json!({ "type": "string" })
    } else {
        json!({ "type": "string", "enum": vocabulary.iter().collect::<Vec<_>>() })
    };

    json!({
        "type": "object",
        "properties": {
            "action": {
                "type": "string",
                "enum": Action::ALL.iter().map(Action::as_str).collect::<Vec<_>>(),
                "description": "Ação a executar conforme a solicitação do usuário"
            },
            "search_params": search_params_schema(tag_items, true),
            "reasoning": {
                "type": "string",
                "description": "Por que esta ação foi escolhida"
            },
            "user_intent": {
                "type": "string",
                "description": "Interpretação da intenção do usuário"
            }
        },
        "required": ["action", "search_params", "reasoning", "user_intent"],
        "additionalProperties": false
    })
}

/// Schema used for local validation.
///
/// `action` is checked separately so an unknown value is reported as
/// [`AgentError::InvalidAction`]. `search_params` may be omitted at the top
/// level; with `strict` every parameter key must be present inside it.
fn validation_schema(strict: bool) -> Value {
    json!({
        "type": "object",
        "properties": {
            "action": { "type": "string" },
            "search_params": search_params_schema(json!({ "type": "string" }), strict),
            "reasoning": { "type": "string" },
            "user_intent": { "type": "string" }
        },
        "required": ["action", "reasoning", "user_intent"],
        "additionalProperties": false
    })
}

fn search_params_schema(tag_items: Value, require_keys: bool) -> Value {
    let mut schema = json!({
        "type": ["object", "null"],
        "properties": {
            "budget": {
                "type": ["number", "null"],
                "description": "Preço máximo em reais"
            },
            "include_tags": {
                "type": ["array", "null"],
                "items": tag_items.clone(),
                "description": "Tags que o prato deve ter (todas)"
            },
            "exclude_tags": {
                "type": ["array", "null"],
                "items": tag_items,
                "description": "Tags que o prato não pode ter"
            },
            "required_keywords": {
                "type": ["array", "null"],
                "items": { "type": "string" },
                "description": "Ingredientes; basta um aparecer no nome ou descrição"
            }
        },
        "additionalProperties": false
    });

    if require_keys {
        schema["required"] = json!(PARAM_KEYS);
    }
    schema
}

/// Defensive parser for model decisions.
pub struct DecisionParser {
    schema: JSONSchema,
    strict: bool,
}

impl fmt::Debug for DecisionParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionParser")
            .field("strict", &self.strict)
            .finish()
    }
}

impl DecisionParser {
    /// Create a parser. `strict` requires all four search parameter keys.
    pub fn new(strict: bool) -> Result<Self> {
        let schema_doc = validation_schema(strict);
        let schema = JSONSchema::compile(&schema_doc)
            .map_err(|e| AgentError::Configuration(format!("Invalid decision schema: {}", e)))?;

        Ok(Self { schema, strict })
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Parse raw model output into a [`Decision`].
    pub fn parse(&self, raw: &str) -> Result<Decision> {
        debug!(raw = %raw, "Parsing decision");

        let value: Value = serde_json::from_str(extract_json(raw))
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        let Value::Object(object) = value else {
            return Err(AgentError::MalformedResponse(
                "decision is not a JSON object".to_string(),
            ));
        };

        let action = Self::parse_action(&object)?;

        let instance = Value::Object(object);
        let violations = match self.schema.validate(&instance) {
            Ok(()) => None,
            Err(errors) => Some(
                errors
                    .map(|e| format!("{}: {}", e.instance_path, e))
                    .collect::<Vec<String>>(),
            ),
        };
        if let Some(messages) = violations {
            return Err(AgentError::InvalidSchema(messages.join("; ")));
        }

        if action == Action::SearchCatalog && instance.get("search_params").map_or(true, Value::is_null) {
            return Err(AgentError::InvalidSchema(
                "search_params is required for search_catalog".to_string(),
            ));
        }

        serde_json::from_value(instance).map_err(|e| AgentError::InvalidSchema(e.to_string()))
    }

    fn parse_action(object: &Map<String, Value>) -> Result<Action> {
        match object.get("action") {
            Some(Value::String(name)) => {
                Action::parse(name).ok_or_else(|| AgentError::InvalidAction(name.clone()))
            }
            Some(other) => Err(AgentError::InvalidAction(other.to_string())),
            None => Err(AgentError::InvalidAction("missing action".to_string())),
        }
    }
}

/// Strip a Markdown code fence around a JSON payload, if present.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> DecisionParser {
        DecisionParser::new(true).unwrap()
    }

    fn lenient() -> DecisionParser {
        DecisionParser::new(false).unwrap()
    }

    #[test]
    fn test_action_round_trip_names() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
        assert_eq!(Action::parse("order_pizza"), None);
    }

    #[test]
    fn test_parse_single_item_action() {
        let decision = strict()
            .parse(
                r#"{
                    "action": "get_cheapest_item",
                    "search_params": null,
                    "reasoning": "Usuário pediu o mais barato",
                    "user_intent": "Opção econômica"
                }"#,
            )
            .unwrap();

        assert_eq!(decision.action, Action::GetCheapestItem);
        assert!(decision.cleaned_params().is_empty());
    }

    #[test]
    fn test_search_params_optional_for_other_actions() {
        let decision = strict()
            .parse(r#"{"action": "get_price_range", "reasoning": "", "user_intent": ""}"#)
            .unwrap();
        assert_eq!(decision.action, Action::GetPriceRange);
        assert_eq!(decision.reasoning, "");
    }

    #[test]
    fn test_parse_full_search() {
        let decision = strict()
            .parse(
                r#"{
                    "action": "search_catalog",
                    "search_params": {
                        "budget": 40,
                        "include_tags": ["vegano"],
                        "exclude_tags": [],
                        "required_keywords": ["frango", "tofu"]
                    },
                    "reasoning": "Prato vegano com proteína",
                    "user_intent": "Refeição vegana até R$40"
                }"#,
            )
            .unwrap();

        let filter = decision.cleaned_params();
        assert_eq!(filter.budget, Some(40.0));
        assert_eq!(filter.include_tags, vec!["vegano"]);
        assert!(filter.exclude_tags.is_empty());
        assert_eq!(filter.required_keywords, vec!["frango", "tofu"]);
    }

    #[test]
    fn test_malformed_json() {
        let err = strict().parse("not json at all").unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_json() {
        let err = strict().parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[test]
    fn test_unknown_action() {
        let err = strict()
            .parse(r#"{"action": "order_pizza", "reasoning": "", "user_intent": ""}"#)
            .unwrap_err();
        match err {
            AgentError::InvalidAction(name) => assert_eq!(name, "order_pizza"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_action() {
        let err = strict()
            .parse(r#"{"reasoning": "", "user_intent": ""}"#)
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidAction(_)));
    }

    #[test]
    fn test_missing_reasoning_is_schema_error() {
        let err = strict()
            .parse(r#"{"action": "get_price_range", "user_intent": "faixa"}"#)
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidSchema(_)));
    }

    #[test]
    fn test_search_without_params_is_schema_error() {
        let err = lenient()
            .parse(r#"{"action": "search_catalog", "reasoning": "", "user_intent": ""}"#)
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidSchema(_)));

        let err = lenient()
            .parse(r#"{"action": "search_catalog", "search_params": null, "reasoning": "", "user_intent": ""}"#)
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidSchema(_)));
    }

    #[test]
    fn test_strict_requires_every_param_key() {
        let raw = r#"{
            "action": "search_catalog",
            "search_params": {"budget": 30},
            "reasoning": "",
            "user_intent": ""
        }"#;

        assert!(matches!(strict().parse(raw), Err(AgentError::InvalidSchema(_))));

        let decision = lenient().parse(raw).unwrap();
        assert_eq!(decision.cleaned_params(), SearchFilter::new().with_budget(30.0));
    }

    #[test]
    fn test_wrong_types_are_schema_errors() {
        let err = strict()
            .parse(
                r#"{
                    "action": "search_catalog",
                    "search_params": {
                        "budget": "quarenta",
                        "include_tags": null,
                        "exclude_tags": null,
                        "required_keywords": null
                    },
                    "reasoning": "",
                    "user_intent": ""
                }"#,
            )
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidSchema(_)));
    }

    #[test]
    fn test_extra_keys_rejected() {
        let err = strict()
            .parse(r#"{"action": "get_price_range", "reasoning": "", "user_intent": "", "mood": "happy"}"#)
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidSchema(_)));
    }

    #[test]
    fn test_code_fenced_json_accepted() {
        let raw = "```json\n{\"action\": \"get_most_expensive_item\", \"reasoning\": \"\", \"user_intent\": \"\"}\n```";
        let decision = strict().parse(raw).unwrap();
        assert_eq!(decision.action, Action::GetMostExpensiveItem);
    }

    #[test]
    fn test_clean_drops_nulls_and_empty_lists() {
        let params = SearchParams {
            budget: None,
            include_tags: Some(vec![]),
            exclude_tags: None,
            required_keywords: Some(vec!["arroz".to_string()]),
        };

        let filter = params.clean();
        assert_eq!(filter, SearchFilter::new().keyword("arroz"));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"required_keywords": ["arroz"]})
        );
    }

    #[test]
    fn test_clean_normalizes_tags() {
        let params = SearchParams {
            include_tags: Some(vec!["  Vegano".to_string(), " ".to_string()]),
            exclude_tags: Some(vec!["PICANTE".to_string()]),
            ..Default::default()
        };

        let filter = params.clean();
        assert_eq!(filter.include_tags, vec!["vegano"]);
        assert_eq!(filter.exclude_tags, vec!["picante"]);
    }

    #[test]
    fn test_cleaned_params_ignored_for_non_search() {
        let decision = Decision {
            action: Action::GetCheapestItem,
            search_params: Some(SearchParams {
                budget: Some(10.0),
                ..Default::default()
            }),
            reasoning: String::new(),
            user_intent: String::new(),
        };
        assert!(decision.cleaned_params().is_empty());
    }

    #[test]
    fn test_provider_schema_is_strict() {
        let vocabulary: BTreeSet<String> = ["vegano", "picante"].iter().map(|s| s.to_string()).collect();
        let schema = decision_schema(&vocabulary);

        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["required"],
            json!(["action", "search_params", "reasoning", "user_intent"])
        );
        assert_eq!(schema["properties"]["search_params"]["required"], json!(PARAM_KEYS));
        assert_eq!(
            schema["properties"]["search_params"]["properties"]["include_tags"]["items"]["enum"],
            json!(["picante", "vegano"])
        );
    }

    #[test]
    fn test_provider_schema_without_vocabulary() {
        let schema = decision_schema(&BTreeSet::new());
        assert!(schema["properties"]["search_params"]["properties"]["include_tags"]["items"]
            .get("enum")
            .is_none());
    }

    #[test]
    fn test_provider_schema_compiles() {
        let schema = decision_schema(&BTreeSet::new());
        assert!(JSONSchema::compile(&schema).is_ok());
    }
}
