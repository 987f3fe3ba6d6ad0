//! Prompt texts for the two model calls and the user-facing apologies.

use crate::decision::Action;
use crate::error::AgentError;
use crate::result::FunctionResult;
use std::collections::BTreeSet;

/// Marker line that precedes the JSON result in the summary bundle.
pub const RESULT_MARKER: &str = "Resultado da busca:";

/// System instruction for the summarization call.
pub const SUMMARY_INSTRUCTION: &str = "Você é um assistente de recomendação de refeições. \
Formate uma resposta amigável e útil baseada nos resultados fornecidos.";

/// System instructions for the decision call.
///
/// Lists the tags actually present in the catalog; with an empty vocabulary
/// the model is told not to use tag filters at all.
pub fn decision_prompt(tags: &BTreeSet<String>) -> String {
    let vocabulary = if tags.is_empty() {
        "- (nenhuma tag disponível; não use include_tags nem exclude_tags)".to_string()
    } else {
        let quoted: Vec<String> = tags.iter().map(|t| format!("\"{}\"", t)).collect();
        format!("- {}", quoted.join(", "))
    };

    format!(
        r#"Você é um assistente especializado em recomendação de refeições. Sua resposta deve seguir EXATAMENTE o schema JSON fornecido.

ANÁLISE E DECISÃO:
1. Analise a solicitação do usuário
2. Determine qual ação tomar baseada nas regras
3. Prepare os parâmetros necessários (se aplicável)
4. Forneça uma explicação clara

MAPEAMENTO DE AÇÕES:
- "mais barato", "econômico", "menor preço", "mais em conta" → action: "{cheapest}"
- "mais caro", "premium", "maior preço" → action: "{priciest}"
- "faixa de preço", "preços disponíveis" → action: "{range}"
- Qualquer outra busca por comida → action: "{search}"

TAGS DISPONÍVEIS (use exatamente):
{vocabulary}

INTERPRETAÇÃO:
- "proteína" → required_keywords: ["frango", "carne", "peixe", "ovo", "tofu", "camarão"]
- "arroz" → required_keywords: ["arroz"]
- "legumes" → required_keywords: ["legumes", "brócolis", "cenoura"]
- "saudável" → ignore (todos os pratos são saudáveis)
- "apimentado"/"picante" → include_tags: ["picante"]
- "sem X"/"intolerante a X" → include_tags: ["sem X"] quando a tag existir
- "até R$ N" → budget: N

EXEMPLOS:
1. "Quero o prato mais barato" →
   {{"action": "{cheapest}", "search_params": null, "reasoning": "Usuário pediu especificamente pelo prato mais barato", "user_intent": "Encontrar a opção mais econômica do cardápio"}}

2. "Prato vegano com proteína até R$40" →
   {{"action": "{search}", "search_params": {{"budget": 40, "include_tags": ["vegano"], "exclude_tags": null, "required_keywords": ["frango", "carne", "peixe", "ovo", "tofu", "camarão"]}}, "reasoning": "Busca por prato vegano com proteína dentro do orçamento", "user_intent": "Encontrar refeição vegana com proteína respeitando o limite de preço"}}

IMPORTANTE: Sempre preencha action, reasoning e user_intent. Use search_params apenas para {search}; nas demais ações envie null."#,
        cheapest = Action::GetCheapestItem,
        priciest = Action::GetMostExpensiveItem,
        range = Action::GetPriceRange,
        search = Action::SearchCatalog,
        vocabulary = vocabulary,
    )
}

/// User message for the summarization call.
///
/// The result JSON comes last, after [`RESULT_MARKER`], followed only by the
/// closing instruction.
pub fn summary_bundle(
    user_text: &str,
    user_intent: &str,
    action: Action,
    reasoning: &str,
    result: &FunctionResult,
) -> String {
    let result_json = serde_json::to_string_pretty(&result.to_json())
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        "Solicitação do usuário: {user_text}\n\
         Intenção identificada: {user_intent}\n\
         Ação tomada: {action}\n\
         Raciocínio: {reasoning}\n\
         {RESULT_MARKER} {result_json}\n\
         \n\
         {SUMMARY_CLOSING}\n"
    )
}

/// Closing line of the summary bundle.
pub const SUMMARY_CLOSING: &str = "Formate uma resposta amigável e útil para o usuário, \
incluindo os pratos encontrados (se houver) com nome, preço e descrição.";

/// User-facing reply for a failed turn.
///
/// Decision problems embed their reason; service failures get a generic
/// message.
pub fn apology(err: &AgentError) -> String {
    if err.is_decision_error() {
        parse_apology(&err.to_string())
    } else {
        service_apology()
    }
}

/// Reply when the decision could not be understood.
pub fn parse_apology(reason: &str) -> String {
    format!(
        "Erro ao processar resposta estruturada: {}. Tente novamente!",
        reason
    )
}

/// Reply when the model service failed or timed out.
pub fn service_apology() -> String {
    "Desculpe, ocorreu um erro ao consultar o assistente. Tente novamente!".to_string()
}
