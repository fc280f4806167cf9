use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::api_connection::{ApiConnectionError, ChatCompletionRequest, ChatMessage, Provider};
use crate::models::{Macro, MacroProfile};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("nutrition oracle unavailable: {0}")]
    Unavailable(#[from] ApiConnectionError),

    #[error("malformed nutrition reply: {0}")]
    Malformed(String),
}

/// Source of per-100g values for products missing from the local table.
#[async_trait]
pub trait NutritionOracle: Send + Sync {
    /// `Ok(None)` means the source explicitly had no answer.
    async fn lookup(&self, product_name: &str) -> Result<Option<MacroProfile>, OracleError>;
}

/// Asks a chat-completions model for the nutrition facts of a product.
pub struct LlmNutritionOracle {
    provider: Provider,
    model: String,
    temperature: f32,
}

impl LlmNutritionOracle {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
        }
    }

    fn build_request(&self, product_name: &str) -> ChatCompletionRequest {
        let prompt = format!(
            "Надай харчову цінність (на 100 г) для продукту '{}' у форматі:
ккал: <значення>
жири: <значення>
вуглеводи: <значення>
цукри: <значення>
білки: <значення>
Без зайвого тексту, лише цифри.",
            product_name
        );
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(self.temperature),
            max_tokens: Some(150),
        }
    }
}

#[async_trait]
impl NutritionOracle for LlmNutritionOracle {
    async fn lookup(&self, product_name: &str) -> Result<Option<MacroProfile>, OracleError> {
        info!(product = product_name, "Asking nutrition oracle");
        let response = self
            .provider
            .call_chat_completion(&self.build_request(product_name))
            .await?;

        let reply = match response.first_content().map(str::trim) {
            Some(reply) if !reply.is_empty() => reply.to_string(),
            _ => {
                debug!(product = product_name, "Oracle sent no content");
                return Ok(None);
            }
        };
        debug!(product = product_name, %reply, "Oracle reply");

        parse_oracle_reply(&reply).map(Some)
    }
}

fn label_regexes() -> &'static [(Macro, Option<Regex>)] {
    static LABELS: OnceLock<Vec<(Macro, Option<Regex>)>> = OnceLock::new();
    LABELS.get_or_init(|| {
        Macro::ALL
            .into_iter()
            .map(|nutrient| {
                let pattern = format!(
                    r"(?i){}(?:[:\s=]|-\s)*([0-9]+(?:[.,][0-9]+)?)",
                    nutrient.label()
                );
                (nutrient, Regex::new(&pattern).ok())
            })
            .collect()
    })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.trim_end_matches("```");
    match inner.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body.trim(),
        _ => inner.trim(),
    }
}

/// Pulls the five labeled values out of free text. Labels may come in any order; the first
/// occurrence of each wins. Decimal commas are accepted.
pub fn parse_oracle_reply(reply: &str) -> Result<MacroProfile, OracleError> {
    let text = strip_code_fences(reply);
    let mut profile = MacroProfile::default();

    for (nutrient, regex) in label_regexes() {
        let regex = regex
            .as_ref()
            .ok_or_else(|| OracleError::Malformed(format!("bad pattern for '{}'", nutrient.label())))?;
        let value = regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
            .ok_or_else(|| OracleError::Malformed(format!("no value for '{}'", nutrient.label())))?;

        match nutrient {
            Macro::Calories => profile.calories = value,
            Macro::Fat => profile.fat = value,
            Macro::Carbohydrate => profile.carbohydrate = value,
            Macro::Sugar => profile.sugar = value,
            Macro::Protein => profile.protein = value,
        }
    }

    Ok(profile)
}
