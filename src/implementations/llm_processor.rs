use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::{LtlGenError, LtlGenResult};
use crate::implementations::config::{ConfigError, ProcessorConfig};
use crate::models::common::{PropertyCategory, PropositionKind};
use crate::models::document::Section;
use crate::models::{LtlFormula, Property, Proposition};
use crate::traits::PropertyProcessor;

/// At most this many top-ranked sections go into one extraction request
const MAX_SECTIONS_PER_REQUEST: usize = 10;

/// Per-section content cap (characters) inside the request payload
const SECTION_CONTENT_LIMIT: usize = 2000;

const SYSTEM_PROMPT: &str =
    "You are a formal methods expert who translates protocol requirements into temporal logic.";

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },
}

impl From<ProcessorError> for LtlGenError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Api(msg) => LtlGenError::ExternalToolError {
                tool: "LLM API".to_string(),
                message: msg,
            },
            ProcessorError::Config(err) => LtlGenError::SystemError(err.to_string()),
            ProcessorError::Parse(msg) => LtlGenError::ModelOutputError(msg),
            ProcessorError::Template(msg) => LtlGenError::SystemError(msg),
            ProcessorError::Network(msg) => LtlGenError::ExternalToolError {
                tool: "Network".to_string(),
                message: msg,
            },
            ProcessorError::Serde(err) => LtlGenError::ModelOutputError(err.to_string()),
            ProcessorError::Http { status, message } => LtlGenError::ExternalToolError {
                tool: "HTTP".to_string(),
                message: format!("Status {}: {}", status, message),
            },
        }
    }
}

/// OpenAI-compatible request types
#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

/// Wire rows the model is asked to return, one schema per stage.
/// Parsing is strict: a response whose array rows do not match the
/// schema is a typed error, never a silently empty result. Fields the
/// model may legitimately omit carry defaults.
#[derive(Debug, Deserialize)]
pub(crate) struct PropertyRow {
    #[serde(default)]
    pub(crate) section: String,
    pub(crate) text: String,
    #[serde(rename = "type", default)]
    pub(crate) category: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PropositionRow {
    pub(crate) property_id: String,
    pub(crate) name: String,
    #[serde(rename = "type", default)]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormulaRow {
    pub(crate) property_id: String,
    pub(crate) ltl_formula: String,
    #[serde(default)]
    pub(crate) explanation: String,
    #[serde(default)]
    pub(crate) operators_used: Vec<String>,
}

/// PropertyProcessor backed by a chat-completion API. One batched
/// request per pipeline stage; Anthropic is preferred, with the
/// OpenAI-compatible body for other providers.
#[derive(Clone)]
pub struct LlmPropertyProcessor {
    config: ProcessorConfig,
    http_client: reqwest::Client,
}

impl LlmPropertyProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    pub fn new_with_defaults() -> Self {
        Self::new(ProcessorConfig::default())
    }

    /// Render a named template with `{{key}}` placeholder substitution
    fn render_template(
        &self,
        template_name: &str,
        params: &HashMap<String, String>,
    ) -> Result<String, ProcessorError> {
        let template = self.config.get_template(template_name).ok_or_else(|| {
            ProcessorError::Template(format!("Template not found: {}", template_name))
        })?;

        let mut result = template;
        for (key, value) in params {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }

        Ok(result)
    }

    fn endpoint_and_model(&self, provider: &str) -> (String, String) {
        match provider {
            "anthropic" => (
                "https://api.anthropic.com/v1/messages".to_string(),
                self.config
                    .llm_api
                    .model
                    .clone()
                    .unwrap_or_else(|| "claude-sonnet-4-20250514".to_string()),
            ),
            "mistral" => (
                "https://api.mistral.ai/v1/chat/completions".to_string(),
                "mistral-large-latest".to_string(),
            ),
            "together" => (
                "https://api.together.xyz/v1/completions".to_string(),
                "llama-3-70b-instruct".to_string(),
            ),
            _ => (
                self.config
                    .llm_api
                    .api_endpoint
                    .clone()
                    .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string()),
                self.config
                    .llm_api
                    .model
                    .clone()
                    .unwrap_or_else(|| "gpt-4o".to_string()),
            ),
        }
    }

    /// One blocking chat-completion round trip. No retries: a failed
    /// stage is reported and the user re-triggers it.
    async fn call_llm_api(&self, prompt: &str) -> Result<String, ProcessorError> {
        let (provider, api_key) = self.config.get_api_key("anthropic")?;
        let (api_endpoint, model) = self.endpoint_and_model(provider.as_str());

        let temperature = self.config.temperature.unwrap_or(0.2);
        let max_tokens = self.config.max_tokens.unwrap_or(8000);

        info!("Making LLM API request to {}", provider);
        debug!("Model: {}, prompt length: {} chars", model, prompt.len());

        if provider == "anthropic" {
            let request = serde_json::json!({
                "model": model,
                "max_tokens": max_tokens,
                "temperature": temperature,
                "system": SYSTEM_PROMPT,
                "messages": [
                    { "role": "user", "content": prompt }
                ]
            });

            let response = self
                .http_client
                .post(&api_endpoint)
                .header("Content-Type", "application/json")
                .header("x-api-key", &api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    warn!("Network error when calling Anthropic API: {}", e);
                    ProcessorError::Network(e.to_string())
                })?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to get error message".to_string());
                warn!("API error: HTTP {} - {}", status, message);
                return Err(ProcessorError::Http { status, message });
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ProcessorError::Parse(e.to_string()))?;

            let content = body["content"]
                .as_array()
                .and_then(|items| items.first())
                .and_then(|item| item["text"].as_str())
                .ok_or_else(|| {
                    ProcessorError::Parse("Missing text content in Anthropic response".to_string())
                })?;

            debug!("Received {} characters from Anthropic", content.len());
            Ok(content.to_string())
        } else {
            let request = ChatRequest {
                model,
                messages: vec![
                    ChatMessage {
                        role: "system".to_string(),
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    ChatMessage {
                        role: "user".to_string(),
                        content: prompt.to_string(),
                    },
                ],
                temperature,
                max_tokens,
            };

            let response = self
                .http_client
                .post(&api_endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", api_key))
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    warn!("Network error when calling {} API: {}", provider, e);
                    ProcessorError::Network(e.to_string())
                })?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to get error message".to_string());
                warn!("API error: HTTP {} - {}", status, message);
                return Err(ProcessorError::Http { status, message });
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ProcessorError::Parse(e.to_string()))?;

            let content = body["choices"]
                .as_array()
                .and_then(|choices| choices.first())
                .and_then(|choice| choice["message"]["content"].as_str())
                .ok_or_else(|| {
                    ProcessorError::Parse("Missing message content in API response".to_string())
                })?;

            debug!("Received {} characters from {}", content.len(), provider);
            Ok(content.to_string())
        }
    }

    fn sections_block(sections: &[Section]) -> String {
        let mut block = String::new();
        for section in sections.iter().take(MAX_SECTIONS_PER_REQUEST) {
            block.push_str(&format!(
                "\n\n=== SECTION {}: {} ===\n",
                section.number, section.title
            ));
            block.extend(section.content.chars().take(SECTION_CONTENT_LIMIT));
        }
        block
    }

    fn properties_block(properties: &[Property]) -> String {
        let mut block = String::new();
        for (i, property) in properties.iter().enumerate() {
            block.push_str(&format!(
                "\n\n[PROPERTY {}]\nID: {}\nText: {}\n",
                i + 1,
                property.id,
                property.text
            ));
        }
        block
    }

    fn items_block(items: &[(&Property, Vec<&Proposition>)]) -> String {
        let mut block = String::new();
        for (i, (property, propositions)) in items.iter().enumerate() {
            block.push_str(&format!(
                "\n\n[PROPERTY {}]\nID: {}\nNatural Language: {}\nType: {}\nAtomic Propositions:\n",
                i + 1,
                property.id,
                property.text,
                property.category
            ));
            for p in propositions {
                block.push_str(&format!("  - {}: {}\n", p.name, p.description));
            }
        }
        block
    }
}

/// Locate the JSON array in a model response. Markdown code fences
/// are stripped if present; otherwise the outermost bracket span is
/// taken. A response with no array fails closed.
pub(crate) fn extract_json_array(response: &str) -> Result<&str, ProcessorError> {
    let mut body = response.trim();

    if let Some(stripped) = body.strip_prefix("```json").or_else(|| body.strip_prefix("```")) {
        body = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    }

    let start = body
        .find('[')
        .ok_or_else(|| ProcessorError::Parse("No JSON array in response".to_string()))?;
    let end = body
        .rfind(']')
        .filter(|end| *end > start)
        .ok_or_else(|| ProcessorError::Parse("Unterminated JSON array in response".to_string()))?;

    Ok(&body[start..=end])
}

/// Strict schema-validated parse of a stage response into typed rows
pub(crate) fn parse_rows<T: serde::de::DeserializeOwned>(response: &str) -> Result<Vec<T>, ProcessorError> {
    let array = extract_json_array(response)?;
    serde_json::from_str(array)
        .map_err(|e| ProcessorError::Parse(format!("Response rows failed validation: {}", e)))
}

/// 8-character record id, enough to stay unique within a store
fn short_id() -> String {
    Uuid::new_v4().to_string().chars().take(8).collect()
}

#[async_trait]
impl PropertyProcessor for LlmPropertyProcessor {
    async fn extract_properties(
        &self,
        sections: &[Section],
        rfc_number: &str,
    ) -> LtlGenResult<Vec<Property>> {
        info!(
            "Extracting properties from {} sections of RFC {}",
            sections.len().min(MAX_SECTIONS_PER_REQUEST),
            rfc_number
        );

        let mut params = HashMap::new();
        params.insert("rfc_number".to_string(), rfc_number.to_string());
        params.insert("sections".to_string(), Self::sections_block(sections));

        let prompt = self.render_template("properties", &params)?;
        let response = self.call_llm_api(&prompt).await?;
        let rows: Vec<PropertyRow> = parse_rows(&response)?;

        let now = Utc::now();
        let properties = rows
            .into_iter()
            .map(|row| Property {
                id: short_id(),
                rfc: rfc_number.to_string(),
                section: row.section,
                text: row.text,
                category: PropertyCategory::parse(&row.category),
                timestamp: now,
            })
            .collect::<Vec<_>>();

        info!("Extracted {} properties", properties.len());
        Ok(properties)
    }

    async fn extract_propositions(
        &self,
        properties: &[Property],
    ) -> LtlGenResult<Vec<Proposition>> {
        info!(
            "Extracting propositions for {} properties",
            properties.len()
        );

        let mut params = HashMap::new();
        params.insert(
            "properties".to_string(),
            Self::properties_block(properties),
        );

        let prompt = self.render_template("propositions", &params)?;
        let response = self.call_llm_api(&prompt).await?;
        let rows: Vec<PropositionRow> = parse_rows(&response)?;

        let now = Utc::now();
        let propositions = rows
            .into_iter()
            .map(|row| Proposition {
                id: short_id(),
                property_id: row.property_id,
                name: row.name,
                kind: PropositionKind::parse(&row.kind),
                description: row.description,
                timestamp: now,
                approved: false,
                approved_by: String::new(),
            })
            .collect::<Vec<_>>();

        info!("Extracted {} propositions", propositions.len());
        Ok(propositions)
    }

    async fn generate_formulas(
        &self,
        items: &[(&Property, Vec<&Proposition>)],
    ) -> LtlGenResult<Vec<LtlFormula>> {
        info!("Generating LTL formulas for {} properties", items.len());

        let mut params = HashMap::new();
        params.insert("items".to_string(), Self::items_block(items));

        let prompt = self.render_template("formulas", &params)?;
        let response = self.call_llm_api(&prompt).await?;
        let rows: Vec<FormulaRow> = parse_rows(&response)?;

        let now = Utc::now();
        let formulas = rows
            .into_iter()
            .map(|row| LtlFormula {
                id: short_id(),
                property_id: row.property_id,
                formula: row.ltl_formula,
                explanation: row.explanation,
                operators_used: row.operators_used,
                timestamp: now,
                approved: false,
                approved_by: String::new(),
            })
            .collect::<Vec<_>>();

        info!("Generated {} formulas", formulas.len());
        Ok(formulas)
    }
}

