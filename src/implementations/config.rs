use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// API key for the LLM service
    pub api_key: Option<String>,

    /// API endpoint for the LLM service
    pub api_endpoint: Option<String>,

    /// Model identifier to use
    pub model: Option<String>,

    /// Additional API parameters
    pub parameters: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessorConfig {
    /// Configuration for the LLM used by the pipeline stages
    pub llm_api: ApiConfig,

    /// Prompt templates keyed by stage name
    pub prompt_templates: HashMap<String, String>,

    /// Maximum tokens for API calls
    pub max_tokens: Option<usize>,

    /// Temperature for generation (0.0-1.0)
    pub temperature: Option<f32>,
}

impl ProcessorConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ProcessorConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Get the API key, checking environment variables if not in the
    /// config. If the preferred provider's key is not found, other
    /// known providers are tried in order.
    pub fn get_api_key(&self, preferred_provider: &str) -> Result<(String, String), ConfigError> {
        use log::{debug, info};

        if let Some(api_key) = &self.llm_api.api_key {
            debug!("Using API key from config");
            return Ok((preferred_provider.to_string(), api_key.clone()));
        }

        let providers = [
            ("anthropic", "ANTHROPIC_API_KEY"),
            ("openai", "OPENAI_API_KEY"),
            ("mistral", "MISTRAL_API_KEY"),
            ("together", "TOGETHER_API_KEY"),
        ];

        let preferred_env = providers
            .iter()
            .find(|(name, _)| *name == preferred_provider.to_lowercase())
            .map(|(_, env)| *env);

        if let Some(env_var) = preferred_env {
            if let Ok(key) = std::env::var(env_var) {
                info!("Using preferred provider: {}", preferred_provider);
                return Ok((preferred_provider.to_string(), key));
            }
            debug!(
                "Preferred provider {} not available, trying others",
                preferred_provider
            );
        }

        for (provider, env_var) in providers {
            if provider != preferred_provider.to_lowercase() {
                if let Ok(key) = std::env::var(env_var) {
                    info!(
                        "Using alternative provider: {} (preferred was {})",
                        provider, preferred_provider
                    );
                    return Ok((provider.to_string(), key));
                }
            }
        }

        Err(ConfigError::MissingApiKey(
            "No API keys found for any provider".to_string(),
        ))
    }

    /// Get the prompt template for a pipeline stage
    pub fn get_template(&self, template_name: &str) -> Option<String> {
        self.prompt_templates.get(template_name).cloned()
    }
}

/// Default configuration with built-in prompt templates for the three
/// pipeline stages
impl Default for ProcessorConfig {
    fn default() -> Self {
        let mut prompt_templates = HashMap::new();

        prompt_templates.insert(
            "properties".to_string(),
            r#"Analyze RFC {{rfc_number}} and extract ALL protocol properties.

A property is a requirement/constraint with keywords like MUST, SHOULD, MAY, etc.

For each property found, provide:
- section: Section number where found
- text: Complete property statement
- type: One of [Safety, Liveness, Ordering, Timing, Unknown]

Here are the sections:
{{sections}}

Return JSON array ONLY:
[
  {"section": "4.2", "text": "Client MUST NOT send...", "type": "Safety"},
  ...
]
"#
            .to_string(),
        );

        prompt_templates.insert(
            "propositions".to_string(),
            r#"Extract atomic propositions from these properties.

An atomic proposition is a basic boolean statement (action, state, event, condition).

For each property, list its propositions with:
- property_id: The property ID
- name: snake_case name
- type: One of [action, state, event, condition]
- description: What it represents

Properties:
{{properties}}

Return JSON array ONLY:
[
  {"property_id": "abc123", "name": "client_sends_data", "type": "action", "description": "Client sends data packet"},
  ...
]
"#
            .to_string(),
        );

        prompt_templates.insert(
            "formulas".to_string(),
            r#"Generate LTL (Linear Temporal Logic) formulas from these properties using their atomic propositions.

LTL Operators:
- G (Globally/Always): Something is always true
- F (Finally/Eventually): Something eventually becomes true
- X (Next): Something is true in the next state
- U (Until): Something holds until another thing becomes true
- -> (Implies): If...then
- & (And), | (Or), ! (Not)

Common patterns:
- Safety "MUST NOT": G !(bad_thing)
- Safety "MUST...before": G (action_a -> precondition)
- Liveness "MUST eventually": G (request -> F response)
- Ordering "before": G (action_a -> X action_b)

For each property, provide:
- property_id: The property ID
- ltl_formula: The LTL formula using the atomic propositions
- explanation: Brief explanation of the formula
- operators_used: List of LTL operators used

Properties:
{{items}}

Return JSON array ONLY:
[
  {
    "property_id": "abc123",
    "ltl_formula": "G (client_sends_data -> handshake_complete)",
    "explanation": "Globally: if client sends data, handshake must be complete",
    "operators_used": ["G", "->"]
  },
  ...
]
"#
            .to_string(),
        );

        ProcessorConfig {
            llm_api: ApiConfig {
                api_key: None,
                api_endpoint: None,
                model: None,
                parameters: None,
            },
            prompt_templates,
            max_tokens: Some(8000),
            temperature: Some(0.2),
        }
    }
}
