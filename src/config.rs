//! Settings for the drafting service, read once at startup

use serde::{Deserialize, Serialize};
use log::debug;
use std::str::FromStr;

use crate::error::Error;
use crate::BackendKind;

pub const DEFAULT_ANTHROPIC_API_BASE: &str 
  = "https://api.anthropic.com/v1";
pub const DEFAULT_OPENAI_API_BASE: &str 
  = "https://api.openai.com/v1";

/// Process-wide settings. Never mutated after construction;
/// share it behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings
{   pub app_name: String
  , pub app_version: String
  , pub debug: bool
  , pub environment: String
  , /// At least one of the two keys must be present
    pub anthropic_api_key: Option<String>
  , pub openai_api_key: Option<String>
  , pub anthropic_api_base: String
  , pub openai_api_base: String
  , /// Per-request timeout applied by the HTTP client
    pub request_timeout_secs: Option<u64>
  , pub primary_llm: BackendKind
  , /// Model used with the Anthropic backend
    pub model_name: String
  , /// Model used with the OpenAI backend
    pub fallback_model: String
  , pub max_tokens: u32
  , pub temperature: f32
  , /// Not enforced
    pub max_requests_per_minute: u32
  , /// Not enforced
    pub max_tokens_per_day: u64
  , /// sqlx SQLite URL, e.g. `sqlite://./pmu_communications.db`
    pub database_url: String
  , pub output_dir: String
  , pub bind_address: String
  , pub department_name: String
  , pub state_name: String
  , pub office_address: String
}

impl Default for Settings
{   fn default() -> Self
    {   Settings
        {   app_name: "AI Communication Expert - PMU".to_string()
          , app_version: "1.0.0".to_string()
          , debug: true
          , environment: "development".to_string()
          , anthropic_api_key: None
          , openai_api_key: None
          , anthropic_api_base: DEFAULT_ANTHROPIC_API_BASE.to_string()
          , openai_api_base: DEFAULT_OPENAI_API_BASE.to_string()
          , request_timeout_secs: None
          , primary_llm: BackendKind::Anthropic
          , model_name: "claude-sonnet-4-20250514".to_string()
          , fallback_model: "gpt-4o".to_string()
          , max_tokens: 4000
          , temperature: 0.3
          , max_requests_per_minute: 10
          , max_tokens_per_day: 1_000_000
          , database_url: "sqlite://./pmu_communications.db".to_string()
          , output_dir: "./outputs".to_string()
          , bind_address: "0.0.0.0:8000".to_string()
          , department_name: "Urban Development Department".to_string()
          , state_name: "Maharashtra".to_string()
          , office_address: "Mantralaya, Mumbai - 400032".to_string()
        }
    }
}

impl Settings
{   /// Load from the process environment, after merging `.env`
    pub fn from_env() -> Result<Self, Error>
    {   match dotenvy::dotenv()
        {   Ok(path) => debug!("Loaded environment from {}", path.display())
          , Err(_) => debug!("No .env file found")
        }
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Keys are case-sensitive;
    /// missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where F: Fn(&str) -> Option<String>
    {   let mut s = Settings::default();

        if let Some(v) = lookup("APP_NAME") { s.app_name = v; }
        if let Some(v) = lookup("APP_VERSION") { s.app_version = v; }
        if let Some(v) = lookup("DEBUG") { s.debug = parse_bool("DEBUG", &v)?; }
        if let Some(v) = lookup("ENVIRONMENT") { s.environment = v; }

        s.anthropic_api_key = non_empty(lookup("ANTHROPIC_API_KEY"));
        s.openai_api_key = non_empty(lookup("OPENAI_API_KEY"));
        if let Some(v) = non_empty(lookup("ANTHROPIC_API_BASE"))
        {   s.anthropic_api_base = v;
        }
        if let Some(v) = non_empty(lookup("OPENAI_API_BASE"))
        {   s.openai_api_base = v;
        }
        if let Some(v) = non_empty(lookup("REQUEST_TIMEOUT_SECS"))
        {   s.request_timeout_secs 
              = Some(parse_num("REQUEST_TIMEOUT_SECS", &v)?);
        }

        if let Some(v) = lookup("PRIMARY_LLM")
        {   s.primary_llm = BackendKind::parse(&v)
              .ok_or_else(|| Error::Configuration(format!(
                "PRIMARY_LLM must be 'anthropic' or 'openai', got '{}'",
                v
              )))?;
        }
        if let Some(v) = lookup("MODEL_NAME") { s.model_name = v; }
        if let Some(v) = lookup("FALLBACK_MODEL") { s.fallback_model = v; }
        if let Some(v) = lookup("MAX_TOKENS")
        {   s.max_tokens = parse_num("MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("TEMPERATURE")
        {   s.temperature = parse_num("TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("MAX_REQUESTS_PER_MINUTE")
        {   s.max_requests_per_minute 
              = parse_num("MAX_REQUESTS_PER_MINUTE", &v)?;
        }
        if let Some(v) = lookup("MAX_TOKENS_PER_DAY")
        {   s.max_tokens_per_day = parse_num("MAX_TOKENS_PER_DAY", &v)?;
        }

        if let Some(v) = non_empty(lookup("DATABASE_URL")) { s.database_url = v; }
        if let Some(v) = lookup("OUTPUT_DIR") { s.output_dir = v; }
        if let Some(v) = lookup("BIND_ADDRESS") { s.bind_address = v; }
        if let Some(v) = lookup("DEPARTMENT_NAME") { s.department_name = v; }
        if let Some(v) = lookup("STATE_NAME") { s.state_name = v; }
        if let Some(v) = lookup("OFFICE_ADDRESS") { s.office_address = v; }

        Ok(s)
    }

    /// Model configured for a given backend kind
    pub fn model_for(&self, kind: BackendKind) -> &str
    {   match kind
        {   BackendKind::Anthropic => &self.model_name
          , BackendKind::OpenAI => &self.fallback_model
        }
    }

    /// API key configured for a backend kind, if any
    pub fn api_key_for(&self, kind: BackendKind) -> Option<&str>
    {   match kind
        {   BackendKind::Anthropic => self.anthropic_api_key.as_deref()
          , BackendKind::OpenAI => self.openai_api_key.as_deref()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String>
{   value.filter(|v| !v.trim().is_empty())
}

fn parse_num<T: FromStr>(key: &str, value: &str) -> Result<T, Error>
{   value.trim().parse::<T>().map_err(|_| {
      Error::Configuration(format!(
        "{} has an invalid value: '{}'", key, value
      ))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error>
{   match value.trim().to_ascii_lowercase().as_str()
    {   "1" | "true" | "yes" | "on" => Ok(true)
      , "0" | "false" | "no" | "off" => Ok(false)
      , _ => Err(Error::Configuration(format!(
          "{} must be a boolean, got '{}'", key, value
        )))
    }
}
