//! Configuration for the hosted model, generation and retry behavior

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Primary credential variable
pub const API_KEY_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";
/// Secondary credential variable, read when the primary is unset
pub const FALLBACK_API_KEY_VAR: &str = "GOOGLE_API_KEY";

pub const DEFAULT_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";

/// Models tried in order, fastest tier first
pub const DEFAULT_PREFERRED_MODELS: [&str; 4] =
[   "gemini-1.5-flash-latest"
  , "gemini-1.5-flash"
  , "gemini-pro"
  , "gemini-1.0-pro"
];

/// Sampling parameters for a single generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig
{   /// Sampling temperature, low for near-deterministic JSON
    pub temperature: f32
  , /// Upper bound on generated tokens
    pub max_output_tokens: u32
}

impl GenerationConfig
{   pub fn with_temperature(mut self, temperature: f32) -> Self
    {   self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self
    {   self.max_output_tokens = max;
        self
    }
}

impl Default for GenerationConfig
{   fn default() -> Self
    {   GenerationConfig
        {   temperature: 0.2
          , max_output_tokens: 2048
        }
    }
}

/// Retry configuration for generation calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig
{   /// Retries after the first attempt
    pub max_retries: usize
  , /// Backoff multiplier for retries
    pub backoff_multiplier: f32
  , /// Base backoff in milliseconds, scaled by multiplier^retry
    pub initial_backoff_ms: u64
}

impl Default for RetryConfig
{   fn default() -> Self
    {   RetryConfig
        {   max_retries: 2
          , backoff_multiplier: 2.0
          , initial_backoff_ms: 1000
        }
    }
}

/// Assistant configuration, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig
{   /// Hosted service credential
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>
  , /// API base URL
    pub api_base: String
  , /// Model identifiers in order of preference
    pub preferred_models: Vec<String>
  , /// Request timeout in seconds
    pub timeout_secs: u64
  , /// Default sampling parameters
    pub generation: GenerationConfig
  , /// Retry behavior
    pub retry: RetryConfig
}

impl Default for AssistantConfig
{   fn default() -> Self
    {   AssistantConfig
        {   api_key: None
          , api_base: DEFAULT_API_BASE.to_string()
          , preferred_models: DEFAULT_PREFERRED_MODELS
              .iter()
              .map(|m| m.to_string())
              .collect()
          , timeout_secs: 60
          , generation: GenerationConfig::default()
          , retry: RetryConfig::default()
        }
    }
}

impl AssistantConfig
{   /// Build configuration from the process environment, loading a
    /// `.env` file first if one exists.
    ///
    /// A missing credential is not an error here; the model selector
    /// turns it into the "not configured" state.
    pub fn from_env() -> Self
    {   if let Ok(path) = dotenvy::dotenv()
        {   debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String>
    {   let mut config = AssistantConfig::default();

        config.api_key = lookup(API_KEY_VAR)
          .filter(|k| !k.trim().is_empty())
          .or_else(|| {
            lookup(FALLBACK_API_KEY_VAR)
              .filter(|k| !k.trim().is_empty())
          });

        if config.api_key.is_none()
        {   warn!(
              "{} is not set; AI features will not work",
              API_KEY_VAR
            );
        }

        if let Some(base) = lookup("HERD_ASSIST_API_BASE")
        {   config.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(models) = lookup("HERD_ASSIST_MODELS")
        {   let models: Vec<String> = models
              .split(',')
              .map(|m| m.trim().to_string())
              .filter(|m| !m.is_empty())
              .collect();
            if !models.is_empty()
            {   config.preferred_models = models;
            }
        }

        if let Some(secs) = lookup("HERD_ASSIST_TIMEOUT_SECS")
        {   match secs.trim().parse::<u64>()
            {   Ok(secs) => config.timeout_secs = secs
              , Err(e) => {
                  warn!(
                    "Ignoring HERD_ASSIST_TIMEOUT_SECS={}: {}",
                    secs, e
                  );
                }
            }
        }

        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }

    pub fn has_credential(&self) -> bool
    {   self.api_key.is_some()
    }
}
