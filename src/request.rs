//! Request, outcome and result types shared by the pipeline

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix every failure message starts with. The normalizer treats raw
/// text carrying it as a known failure rather than model output.
pub const ERROR_MARKER: &str = "Error";

/// One generation call, built fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest
{   /// The prompt text, after JSON instruction augmentation
    pub prompt: String
  , /// Sampling temperature
    pub temperature: f32
  , /// Max tokens to generate
    pub max_output_tokens: u32
}

impl GenerationRequest
{   pub fn new(
      prompt: impl Into<String>
    , config: crate::config::GenerationConfig
    ) -> Self
    {   GenerationRequest
        {   prompt: prompt.into()
          , temperature: config.temperature
          , max_output_tokens: config.max_output_tokens
        }
    }
}

/// Why a generation produced no text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind
{   /// No credential or no usable model; no call was made
    NotConfigured
  , /// Every attempt failed
    Exhausted
  , /// Service refused the credential; not retried
    Rejected
}

/// Result of a generation call
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome
{   RawText(String)
  , Failure
    {   kind: FailureKind
      , detail: String
    }
}

impl GenerationOutcome
{   pub fn not_configured() -> Self
    {   GenerationOutcome::Failure
        {   kind: FailureKind::NotConfigured
          , detail: "Gemini API not properly configured.".to_string()
        }
    }

    pub fn is_failure(&self) -> bool
    {   matches!(self, GenerationOutcome::Failure { .. })
    }

    /// Flatten into the text form: raw text, or the error message
    /// beginning with [`ERROR_MARKER`].
    pub fn into_text(self) -> String
    {   match self
        {   GenerationOutcome::RawText(text) => text
          , failure => failure.to_string()
        }
    }
}

impl fmt::Display for GenerationOutcome
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   GenerationOutcome::RawText(text) => f.write_str(text)
          , GenerationOutcome::Failure { kind, detail } => match kind
            {   FailureKind::NotConfigured => {
                  write!(f, "{}: {}", ERROR_MARKER, detail)
                }
              , FailureKind::Exhausted
              | FailureKind::Rejected => {
                  write!(
                    f,
                    "{} generating AI response: {}",
                    ERROR_MARKER, detail
                  )
                }
            }
        }
    }
}

/// Normalization failure surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult
{   pub error: String
  , #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw_response: Option<String>
}

/// Normalized model output: the parsed JSON object, or an error
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredResult
{   Payload(Map<String, Value>)
  , Error(ErrorResult)
}

impl StructuredResult
{   pub fn error(message: impl Into<String>) -> Self
    {   StructuredResult::Error(ErrorResult
        {   error: message.into()
          , raw_response: None
        })
    }

    pub fn is_error(&self) -> bool
    {   matches!(self, StructuredResult::Error(_))
    }

    pub fn payload(&self) -> Option<&Map<String, Value>>
    {   match self
        {   StructuredResult::Payload(map) => Some(map)
          , StructuredResult::Error(_) => None
        }
    }

    /// Look up a top-level key of the payload
    pub fn get(&self, key: &str) -> Option<&Value>
    {   self.payload().and_then(|map| map.get(key))
    }

    /// The mapping seen by callers: either the payload itself or
    /// `{"error": .., "raw_response"?: ..}`.
    pub fn to_value(&self) -> Value
    {   match self
        {   StructuredResult::Payload(map) => Value::Object(map.clone())
          , StructuredResult::Error(err) => {
              let mut map = Map::new();
              map.insert(
                "error".to_string(),
                Value::String(err.error.clone())
              );
              if let Some(raw) = &err.raw_response
              {   map.insert(
                    "raw_response".to_string(),
                    Value::String(raw.clone())
                  );
              }
              Value::Object(map)
            }
        }
    }
}

impl From<StructuredResult> for Value
{   fn from(result: StructuredResult) -> Self
    {   match result
        {   StructuredResult::Payload(map) => Value::Object(map)
          , other => other.to_value()
        }
    }
}

impl Serialize for StructuredResult
{   fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: serde::Serializer
    {   match self
        {   StructuredResult::Payload(map) => map.serialize(serializer)
          , StructuredResult::Error(err) => err.serialize(serializer)
        }
    }
}
