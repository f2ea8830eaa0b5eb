use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::config::GenerationConfig;
use crate::failover::RetryPolicy;
use crate::providers::ModelTransport;
use crate::request::{FailureKind, GenerationOutcome, GenerationRequest};
use crate::selector::ModelSelection;

/// Appended to prompts that ask for JSON without already forbidding
/// comments
pub const JSON_INSTRUCTION: &str = "\n\nIMPORTANT: Your response must be valid JSON with no text or comments outside the JSON object. DO NOT add comments inside the JSON (no // or /* */ comments). The JSON must be parseable by standard JSON parsers.";

const NO_COMMENTS_MARKER: &str = "DO NOT add comments";

/// Raw responses are logged up to this many characters
const LOG_PREVIEW_CHARS: usize = 200;

/// Add the JSON/no-comments instruction when the prompt asks for JSON
pub fn augment_prompt(prompt: &str) -> String
{   if prompt.contains("JSON") && !prompt.contains(NO_COMMENTS_MARKER)
    {   format!("{}{}", prompt, JSON_INSTRUCTION)
    } else
    {   prompt.to_string()
    }
}

fn preview(text: &str) -> String
{   text.chars().take(LOG_PREVIEW_CHARS).collect()
}

/// Issues generation requests against the selected model with
/// retry and backoff. Cheap to clone; clones share the transport.
pub struct GenerationClient<T: ?Sized>
{   selection: ModelSelection
  , transport: Arc<T>
  , policy: RetryPolicy
  , defaults: GenerationConfig
}

impl<T: ?Sized> Clone for GenerationClient<T>
{   fn clone(&self) -> Self
    {   GenerationClient
        {   selection: self.selection.clone()
          , transport: Arc::clone(&self.transport)
          , policy: self.policy.clone()
          , defaults: self.defaults
        }
    }
}

impl<T> GenerationClient<T>
where T: ModelTransport + ?Sized
{   pub fn new(
      selection: ModelSelection
    , transport: Arc<T>
    , policy: RetryPolicy
    , defaults: GenerationConfig
    ) -> Self
    {   debug!("Creating GenerationClient ({:?})", selection);
        GenerationClient
        {   selection
          , transport
          , policy
          , defaults
        }
    }

    pub fn selection(&self) -> &ModelSelection
    {   &self.selection
    }

    pub fn is_configured(&self) -> bool
    {   self.selection.is_configured()
    }

    /// Generate text for `prompt`, using the client defaults unless
    /// `config` overrides them.
    ///
    /// Never fails: transport errors are retried per the policy and
    /// then reported as [`GenerationOutcome::Failure`].
    pub async fn generate(
      &self
    , prompt: &str
    , config: Option<GenerationConfig>
    ) -> GenerationOutcome
    {   let Some(endpoint) = self.selection.endpoint()
        else
        {   warn!("Generation requested but no model is configured");
            return GenerationOutcome::not_configured();
        };

        let request = GenerationRequest::new(
          augment_prompt(prompt),
          config.unwrap_or(self.defaults)
        );

        let mut retry = 0;
        loop
        {   match self.transport.generate(endpoint.name(), &request).await
            {   Ok(text) => {
                  info!("Raw model response: {}...", preview(&text));
                  return GenerationOutcome::RawText(text);
                }
              , Err(e) if !e.is_retryable() => {
                  error!("Model call rejected, not retrying: {}", e);
                  return GenerationOutcome::Failure
                  {   kind: FailureKind::Rejected
                    , detail: e.to_string()
                  };
                }
              , Err(e) => {
                  retry += 1;
                  if retry > self.policy.max_retries
                  {   error!(
                        "Failed to generate content after {} retries: {}",
                        self.policy.max_retries, e
                      );
                      return GenerationOutcome::Failure
                      {   kind: FailureKind::Exhausted
                        , detail: e.to_string()
                      };
                  }
                  let wait = self.policy.backoff_for_attempt(retry);
                  warn!(
                    "Model API error: {}. Retrying in {:?}...",
                    e, wait
                  );
                  tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
