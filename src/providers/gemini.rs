use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::config::AssistantConfig;
use crate::error::Error;
use crate::request::GenerationRequest;

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGenerationConfig
{   pub temperature: f32
  , pub max_output_tokens: u32
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: WireGenerationConfig
}

impl From<&GenerationRequest> for GenerateContentRequest
{   fn from(request: &GenerationRequest) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![
                    Part { text: request.prompt.clone() }
                  ]
              }
            ]
          , generation_config: WireGenerationConfig
            {   temperature: request.temperature
              , max_output_tokens: request.max_output_tokens
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

impl GenerateContentResponse
{   /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Result<String, Error>
    {   let candidate = self.candidates.first()
          .ok_or(Error::NoCandidatesInResponse)?;
        let text = candidate.content
          .as_ref()
          .map(|c| {
            c.parts.iter()
              .map(|p| p.text.as_str())
              .collect::<String>()
          })
          .unwrap_or_default();
        if text.is_empty()
        {   debug!(
              "Empty candidate text (finish reason: {})",
              candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse
{   #[serde(default)]
    pub models: Vec<ModelData>
  , #[serde(default)]
    pub next_page_token: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelData
{   pub name: String
}

impl ModelsResponse
{   /// Token for the next page, if the listing continues
    pub fn next_page(&self) -> Option<&str>
    {   self.next_page_token
          .as_deref()
          .filter(|token| !token.is_empty())
    }
}

/// Reduce `models/gemini-pro` to `gemini-pro`
pub fn short_model_name(name: &str) -> &str
{   name.rsplit('/').next().unwrap_or(name)
}

// ===== Gemini Transport =====

/// Generative Language REST transport
pub struct GeminiTransport
{   api_key: Option<String>
  , api_base: String
  , http_client: reqwest::Client
}

impl GeminiTransport
{   pub fn new(config: &AssistantConfig) -> Result<Self, Error>
    {   debug!("Creating GeminiTransport for {}", config.api_base);
        let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            Error::InvalidConfiguration(e.to_string())
          })?;

        Ok(GeminiTransport
        {   api_key: config.api_key.clone()
          , api_base: config.api_base.trim_end_matches('/').to_string()
          , http_client
        })
    }

    fn api_key(&self) -> Result<&str, Error>
    {   self.api_key.as_deref().ok_or_else(|| {
          error!("No Gemini API key");
          Error::MissingApiKey(
            crate::config::API_KEY_VAR.to_string()
          )
        })
    }

    fn model_url(&self, model: &str) -> String
    {   format!(
          "{}/models/{}",
          self.api_base,
          short_model_name(model)
        )
    }

    async fn check_status(
      response: reqwest::Response
    ) -> Result<reqwest::Response, Error>
    {   let status = response.status();
        trace!("Gemini response status: {}", status);

        if status.is_success()
        {   return Ok(response);
        }

        let message = response.text().await
          .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Gemini API error ({}): {}", status, message);
        Err(Error::ApiError
        {   status: status.as_u16()
          , message
        })
    }
}

#[async_trait]
impl super::ModelTransport for GeminiTransport
{   async fn list_models(&self) -> Result<Vec<String>, Error>
    {   debug!("Listing Gemini models");
        let api_key = self.api_key()?;

        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop
        {   let mut request = self.http_client
              .get(format!("{}/models", self.api_base))
              .header("x-goog-api-key", api_key);
            if let Some(token) = &page_token
            {   request = request.query(&[("pageToken", token)]);
            }

            let response = Self::check_status(
              request.send().await?
            ).await?;

            let page: ModelsResponse = response.json().await
              .map_err(|e| {
                error!("Parse error: {}", e);
                Error::ParseError(e.to_string())
              })?;

            names.extend(
              page.models
                .iter()
                .map(|m| short_model_name(&m.name).to_string())
            );

            match page.next_page()
            {   Some(token) => page_token = Some(token.to_string())
              , None => break
            }
        }

        debug!("Retrieved {} models", names.len());
        Ok(names)
    }

    async fn probe_model(&self, model: &str) -> Result<(), Error>
    {   debug!("Probing model {}", model);
        let api_key = self.api_key()?;

        let response = self.http_client
          .get(self.model_url(model))
          .header("x-goog-api-key", api_key)
          .send()
          .await?;

        match Self::check_status(response).await
        {   Ok(_) => Ok(())
          , Err(Error::ApiError { status: 404, .. }) => {
              Err(Error::ModelNotFound(model.to_string()))
            }
          , Err(e) => Err(e)
        }
    }

    async fn generate(
      &self
    , model: &str
    , request: &GenerationRequest
    ) -> Result<String, Error>
    {   debug!("Sending generateContent to {}", model);
        let api_key = self.api_key()?;

        let body = GenerateContentRequest::from(request);
        trace!("Gemini request: {:?}", body);

        let response = self.http_client
          .post(format!("{}:generateContent", self.model_url(model)))
          .header("x-goog-api-key", api_key)
          .header("Content-Type", "application/json")
          .json(&body)
          .send()
          .await?;

        let response = Self::check_status(response).await?;

        let parsed: GenerateContentResponse = response.json().await
          .map_err(|e| {
            error!("Parse error: {}", e);
            Error::ParseError(e.to_string())
          })?;

        parsed.text()
    }
}
