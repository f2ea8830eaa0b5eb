//! Feature entry points: feeding plans, anomaly detection, health
//! summaries

use std::sync::Arc;

use log::debug;

use crate::client::GenerationClient;
use crate::config::AssistantConfig;
use crate::failover::RetryPolicy;
use crate::normalizer::Normalizer;
use crate::prompts::{
  self, AnomalyFacts, FeedingPlanFacts, HealthSummaryFacts
};
use crate::providers::{GeminiTransport, ModelTransport};
use crate::request::StructuredResult;
use crate::selector::{ModelSelection, ModelSelector};

/// Farm assistant bound to one selected model.
///
/// Built once at startup and shared read-only between requests.
pub struct FarmAssistant<T: ?Sized>
{   client: GenerationClient<T>
  , normalizer: Normalizer
}

impl<T: ?Sized> Clone for FarmAssistant<T>
{   fn clone(&self) -> Self
    {   FarmAssistant
        {   client: self.client.clone()
          , normalizer: self.normalizer
        }
    }
}

impl FarmAssistant<GeminiTransport>
{   /// Configure from the environment and select a Gemini model.
    ///
    /// Only fails if the HTTP client cannot be built. A missing
    /// credential or unreachable service yields an assistant whose
    /// calls all return an error result.
    pub async fn from_env() -> Result<Self, crate::error::Error>
    {   Self::connect(&AssistantConfig::from_env()).await
    }

    pub async fn connect(config: &AssistantConfig)
      -> Result<Self, crate::error::Error>
    {   let transport = Arc::new(GeminiTransport::new(config)?);
        Ok(Self::start(config, transport).await)
    }
}

impl<T> FarmAssistant<T>
where T: ModelTransport + ?Sized
{   /// Run model selection over `transport` and build the assistant
    pub async fn start(config: &AssistantConfig, transport: Arc<T>)
      -> Self
    {   let selection = ModelSelector::new(config.preferred_models.clone())
          .select(transport.as_ref(), config.has_credential())
          .await;
        Self::with_selection(config, selection, transport)
    }

    /// Build the assistant around an already made selection
    pub fn with_selection(
      config: &AssistantConfig
    , selection: ModelSelection
    , transport: Arc<T>
    ) -> Self
    {   let client = GenerationClient::new(
          selection,
          transport,
          RetryPolicy::from(&config.retry),
          config.generation
        );
        FarmAssistant
        {   client
          , normalizer: Normalizer::new()
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self
    {   self.normalizer = normalizer;
        self
    }

    pub fn client(&self) -> &GenerationClient<T>
    {   &self.client
    }

    pub fn is_configured(&self) -> bool
    {   self.client.is_configured()
    }

    pub async fn generate_feeding_plan(
      &self
    , facts: &FeedingPlanFacts
    ) -> StructuredResult
    {   debug!("Feeding plan for {}", facts.animal.tag_id);
        self.run(prompts::feeding_plan_prompt(facts)).await
    }

    pub async fn detect_anomalies(
      &self
    , facts: &AnomalyFacts
    ) -> StructuredResult
    {   debug!("Anomaly detection for {}", facts.animal.tag_id);
        self.run(prompts::anomaly_prompt(facts)).await
    }

    pub async fn generate_health_summary(
      &self
    , facts: &HealthSummaryFacts
    ) -> StructuredResult
    {   debug!("Health summary for {}", facts.animal.tag_id);
        self.run(prompts::health_summary_prompt(facts)).await
    }

    async fn run(&self, prompt: String) -> StructuredResult
    {   let outcome = self.client.generate(&prompt, None).await;
        self.normalizer.extract(&outcome.into_text())
    }
}
