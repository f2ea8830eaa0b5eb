//! herd-assist: model access and response normalization for the
//! livestock record keeper's AI features
//!
//! The web layer gathers animal facts and calls one of the three
//! [`FarmAssistant`] features. Each renders a prompt, sends it through
//! the [`GenerationClient`] (retry with exponential backoff against the
//! model picked at startup by the [`selector`]), and recovers a JSON
//! object from the reply with the [`normalizer`]. Every failure comes
//! back as a value: `{"error": .., "raw_response"?: ..}`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), herd_assist::error::Error> {
//! use herd_assist::{FarmAssistant, prompts::{AnimalProfile, AnomalyFacts}};
//!
//! let assistant = FarmAssistant::from_env().await?;
//! let report = assistant.detect_anomalies(&AnomalyFacts
//! {   animal: AnimalProfile::new("COW-001", "Cow", None, "3 years")
//!   , feeding_history: vec![]
//!   , health_history: vec![]
//! }).await;
//! println!("{}", report.to_value());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod failover;
pub mod selector;
pub mod client;
pub mod normalizer;
pub mod prompts;
pub mod history;
pub mod schema;
pub mod assistant;

pub use assistant::FarmAssistant;
pub use client::GenerationClient;
pub use config::{AssistantConfig, GenerationConfig};
pub use error::Error;
pub use normalizer::{extract, Normalizer};
pub use request::{
  ErrorResult, FailureKind, GenerationOutcome, GenerationRequest,
  StructuredResult
};
pub use selector::{ModelEndpoint, ModelSelection, ModelSelector};
