//! Hosted model service transports

use async_trait::async_trait;

pub mod gemini;

// Re-export for convenience
pub use gemini::GeminiTransport;

/// The three calls the pipeline makes against a hosted model service.
/// Implementations report failures as [`crate::error::Error`]; retry
/// and fallback decisions live above this seam.
#[async_trait]
pub trait ModelTransport: Send + Sync
{   /// Names of the models the credential can use, without any
    /// `models/` resource prefix.
    async fn list_models(&self)
      -> Result<Vec<String>, crate::error::Error>;

    /// Check a single model identifier is usable
    async fn probe_model(&self, model: &str)
      -> Result<(), crate::error::Error>;

    /// Generate text for one request
    async fn generate(
      &self
    , model: &str
    , request: &crate::request::GenerationRequest
    ) -> Result<String, crate::error::Error>;
}
