//! Startup model selection
//!
//! Selection runs once per process and never fails: every error is
//! logged and folds into [`ModelSelection::NotConfigured`]. The
//! fallback chain is an ordered sequence of steps:
//!
//! ```text
//! Enumerate ──ok, non-empty──> MatchPreferred ──miss──> FirstAvailable
//!     │
//!     └──error or empty──> ProbeDirect(0) ──not found──> ProbeDirect(1) ... ──> NotConfigured
//! ```
//!
//! A probe that fails for transport reasons keeps its candidate: the
//! service being unreachable at startup says nothing about the model.

use std::fmt;

use log::{debug, info, warn, error};

use crate::providers::ModelTransport;

/// Identifier of the hosted model in use
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelEndpoint
{   name: String
}

impl ModelEndpoint
{   pub fn new(name: impl Into<String>) -> Self
    {   ModelEndpoint { name: name.into() }
    }

    pub fn name(&self) -> &str
    {   &self.name
    }
}

impl fmt::Display for ModelEndpoint
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(&self.name)
    }
}

/// Outcome of startup selection, immutable for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection
{   Configured(ModelEndpoint)
  , NotConfigured
}

impl ModelSelection
{   pub fn endpoint(&self) -> Option<&ModelEndpoint>
    {   match self
        {   ModelSelection::Configured(endpoint) => Some(endpoint)
          , ModelSelection::NotConfigured => None
        }
    }

    pub fn is_configured(&self) -> bool
    {   self.endpoint().is_some()
    }
}

/// One state of the selection chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep
{   Enumerate
  , MatchPreferred(Vec<String>)
  , FirstAvailable(Vec<String>)
  , ProbeDirect(usize)
  , Done(ModelSelection)
}

/// Picks the model endpoint from a preference list
#[derive(Debug, Clone)]
pub struct ModelSelector
{   preferred: Vec<String>
}

impl ModelSelector
{   pub fn new(preferred: Vec<String>) -> Self
    {   ModelSelector { preferred }
    }

    pub fn preferred(&self) -> &[String]
    {   &self.preferred
    }

    /// First available name containing a preferred identifier,
    /// searching preferences in order.
    pub fn match_preferred(&self, available: &[String])
      -> Option<String>
    {   self.preferred
          .iter()
          .find_map(|preferred| {
            available
              .iter()
              .find(|name| name.contains(preferred.as_str()))
              .cloned()
          })
    }

    /// Run the selection chain against `transport`.
    ///
    /// `has_credential` false short-circuits to `NotConfigured`
    /// without touching the transport.
    pub async fn select<T>(
      &self
    , transport: &T
    , has_credential: bool
    ) -> ModelSelection
    where T: ModelTransport + ?Sized
    {   if !has_credential
        {   warn!("No API credential present; model not configured");
            return ModelSelection::NotConfigured;
        }

        let mut step = SelectionStep::Enumerate;
        loop
        {   step = match step
            {   SelectionStep::Done(selection) => {
                  match &selection
                  {   ModelSelection::Configured(endpoint) => {
                        info!("Using model: {}", endpoint);
                      }
                    , ModelSelection::NotConfigured => {
                        error!("Failed to configure any model");
                      }
                  }
                  return selection;
                }
              , other => self.advance(other, transport).await
            };
        }
    }

    /// Execute one step of the chain
    pub async fn advance<T>(
      &self
    , step: SelectionStep
    , transport: &T
    ) -> SelectionStep
    where T: ModelTransport + ?Sized
    {   match step
        {   SelectionStep::Enumerate => {
              match transport.list_models().await
              {   Ok(models) if !models.is_empty() => {
                    debug!("Available models:");
                    for model in &models
                    {   debug!(" - {}", model);
                    }
                    SelectionStep::MatchPreferred(models)
                  }
                , Ok(_) => {
                    warn!("Model listing returned nothing");
                    SelectionStep::ProbeDirect(0)
                  }
                , Err(e) => {
                    warn!("Error listing models: {}", e);
                    SelectionStep::ProbeDirect(0)
                  }
              }
            }
          , SelectionStep::MatchPreferred(models) => {
              match self.match_preferred(&models)
              {   Some(name) => SelectionStep::Done(
                    ModelSelection::Configured(ModelEndpoint::new(name))
                  )
                , None => SelectionStep::FirstAvailable(models)
              }
            }
          , SelectionStep::FirstAvailable(models) => {
              match models.into_iter().next()
              {   Some(name) => {
                    debug!("No preferred model listed; taking {}", name);
                    SelectionStep::Done(
                      ModelSelection::Configured(ModelEndpoint::new(name))
                    )
                  }
                , None => SelectionStep::ProbeDirect(0)
              }
            }
          , SelectionStep::ProbeDirect(index) => {
              let Some(name) = self.preferred.get(index)
              else
              {   return SelectionStep::Done(
                    ModelSelection::NotConfigured
                  );
              };
              debug!("Trying model directly: {}", name);
              match transport.probe_model(name).await
              {   Ok(()) => SelectionStep::Done(
                    ModelSelection::Configured(
                      ModelEndpoint::new(name.clone())
                    )
                  )
                , Err(e) if e.rules_out_model() => {
                    warn!("Error with model {}: {}", name, e);
                    SelectionStep::ProbeDirect(index + 1)
                  }
                , Err(e) => {
                    warn!(
                      "Could not verify model {} ({}); using it anyway",
                      name, e
                    );
                    SelectionStep::Done(
                      ModelSelection::Configured(
                        ModelEndpoint::new(name.clone())
                      )
                    )
                  }
              }
            }
          , done @ SelectionStep::Done(_) => done
        }
    }
}

impl Default for ModelSelector
{   fn default() -> Self
    {   ModelSelector::new(
          crate::config::AssistantConfig::default().preferred_models
        )
    }
}
