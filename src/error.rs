use std::fmt;

/// Custom error type for herd-assist operations
/// Implements Clone so failures can be recorded per attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No API credential in the environment
    MissingApiKey(String)
  , /// HTTP transport error (connect, timeout, body read)
    HttpError(String)
  , /// Service answered with a non-success status
    ApiError
    {   status: u16
      , message: String
    }
  , /// Failed to parse the service response
    ParseError(String)
  , /// Service answered without any candidate text
    NoCandidatesInResponse
  , /// Requested model is not offered by the service
    ModelNotFound(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl Error
{   /// Whether a generation attempt that failed with this error
    /// should be tried again.
    ///
    /// Credential problems are permanent for the process, so they
    /// short-circuit the retry loop.
    pub fn is_retryable(&self) -> bool
    {   match self
        {   Error::MissingApiKey(_) => false
          , Error::ApiError { status, .. } => {
              !matches!(status, 401 | 403)
            }
          , _ => true
        }
    }

    /// Whether a model probe that failed with this error proves the
    /// model unusable. Transport trouble proves nothing about the
    /// model, so the candidate is kept and calls retry later.
    pub fn rules_out_model(&self) -> bool
    {   match self
        {   Error::ModelNotFound(_) => true
          , Error::ApiError { status, .. } => matches!(status, 400 | 404)
          , _ => false
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(var) => {
              write!(f, "Missing API key: {} is not set", var)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, message } => {
              write!(f, "API error ({}): {}", status, message)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoCandidatesInResponse => {
              write!(f, "API response contained no candidates")
            }
          , Error::ModelNotFound(model) => {
              write!(f, "Model not available: {}", model)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}
