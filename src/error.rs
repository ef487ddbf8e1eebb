use std::fmt;

/// Error type for drafting, storage and rendering operations.
/// Implements Clone so failures can be stringified into combined causes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No usable provider, or an unparseable setting
    Configuration(String)
  , /// API key is missing for a provider
    MissingApiKey(String)
  , /// HTTP request error
    HttpError(String)
  , /// API returned an error response
    ApiError(String)
  , /// Failed to parse API response
    ParseError(String)
  , /// No choices or content blocks in API response
    NoChoicesInResponse
  , /// Primary and fallback generation both failed
    GenerationFailed
    {   primary: String
      , fallback: String
    }
  , /// Requested record or file does not exist
    NotFound(String)
  , /// Record store could not be read or written
    Storage(String)
  , /// Output file could not be produced
    Render(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) 
      -> fmt::Result
    {   match self
        {   Error::Configuration(msg) => {
              write!(f, "Configuration error: {}", msg)
            }
          , Error::MissingApiKey(provider) => {
              write!(f, "Missing API key for: {}", provider)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoChoicesInResponse => {
              write!(f, "API response contained no content")
            }
          , Error::GenerationFailed { primary, fallback } => {
              write!(f, 
                "Both LLMs failed: Primary - {}, Fallback - {}", 
                primary, fallback
              )
            }
          , Error::NotFound(what) => {
              write!(f, "{} not found", what)
            }
          , Error::Storage(msg) => {
              write!(f, "Storage error: {}", msg)
            }
          , Error::Render(msg) => {
              write!(f, "Render error: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
