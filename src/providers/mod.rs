//! Text-generation backends behind one capability

pub mod anthropic;
pub mod openai;

use async_trait::async_trait;

use crate::error::Error;
use crate::request::{PromptRequest, PromptResponse};
use crate::BackendKind;

// Re-export for convenience
pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

/// A provider that can complete one system + user prompt pair.
///
/// `tokens_used` in the response is input plus output tokens as
/// reported by the provider.
#[async_trait]
pub trait Backend: Send + Sync
{   fn kind(&self) -> BackendKind;

    async fn complete(
      &self
    , request: &PromptRequest
    ) -> Result<PromptResponse, Error>;
}

pub(crate) fn http_client(
  timeout_secs: Option<u64>
) -> Result<reqwest::Client, Error>
{   let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs
    {   builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder.build().map_err(|e| {
      Error::Configuration(format!("HTTP client: {}", e))
    })
}

/// Read a non-success response body for the error message
pub(crate) async fn error_body(response: reqwest::Response) -> String
{   let status = response.status();
    let text = response.text().await
      .unwrap_or_else(|_| "Unknown error".to_string());
    format!("{} {}", status.as_u16(), text)
}
