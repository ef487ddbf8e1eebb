use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::error::Error;
use crate::request::{PromptRequest, PromptResponse};
use crate::BackendKind;

const ANTHROPIC_VERSION: &str = "2023-06-01";

// ===== Message Types =====

#[derive(Debug, Clone, Serialize)]
pub struct Message
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest
{   pub model: String
  , pub max_tokens: u32
  , pub temperature: f32
  , pub system: String
  , pub messages: Vec<Message>
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse
{   pub content: Vec<ContentBlock>
  , #[serde(default)]
    pub usage: Usage
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock
{   #[serde(rename = "type")]
    pub kind: String
  , #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub input_tokens: u64
  , #[serde(default)]
    pub output_tokens: u64
}

// ===== Client =====

/// Anthropic Messages API adapter
pub struct AnthropicClient
{   api_key: String
  , api_base: String
  , http_client: reqwest::Client
}

impl AnthropicClient
{   pub fn new(
      api_key: String
    , api_base: String
    , timeout_secs: Option<u64>
    ) -> Result<Self, Error>
    {   debug!("Creating AnthropicClient for {}", api_base);
        Ok(AnthropicClient
        {   api_key
          , api_base: api_base.trim_end_matches('/').to_string()
          , http_client: super::http_client(timeout_secs)?
        })
    }
}

#[async_trait]
impl super::Backend for AnthropicClient
{   fn kind(&self) -> BackendKind
    {   BackendKind::Anthropic
    }

    async fn complete(
      &self
    , request: &PromptRequest
    ) -> Result<PromptResponse, Error>
    {   debug!("Anthropic completion with model: {}", request.model);

        let body = MessagesRequest
        {   model: request.model.clone()
          , max_tokens: request.max_tokens
          , temperature: request.temperature
          , system: request.system_message.clone()
          , messages: vec![
              Message
              {   role: "user".to_string()
                , content: request.prompt.clone()
              }
            ]
        };

        trace!("Anthropic request: {:?}", body);

        let response = self.http_client
          .post(format!("{}/messages", self.api_base))
          .header("x-api-key", self.api_key.as_str())
          .header("anthropic-version", ANTHROPIC_VERSION)
          .header("Content-Type", "application/json")
          .json(&body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Anthropic response status: {}", status);

        if !status.is_success()
        {   let error_text = super::error_body(response).await;
            error!("Anthropic API error: {}", error_text);
            return Err(Error::ApiError(
              format!("Anthropic error: {}", error_text)
            ));
        }

        let messages_response: MessagesResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::ParseError(e.to_string())
          })?;

        let text = messages_response.content
          .iter()
          .find(|block| block.kind == "text")
          .and_then(|block| block.text.clone())
          .ok_or_else(|| {
            error!("No text block in response");
            Error::NoChoicesInResponse
          })?;

        let usage = &messages_response.usage;
        Ok(PromptResponse
        {   text
          , provider: BackendKind::Anthropic
          , model: request.model.clone()
          , tokens_used: usage.input_tokens + usage.output_tokens
        })
    }
}
