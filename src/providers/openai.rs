use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::error::Error;
use crate::request::{PromptRequest, PromptResponse};
use crate::BackendKind;

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenAiChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub max_tokens: u32
  , pub temperature: f32
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChatResponse
{   pub choices: Vec<Choice>
  , #[serde(default)]
    pub usage: Option<Usage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChatMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub total_tokens: u64
}

// ===== Client =====

/// OpenAI Chat Completions adapter
pub struct OpenAiClient
{   api_key: String
  , api_base: String
  , http_client: reqwest::Client
}

impl OpenAiClient
{   pub fn new(
      api_key: String
    , api_base: String
    , timeout_secs: Option<u64>
    ) -> Result<Self, Error>
    {   debug!("Creating OpenAiClient for {}", api_base);
        Ok(OpenAiClient
        {   api_key
          , api_base: api_base.trim_end_matches('/').to_string()
          , http_client: super::http_client(timeout_secs)?
        })
    }
}

#[async_trait]
impl super::Backend for OpenAiClient
{   fn kind(&self) -> BackendKind
    {   BackendKind::OpenAI
    }

    async fn complete(
      &self
    , request: &PromptRequest
    ) -> Result<PromptResponse, Error>
    {   debug!("OpenAI completion with model: {}", request.model);

        let body = OpenAiChatRequest
        {   model: request.model.clone()
          , messages: vec![
              ChatMessage
              {   role: "system".to_string()
                , content: Some(request.system_message.clone())
              }
            , ChatMessage
              {   role: "user".to_string()
                , content: Some(request.prompt.clone())
              }
            ]
          , max_tokens: request.max_tokens
          , temperature: request.temperature
        };

        trace!("OpenAI request: {:?}", body);

        let response = self.http_client
          .post(format!("{}/chat/completions", self.api_base))
          .header("Authorization", format!("Bearer {}", self.api_key))
          .header("Content-Type", "application/json")
          .json(&body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("OpenAI response status: {}", status);

        if !status.is_success()
        {   let error_text = super::error_body(response).await;
            error!("OpenAI API error: {}", error_text);
            return Err(Error::ApiError(
              format!("OpenAI error: {}", error_text)
            ));
        }

        let chat_response: OpenAiChatResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::ParseError(e.to_string())
          })?;

        let text = chat_response.choices.first()
          .and_then(|c| c.message.content.clone())
          .ok_or_else(|| {
            error!("No choices in response");
            Error::NoChoicesInResponse
          })?;

        let tokens_used = chat_response.usage
          .map(|u| u.total_tokens)
          .unwrap_or(0);

        Ok(PromptResponse
        {   text
          , provider: BackendKind::OpenAI
          , model: request.model.clone()
          , tokens_used
        })
    }
}
