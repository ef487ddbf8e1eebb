use std::sync::Arc;
use log::{debug, info, warn};

use crate::config::Settings;
use crate::error::Error;
use crate::providers::{AnthropicClient, Backend, OpenAiClient};
use crate::request::
{   DocumentRequest
  , GenerationResult
  , PromptRequest
  , PromptResponse
  , FALLBACK_MARKER
};
use crate::failover::FailoverSequence;
use crate::{cost, prompt, templates, BackendKind};

/// Generation orchestrator: template, prompts, primary call,
/// single fallback, normalised result.
///
/// Holds no mutable state; concurrent `generate` calls are independent.
pub struct DraftingClient
{   settings: Arc<Settings>
  , anthropic: Option<Arc<dyn Backend>>
  , openai: Option<Arc<dyn Backend>>
}

impl DraftingClient
{   /// Build HTTP backends for whichever API keys are configured
    pub fn new(settings: Arc<Settings>) -> Result<Self, Error>
    {   debug!("Initializing DraftingClient");

        let mut backends: Vec<Arc<dyn Backend>> = Vec::new();
        if let Some(key) = settings.api_key_for(BackendKind::Anthropic)
        {   backends.push(Arc::new(AnthropicClient::new(
              key.to_string()
            , settings.anthropic_api_base.clone()
            , settings.request_timeout_secs
            )?));
        }
        if let Some(key) = settings.api_key_for(BackendKind::OpenAI)
        {   backends.push(Arc::new(OpenAiClient::new(
              key.to_string()
            , settings.openai_api_base.clone()
            , settings.request_timeout_secs
            )?));
        }

        DraftingClient::with_backends(settings, backends)
    }

    /// Build from explicit backends, each slotted by its `kind()`.
    /// Fails unless at least one is given; a later backend of the same
    /// kind replaces an earlier one.
    pub fn with_backends(
      settings: Arc<Settings>
    , backends: Vec<Arc<dyn Backend>>
    ) -> Result<Self, Error>
    {   let mut anthropic = None;
        let mut openai = None;
        for backend in backends
        {   match backend.kind()
            {   BackendKind::Anthropic => anthropic = Some(backend)
              , BackendKind::OpenAI => openai = Some(backend)
            }
        }

        if anthropic.is_none() && openai.is_none()
        {   return Err(Error::Configuration(
              "At least one API key (ANTHROPIC_API_KEY or OPENAI_API_KEY) \
               must be provided".to_string()
            ));
        }
        info!(
          "Primary LLM: {} ({}), fallback available: {}",
          settings.primary_llm,
          settings.model_for(settings.primary_llm),
          settings.primary_llm == BackendKind::Anthropic && openai.is_some()
        );
        Ok(DraftingClient
        {   settings
          , anthropic
          , openai
        })
    }

    pub fn settings(&self) -> &Settings
    {   &self.settings
    }

    fn backend(&self, kind: BackendKind) -> Option<&Arc<dyn Backend>>
    {   match kind
        {   BackendKind::Anthropic => self.anthropic.as_ref()
          , BackendKind::OpenAI => self.openai.as_ref()
        }
    }

    async fn call(
      &self
    , kind: BackendKind
    , model: &str
    , system: &str
    , user: &str
    ) -> Result<PromptResponse, Error>
    {   let backend = self.backend(kind).ok_or_else(|| {
          Error::MissingApiKey(kind.to_string())
        })?;
        let request = PromptRequest
        {   system_message: system.to_string()
          , prompt: user.to_string()
          , model: model.to_string()
          , max_tokens: self.settings.max_tokens
          , temperature: self.settings.temperature
        };
        let response = backend.complete(&request).await?;
        if response.text.trim().is_empty()
        {   return Err(Error::NoChoicesInResponse);
        }
        Ok(response)
    }

    /// Draft a document. Fails only when the primary and the fallback
    /// (if any) both fail.
    pub async fn generate(
      &self
    , request: &DocumentRequest
    ) -> Result<GenerationResult, Error>
    {   let template = templates::template_for(request.document_type);
        let system = prompt::system_instructions(
          request.document_type
        , &self.settings
        );
        let user = prompt::user_instructions(request, template);

        let sequence = FailoverSequence::from_settings(
          &self.settings
        , self.openai.is_some()
        );
        let (primary_kind, primary_model) = &sequence.primary;

        let primary_error = match self
          .call(*primary_kind, primary_model, &system, &user)
          .await
        {   Ok(response) => return Ok(normalize(response, false))
          , Err(e) => e
        };
        warn!("Primary LLM failed: {}, trying fallback...", primary_error);

        let fallback_error = match &sequence.fallback
        {   Some((kind, model)) => {
              match self.call(*kind, model, &system, &user).await
              {   Ok(response) => return Ok(normalize(response, true))
                , Err(e) => e
              }
            }
          , None => Error::Other("No fallback available".to_string())
        };

        Err(Error::GenerationFailed
        {   primary: primary_error.to_string()
          , fallback: fallback_error.to_string()
        })
    }
}

fn normalize(response: PromptResponse, fallback: bool) -> GenerationResult
{   let model_used = if fallback
    {   format!("{}{}", response.model, FALLBACK_MARKER)
    } else
    {   response.model
    };
    debug!(
      "Generated {} tokens with {}",
      response.tokens_used, model_used
    );
    GenerationResult
    {   content: response.text
      , tokens_used: response.tokens_used
      , cost_estimate: cost::estimate_cost(response.tokens_used)
      , model_used
    }
}
