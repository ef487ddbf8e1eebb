//! Primary / fallback backend selection

use log::debug;

use crate::config::Settings;
use crate::BackendKind;

/// The backend calls to attempt for one request, in order:
/// always a primary, at most one fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct FailoverSequence
{   pub primary: (BackendKind, String)
  , pub fallback: Option<(BackendKind, String)>
}

impl FailoverSequence
{   /// Build the sequence for the configured primary.
    ///
    /// Only an Anthropic primary falls back, and only to OpenAI when
    /// an OpenAI backend is available. An OpenAI primary has no fallback.
    pub fn from_settings(
      settings: &Settings
    , openai_available: bool
    ) -> Self
    {   let kind = settings.primary_llm;
        let primary = (kind, settings.model_for(kind).to_string());

        let fallback = if kind == BackendKind::Anthropic && openai_available
        {   Some((
              BackendKind::OpenAI
            , settings.model_for(BackendKind::OpenAI).to_string()
            ))
        } else
        {   None
        };

        debug!("Failover sequence: {:?} then {:?}", primary, fallback);
        FailoverSequence { primary, fallback }
    }

    pub fn has_fallback(&self) -> bool
    {   self.fallback.is_some()
    }
}
