#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use govdraft::config::Settings;
use govdraft::error::Error;
use govdraft::providers::Backend;
use govdraft::request::{DocumentRequest, PromptRequest, PromptResponse};
use govdraft::{BackendKind, DocumentType, Priority};

/// Backend double that replies with a canned outcome and counts calls
pub struct FakeBackend
{   pub kind: BackendKind
  , pub reply: Result<(String, u64), Error>
  , pub calls: AtomicUsize
  , pub last_request: Mutex<Option<PromptRequest>>
}

impl FakeBackend
{   pub fn ok(kind: BackendKind, text: &str, tokens: u64) -> Arc<Self>
    {   Arc::new(FakeBackend
        {   kind
          , reply: Ok((text.to_string(), tokens))
          , calls: AtomicUsize::new(0)
          , last_request: Mutex::new(None)
        })
    }

    pub fn failing(kind: BackendKind, error: Error) -> Arc<Self>
    {   Arc::new(FakeBackend
        {   kind
          , reply: Err(error)
          , calls: AtomicUsize::new(0)
          , last_request: Mutex::new(None)
        })
    }

    pub fn call_count(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PromptRequest>
    {   self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend
{   fn kind(&self) -> BackendKind
    {   self.kind
    }

    async fn complete(
      &self
    , request: &PromptRequest
    ) -> Result<PromptResponse, Error>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let (text, tokens_used) = self.reply.clone()?;
        Ok(PromptResponse
        {   text
          , provider: self.kind
          , model: request.model.clone()
          , tokens_used
        })
    }
}

pub fn as_backend(fake: &Arc<FakeBackend>) -> Arc<dyn Backend>
{   fake.clone() as Arc<dyn Backend>
}

pub fn settings() -> Settings
{   Settings
    {   anthropic_api_key: Some("sk-ant-test".to_string())
      , openai_api_key: Some("sk-openai-test".to_string())
      , ..Settings::default()
    }
}

/// The status-report letter used across tests
pub fn status_report_request() -> DocumentRequest
{   let mut request = DocumentRequest::new(
      DocumentType::OfficialLetter
    , "Request for Project Status Report"
    , "Need status report for Smart City Mission project Phase-2"
    );
    request.recipient_name = Some("Municipal Commissioner".to_string());
    request.priority = Priority::High;
    request
}

pub fn approx_eq(a: f64, b: f64) -> bool
{   (a - b).abs() < 1e-9
}
