pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod templates;
pub mod prompt;
pub mod cost;
pub mod failover;
pub mod client;
pub mod render;
pub mod store;
pub mod service;
pub mod server;
use serde::{Deserialize, Serialize};
use std::fmt;

/*

govdraft drafts formal government correspondence (letters, emails,
minutes, memos, circulars, notices). A fixed template per document
type and a structured prompt go to one LLM backend, with a single
fallback to the other backend when the primary call fails. The text
is then rendered to DOCX and PDF and recorded in SQLite.

govdraft/
├── src/
│   ├── lib.rs          # Shared enums and module wiring
│   ├── error.rs        # Crate error type
│   ├── config.rs       # Settings read once at startup
│   ├── request.rs      # Request / result / response types
│   ├── templates.rs    # Template catalog
│   ├── prompt.rs       # System and user prompt assembly
│   ├── cost.rs         # Token cost estimate
│   ├── failover.rs     # Primary / fallback selection
│   ├── client.rs       # Generation orchestrator
│   ├── providers/      # Anthropic and OpenAI adapters
│   ├── render.rs       # DOCX + PDF output
│   ├── store.rs        # Document record store
│   ├── service.rs      # Generate, render, persist
│   ├── server.rs       # HTTP routes
│   └── main.rs         # Binary entry point
└── tests/

*/

/// Kind of document that can be drafted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType
{   OfficialLetter
  , Email
  , MeetingMinutes
  , Memo
  , Circular
  , Notice
}

impl DocumentType
{   pub const ALL: [DocumentType; 6] =
    [   DocumentType::OfficialLetter
      , DocumentType::Email
      , DocumentType::MeetingMinutes
      , DocumentType::Memo
      , DocumentType::Circular
      , DocumentType::Notice
    ];

    /// Wire identifier, e.g. `official_letter`
    pub fn as_str(&self) -> &'static str
    {   match self
        {   DocumentType::OfficialLetter => "official_letter"
          , DocumentType::Email => "email"
          , DocumentType::MeetingMinutes => "meeting_minutes"
          , DocumentType::Memo => "memo"
          , DocumentType::Circular => "circular"
          , DocumentType::Notice => "notice"
        }
    }

    /// Parse a wire identifier; `None` when unrecognised
    pub fn parse(value: &str) -> Option<DocumentType>
    {   DocumentType::ALL
          .iter()
          .copied()
          .find(|t| t.as_str() == value)
    }
}

impl fmt::Display for DocumentType
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

/// Handling priority requested for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority
{   Urgent
  , High
  , #[default]
    Normal
  , Low
}

impl Priority
{   pub fn as_str(&self) -> &'static str
    {   match self
        {   Priority::Urgent => "urgent"
          , Priority::High => "high"
          , Priority::Normal => "normal"
          , Priority::Low => "low"
        }
    }
}

impl fmt::Display for Priority
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

/// The two supported text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind
{   /// Anthropic Messages API (Claude models)
    Anthropic
  , /// OpenAI Chat Completions API (GPT models)
    OpenAI
}

impl BackendKind
{   pub fn as_str(&self) -> &'static str
    {   match self
        {   BackendKind::Anthropic => "anthropic"
          , BackendKind::OpenAI => "openai"
        }
    }

    pub fn parse(value: &str) -> Option<BackendKind>
    {   match value.trim().to_ascii_lowercase().as_str()
        {   "anthropic" => Some(BackendKind::Anthropic)
          , "openai" => Some(BackendKind::OpenAI)
          , _ => None
        }
    }
}

impl fmt::Display for BackendKind
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}
