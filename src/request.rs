//! Request, result and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{BackendKind, DocumentType, Priority};

/// Meeting participant listed in minutes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee
{   #[serde(default)]
    pub name: String
  , #[serde(default)]
    pub designation: String
}

/// Input to document generation. Absent optional fields are left
/// out of the prompt entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest
{   pub document_type: DocumentType
  , /// Subject or title of the document
    pub subject: String
  , /// Main content or key points
    pub content: String
  , #[serde(default)]
    pub recipient_name: Option<String>
  , #[serde(default)]
    pub recipient_designation: Option<String>
  , #[serde(default)]
    pub recipient_organization: Option<String>
  , #[serde(default = "default_sender_name")]
    pub sender_name: String
  , #[serde(default = "default_sender_designation")]
    pub sender_designation: String
  , #[serde(default)]
    pub reference_number: Option<String>
  , #[serde(default)]
    pub priority: Priority
  , #[serde(default, deserialize_with = "null_as_empty")]
    pub attachments: Vec<String>
  , #[serde(default)]
    pub additional_context: Option<String>
  , // meeting minutes only
    #[serde(default)]
    pub meeting_date: Option<String>
  , #[serde(default)]
    pub meeting_venue: Option<String>
  , #[serde(default, deserialize_with = "null_as_empty")]
    pub attendees: Vec<Attendee>
  , #[serde(default, deserialize_with = "null_as_empty")]
    pub agenda_items: Vec<String>
}

/// Treats an explicit JSON `null` list the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>
, T: Deserialize<'de>
{   Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_sender_name() -> String
{   "Project Director".to_string()
}

fn default_sender_designation() -> String
{   "Project Director, PMU".to_string()
}

impl DocumentRequest
{   /// Request with only the required fields set
    pub fn new(
      document_type: DocumentType
    , subject: impl Into<String>
    , content: impl Into<String>
    ) -> Self
    {   DocumentRequest
        {   document_type
          , subject: subject.into()
          , content: content.into()
          , recipient_name: None
          , recipient_designation: None
          , recipient_organization: None
          , sender_name: default_sender_name()
          , sender_designation: default_sender_designation()
          , reference_number: None
          , priority: Priority::default()
          , attachments: vec![]
          , additional_context: None
          , meeting_date: None
          , meeting_venue: None
          , attendees: vec![]
          , agenda_items: vec![]
        }
    }
}

/// Marker appended to the model identifier when the fallback produced the text
pub const FALLBACK_MARKER: &str = " (fallback)";

/// Normalised outcome of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult
{   pub content: String
  , /// Input plus output tokens
    pub tokens_used: u64
  , pub cost_estimate: f64
  , /// Model that produced the text, with FALLBACK_MARKER if applicable
    pub model_used: String
}

impl GenerationResult
{   pub fn used_fallback(&self) -> bool
    {   self.model_used.ends_with(FALLBACK_MARKER)
    }
}

/// One call to a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest
{   /// System-role instructions
    pub system_message: String
  , /// User-role prompt text
    pub prompt: String
  , pub model: String
  , pub max_tokens: u32
  , pub temperature: f32
}

/// What a backend hands back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse
{   pub text: String
  , pub provider: BackendKind
  , pub model: String
  , pub tokens_used: u64
}

/// Body returned to the caller after a successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse
{   pub id: String
  , pub document_type: String
  , pub generated_content: String
  , pub file_path: Option<String>
  , pub pdf_path: Option<String>
  , pub docx_path: Option<String>
  , pub metadata: serde_json::Value
  , pub created_at: DateTime<Utc>
  , pub tokens_used: u64
  , pub cost_estimate: f64
}

/// Catalog entry describing one document type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo
{   pub id: String
  , pub name: String
  , pub document_type: DocumentType
  , pub description: String
  , pub required_fields: Vec<String>
  , pub sample: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck
{   pub status: String
  , pub version: String
  , pub timestamp: DateTime<Utc>
  , pub ai_service: String
  , pub database: String
}
