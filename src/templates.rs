//! Static format skeletons, one per document type.
//!
//! The `{placeholders}` are left as-is; the model fills them.

use crate::request::TemplateInfo;
use crate::DocumentType;

const OFFICIAL_LETTER: &str = r#"
Format: Official Government Letter (As per Manual of Office Procedure)

[Reference Number]
Date: [Date]

From:
{sender_name}
{sender_designation}
{department_name}
{office_address}

To:
{recipient_name}
{recipient_designation}
{recipient_organization}

Subject: {subject}

Sir/Madam,

[Body of the letter - formal government tone, clear paragraphs]

[Action required/Request]

Thanking you,

Yours faithfully,

[Digital Signature]
{sender_name}
{sender_designation}

Copy to:
1. [Relevant authority]
2. File/Guard File
"#;

const MEETING_MINUTES: &str = r#"
Format: Official Meeting Minutes

MINUTES OF MEETING

Reference No.: [Number]
Date: {meeting_date}
Venue: {meeting_venue}

Subject: {subject}

ATTENDANCE:
[List all attendees with designation]

AGENDA:
[Numbered list of agenda items]

DISCUSSION:
[Point-by-point discussion summary]

DECISIONS TAKEN:
[Numbered list of decisions]

ACTION POINTS:
[Responsibility matrix with timeline]

Meeting concluded at [Time]

Recorded by: [Name]
Approved by: [Chairperson]
"#;

const EMAIL: &str = r#"
Format: Formal Government Email

Subject: {subject}

Dear {recipient_name},

[Professional greeting and context]

[Main content - clear, concise paragraphs]

[Call to action or next steps]

Regards,
{sender_name}
{sender_designation}
{department_name}
Contact: [Phone/Email]
"#;

const MEMO: &str = r#"
Format: Office Memorandum

GOVERNMENT OF {state}
{department_name}

OFFICE MEMORANDUM

No. {reference_number}
Dated: {date}

Subject: {subject}

[Body in numbered paragraphs]

[Signature]
{sender_name}
{sender_designation}

Distribution:
[List of recipients]
"#;

const CIRCULAR: &str = r#"
Format: Government Circular

GOVERNMENT OF {state}
{department_name}

CIRCULAR

No. {reference_number}
Date: {date}

Subject: {subject}

To: [All concerned departments/officials]

[Directive or information in clear points]

This issues with the approval of competent authority.

{sender_name}
{sender_designation}
"#;

/// Skeleton for a document type. Notices have no skeleton of their
/// own and use the official letter.
pub fn template_for(document_type: DocumentType) -> &'static str
{   match document_type
    {   DocumentType::OfficialLetter => OFFICIAL_LETTER
      , DocumentType::MeetingMinutes => MEETING_MINUTES
      , DocumentType::Email => EMAIL
      , DocumentType::Memo => MEMO
      , DocumentType::Circular => CIRCULAR
      , DocumentType::Notice => OFFICIAL_LETTER
    }
}

/// Skeleton by wire identifier; unknown identifiers get the official letter.
pub fn template_for_name(document_type: &str) -> &'static str
{   DocumentType::parse(document_type)
      .map(template_for)
      .unwrap_or(OFFICIAL_LETTER)
}

/// "meeting_minutes" -> "Meeting Minutes"
fn display_name(document_type: DocumentType) -> String
{   document_type.as_str()
      .split('_')
      .map(|word| {
        let mut chars = word.chars();
        match chars.next()
        {   Some(first) => first.to_uppercase()
              .chain(chars)
              .collect::<String>()
          , None => String::new()
        }
      })
      .collect::<Vec<_>>()
      .join(" ")
}

/// One catalog entry per document type, in declaration order
pub fn available_templates() -> Vec<TemplateInfo>
{   DocumentType::ALL
      .iter()
      .map(|&document_type| {
        let name = display_name(document_type);
        TemplateInfo
        {   id: document_type.as_str().to_string()
          , description: format!(
              "Generate {} in government format",
              document_type.as_str().replace('_', " ")
            )
          , required_fields: vec![
              "subject".to_string()
            , "content".to_string()
            ]
          , sample: format!("Sample {}", name)
          , name
          , document_type
        }
      })
      .collect()
}
