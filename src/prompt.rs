//! Prompt assembly for the two message roles

use std::fmt::Write;

use crate::config::Settings;
use crate::request::DocumentRequest;
use crate::DocumentType;

/// System-role instructions: persona, house rules, department identity
pub fn system_instructions(
  document_type: DocumentType
, settings: &Settings
) -> String
{   format!(
"You are an expert government communication specialist for the {dept}, {state}, India.

Your role is to draft official government documents following Indian government protocols, Manual of Office Procedure (MOP), and standard formats.

Key Guidelines:
1. Use formal, professional language appropriate for government communication
2. Follow the exact format structure provided
3. Use respectful salutations (Sir/Madam, Dear, etc.)
4. Include proper reference numbers and dates
5. Maintain hierarchy and protocol
6. Be clear, concise, and action-oriented
7. Use numbered paragraphs for office memorandums
8. Include proper closing formalities
9. Maintain official tone throughout
10. Follow RTI Act compliance where applicable

Current document type: {doc_type}

Department: {dept}
State: {state}
Office: {office}"
      , dept = settings.department_name
      , state = settings.state_name
      , office = settings.office_address
      , doc_type = document_type.as_str()
    )
}

/// User-role prompt: request details, then the template, then the
/// fixed output instructions.
pub fn user_instructions(
  request: &DocumentRequest
, template: &str
) -> String
{   // writing into a String cannot fail
    let mut prompt = String::new();

    let _ = write!(
      prompt
    , "Generate a {} with the following details:\n\n\
       **Subject:** {}\n\n\
       **Main Content/Purpose:** \n{}\n\n\
       **Document Details:**\n\
       - Sender: {} ({})\n\
       - Priority: {}\n"
    , request.document_type.as_str()
    , request.subject
    , request.content
    , request.sender_name
    , request.sender_designation
    , request.priority.as_str()
    );

    if let Some(name) = present(&request.recipient_name)
    {   let _ = write!(prompt, "- Recipient: {}", name);
        if let Some(designation) = present(&request.recipient_designation)
        {   let _ = write!(prompt, " ({})", designation);
        }
        if let Some(organization) = present(&request.recipient_organization)
        {   let _ = write!(prompt, ", {}", organization);
        }
        prompt.push('\n');
    }

    if let Some(reference) = present(&request.reference_number)
    {   let _ = writeln!(prompt, "- Reference Number: {}", reference);
    }

    if let Some(context) = present(&request.additional_context)
    {   let _ = writeln!(prompt, "\n**Additional Context:**\n{}", context);
    }

    if request.document_type == DocumentType::MeetingMinutes
    {   append_meeting_details(&mut prompt, request);
    }

    if !request.attachments.is_empty()
    {   let _ = writeln!(
          prompt
        , "\n**Attachments:** {}"
        , request.attachments.join(", ")
        );
    }

    let _ = writeln!(prompt, "\n**Format Template to Follow:**\n{}", template);
    prompt.push_str("\n**Instructions:**\n");
    prompt.push_str("1. Generate a complete, ready-to-use document\n");
    prompt.push_str("2. Fill in today's date where [Date] appears\n");
    prompt.push_str("3. Generate appropriate reference number if not provided\n");
    prompt.push_str("4. Maintain strict government format\n");
    prompt.push_str("5. Do NOT include any explanations or notes - only the document\n");
    prompt.push_str("6. Ensure all placeholders are replaced with actual content\n");

    prompt
}

fn append_meeting_details(prompt: &mut String, request: &DocumentRequest)
{   if let Some(date) = present(&request.meeting_date)
    {   let _ = write!(prompt, "\n**Meeting Date:** {}", date);
    }
    if let Some(venue) = present(&request.meeting_venue)
    {   let _ = write!(prompt, "\n**Venue:** {}", venue);
    }
    if !request.attendees.is_empty()
    {   prompt.push_str("\n**Attendees:**\n");
        for attendee in &request.attendees
        {   let _ = writeln!(
              prompt
            , "- {} - {}"
            , attendee.name
            , attendee.designation
            );
        }
    }
    if !request.agenda_items.is_empty()
    {   prompt.push_str("\n**Agenda Items:**\n");
        for (i, item) in request.agenda_items.iter().enumerate()
        {   let _ = writeln!(prompt, "{}. {}", i + 1, item);
        }
    }
}

/// Optional text that is absent, empty or only whitespace is left out
fn present(value: &Option<String>) -> Option<&str>
{   value.as_deref().filter(|v| !v.trim().is_empty())
}
