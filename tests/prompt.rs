mod common;

use govdraft::config::Settings;
use govdraft::prompt::{system_instructions, user_instructions};
use govdraft::request::{Attendee, DocumentRequest};
use govdraft::templates::template_for;
use govdraft::{DocumentType, Priority};

fn minutes_request() -> DocumentRequest
{   DocumentRequest::new(
      DocumentType::MeetingMinutes
    , "Monthly review"
    , "Review progress of ongoing works"
    )
}

#[test]
fn test_system_instructions_carry_department_identity()
{   let settings = Settings
    {   department_name: "Water Resources Department".to_string()
      , state_name: "Karnataka".to_string()
      , office_address: "Vidhana Soudha, Bengaluru".to_string()
      , ..Settings::default()
    };
    let system = system_instructions(DocumentType::Memo, &settings);

    assert!(system.starts_with(
      "You are an expert government communication specialist for the \
       Water Resources Department, Karnataka, India."
    ));
    assert!(system.contains("Current document type: memo"));
    assert!(system.contains("Department: Water Resources Department"));
    assert!(system.contains("State: Karnataka"));
    assert!(system.ends_with("Office: Vidhana Soudha, Bengaluru"));
}

#[test]
fn test_system_instructions_list_ten_rules()
{   let system = system_instructions(
      DocumentType::OfficialLetter
    , &Settings::default()
    );
    for n in 1..=10
    {   assert!(
          system.contains(&format!("\n{}. ", n)),
          "rule {} missing", n
        );
    }
    assert!(system.contains("7. Use numbered paragraphs for office memorandums"));
    assert!(system.contains("10. Follow RTI Act compliance where applicable"));
}

#[test]
fn test_user_instructions_core_fields()
{   let request = common::status_report_request();
    let template = template_for(request.document_type);
    let prompt = user_instructions(&request, template);

    assert!(prompt.starts_with(
      "Generate a official_letter with the following details:\n\n\
       **Subject:** Request for Project Status Report\n\n\
       **Main Content/Purpose:** \n\
       Need status report for Smart City Mission project Phase-2\n\n\
       **Document Details:**\n\
       - Sender: Project Director (Project Director, PMU)\n\
       - Priority: high\n\
       - Recipient: Municipal Commissioner\n"
    ));
    assert!(prompt.contains(&format!(
      "\n**Format Template to Follow:**\n{}\n", template
    )));
    assert!(prompt.ends_with(
      "\n**Instructions:**\n\
       1. Generate a complete, ready-to-use document\n\
       2. Fill in today's date where [Date] appears\n\
       3. Generate appropriate reference number if not provided\n\
       4. Maintain strict government format\n\
       5. Do NOT include any explanations or notes - only the document\n\
       6. Ensure all placeholders are replaced with actual content\n"
    ));
}

#[test]
fn test_absent_optional_fields_are_omitted()
{   let request = DocumentRequest::new(
      DocumentType::Email
    , "Site visit"
    , "Confirm the site visit"
    );
    let prompt = user_instructions(&request, template_for(request.document_type));

    assert!(!prompt.contains("Recipient"));
    assert!(!prompt.contains("Reference Number"));
    assert!(!prompt.contains("Additional Context"));
    assert!(!prompt.contains("Attachments"));
    assert!(!prompt.contains("None"));
    assert!(prompt.contains("- Priority: normal\n\n**Format Template to Follow:**"));
}

#[test]
fn test_recipient_parts_appended_only_when_present()
{   let mut request = common::status_report_request();
    request.recipient_organization = Some("Municipal Corporation".to_string());
    let prompt = user_instructions(&request, "");
    assert!(prompt.contains(
      "- Recipient: Municipal Commissioner, Municipal Corporation\n"
    ));

    request.recipient_designation = Some("Commissioner".to_string());
    let prompt = user_instructions(&request, "");
    assert!(prompt.contains(
      "- Recipient: Municipal Commissioner (Commissioner), Municipal Corporation\n"
    ));

    request.recipient_name = None;
    let prompt = user_instructions(&request, "");
    assert!(!prompt.contains("Recipient"));
    assert!(!prompt.contains("Commissioner"));
}

#[test]
fn test_optional_sections_in_order()
{   let mut request = common::status_report_request();
    request.reference_number = Some("UDD/2024/113".to_string());
    request.additional_context = Some("Audit due next month".to_string());
    request.attachments = vec!["Annexure A".to_string(), "Annexure B".to_string()];
    let prompt = user_instructions(&request, "TEMPLATE");

    let reference = prompt.find("- Reference Number: UDD/2024/113\n").unwrap();
    let context = prompt.find("\n**Additional Context:**\nAudit due next month\n").unwrap();
    let attachments = prompt.find("\n**Attachments:** Annexure A, Annexure B\n").unwrap();
    let template = prompt.find("**Format Template to Follow:**\nTEMPLATE").unwrap();
    assert!(reference < context);
    assert!(context < attachments);
    assert!(attachments < template);
}

#[test]
fn test_meeting_sections_keep_list_order()
{   let mut request = minutes_request();
    request.meeting_date = Some("2024-03-15".to_string());
    request.meeting_venue = Some("Conference Hall".to_string());
    request.attendees = vec![
      Attendee { name: "A. Patil".to_string(), designation: "Chief Engineer".to_string() }
    , Attendee { name: "S. Rao".to_string(), designation: "Deputy Secretary".to_string() }
    ];
    request.agenda_items = vec![
      "Budget review".to_string()
    , "Tender status".to_string()
    ];
    let prompt = user_instructions(&request, "");

    assert!(prompt.contains("\n**Meeting Date:** 2024-03-15"));
    assert!(prompt.contains("\n**Venue:** Conference Hall"));
    assert!(prompt.contains(
      "\n**Attendees:**\n- A. Patil - Chief Engineer\n- S. Rao - Deputy Secretary\n"
    ));
    assert!(prompt.contains("\n**Agenda Items:**\n1. Budget review\n2. Tender status\n"));
}

#[test]
fn test_meeting_sections_absent_when_lists_empty()
{   let prompt = user_instructions(&minutes_request(), "");
    assert!(!prompt.contains("Attendees"));
    assert!(!prompt.contains("Agenda Items"));
    assert!(!prompt.contains("Meeting Date"));
    assert!(!prompt.contains("Venue"));
}

#[test]
fn test_meeting_fields_ignored_for_other_types()
{   let mut request = common::status_report_request();
    request.meeting_venue = Some("Conference Hall".to_string());
    request.agenda_items = vec!["Budget review".to_string()];
    request.priority = Priority::Low;
    let prompt = user_instructions(&request, "");
    assert!(!prompt.contains("Conference Hall"));
    assert!(!prompt.contains("Agenda Items"));
    assert!(prompt.contains("- Priority: low\n"));
}

#[test]
fn test_empty_strings_count_as_absent()
{   let request: DocumentRequest = serde_json::from_value(serde_json::json!({
      "document_type": "meeting_minutes",
      "subject": "Monthly review",
      "content": "Review progress of ongoing works",
      "recipient_name": "",
      "recipient_designation": "",
      "recipient_organization": "  ",
      "reference_number": "",
      "additional_context": "",
      "meeting_date": "",
      "meeting_venue": " "
    })).unwrap();
    let prompt = user_instructions(&request, "");

    assert!(!prompt.contains("Recipient"));
    assert!(!prompt.contains("Reference Number"));
    assert!(!prompt.contains("Additional Context"));
    assert!(!prompt.contains("Meeting Date"));
    assert!(!prompt.contains("Venue"));
}

#[test]
fn test_recipient_details_skip_empty_parts()
{   let mut request = common::status_report_request();
    request.recipient_designation = Some(String::new());
    request.recipient_organization = Some("Municipal Corporation".to_string());
    let prompt = user_instructions(&request, "");
    assert!(prompt.contains(
      "- Recipient: Municipal Commissioner, Municipal Corporation\n"
    ));
}

#[test]
fn test_null_lists_deserialize_as_empty()
{   let request: DocumentRequest = serde_json::from_value(serde_json::json!({
      "document_type": "meeting_minutes",
      "subject": "Monthly review",
      "content": "Review progress of ongoing works",
      "attachments": null,
      "attendees": null,
      "agenda_items": null
    })).unwrap();
    assert!(request.attachments.is_empty());
    assert!(request.attendees.is_empty());
    assert!(request.agenda_items.is_empty());

    let listed: DocumentRequest = serde_json::from_value(serde_json::json!({
      "document_type": "meeting_minutes",
      "subject": "Monthly review",
      "content": "Review progress of ongoing works",
      "attendees": [{ "name": "A. Patil", "designation": "Engineer" }]
    })).unwrap();
    assert_eq!(listed.attendees.len(), 1);
    assert!(listed.agenda_items.is_empty());
}
