use govdraft::templates::{available_templates, template_for, template_for_name};
use govdraft::DocumentType;

#[test]
fn test_every_type_has_a_skeleton()
{   for document_type in DocumentType::ALL
    {   let template = template_for(document_type);
        assert!(
          !template.trim().is_empty(),
          "empty template for {}", document_type
        );
    }
}

#[test]
fn test_skeletons_match_their_type()
{   assert!(template_for(DocumentType::OfficialLetter)
      .contains("Official Government Letter"));
    assert!(template_for(DocumentType::MeetingMinutes)
      .contains("MINUTES OF MEETING"));
    assert!(template_for(DocumentType::Email)
      .contains("Formal Government Email"));
    assert!(template_for(DocumentType::Memo)
      .contains("OFFICE MEMORANDUM"));
    assert!(template_for(DocumentType::Circular)
      .contains("CIRCULAR"));
}

#[test]
fn test_notice_uses_letter_skeleton()
{   assert_eq!(
      template_for(DocumentType::Notice),
      template_for(DocumentType::OfficialLetter)
    );
}

#[test]
fn test_unknown_name_falls_back_to_letter()
{   assert_eq!(
      template_for_name("press_release"),
      template_for(DocumentType::OfficialLetter)
    );
    assert_eq!(template_for_name(""), template_for(DocumentType::OfficialLetter));
    assert_eq!(template_for_name("memo"), template_for(DocumentType::Memo));
}

#[test]
fn test_placeholders_are_left_for_the_model()
{   let letter = template_for(DocumentType::OfficialLetter);
    assert!(letter.contains("{sender_name}"));
    assert!(letter.contains("{recipient_organization}"));
    assert!(letter.contains("[Date]"));
}

#[test]
fn test_available_templates_lists_every_type()
{   let templates = available_templates();
    assert_eq!(templates.len(), DocumentType::ALL.len());

    let minutes = templates.iter()
      .find(|t| t.document_type == DocumentType::MeetingMinutes)
      .expect("meeting minutes entry");
    assert_eq!(minutes.id, "meeting_minutes");
    assert_eq!(minutes.name, "Meeting Minutes");
    assert_eq!(
      minutes.description,
      "Generate meeting minutes in government format"
    );
    assert_eq!(minutes.required_fields, vec!["subject", "content"]);
    assert_eq!(minutes.sample, "Sample Meeting Minutes");
}
