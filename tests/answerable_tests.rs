// tests/answerable_tests.rs

use chrono::Utc;
use formcore::error::AppError;
use formcore::metadata::IconSet;
use formcore::models::answer::Answer;
use formcore::models::choice::RankedChoice;
use formcore::models::question::{Question, QuestionType};
use formcore::Answerable;
use serde_json::json;
use uuid::Uuid;

/// Helper to build a question row with inline metadata.
fn question(question_type: QuestionType, metadata: Option<serde_json::Value>) -> Question {
    Question {
        id: Uuid::new_v4(),
        section_id: Uuid::new_v4(),
        question_type,
        title: "How do you feel about this?".to_string(),
        description: None,
        required: false,
        metadata: metadata.map(|value| serde_json::to_vec(&value).unwrap()),
        source_id: None,
        order: 1,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn build(question: Question) -> Answerable {
    Answerable::for_question(question, Uuid::new_v4(), &IconSet::bundled())
        .expect("variant should build")
}

/// Three fixed choices A, B, C.
fn choice_metadata(ids: &[Uuid; 3]) -> serde_json::Value {
    json!({
        "choice": {
            "choices": [
                { "id": ids[0], "name": "Alpha", "description": "first" },
                { "id": ids[1], "name": "Beta", "description": "" },
                { "id": ids[2], "name": "Gamma", "description": "" },
            ]
        }
    })
}

#[test]
fn short_text_round_trips_and_displays() {
    // Arrange
    let answerable = build(question(QuestionType::ShortText, None));
    let wire = serde_json::to_vec(&json!("blue")).unwrap();

    // Act
    let decoded = answerable.decode_request(&wire).unwrap();
    let encoded = answerable.encode_request(&decoded).unwrap();
    let stored = answerable.encode_storage(&decoded).unwrap();
    let reread = answerable.decode_storage(&encoded).unwrap();

    // Assert
    assert_eq!(encoded, wire);
    assert_eq!(reread, decoded);
    assert_eq!(answerable.display_value(&stored).unwrap(), "blue");
}

#[test]
fn short_text_rejects_over_100_chars() {
    let answerable = build(question(QuestionType::ShortText, None));
    let wire = serde_json::to_vec(&"x".repeat(101)).unwrap();

    let err = answerable.validate(&wire).unwrap_err();

    assert!(matches!(
        err,
        AppError::InvalidAnswerLength { length: 101, max: 100, .. }
    ));
}

#[test]
fn long_text_display_is_truncated_with_ellipsis() {
    let answerable = build(question(QuestionType::LongText, None));
    let value = "y".repeat(250);
    let stored = serde_json::to_vec(&json!({ "value": value })).unwrap();

    let display = answerable.display_value(&stored).unwrap();

    assert_eq!(display.chars().count(), 103);
    assert!(display.ends_with("..."));
    // Pattern matching works on the full value, not the truncated display.
    assert!(answerable.matches_pattern(&stored, "^y{250}$").unwrap());
}

#[test]
fn required_text_rejects_blank_answer() {
    let mut q = question(QuestionType::ShortText, None);
    q.required = true;
    let answerable = build(q);

    let err = answerable
        .validate(&serde_json::to_vec(&json!("  ")).unwrap())
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidAnswer { .. }));
}

#[test]
fn hyperlink_without_scheme_is_rejected() {
    let answerable = build(question(QuestionType::Hyperlink, None));

    let err = answerable
        .validate(&serde_json::to_vec(&json!("example.com")).unwrap())
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidHyperlinkFormat { .. }));
}

#[test]
fn hyperlink_accepts_https_with_host() {
    let answerable = build(question(QuestionType::Hyperlink, None));

    let result = answerable.validate(&serde_json::to_vec(&json!("https://example.com/x")).unwrap());

    assert!(result.is_ok());
}

#[test]
fn single_choice_rejects_double_select() {
    // Arrange: metadata choices [Alpha, Beta, Gamma]; request carries two IDs.
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let answerable = build(question(
        QuestionType::SingleChoice,
        Some(choice_metadata(&ids)),
    ));
    let wire = serde_json::to_vec(&json!([ids[0], ids[1]])).unwrap();

    // Act
    let err = answerable.decode_request(&wire).unwrap_err();

    // Assert: error, no DTO produced.
    assert!(matches!(err, AppError::InvalidAnswer { .. }));
}

#[test]
fn single_choice_snapshots_the_selected_choice() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let answerable = build(question(
        QuestionType::SingleChoice,
        Some(choice_metadata(&ids)),
    ));
    let wire = serde_json::to_vec(&json!([ids[0]])).unwrap();

    let decoded = answerable.decode_request(&wire).unwrap();
    let stored = answerable.encode_storage(&decoded).unwrap();

    let Answer::SingleChoice(answer) = &decoded else {
        panic!("wrong DTO arm");
    };
    let choice = answer.choice.as_ref().unwrap();
    assert_eq!(choice.name, "Alpha");
    assert_eq!(choice.description, "first");
    assert_eq!(answerable.display_value(&stored).unwrap(), "Alpha");
}

#[test]
fn unknown_choice_id_is_rejected_with_context() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let q = question(QuestionType::MultipleChoice, Some(choice_metadata(&ids)));
    let question_id = q.id;
    let answerable = build(q);
    let stranger = Uuid::new_v4();

    let err = answerable
        .decode_request(&serde_json::to_vec(&json!([ids[0], stranger])).unwrap())
        .unwrap_err();

    match err {
        AppError::InvalidChoiceId {
            question_id: qid,
            choice_id,
        } => {
            assert_eq!(qid, question_id);
            assert_eq!(choice_id, stranger.to_string());
        }
        other => panic!("expected InvalidChoiceId, got {other}"),
    }
}

#[test]
fn multiple_choice_round_trip_keeps_display_value() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let answerable = build(question(
        QuestionType::MultipleChoice,
        Some(choice_metadata(&ids)),
    ));
    let wire = serde_json::to_vec(&json!([ids[2], ids[0]])).unwrap();

    let decoded = answerable.decode_request(&wire).unwrap();
    let encoded = answerable.encode_request(&decoded).unwrap();
    let reread = answerable.decode_storage(&encoded).unwrap();

    assert_eq!(
        answerable.encode_storage(&reread).unwrap(),
        answerable.encode_storage(&decoded).unwrap()
    );
    assert_eq!(answerable.display_value(&encoded).unwrap(), "Gamma, Alpha");
}

#[test]
fn ranking_assigns_ranks_from_array_position() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let answerable = build(question(QuestionType::Ranking, Some(choice_metadata(&ids))));
    let wire = serde_json::to_vec(&json!([ids[1], ids[2], ids[0]])).unwrap();

    let decoded = answerable.decode_request(&wire).unwrap();

    let Answer::Ranking(answer) = &decoded else {
        panic!("wrong DTO arm");
    };
    let ranks: Vec<(String, u32)> = answer
        .choices
        .iter()
        .map(|c| (c.name.clone(), c.rank))
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("Beta".to_string(), 1),
            ("Gamma".to_string(), 2),
            ("Alpha".to_string(), 3)
        ]
    );
}

#[test]
fn ranking_encode_is_canonical_by_rank() {
    // Arrange: a DTO whose internal array order drifted away from the ranks.
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let answerable = build(question(QuestionType::Ranking, Some(choice_metadata(&ids))));
    let answer = Answer::Ranking(formcore::models::answer::RankingAnswer {
        choices: vec![
            RankedChoice {
                id: ids[2],
                name: "Gamma".to_string(),
                description: String::new(),
                rank: 3,
            },
            RankedChoice {
                id: ids[0],
                name: "Alpha".to_string(),
                description: String::new(),
                rank: 1,
            },
            RankedChoice {
                id: ids[1],
                name: "Beta".to_string(),
                description: String::new(),
                rank: 2,
            },
        ],
    });

    // Act
    let encoded = answerable.encode_request(&answer).unwrap();

    // Assert: IDs ascending by rank, regardless of array order.
    let id_list: Vec<String> = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(
        id_list,
        vec![ids[0].to_string(), ids[1].to_string(), ids[2].to_string()]
    );
}

#[test]
fn scale_boundaries_are_inclusive() {
    let metadata = json!({ "scale": { "minVal": 2, "maxVal": 8 } });
    let answerable = build(question(QuestionType::LinearScale, Some(metadata)));

    for value in [2, 8] {
        assert!(
            answerable
                .validate(&serde_json::to_vec(&json!(value)).unwrap())
                .is_ok(),
            "{value} should be accepted"
        );
    }
    for value in [1, 9] {
        let err = answerable
            .validate(&serde_json::to_vec(&json!(value)).unwrap())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidScaleValue { .. }));
    }
}

#[test]
fn scale_rejects_float_input() {
    let metadata = json!({ "scale": { "minVal": 1, "maxVal": 5 } });
    let answerable = build(question(QuestionType::LinearScale, Some(metadata)));

    let err = answerable
        .validate(&serde_json::to_vec(&json!(3.5)).unwrap())
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidAnswer { .. }));
}

#[test]
fn rating_round_trips_through_storage() {
    let metadata = json!({ "scale": { "minVal": 1, "maxVal": 5, "icon": "star" } });
    let answerable = build(question(QuestionType::Rating, Some(metadata)));
    let wire = serde_json::to_vec(&json!(4)).unwrap();

    let decoded = answerable.decode_request(&wire).unwrap();
    let stored = answerable.encode_storage(&decoded).unwrap();

    assert_eq!(stored, serde_json::to_vec(&json!({ "value": 4 })).unwrap());
    assert_eq!(answerable.display_value(&stored).unwrap(), "4");
    assert!(answerable.matches_pattern(&stored, "^4$").unwrap());
}

#[test]
fn date_partial_precision_drops_the_day() {
    // Arrange: year+month question.
    let metadata = json!({ "date": { "hasYear": true, "hasMonth": true, "hasDay": false } });
    let answerable = build(question(QuestionType::Date, Some(metadata)));
    let wire = serde_json::to_vec(&json!("2024-06-15")).unwrap();

    // Act
    let decoded = answerable.decode_request(&wire).unwrap();
    let encoded = answerable.encode_request(&decoded).unwrap();

    // Assert
    let Answer::Date(answer) = &decoded else {
        panic!("wrong DTO arm");
    };
    assert_eq!(answer.year, Some(2024));
    assert_eq!(answer.month, Some(6));
    assert_eq!(answer.day, None);
    let encoded: String = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(encoded, "2024-06-01T00:00:00Z");
}

#[test]
fn date_accepts_rfc3339_and_respects_bounds() {
    let metadata = json!({
        "date": {
            "hasYear": true, "hasMonth": true, "hasDay": true,
            "minDate": "2024-01-01", "maxDate": "2024-12-31"
        }
    });
    let answerable = build(question(QuestionType::Date, Some(metadata)));

    let ok = answerable.validate(&serde_json::to_vec(&json!("2024-06-15T09:30:00Z")).unwrap());
    let out_of_range =
        answerable.validate(&serde_json::to_vec(&json!("2025-01-01")).unwrap());
    let garbage = answerable.validate(&serde_json::to_vec(&json!("June 15th")).unwrap());

    assert!(ok.is_ok());
    assert!(matches!(
        out_of_range.unwrap_err(),
        AppError::InvalidDateFormat { .. }
    ));
    assert!(matches!(
        garbage.unwrap_err(),
        AppError::InvalidDateFormat { .. }
    ));
}

#[test]
fn date_display_renders_present_components() {
    let metadata = json!({ "date": { "hasYear": true, "hasMonth": true, "hasDay": false } });
    let answerable = build(question(QuestionType::Date, Some(metadata)));
    let stored = serde_json::to_vec(&json!({ "year": 2024, "month": 6 })).unwrap();

    assert_eq!(answerable.display_value(&stored).unwrap(), "2024-06");
    assert!(answerable.matches_pattern(&stored, "^2024").unwrap());
}

#[test]
fn upload_file_checks_count_only() {
    let metadata = json!({
        "uploadFile": { "allowedFileTypes": ["image/png"], "maxFileAmount": 2, "maxFileSizeLimit": 1048576 }
    });
    let answerable = build(question(QuestionType::UploadFile, Some(metadata)));
    let file = |name: &str| {
        json!({
            "fileId": Uuid::new_v4(),
            "originalFilename": name,
            "contentType": "image/png",
            "size": 999_999_999u64
        })
    };

    // Oversized files pass here: byte limits belong to the file storage.
    let two = serde_json::to_vec(&json!({ "files": [file("a.png"), file("b.png")] })).unwrap();
    let three =
        serde_json::to_vec(&json!({ "files": [file("a.png"), file("b.png"), file("c.png")] }))
            .unwrap();

    assert!(answerable.validate(&two).is_ok());
    assert!(matches!(
        answerable.validate(&three).unwrap_err(),
        AppError::InvalidAnswer { .. }
    ));
    assert_eq!(answerable.display_value(&two).unwrap(), "a.png, b.png");
}

#[test]
fn pattern_match_is_unsupported_for_files_and_oauth() {
    let upload = build(question(
        QuestionType::UploadFile,
        Some(json!({ "uploadFile": { "maxFileAmount": 1, "maxFileSizeLimit": 1 } })),
    ));
    let oauth = build(question(
        QuestionType::OAuthConnect,
        Some(json!({ "oauthConnect": { "provider": "github" } })),
    ));
    let stored_files = serde_json::to_vec(&json!({ "files": [] })).unwrap();
    let stored_account = serde_json::to_vec(&json!({
        "provider": "github", "providerId": "42", "email": "", "username": "octo"
    }))
    .unwrap();

    // Always an error, never a silent non-match.
    assert!(matches!(
        upload.matches_pattern(&stored_files, ".*").unwrap_err(),
        AppError::PatternMatchUnsupported { .. }
    ));
    assert!(matches!(
        oauth.matches_pattern(&stored_account, ".*").unwrap_err(),
        AppError::PatternMatchUnsupported { .. }
    ));
}

#[test]
fn invalid_pattern_is_a_silent_non_match() {
    let answerable = build(question(QuestionType::ShortText, None));
    let stored = serde_json::to_vec(&json!({ "value": "anything" })).unwrap();

    // Broken workflow condition: non-match, no error.
    assert!(!answerable.matches_pattern(&stored, "(unclosed").unwrap());
    // Corrupt stored data still errors.
    assert!(answerable.matches_pattern(b"{{nonsense", ".*").is_err());
}

#[test]
fn oauth_display_prefers_username_with_email() {
    let answerable = build(question(
        QuestionType::OAuthConnect,
        Some(json!({ "oauthConnect": { "provider": "google" } })),
    ));
    let full = serde_json::to_vec(&json!({
        "provider": "google", "providerId": "1", "email": "a@b.c", "username": "ada"
    }))
    .unwrap();
    let no_email = serde_json::to_vec(&json!({
        "provider": "google", "providerId": "1", "email": "", "username": "ada"
    }))
    .unwrap();
    let no_username = serde_json::to_vec(&json!({
        "provider": "google", "providerId": "1", "email": "a@b.c", "username": ""
    }))
    .unwrap();

    assert_eq!(answerable.display_value(&full).unwrap(), "ada(a@b.c)");
    assert_eq!(answerable.display_value(&no_email).unwrap(), "ada");
    assert_eq!(answerable.display_value(&no_username).unwrap(), "a@b.c");
}

#[test]
fn oauth_rejects_mismatched_provider() {
    let answerable = build(question(
        QuestionType::OAuthConnect,
        Some(json!({ "oauthConnect": { "provider": "google" } })),
    ));
    let wire = serde_json::to_vec(&json!({
        "provider": "github", "providerId": "42", "email": "", "username": "octo"
    }))
    .unwrap();

    assert!(matches!(
        answerable.decode_request(&wire).unwrap_err(),
        AppError::InvalidAnswer { .. }
    ));
}

#[test]
fn encode_request_refuses_a_foreign_dto() {
    // Arrange: a text DTO handed to a scale variant.
    let scale = build(question(
        QuestionType::LinearScale,
        Some(json!({ "scale": { "minVal": 1, "maxVal": 5 } })),
    ));
    let text = build(question(QuestionType::ShortText, None));
    let dto = text
        .decode_request(&serde_json::to_vec(&json!("hi")).unwrap())
        .unwrap();

    // Act
    let err = scale.encode_request(&dto).unwrap_err();

    // Assert
    assert!(matches!(err, AppError::AnswerTypeMismatch { .. }));
}

#[test]
fn dropdown_behaves_like_single_choice() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let answerable = build(question(QuestionType::Dropdown, Some(choice_metadata(&ids))));

    let decoded = answerable
        .decode_request(&serde_json::to_vec(&json!([ids[1]])).unwrap())
        .unwrap();

    assert!(matches!(decoded, Answer::Dropdown(_)));
    let stored = answerable.encode_storage(&decoded).unwrap();
    assert_eq!(answerable.display_value(&stored).unwrap(), "Beta");
}
