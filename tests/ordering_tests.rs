// tests/ordering_tests.rs

use formcore::error::AppError;
use formcore::metadata::IconSet;
use formcore::models::question::{CreateQuestionRequest, UpdateQuestionRequest};
use formcore::store::{MemoryStore, QuestionStore};
use formcore::{Answer, QuestionService};
use serde_json::json;
use uuid::Uuid;

/// Helper to spin up a service with one registered form and section.
fn service() -> (QuestionService<MemoryStore>, Uuid, Uuid) {
    let store = MemoryStore::new();
    let form_id = Uuid::new_v4();
    let section_id = Uuid::new_v4();
    store.register_form(form_id);
    store.register_section(section_id);
    (QuestionService::new(store, IconSet::bundled()), form_id, section_id)
}

fn create_request(section_id: Uuid, title: &str, order: Option<i32>) -> CreateQuestionRequest {
    CreateQuestionRequest {
        section_id,
        question_type: "shortText".to_string(),
        title: title.to_string(),
        description: None,
        required: false,
        source_id: None,
        order,
        metadata: None,
    }
}

/// Collects `(title, order)` pairs of a section, ascending by order.
async fn section_orders(
    service: &QuestionService<MemoryStore>,
    section_id: Uuid,
) -> Vec<(String, i32)> {
    service
        .store()
        .list_by_section(section_id)
        .await
        .unwrap()
        .into_iter()
        .map(|q| (q.title, q.order))
        .collect()
}

#[tokio::test]
async fn create_appends_at_the_tail_by_default() {
    // Arrange
    let (service, form_id, section_id) = service();

    // Act
    for title in ["first", "second", "third"] {
        service
            .create_question(form_id, create_request(section_id, title, None))
            .await
            .unwrap();
    }

    // Assert
    assert_eq!(
        section_orders(&service, section_id).await,
        vec![
            ("first".to_string(), 1),
            ("second".to_string(), 2),
            ("third".to_string(), 3)
        ]
    );
}

#[tokio::test]
async fn create_in_the_middle_shifts_the_rest() {
    let (service, form_id, section_id) = service();
    for title in ["first", "second", "third"] {
        service
            .create_question(form_id, create_request(section_id, title, None))
            .await
            .unwrap();
    }

    let inserted = service
        .create_question(form_id, create_request(section_id, "between", Some(2)))
        .await
        .unwrap();

    assert_eq!(inserted.order, 2);
    assert_eq!(
        section_orders(&service, section_id).await,
        vec![
            ("first".to_string(), 1),
            ("between".to_string(), 2),
            ("second".to_string(), 3),
            ("third".to_string(), 4)
        ]
    );
}

#[tokio::test]
async fn create_clamps_the_requested_order() {
    let (service, form_id, section_id) = service();
    service
        .create_question(form_id, create_request(section_id, "first", None))
        .await
        .unwrap();

    let low = service
        .create_question(form_id, create_request(section_id, "low", Some(-7)))
        .await
        .unwrap();
    let high = service
        .create_question(form_id, create_request(section_id, "high", Some(99)))
        .await
        .unwrap();

    assert_eq!(low.order, 1);
    assert_eq!(high.order, 3);
    assert_eq!(
        section_orders(&service, section_id).await,
        vec![
            ("low".to_string(), 1),
            ("first".to_string(), 2),
            ("high".to_string(), 3)
        ]
    );
}

#[tokio::test]
async fn update_moves_a_question_both_directions() {
    let (service, form_id, section_id) = service();
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        let q = service
            .create_question(form_id, create_request(section_id, title, None))
            .await
            .unwrap();
        ids.push(q.id);
    }

    // Move "d" up to position 2.
    service
        .update_question(
            ids[3],
            UpdateQuestionRequest {
                title: None,
                description: None,
                required: None,
                order: Some(2),
                metadata: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        section_orders(&service, section_id).await,
        vec![
            ("a".to_string(), 1),
            ("d".to_string(), 2),
            ("b".to_string(), 3),
            ("c".to_string(), 4)
        ]
    );

    // Move "a" down to the tail.
    service
        .update_question(
            ids[0],
            UpdateQuestionRequest {
                title: None,
                description: None,
                required: None,
                order: Some(4),
                metadata: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        section_orders(&service, section_id).await,
        vec![
            ("d".to_string(), 1),
            ("b".to_string(), 2),
            ("c".to_string(), 3),
            ("a".to_string(), 4)
        ]
    );
}

#[tokio::test]
async fn delete_compacts_the_order_index() {
    let (service, form_id, section_id) = service();
    let mut ids = Vec::new();
    for title in ["a", "b", "c"] {
        let q = service
            .create_question(form_id, create_request(section_id, title, None))
            .await
            .unwrap();
        ids.push(q.id);
    }

    service.delete_question(ids[1]).await.unwrap();

    // No gap: "c" slid from 3 to 2.
    assert_eq!(
        section_orders(&service, section_id).await,
        vec![("a".to_string(), 1), ("c".to_string(), 2)]
    );
}

#[tokio::test]
async fn create_rejects_unknown_section_and_type() {
    let (service, form_id, section_id) = service();

    let bad_section = service
        .create_question(form_id, create_request(Uuid::new_v4(), "q", None))
        .await
        .unwrap_err();
    let mut bad_type = create_request(section_id, "q", None);
    bad_type.question_type = "telepathy".to_string();
    let bad_type = service.create_question(form_id, bad_type).await.unwrap_err();

    assert!(matches!(bad_section, AppError::NotFound(_)));
    assert!(matches!(bad_type, AppError::UnsupportedQuestionType(_)));
}

#[tokio::test]
async fn source_question_choices_are_borrowed() {
    // Arrange: a single-choice question owning two choices.
    let (service, form_id, section_id) = service();
    let mut owner = create_request(section_id, "owner", None);
    owner.question_type = "singleChoice".to_string();
    owner.metadata = Some(json!({
        "choice": { "choices": [{ "name": "Yes" }, { "name": "No" }] }
    }));
    let owner = service.create_question(form_id, owner).await.unwrap();

    let mut borrower = create_request(section_id, "borrower", None);
    borrower.question_type = "dropdown".to_string();
    borrower.source_id = Some(owner.id);
    let borrower = service.create_question(form_id, borrower).await.unwrap();
    assert!(borrower.metadata.is_none());

    // Act: answer the borrower with one of the owner's choice IDs.
    let owner_envelope: serde_json::Value =
        serde_json::from_slice(owner.metadata.as_deref().unwrap()).unwrap();
    let yes_id = owner_envelope["choice"]["choices"][0]["id"].as_str().unwrap().to_string();
    let answerable = service.load_answerable(borrower.id, form_id).await.unwrap();
    let decoded = answerable
        .decode_request(&serde_json::to_vec(&json!([yes_id])).unwrap())
        .unwrap();

    // Assert: the snapshot came from the source's choice set.
    let Answer::Dropdown(answer) = decoded else {
        panic!("wrong DTO arm");
    };
    assert_eq!(answer.choice.unwrap().name, "Yes");
}

#[tokio::test]
async fn source_on_a_non_choice_type_is_rejected() {
    let (service, form_id, section_id) = service();
    let mut owner = create_request(section_id, "owner", None);
    owner.question_type = "singleChoice".to_string();
    owner.metadata = Some(json!({ "choice": { "choices": [{ "name": "Yes" }] } }));
    let owner = service.create_question(form_id, owner).await.unwrap();

    let mut borrower = create_request(section_id, "borrower", None);
    borrower.source_id = Some(owner.id);
    let err = service.create_question(form_id, borrower).await.unwrap_err();

    assert!(matches!(err, AppError::MetadataValidate(_)));
}

#[tokio::test]
async fn source_with_inline_metadata_is_rejected() {
    let (service, form_id, section_id) = service();
    let mut owner = create_request(section_id, "owner", None);
    owner.question_type = "singleChoice".to_string();
    owner.metadata = Some(json!({ "choice": { "choices": [{ "name": "Yes" }] } }));
    let owner = service.create_question(form_id, owner).await.unwrap();

    let mut borrower = create_request(section_id, "borrower", None);
    borrower.question_type = "ranking".to_string();
    borrower.source_id = Some(owner.id);
    borrower.metadata = Some(json!({ "choice": { "choices": [{ "name": "Own" }] } }));
    let err = service.create_question(form_id, borrower).await.unwrap_err();

    assert!(matches!(err, AppError::MetadataValidate(_)));
}

#[tokio::test]
async fn update_regenerates_metadata() {
    let (service, form_id, section_id) = service();
    let mut request = create_request(section_id, "scale", None);
    request.question_type = "linearScale".to_string();
    request.metadata = Some(json!({ "scale": { "minVal": 1, "maxVal": 5 } }));
    let created = service.create_question(form_id, request).await.unwrap();

    let updated = service
        .update_question(
            created.id,
            UpdateQuestionRequest {
                title: Some("wider scale".to_string()),
                description: None,
                required: None,
                order: None,
                metadata: Some(json!({ "scale": { "minVal": 1, "maxVal": 10 } })),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "wider scale");
    let envelope: serde_json::Value =
        serde_json::from_slice(updated.metadata.as_deref().unwrap()).unwrap();
    assert_eq!(envelope["scale"]["maxVal"], 10);
}
