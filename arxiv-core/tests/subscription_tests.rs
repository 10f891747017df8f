use std::time::{Duration, Instant};

use arxiv_core::subscription::GENERIC_FAILURE;
use arxiv_core::{
    submit_subscription, ApiClient, ApiError, FormError, Notice, PushTime, SubscriptionForm,
    TopicCode,
};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn filled_form() -> SubscriptionForm {
    let mut form = SubscriptionForm::default();
    form.email = " reader@example.com ".into();
    form.query = "graph neural networks".into();
    form.select_topic(TopicCode::MachineLearning);
    form
}

#[test]
fn selecting_a_second_topic_replaces_the_first() {
    let mut form = SubscriptionForm::default();
    form.select_topic(TopicCode::ArtificialIntelligence);
    form.select_topic(TopicCode::Robotics);
    assert_eq!(form.topic(), Some(TopicCode::Robotics));

    form.toggle_topic(TopicCode::ComputerVision);
    assert_eq!(form.topic(), Some(TopicCode::ComputerVision));
    form.toggle_topic(TopicCode::ComputerVision);
    assert_eq!(form.topic(), None);
}

#[test]
fn defaults_to_nine_oclock() {
    let form = SubscriptionForm::default();
    assert_eq!(form.push_time().unwrap().to_string(), "09:00");
}

#[test]
fn any_missing_field_blocks_submission() {
    let cases: [(&str, fn(&mut SubscriptionForm)); 5] = [
        ("email", |f| f.email = "   ".into()),
        ("topic", |f| f.clear_topic()),
        ("query", |f| f.query.clear()),
        ("hour", |f| f.hour = None),
        ("minute", |f| f.minute = None),
    ];
    for (field, clear) in cases {
        let mut form = filled_form();
        assert!(form.can_submit());
        clear(&mut form);
        assert!(!form.can_submit(), "{field} missing should disable submit");
        assert_eq!(form.missing_fields(), vec![field]);
        assert_eq!(form.begin_submit(), Err(FormError::Incomplete(vec![field])));
        assert!(!form.is_submitting());
    }
}

#[test]
fn begin_submit_builds_trimmed_single_topic_request() {
    let mut form = filled_form();
    form.hour = Some(18);
    form.minute = Some(30);

    let request = form.begin_submit().unwrap();

    assert_eq!(request.email, "reader@example.com");
    assert_eq!(request.topics, vec![TopicCode::MachineLearning]);
    assert_eq!(request.query_content, "graph neural networks");
    assert_eq!(request.push_time, PushTime::new(18, 30).unwrap());
    assert!(form.is_submitting());
    assert!(!form.can_submit());
    assert_eq!(form.begin_submit(), Err(FormError::Busy));
}

#[test]
fn success_notice_expires_after_its_duration() {
    let mut form = filled_form();
    form.begin_submit().unwrap();
    let start = Instant::now();
    form.finish_submit(Ok(()), start);

    assert!(matches!(form.notice(), Some(Notice::Success { .. })));
    assert_eq!(
        form.tick(start + Duration::from_millis(2999)),
        Some(Duration::from_millis(1))
    );
    assert!(form.notice().is_some());
    assert_eq!(form.tick(start + Duration::from_millis(3000)), None);
    assert!(form.notice().is_none());
}

#[test]
fn failure_notice_stays_until_dismissed() {
    let mut form = filled_form();
    form.begin_submit().unwrap();
    let now = Instant::now();
    form.finish_submit(
        Err(ApiError::Rejected {
            message: "Database error".into(),
        }),
        now,
    );

    assert!(!form.is_submitting());
    assert_eq!(form.notice(), Some(&Notice::Error("Database error".into())));
    form.tick(now + Duration::from_secs(60));
    assert!(form.notice().is_some());
    form.dismiss_notice();
    assert!(form.notice().is_none());
}

#[test]
fn empty_error_message_uses_generic_text() {
    let mut form = filled_form();
    form.begin_submit().unwrap();
    form.finish_submit(
        Err(ApiError::Rejected {
            message: String::new(),
        }),
        Instant::now(),
    );
    assert_eq!(form.notice(), Some(&Notice::Error(GENERIC_FAILURE.into())));
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_base_url(Client::new(), &format!("{}/api", server.uri())).unwrap()
}

#[tokio::test]
async fn submission_sends_confirmation_after_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/subscribe_success"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = filled_form().build_request().unwrap();
    submit_subscription(&client_for(&server), &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_submission_skips_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search-request"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Database error: duplicate" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/subscribe_success"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let request = filled_form().build_request().unwrap();
    let err = submit_subscription(&client_for(&server), &request)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Database error: duplicate");
}

#[tokio::test]
async fn confirmation_failure_fails_the_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/subscribe_success"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "smtp down" })))
        .mount(&server)
        .await;

    let request = filled_form().build_request().unwrap();
    let err = submit_subscription(&client_for(&server), &request)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "smtp down");
}

#[tokio::test]
async fn validation_error_list_is_rejected_with_fallback_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search-request"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                { "loc": ["body", "email"], "msg": "field required", "type": "value_error.missing" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/subscribe_success"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let request = filled_form().build_request().unwrap();
    let err = submit_subscription(&client_for(&server), &request)
        .await
        .unwrap_err();

    match err {
        ApiError::Rejected { message } => {
            assert_eq!(message, "Subscription request was not accepted")
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn reply_that_is_not_an_object_counts_as_not_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["success"])))
        .mount(&server)
        .await;

    let request = filled_form().build_request().unwrap();
    let err = submit_subscription(&client_for(&server), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Rejected { .. }), "got {err:?}");
}
