use std::time::{Duration, Instant};

use arxiv_core::{ApiClient, Event, FeedState, Notice, SubscriptionForm, TopicCode, Worker};
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn worker_for(server: &MockServer) -> (Worker, UnboundedReceiver<Event>) {
    let api = ApiClient::with_base_url(Client::new(), &format!("{}/api", server.uri())).unwrap();
    Worker::new(api, tokio::runtime::Handle::current())
}

async fn next_event(rx: &mut UnboundedReceiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out")
        .expect("channel closed")
}

fn paper_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "entry_id": format!("http://arxiv.org/abs/{id}"),
        "title": title,
        "abstract": "abstract",
        "category": "cs.AI",
        "publishedAt": "2024-10-21T07:28:00"
    })
}

#[tokio::test]
async fn category_fetch_round_trip_fills_the_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/papers"))
        .and(query_param("category", "cs.AI"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([paper_json("1", "One"), paper_json("2", "Two")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (worker, mut rx) = worker_for(&server);
    let mut feed = FeedState::new(TopicCode::Robotics);
    let ticket = feed.select_category(TopicCode::ArtificialIntelligence);
    worker.fetch_papers(ticket);
    assert!(feed.is_loading());

    match next_event(&mut rx).await {
        Event::PapersLoaded { ticket, result } => {
            assert_eq!(ticket.category, TopicCode::ArtificialIntelligence);
            feed.finish_fetch(ticket.generation, result);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    assert!(!feed.is_loading());
    let titles: Vec<_> = feed.papers().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["One", "Two"]);
}

#[tokio::test]
async fn failed_fetch_leaves_feed_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/papers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .mount(&server)
        .await;

    let (worker, mut rx) = worker_for(&server);
    let mut feed = FeedState::default();
    worker.fetch_papers(feed.initial_fetch());

    let Event::PapersLoaded { ticket, result } = next_event(&mut rx).await else {
        panic!("expected PapersLoaded");
    };
    assert_eq!(result.as_ref().unwrap_err().to_string(), "boom");
    feed.finish_fetch(ticket.generation, result);

    assert!(feed.papers().is_empty());
    assert!(!feed.is_loading());
}

#[tokio::test]
async fn repeated_translate_clicks_send_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/papers/1/translate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(paper_json("1", "一"))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (worker, mut rx) = worker_for(&server);
    let mut feed = FeedState::default();
    let t = feed.initial_fetch();
    let listed = serde_json::from_value(json!([paper_json("1", "One"), paper_json("2", "Two")])).unwrap();
    feed.finish_fetch(t.generation, Ok(listed));
    let id = feed.papers()[0].entry_id.clone();

    for _ in 0..3 {
        if let Some(ticket) = feed.begin_translate(&id) {
            worker.translate(ticket);
        }
    }

    let Event::PaperTranslated { entry_id, result } = next_event(&mut rx).await else {
        panic!("expected PaperTranslated");
    };
    feed.finish_translate(&entry_id, result);

    assert_eq!(feed.papers().len(), 2);
    assert_eq!(feed.papers()[0].title, "一");
    assert!(!feed.is_translating(&id));
    assert!(
        tokio::time::timeout(Duration::from_millis(200), rx.recv()).await.is_err(),
        "no second translation event"
    );
}

#[tokio::test]
async fn subscription_round_trip_shows_success_notice() {
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

    let (worker, mut rx) = worker_for(&server);
    let mut form = SubscriptionForm::default();
    form.email = "reader@example.com".into();
    form.query = "robot grasping".into();
    form.select_topic(TopicCode::Robotics);
    worker.subscribe(form.begin_submit().unwrap());

    let Event::SubscriptionFinished { result } = next_event(&mut rx).await else {
        panic!("expected SubscriptionFinished");
    };
    let now = Instant::now();
    form.finish_submit(result, now);

    assert!(matches!(form.notice(), Some(Notice::Success { .. })));
    form.tick(now + Duration::from_millis(3000));
    assert!(form.notice().is_none());
}
