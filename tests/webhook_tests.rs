use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hookbot::api::Api;
use hookbot::dispatch::Bot;
use hookbot::types::BotIdentity;
use hookbot::webhook;
use tower::ServiceExt;

fn update_body(text: &str) -> String {
    format!(
        r#"{{
            "update_id": 1,
            "message": {{
                "message_id": 10,
                "from": {{"id": 7, "first_name": "Ada"}},
                "chat": {{"id": 99, "type": "private"}},
                "date": 1700000000,
                "text": "{text}"
            }}
        }}"#
    )
}

fn post(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// The receiver acknowledges with an empty 200 even when the update is
/// dropped by the readiness gate.
#[tokio::test]
async fn dropped_update_still_gets_a_200() {
    let bot = Arc::new(Bot::new(Api::new("TOKEN")));
    let app = webhook::router(bot);

    let response = app.oneshot(post(update_body("hello"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn processed_update_gets_a_200_and_reaches_the_dispatcher() {
    let mut bot = Bot::new(Api::new("TOKEN"));
    let calls = Arc::new(AtomicUsize::new(0));

    let sink = calls.clone();
    bot.on_plain_text(move |_ctx, _text| {
        let calls = sink.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });
    bot.mark_ready(BotIdentity {
        id: 1,
        username: "testbot".to_string(),
    });

    let app = webhook::router(Arc::new(bot));
    let response = app.oneshot(post(update_body("hello"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
