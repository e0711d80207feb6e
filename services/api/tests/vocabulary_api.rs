//! End-to-end checks of the HTTP surface against the in-memory store.

use api_lib::{
    adapters::InMemoryItemStore,
    config::Config,
    web::{api_router, state::AppState},
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vocabulary_core::{
    domain::{Translation, VocabularyRecord},
    ports::{ItemStore, PortError, PortResult, TranslationService},
};

struct StubTranslator;

#[async_trait]
impl TranslationService for StubTranslator {
    async fn translate(&self, text: &str) -> PortResult<Translation> {
        if text == "σφάλμα" {
            return Err(PortError::Unexpected("upstream down".to_string()));
        }
        Ok(Translation {
            original: text.to_string(),
            translation: format!("<{}>", text),
            alternatives: vec!["alt".to_string()],
        })
    }
}

fn app_with(store: Arc<InMemoryItemStore>) -> Router {
    let config = Config::from_lookup(|_| None).unwrap();
    let state = AppState::new(store, Arc::new(StubTranslator), Arc::new(config));
    api_router(Arc::new(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn learned(id: &str, count: u32, days_since_review: i64) -> VocabularyRecord {
    let now = Utc::now();
    VocabularyRecord {
        review_count: count,
        last_reviewed: Some(now - Duration::days(days_since_review)),
        ..VocabularyRecord::new(
            id,
            format!("λέξη {id}"),
            format!("word {id}"),
            now - Duration::days(60),
        )
    }
}

#[tokio::test]
async fn saving_a_known_word_refreshes_it() {
    let app = app_with(Arc::new(InMemoryItemStore::new()));

    let (status, created) = post(
        &app,
        "/vocabulary",
        json!({ "original": "Καλημέρα", "translation": "good morning", "videoId": "abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["reviewCount"], 0);
    assert!(created.get("lastReviewed").is_none());

    let (status, refreshed) = send(
        &app,
        Method::POST,
        "/vocabulary",
        Some(json!({ "original": "καλημέρα", "translation": "morning greeting" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["id"], created["id"]);
    assert_eq!(refreshed["reviewCount"], 1);
    assert_eq!(refreshed["translation"], "morning greeting");
    assert_eq!(refreshed["videoId"], "abc");

    let (_, all) = send(&app, Method::GET, "/vocabulary", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn saving_without_translation_is_rejected() {
    let app = app_with(Arc::new(InMemoryItemStore::new()));
    let (status, _) = post(&app, "/vocabulary", json!({ "original": "ναι" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_filters_and_rejects_unknown_sort() {
    let store = Arc::new(InMemoryItemStore::with_records([
        learned("1", 1, 0),
        learned("2", 2, 0),
    ]));
    let app = app_with(store);

    let (status, items) = send(&app, Method::GET, "/vocabulary?search=WORD%202", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "2");

    let (status, _) = send(&app, Method::GET, "/vocabulary?sort=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_keeps_schedule_and_delete_removes() {
    let store = Arc::new(InMemoryItemStore::with_records([learned("7", 3, 2)]));
    let app = app_with(store.clone());

    let (status, edited) = send(
        &app,
        Method::PUT,
        "/vocabulary/7",
        Some(json!({ "translation": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["translation"], "edited");
    assert_eq!(edited["reviewCount"], 3);

    let (status, _) = send(&app, Method::DELETE, "/vocabulary/7", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.get("7").await.unwrap().is_none());

    let (status, _) = send(&app, Method::DELETE, "/vocabulary/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/vocabulary/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_queue_reports_stats_and_due_items() {
    let now = Utc::now();
    let store = Arc::new(InMemoryItemStore::with_records([
        VocabularyRecord::new("new", "νέο", "new", now - Duration::days(1)),
        // count 2 waits 7 days; reviewed 10 days ago.
        learned("overdue", 2, 10),
        // count 5 waits 90 days; reviewed yesterday.
        learned("mastered", 5, 1),
    ]));
    let app = app_with(store);

    let (status, queue) = send(&app, Method::GET, "/vocabulary/review", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue["totalItems"], 3);
    assert_eq!(queue["dueItems"], 2);
    assert_eq!(queue["masteredItems"], 1);

    let items = queue["studyItems"].as_array().unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["new", "overdue", "mastered"]);
    assert!(items[0]["dueDate"].is_null());
    assert_eq!(items[2]["isDue"], false);
}

#[tokio::test]
async fn recording_a_review_increments_or_overrides_count() {
    let store = Arc::new(InMemoryItemStore::with_records([learned("3", 1, 5)]));
    let app = app_with(store.clone());

    let (status, updated) = post(&app, "/vocabulary/review", json!({ "id": "3" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["reviewCount"], 2);

    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let (status, updated) = post(
        &app,
        "/vocabulary/review",
        json!({ "id": "3", "reviewCount": 5, "lastReviewed": yesterday }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["reviewCount"], 5);
    assert_eq!(updated["lastReviewed"], yesterday.as_str());

    let (status, _) = post(&app, "/vocabulary/review", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(&app, "/vocabulary/review", json!({ "id": "nope" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn explicit_review_cannot_break_record_invariants() {
    let store = Arc::new(InMemoryItemStore::with_records([learned("4", 2, 3)]));
    let app = app_with(store.clone());

    let (status, _) =
        post(&app, "/vocabulary/review", json!({ "id": "4", "reviewCount": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Added 60 days ago, so a review in 2001 predates it.
    let (status, _) = post(
        &app,
        "/vocabulary/review",
        json!({ "id": "4", "lastReviewed": "2001-01-01T00:00:00Z" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.get("4").await.unwrap().unwrap().review_count, 2);
}

#[tokio::test]
async fn study_session_persists_each_response() {
    let now = Utc::now();
    let store = Arc::new(InMemoryItemStore::with_records([
        VocabularyRecord::new("a", "ένα", "one", now - Duration::days(2)),
        VocabularyRecord::new("b", "δύο", "two", now - Duration::days(1)),
    ]));
    let app = app_with(store.clone());

    let (status, session) = send(&app, Method::POST, "/study/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["total"], 2);
    assert_eq!(session["current"]["id"], "a");
    let id = session["sessionId"].as_str().unwrap().to_string();

    let uri = format!("/study/sessions/{}/responses", id);
    let (status, _) = post(&app, &uri, json!({ "response": "meh" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, answered) = post(&app, &uri, json!({ "response": "good" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answered["updated"]["id"], "a");
    assert_eq!(answered["updated"]["reviewCount"], 1);
    assert_eq!(answered["session"]["current"]["id"], "b");
    assert_eq!(store.get("a").await.unwrap().unwrap().review_count, 1);

    let (_, answered) = post(&app, &uri, json!({ "response": "Again" })).await;
    assert_eq!(answered["session"]["completed"], true);

    let (status, _) = post(&app, &uri, json!({ "response": "easy" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let restart_uri = format!("/study/sessions/{}/restart", id);
    let (status, restarted) = send(&app, Method::POST, &restart_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restarted["position"], 0);
    assert_eq!(restarted["completed"], false);

    let (status, _) = send(
        &app,
        Method::GET,
        "/study/sessions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn start_session(app: &Router) -> String {
    let (status, session) = send(app, Method::POST, "/study/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = session["sessionId"].as_str().unwrap();
    format!("/study/sessions/{}/responses", id)
}

fn two_new_words() -> Arc<InMemoryItemStore> {
    let now = Utc::now();
    Arc::new(InMemoryItemStore::with_records([
        VocabularyRecord::new("a", "ένα", "one", now - Duration::days(2)),
        VocabularyRecord::new("b", "δύο", "two", now - Duration::days(1)),
    ]))
}

#[tokio::test]
async fn answering_a_deleted_item_does_not_resurrect_it() {
    let store = two_new_words();
    let app = app_with(store.clone());
    let uri = start_session(&app).await;

    let (status, _) = send(&app, Method::DELETE, "/vocabulary/a", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = post(&app, &uri, json!({ "response": "good" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.get("a").await.unwrap().is_none());

    let (status, answered) = post(&app, &uri, json!({ "response": "good" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answered["updated"]["id"], "b");
    assert_eq!(answered["session"]["total"], 1);
    assert_eq!(answered["session"]["completed"], true);
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn answering_keeps_changes_made_during_the_session() {
    let store = two_new_words();
    let app = app_with(store.clone());
    let uri = start_session(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/vocabulary/a",
        Some(json!({ "context": "ένα, δύο, τρία" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Saving the word again counts as a review.
    let (status, refreshed) =
        post(&app, "/vocabulary", json!({ "original": "ΈΝΑ", "translation": "a, one" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["reviewCount"], 1);

    let (status, answered) = post(&app, &uri, json!({ "response": "hard" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answered["updated"]["reviewCount"], 2);
    assert_eq!(answered["updated"]["translation"], "a, one");
    assert_eq!(answered["updated"]["context"], "ένα, δύο, τρία");

    let stored = store.get("a").await.unwrap().unwrap();
    assert_eq!(stored.review_count, 2);
    assert_eq!(stored.translation, "a, one");
}

#[tokio::test]
async fn import_then_export_round_trips_collection() {
    let app = app_with(Arc::new(InMemoryItemStore::new()));

    let (status, result) = send(
        &app,
        Method::POST,
        "/vocabulary/import",
        Some(json!([
            { "id": "x1", "original": "σπίτι", "translation": "house", "reviewCount": 4,
              "lastReviewed": "2024-05-01T12:00:00Z", "dateAdded": "2024-04-01T12:00:00Z" },
            { "id": "x2", "original": "νερό", "translation": "water" }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["imported"], 2);

    let (_, exported) = send(&app, Method::GET, "/vocabulary/export", None).await;
    let exported = exported.as_array().unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0]["id"], "x1");
    assert_eq!(exported[0]["reviewCount"], 4);
    assert!(exported[1].get("dateAdded").is_none());

    let (status, _) = send(
        &app,
        Method::POST,
        "/vocabulary/import",
        Some(json!([{ "id": "x3", "original": "", "translation": "nothing" }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn translate_maps_translator_results() {
    let app = app_with(Arc::new(InMemoryItemStore::new()));

    let (status, body) = send(&app, Method::GET, "/translate?text=%CE%BD%CE%B1%CE%B9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original"], "ναι");
    assert_eq!(body["translation"], "<ναι>");
    assert_eq!(body["alternatives"], json!(["alt"]));

    let (status, _) = send(&app, Method::GET, "/translate?text=%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/translate?text=%CF%83%CF%86%CE%AC%CE%BB%CE%BC%CE%B1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn serves_openapi_document() {
    let app = app_with(Arc::new(InMemoryItemStore::new()));
    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/vocabulary/review"].is_object());
    assert!(doc["paths"]["/study/sessions/{id}/responses"].is_object());
}
