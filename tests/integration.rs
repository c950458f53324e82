use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use poobel_store::api::rest::router;
use poobel_store::config::ChatTiming;
use poobel_store::persistence::{FileStorage, MemoryStorage};
use poobel_store::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn setup() -> axum::Router {
    router(Arc::new(AppState::in_memory(1024)))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_seed_counts() {
    let app = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["drivers"], 4);
    assert_eq!(body["customers"], 6);
    assert_eq!(body["routes"], 3);
    assert_eq!(body["stops"], 8);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let app = setup();

    app.clone()
        .oneshot(json_request(
            "PATCH",
            "/drivers/driver-2/status",
            json!({"status": "offline"}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("store_mutations_total"));
    assert!(body.contains("update_driver_status"));
}

#[tokio::test]
async fn driver_status_and_location_updates_are_visible() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/drivers/driver-4/status",
            json!({"status": "available"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "available");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/drivers/driver-4/location",
            json!({"location": {"lat": 37.79, "lng": -122.41}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/drivers")).await.unwrap();
    let drivers = body_json(response).await;
    let emily = drivers
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"] == "driver-4")
        .unwrap();
    assert_eq!(emily["status"], "available");
    assert_eq!(emily["current_location"]["lat"], 37.79);
    assert_eq!(emily["current_location"]["lng"], -122.41);
}

#[tokio::test]
async fn out_of_range_location_is_rejected() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "PATCH",
            "/drivers/driver-1/location",
            json!({"location": {"lat": 120.0, "lng": 0.0}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_return_not_found() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/drivers/nonexistent/status",
            json!({"status": "offline"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("nonexistent"));

    let response = app
        .clone()
        .oneshot(empty_request("PATCH", "/notifications/notif-404/read"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get_request("/routes/route-404/stops"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("POST", "/stops/stop-404/complete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn added_stop_appears_on_its_route() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/stops",
            json!({
                "route_id": "route-2",
                "customer_id": "customer-3",
                "scheduled_time": "11:15"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stop = body_json(response).await;
    assert_eq!(stop["status"], "pending");
    assert_eq!(stop["sequence"], 3);
    let stop_id = stop["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request("/routes/route-2/stops"))
        .await
        .unwrap();
    let stops = body_json(response).await;
    let ids: Vec<&str> = stops
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["stop-5", "stop-6", stop_id.as_str()]);

    let response = app
        .oneshot(empty_request("DELETE", &format!("/stops/{stop_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_scheduled_time_is_rejected() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/stops",
            json!({
                "route_id": "route-2",
                "customer_id": "customer-3",
                "scheduled_time": "quarter past eleven"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completing_a_stop_twice_conflicts() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/stops/stop-3/complete",
            json!({"photo_url": "https://example.com/bin.jpg"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stop = body_json(response).await;
    assert_eq!(stop["status"], "completed");
    assert_eq!(stop["photo_url"], "https://example.com/bin.jpg");
    assert!(stop["actual_time"].is_string());

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/stops/stop-3/complete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.oneshot(get_request("/drivers")).await.unwrap();
    let drivers = body_json(response).await;
    assert_eq!(drivers[0]["id"], "driver-1");
    assert_eq!(drivers[0]["completed_stops"], 2);
}

#[tokio::test]
async fn review_updates_driver_rating() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/reviews",
            json!({
                "customer_id": "customer-1",
                "driver_id": "driver-2",
                "stop_id": "stop-5",
                "rating": 1,
                "comment": "Bins left in the street"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/drivers/driver-2/ratings"))
        .await
        .unwrap();
    let breakdown = body_json(response).await;
    assert_eq!(breakdown["rating"], 3.0);
    assert_eq!(breakdown["total_ratings"], 3);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/reviews",
            json!({
                "customer_id": "customer-1",
                "driver_id": "driver-2",
                "stop_id": "stop-5",
                "rating": 6
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_home_follows_a_pickup_to_completion() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(get_request("/customers/customer-6/home"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let home = body_json(response).await;
    assert_eq!(home["state"]["state"], "no_upcoming_service");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/stops",
            json!({
                "route_id": "route-1",
                "customer_id": "customer-6",
                "scheduled_time": "10:00"
            }),
        ))
        .await
        .unwrap();
    let stop_id = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(get_request("/customers/customer-6/home"))
        .await
        .unwrap();
    let home = body_json(response).await;
    assert_eq!(home["state"]["state"], "tracking");
    assert_eq!(home["state"]["stop"]["id"], stop_id.as_str());

    app.clone()
        .oneshot(empty_request("POST", &format!("/stops/{stop_id}/complete")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/customers/customer-6/home"))
        .await
        .unwrap();
    let home = body_json(response).await;
    assert_eq!(home["state"]["state"], "completed");
    assert_eq!(home["state"]["can_review"], true);

    let response = app
        .oneshot(get_request("/customers/customer-6/notifications"))
        .await
        .unwrap();
    let notifications = body_json(response).await;
    let completed = notifications
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["type"] == "completed")
        .unwrap();
    assert_eq!(completed["data"]["stopId"], stop_id.as_str());
    assert_eq!(completed["data"]["canReview"], true);
}

#[tokio::test]
async fn marking_notification_read_is_idempotent() {
    let app = setup();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(empty_request("PATCH", "/notifications/notif-1/read"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app.oneshot(get_request("/notifications")).await.unwrap();
    let notifications = body_json(response).await;
    let notif = notifications
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "notif-1")
        .unwrap();
    assert_eq!(notif["read"], true);
}

#[tokio::test]
async fn chat_message_gets_an_assistant_reply() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/chat",
            json!({"customer_id": "customer-3", "content": "When is my next pickup?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let exchange = body_json(response).await;
    assert_eq!(exchange["message"]["role"], "user");
    let thread_id = exchange["thread_id"].as_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = app
        .oneshot(get_request("/chat/threads?customer_id=customer-3"))
        .await
        .unwrap();
    let threads = body_json(response).await;
    let threads = threads.as_array().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["id"], thread_id.as_str());

    let messages = threads[0]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["role"], "assistant");
    assert!(
        messages[1]["content"]
            .as_str()
            .unwrap()
            .starts_with("Your next pickup")
    );
}

#[tokio::test]
async fn blank_chat_message_is_rejected() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/chat",
            json!({"customer_id": "customer-3", "content": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_restores_the_seed() {
    let app = setup();

    app.clone()
        .oneshot(empty_request("DELETE", "/stops/stop-8"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/reset"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(body_json(response).await["stops"], 8);
}

#[tokio::test]
async fn dispatch_overview_reflects_completions() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(get_request("/dispatch/overview"))
        .await
        .unwrap();
    let before = body_json(response).await;
    assert_eq!(before["completed_stops"], 2);
    assert_eq!(before["pending_stops"], 5);

    app.clone()
        .oneshot(empty_request("POST", "/stops/stop-8/complete"))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/dispatch/overview")).await.unwrap();
    let after = body_json(response).await;
    assert_eq!(after["completed_stops"], 3);
    assert_eq!(after["pending_stops"], 4);
}

#[tokio::test]
async fn mutations_survive_a_restart_with_shared_storage() {
    let storage = Arc::new(MemoryStorage::new());

    let first = router(Arc::new(AppState::new(
        storage.clone(),
        "poobel-storage",
        16,
        ChatTiming::immediate(),
    )));
    first
        .oneshot(json_request(
            "PUT",
            "/drivers/current",
            json!({"driver_id": "driver-3"}),
        ))
        .await
        .unwrap();

    let second = router(Arc::new(AppState::new(
        storage,
        "poobel-storage",
        16,
        ChatTiming::immediate(),
    )));
    let response = second.oneshot(get_request("/drivers/current")).await.unwrap();
    assert_eq!(body_json(response).await["id"], "driver-3");
}

#[tokio::test]
async fn file_storage_snapshot_is_restored() {
    let dir = tempfile::tempdir().unwrap();

    let first = router(Arc::new(AppState::new(
        Arc::new(FileStorage::new(dir.path()).unwrap()),
        "poobel-storage",
        16,
        ChatTiming::immediate(),
    )));
    first
        .oneshot(json_request(
            "PATCH",
            "/alerts/alert-1/resolve",
            json!({}),
        ))
        .await
        .unwrap();

    let second = router(Arc::new(AppState::new(
        Arc::new(FileStorage::new(dir.path()).unwrap()),
        "poobel-storage",
        16,
        ChatTiming::immediate(),
    )));
    let response = second.oneshot(get_request("/alerts")).await.unwrap();
    let alerts = body_json(response).await;
    let alert = alerts
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == "alert-1")
        .unwrap();
    assert_eq!(alert["resolved"], true);
}
