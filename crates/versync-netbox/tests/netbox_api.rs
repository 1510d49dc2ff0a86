//! Integration tests against a local NetBox stand-in served by axum

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch};
use serde_json::{Value, json};

use versync_netbox::{DeviceFilter, Inventory, NetboxClient, NetboxError};

const TOKEN: &str = "test-token";
const TOTAL_DEVICES: u64 = 614;
const PAGE_LIMIT: u64 = 300;

struct ServerState {
    base: String,
}

fn device_json(id: u64) -> Value {
    json!({
        "id": id,
        "display": format!("dev-{id}"),
        "primary_ip": {"address": format!("10.{}.{}.1/24", id / 250, id % 250)},
        "platform": {"slug": "cisco_ios"},
        "custom_fields": {"sw_version": null}
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Token {TOKEN}"))
}

async fn list_devices(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"detail": "Invalid token"})));
    }

    assert_eq!(params.get("status").map(String::as_str), Some("active"));
    assert_eq!(params.get("tenant").map(String::as_str), Some("noc"));

    let offset: u64 = params
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let end = (offset + PAGE_LIMIT).min(TOTAL_DEVICES);

    let results: Vec<Value> = (offset..end).map(device_json).collect();
    let next = if end < TOTAL_DEVICES {
        Some(format!(
            "{}/api/dcim/devices/?status=active&tenant=noc&limit={PAGE_LIMIT}&offset={end}",
            state.base
        ))
    } else {
        None
    };

    (
        StatusCode::OK,
        Json(json!({
            "count": TOTAL_DEVICES,
            "next": next,
            "results": results
        })),
    )
}

async fn update_device(
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"detail": "Invalid token"})));
    }

    assert!(payload["custom_fields"]["sw_version"].is_string());

    // Sentinel id simulating a write rejected by NetBox
    if id == 9999 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "sw_version: Unknown field name"})),
        );
    }

    (StatusCode::OK, Json(json!({"id": id})))
}

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{addr}");

    let state = Arc::new(ServerState { base: base.clone() });
    let app = Router::new()
        .route("/api/dcim/devices/", get(list_devices))
        .route("/api/dcim/devices/{id}/", patch(update_device))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

#[tokio::test]
async fn test_pagination_materializes_all_pages() {
    let base = spawn_server().await;
    let client = NetboxClient::new(&base, TOKEN).unwrap();

    let devices = client.list_devices(&DeviceFilter::default()).await.unwrap();

    // Three pages of 300/300/14
    assert_eq!(devices.len(), TOTAL_DEVICES as usize);
    assert_eq!(devices[0].display, "dev-0");
    assert_eq!(devices[613].display, "dev-613");
}

#[tokio::test]
async fn test_update_sw_version_success() {
    let base = spawn_server().await;
    let client = NetboxClient::new(&base, TOKEN).unwrap();

    client.update_sw_version(17, "15.2(4)M6").await.unwrap();
}

#[tokio::test]
async fn test_update_sw_version_non_200_is_api_error() {
    let base = spawn_server().await;
    let client = NetboxClient::new(&base, TOKEN).unwrap();

    let err = client.update_sw_version(9999, "1.0").await.unwrap_err();

    match err {
        NetboxError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("Unknown field name"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_token_is_fatal_fetch_error() {
    let base = spawn_server().await;
    let client = NetboxClient::new(&base, "wrong-token").unwrap();

    let err = client
        .list_devices(&DeviceFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NetboxError::Api { status: 403, .. }));
}
