use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vendordash::application::service::DashboardService;
use vendordash::application::state::UpdatePhase;
use vendordash::config::GatewayConfig;
use vendordash::domain::order::{StatusUpdate, VendorId};
use vendordash::domain::ports::{OrderGateway, OrderScope};
use vendordash::domain::status::ItemStatus;
use vendordash::error::DashboardError;
use vendordash::infrastructure::http::HttpOrderGateway;

/// Requests the fake backend has seen.
#[derive(Clone, Default)]
struct Backend {
    updates: Arc<Mutex<Vec<(String, Value)>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl Backend {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth.lock().unwrap().push(value);
    }
}

fn vendor_orders() -> Value {
    json!([
        {
            "id": 1,
            "order_id": "ORD-001",
            "first_name": "Alice",
            "last_name": "Johnson",
            "subtotal": "30.00",
            "items": [
                {"item_id": 1, "vendor_id": 7, "status": "pending", "price": "10.00"},
                {"item_id": 2, "vendor_id": 8, "status": "confirmed", "price": "20.00"}
            ]
        },
        {
            "id": 2,
            "order_id": "LOCKED",
            "items": [{"item_id": 3, "vendor_id": 7, "status": "pending"}]
        }
    ])
}

async fn list_vendor_orders(
    State(backend): State<Backend>,
    Path(vendor_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    backend.record_auth(&headers);
    match vendor_id.as_str() {
        "7" => Json(json!({"success": true, "orders": vendor_orders()})).into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"success": true, "orders": []})).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "vendor not found"})),
        )
            .into_response(),
    }
}

async fn list_all_orders(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record_auth(&headers);
    Json(json!({"success": true, "results": vendor_orders()})).into_response()
}

async fn update_order_status(
    State(backend): State<Backend>,
    Path(vendor_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let locked = body["order_id"] == "LOCKED";
    backend.updates.lock().unwrap().push((vendor_id, body));
    if locked {
        (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "message": "order locked"})),
        )
            .into_response()
    } else {
        Json(json!({"success": true, "message": "Order status updated"})).into_response()
    }
}

async fn spawn_backend() -> (SocketAddr, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/get_vendor_orders/{vendor_id}", get(list_vendor_orders))
        .route("/api/get_all_orders", get(list_all_orders))
        .route("/api/update_order_status/{vendor_id}", put(update_order_status))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, backend)
}

fn gateway(addr: SocketAddr, token: Option<&str>) -> HttpOrderGateway {
    let config = GatewayConfig::new(&format!("http://{addr}"), token.map(str::to_string), 1).unwrap();
    HttpOrderGateway::new(&config).unwrap()
}

#[tokio::test]
async fn test_list_vendor_orders() {
    let (addr, backend) = spawn_backend().await;
    let gateway = gateway(addr, Some("secret"));

    let orders = gateway
        .list_orders(&OrderScope::Vendor(VendorId::from(7u64)))
        .await
        .unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_id, "ORD-001");
    assert_eq!(orders[0].overall_status().as_str(), "partially_confirmed");
    assert_eq!(
        backend.auth.lock().unwrap().as_slice(),
        [Some("Bearer secret".to_string())]
    );
}

#[tokio::test]
async fn test_list_all_orders_without_token() {
    let (addr, backend) = spawn_backend().await;
    let gateway = gateway(addr, None);

    let orders = gateway.list_orders(&OrderScope::All).await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(backend.auth.lock().unwrap().as_slice(), [None::<String>]);
}

#[tokio::test]
async fn test_list_failures() {
    let (addr, _backend) = spawn_backend().await;
    let gateway = gateway(addr, None);

    match gateway.list_orders(&OrderScope::Vendor("404".into())).await {
        Err(DashboardError::Rejected(message)) => assert_eq!(message, "vendor not found"),
        other => panic!("unexpected result {other:?}"),
    }
    match gateway.list_orders(&OrderScope::Vendor("boom".into())).await {
        Err(DashboardError::Rejected(message)) => assert!(message.contains("500")),
        other => panic!("unexpected result {other:?}"),
    }
    assert!(matches!(
        gateway.list_orders(&OrderScope::Vendor("slow".into())).await,
        Err(DashboardError::HttpError(_))
    ));
}

#[tokio::test]
async fn test_update_status_sends_body() {
    let (addr, backend) = spawn_backend().await;
    let gateway = gateway(addr, None);

    let update = StatusUpdate::for_order("ORD-001", ItemStatus::Confirmed).by_vendor(VendorId::from(7u64));
    gateway.update_status(&update).await.unwrap();

    let updates = backend.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    let (vendor, body) = &updates[0];
    assert_eq!(vendor, "7");
    assert_eq!(
        body,
        &json!({"order_id": "ORD-001", "vendor_id": "7", "status": "confirmed"})
    );
}

#[tokio::test]
async fn test_update_status_requires_vendor() {
    let (addr, backend) = spawn_backend().await;
    let gateway = gateway(addr, None);

    let update = StatusUpdate::for_order("ORD-001", ItemStatus::Confirmed);
    assert!(matches!(
        gateway.update_status(&update).await,
        Err(DashboardError::MissingVendorScope)
    ));
    assert!(backend.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_service_rolls_back_rejected_update() {
    let (addr, _backend) = spawn_backend().await;
    let service = DashboardService::new(
        Box::new(gateway(addr, None)),
        OrderScope::Vendor(VendorId::from(7u64)),
    );
    service.refresh().await.unwrap();

    let outcome = service
        .update_status("LOCKED", ItemStatus::Confirmed)
        .await
        .unwrap();
    assert!(matches!(
        outcome.phase,
        UpdatePhase::RolledBack { ref reason } if reason.contains("order locked")
    ));

    let view = service.order("LOCKED").await.unwrap();
    assert_eq!(view.order.items[0].status, ItemStatus::Pending);
    assert_eq!(view.status.as_str(), "pending");
    assert!(service.take_error().await.is_some());
}

#[tokio::test]
async fn test_service_applies_accepted_update() {
    let (addr, backend) = spawn_backend().await;
    let service = DashboardService::new(
        Box::new(gateway(addr, None)),
        OrderScope::Vendor(VendorId::from(7u64)),
    );
    service.refresh().await.unwrap();

    let outcome = service
        .update_status("ORD-001", ItemStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome.phase, UpdatePhase::Applied);

    // Only vendor 7's item moves; the order is now uniformly confirmed.
    let view = service.order("ORD-001").await.unwrap();
    assert_eq!(view.status.as_str(), "confirmed");
    assert_eq!(backend.updates.lock().unwrap().len(), 1);
}
