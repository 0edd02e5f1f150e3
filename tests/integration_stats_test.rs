mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn stats_count_materials_and_orders_by_status() {
    let app = TestApp::new().await;

    let (status, empty) = app.request_json(Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        empty,
        json!({
            "materials_count": 0,
            "orders_count": 0,
            "orders_draft": 0,
            "orders_production": 0
        })
    );

    for code in ["M-1", "M-2"] {
        let (status, _) = app
            .request_json(
                Method::POST,
                "/api/materials",
                Some(json!({
                    "code": code,
                    "name": format!("Material {code}"),
                    "unit": "pcs",
                    "price_without_vat": 1
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    for (number, order_status) in [
        ("ORD-S-1", "draft"),
        ("ORD-S-2", "draft"),
        ("ORD-S-3", "production"),
        ("ORD-S-4", "done"),
    ] {
        let (status, _) = app
            .request_json(
                Method::POST,
                "/api/orders",
                Some(json!({
                    "order_number": number,
                    "product_type": "sauna",
                    "status": order_status
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = app.request_json(Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["materials_count"], 2);
    assert_eq!(stats["orders_count"], 4);
    assert_eq!(stats["orders_draft"], 2);
    assert_eq!(stats["orders_production"], 1);
}

#[tokio::test]
async fn health_answers_without_store_access() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().is_some());
}
