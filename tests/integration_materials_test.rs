mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

use common::TestApp;

#[tokio::test]
async fn create_and_fetch_material() {
    let app = TestApp::new().await;

    let (status, created) = app
        .request_json(
            Method::POST,
            "/api/materials",
            Some(json!({
                "code": "WD-001",
                "name": "Thermo spruce board",
                "category": "Wood",
                "unit": "m2",
                "price_without_vat": "12.40",
                "supplier": "Thermory"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Material created successfully");
    let id = created["id"].as_i64().expect("created id");

    let (status, material) = app
        .request_json(Method::GET, &format!("/api/materials/{id}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(material["code"], "WD-001");
    assert_eq!(material["name"], "Thermo spruce board");
    assert_eq!(material["category"], "Wood");
    assert_eq!(material["unit"], "m2");
    assert_eq!(material["supplier"], "Thermory");
    assert_eq!(material["comment"], "");

    // Quantity defaults to one when the payload omits it.
    let quantity = Decimal::from_str(material["quantity"].as_str().expect("quantity string"))
        .expect("decimal quantity");
    assert_eq!(quantity, Decimal::ONE);
    let price =
        Decimal::from_str(material["price_without_vat"].as_str().expect("price string"))
            .expect("decimal price");
    assert_eq!(price, Decimal::from_str("12.40").unwrap());
}

#[tokio::test]
async fn duplicate_material_code_is_rejected() {
    let app = TestApp::new().await;

    let payload = json!({
        "code": "WD-010",
        "name": "Cedar plank",
        "unit": "pcs",
        "price_without_vat": 3.5
    });

    let (status, _) = app
        .request_json(Method::POST, "/api/materials", Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request_json(Method::POST, "/api/materials", Some(payload))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Material code already exists");
}

#[tokio::test]
async fn missing_required_field_names_the_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/materials",
            Some(json!({
                "name": "No code",
                "unit": "pcs",
                "price_without_vat": 1
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'code' is required");
}

#[tokio::test]
async fn update_and_delete_missing_material_return_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::PUT,
            "/api/materials/9999",
            Some(json!({
                "name": "Ghost",
                "unit": "pcs",
                "price_without_vat": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Material not found");

    let (status, body) = app
        .request_json(Method::DELETE, "/api/materials/9999", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Material not found");
}

#[tokio::test]
async fn update_replaces_material_fields() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(
            Method::POST,
            "/api/materials",
            Some(json!({
                "code": "HW-100",
                "name": "Stainless screw",
                "unit": "pcs",
                "price_without_vat": "0.12"
            })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/materials/{id}"),
            Some(json!({
                "name": "Stainless screw A4",
                "category": "Hardware",
                "unit": "pcs",
                "quantity": 100,
                "price_without_vat": "0.10",
                "supplier": "Wurth",
                "comment": "bulk pack"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Material updated successfully");

    let (_, material) = app
        .request_json(Method::GET, &format!("/api/materials/{id}"), None)
        .await;
    assert_eq!(material["name"], "Stainless screw A4");
    assert_eq!(material["category"], "Hardware");
    assert_eq!(material["supplier"], "Wurth");
    assert_eq!(material["comment"], "bulk pack");
    // The code is identity and survives a full-row update.
    assert_eq!(material["code"], "HW-100");
}

#[tokio::test]
async fn list_filters_by_category_and_search() {
    let app = TestApp::new().await;

    for (code, name, category) in [
        ("WD-001", "Spruce board", "Wood"),
        ("WD-002", "Aspen bench slat", "Wood"),
        ("HW-001", "Hinge", "Hardware"),
    ] {
        let (status, _) = app
            .request_json(
                Method::POST,
                "/api/materials",
                Some(json!({
                    "code": code,
                    "name": name,
                    "category": category,
                    "unit": "pcs",
                    "price_without_vat": 1
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = app
        .request_json(Method::GET, "/api/materials?category=Wood", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = listed.as_array().expect("material list");
    assert_eq!(rows.len(), 2);
    // Sorted by code.
    assert_eq!(rows[0]["code"], "WD-001");
    assert_eq!(rows[1]["code"], "WD-002");

    // Search matches code or name substrings.
    let (_, by_name) = app
        .request_json(Method::GET, "/api/materials?search=bench", None)
        .await;
    assert_eq!(by_name.as_array().unwrap().len(), 1);
    assert_eq!(by_name[0]["code"], "WD-002");

    let (_, by_code) = app
        .request_json(Method::GET, "/api/materials?search=HW", None)
        .await;
    assert_eq!(by_code.as_array().unwrap().len(), 1);
    assert_eq!(by_code[0]["name"], "Hinge");
}

#[tokio::test]
async fn category_listing_is_distinct_and_sorted() {
    let app = TestApp::new().await;

    for (code, category) in [
        ("M-1", "Wood"),
        ("M-2", "Hardware"),
        ("M-3", "Wood"),
        ("M-4", ""),
    ] {
        app.request_json(
            Method::POST,
            "/api/materials",
            Some(json!({
                "code": code,
                "name": format!("Material {code}"),
                "category": category,
                "unit": "pcs",
                "price_without_vat": 1
            })),
        )
        .await;
    }

    let (status, categories) = app
        .request_json(Method::GET, "/api/materials/categories", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories, json!(["Hardware", "Wood"]));
}
