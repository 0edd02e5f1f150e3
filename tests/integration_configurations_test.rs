mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use std::str::FromStr;
use wild_erp_api::entities::configuration_category;

use common::TestApp;

async fn seed_category(app: &TestApp, name: &str, sort_order: i32) -> i32 {
    let category = configuration_category::ActiveModel {
        name: Set(name.to_string()),
        sort_order: Set(sort_order),
        ..Default::default()
    };
    category
        .insert(&*app.state.db)
        .await
        .expect("seed configuration category")
        .id
}

async fn seed_material(app: &TestApp, code: &str, name: &str, unit: &str) -> i64 {
    let (status, created) = app
        .request_json(
            Method::POST,
            "/api/materials",
            Some(json!({
                "code": code,
                "name": name,
                "unit": unit,
                "price_without_vat": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_i64().expect("material id")
}

#[tokio::test]
async fn create_and_fetch_configuration_with_material_lines() {
    let app = TestApp::new().await;
    let category_id = seed_category(&app, "Barrel saunas", 1).await;
    let board = seed_material(&app, "WD-201", "Spruce board", "m2").await;
    let stove = seed_material(&app, "ST-001", "Harvia stove", "pcs").await;

    let (status, created) = app
        .request_json(
            Method::POST,
            "/api/configurations",
            Some(json!({
                "name": "Barrel sauna 2.4m",
                "product_type": "sauna",
                "category_id": category_id,
                "materials": [
                    { "material_id": board, "quantity": "14.5" },
                    { "material_id": stove, "quantity": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Configuration created successfully");
    let id = created["id"].as_i64().unwrap();

    let (status, detail) = app
        .request_json(Method::GET, &format!("/api/configurations/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Barrel sauna 2.4m");
    assert_eq!(detail["product_type"], "sauna");
    assert_eq!(detail["category_name"], "Barrel saunas");
    assert_eq!(detail["is_active"], true);

    let lines = detail["materials"].as_array().expect("material lines");
    assert_eq!(lines.len(), 2);
    let board_line = lines
        .iter()
        .find(|line| line["code"] == "WD-201")
        .expect("board line");
    assert_eq!(board_line["material_name"], "Spruce board");
    assert_eq!(board_line["unit"], "m2");
    assert_eq!(
        Decimal::from_str(board_line["quantity"].as_str().unwrap()).unwrap(),
        Decimal::from_str("14.5").unwrap()
    );
}

#[tokio::test]
async fn listing_filters_by_type_and_hides_inactive() {
    let app = TestApp::new().await;
    let saunas = seed_category(&app, "Saunas", 2).await;
    let tubs = seed_category(&app, "Hot tubs", 1).await;

    for (name, product_type, category_id, is_active) in [
        ("Barrel sauna", "sauna", saunas, true),
        ("Square sauna", "sauna", saunas, false),
        ("Fiberglass tub", "hot_tub", tubs, true),
    ] {
        let (status, _) = app
            .request_json(
                Method::POST,
                "/api/configurations",
                Some(json!({
                    "name": name,
                    "product_type": product_type,
                    "category_id": category_id,
                    "is_active": is_active
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = app
        .request_json(Method::GET, "/api/configurations?type=sauna", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = listed.as_array().unwrap();
    // The inactive configuration is never listed.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Barrel sauna");
    assert_eq!(rows[0]["category_name"], "Saunas");

    // Unfiltered listing follows category sort order.
    let (_, all) = app.request_json(Method::GET, "/api/configurations", None).await;
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Fiberglass tub", "Barrel sauna"]);

    let (_, by_category) = app
        .request_json(
            Method::GET,
            &format!("/api/configurations?category_id={tubs}"),
            None,
        )
        .await;
    assert_eq!(by_category.as_array().unwrap().len(), 1);
    assert_eq!(by_category[0]["name"], "Fiberglass tub");
}

#[tokio::test]
async fn update_replaces_material_lines() {
    let app = TestApp::new().await;
    let board = seed_material(&app, "WD-301", "Aspen board", "m2").await;
    let screws = seed_material(&app, "HW-301", "Screws", "pcs").await;

    let (_, created) = app
        .request_json(
            Method::POST,
            "/api/configurations",
            Some(json!({
                "name": "Sauna interior",
                "product_type": "sauna",
                "materials": [{ "material_id": board, "quantity": 8 }]
            })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/configurations/{id}"),
            Some(json!({
                "name": "Sauna interior v2",
                "product_type": "sauna",
                "materials": [{ "material_id": screws, "quantity": 200 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration updated successfully");

    let (_, detail) = app
        .request_json(Method::GET, &format!("/api/configurations/{id}"), None)
        .await;
    assert_eq!(detail["name"], "Sauna interior v2");
    let lines = detail["materials"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["code"], "HW-301");
}

#[tokio::test]
async fn categories_endpoint_returns_display_order() {
    let app = TestApp::new().await;
    seed_category(&app, "Extras", 3).await;
    seed_category(&app, "Hot tubs", 1).await;
    seed_category(&app, "Saunas", 2).await;

    let (status, categories) = app
        .request_json(Method::GET, "/api/configurations/categories", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Hot tubs", "Saunas", "Extras"]);
}

#[tokio::test]
async fn missing_configuration_returns_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(Method::GET, "/api/configurations/9999", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Configuration not found");

    let (status, _) = app
        .request_json(Method::DELETE, "/api/configurations/9999", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
