//! Handler tests for the medication catalog
//!
//! These tests verify that catalog HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error response bodies
//!
//! Unlike E2E tests, these exercise ONLY the catalog handlers against an
//! in-memory store, not the full application with routing middleware.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use domain_inventory::*;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
}

#[tokio::test]
async fn test_create_medication_handler_returns_201() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let app = handlers::medications_router(service);

    let builder = TestDataBuilder::from_test_name("handler_create_201");

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": builder.name("medication", "main"),
                "unit_price": 5.5,
                "quantity_on_hand": 100,
                "expires_on": "2099-12-31"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let medication: Medication = json_body(response.into_body()).await;
    assert_eq!(medication.name, builder.name("medication", "main"));
    assert_eq!(medication.unit_price, dec!(5.5));
    assert_eq!(medication.quantity_on_hand, 100);
    assert_eq!(medication.expires_on, far_future());
}

#[tokio::test]
async fn test_create_medication_handler_validates_input() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let app = handlers::medications_router(service);

    // Invalid name (whitespace only)
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "   ",
                "unit_price": 5.5,
                "quantity_on_hand": 10,
                "expires_on": "2099-12-31"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["name"][0]["code"], "MISSING_NAME");
}

#[tokio::test]
async fn test_create_medication_handler_rejects_non_positive_price() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Aspirine",
                "unit_price": 0.0,
                "quantity_on_hand": 10,
                "expires_on": "2099-12-31"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["unit_price"][0]["code"], "INVALID_PRICE");
}

#[tokio::test]
async fn test_create_medication_handler_rejects_malformed_expiry() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let app = handlers::medications_router(service);

    // Not ISO 8601; rejected by deserialization before validation runs
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Aspirine",
                "unit_price": 4.2,
                "quantity_on_hand": 10,
                "expires_on": "31/12/2099"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_get_medication_handler_returns_200() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let builder = TestDataBuilder::from_test_name("handler_get_200");

    let input = CreateMedication {
        name: builder.name("medication", "get"),
        unit_price: dec!(7.80),
        quantity_on_hand: 40,
        expires_on: far_future(),
    };
    let created = service.create_medication(input).await.unwrap();

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let medication: Medication = json_body(response.into_body()).await;
    assert_eq!(medication.id, created.id);
    assert_eq!(medication.name, builder.name("medication", "get"));
}

#[tokio::test]
async fn test_get_medication_handler_returns_404_for_missing() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let app = handlers::medications_router(service);

    let missing_id = uuid::Uuid::new_v4();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", missing_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains(&missing_id.to_string())
    );
}

#[tokio::test]
async fn test_get_medication_handler_rejects_malformed_id() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_list_medications_handler_with_search() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);

    for (name, price) in [
        ("Paracétamol 500mg", dec!(5.50)),
        ("Ibuprofène 200mg", dec!(7.80)),
        ("Aspirine", dec!(4.20)),
    ] {
        let input = CreateMedication {
            name: name.to_string(),
            unit_price: price,
            quantity_on_hand: 30,
            expires_on: far_future(),
        };
        service.create_medication(input).await.unwrap();
    }

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?search=para")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let medications: Vec<Medication> = json_body(response.into_body()).await;
    assert_eq!(medications.len(), 1);
    assert_eq!(medications[0].name, "Paracétamol 500mg");
}

#[tokio::test]
async fn test_list_medications_handler_filters_by_status() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);

    for (name, quantity) in [("Épuisé", 0), ("Faible", 5), ("Abondant", 50)] {
        let input = CreateMedication {
            name: name.to_string(),
            unit_price: dec!(3.00),
            quantity_on_hand: quantity,
            expires_on: far_future(),
        };
        service.create_medication(input).await.unwrap();
    }

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?status=low_stock")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let medications: Vec<Medication> = json_body(response.into_body()).await;
    assert_eq!(medications.len(), 1);
    assert_eq!(medications[0].name, "Faible");

    // A zero-quantity row counts as expired even with a future date
    let request = Request::builder()
        .method("GET")
        .uri("/?status=expired")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let medications: Vec<Medication> = json_body(response.into_body()).await;
    assert_eq!(medications.len(), 1);
    assert_eq!(medications[0].name, "Épuisé");
}

#[tokio::test]
async fn test_list_medications_handler_paginates() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let builder = TestDataBuilder::from_test_name("handler_paginate");

    let names: Vec<String> = (0..3)
        .map(|i| builder.name("medication", &format!("p{}", i)))
        .collect();
    for name in &names {
        let input = CreateMedication {
            name: name.clone(),
            unit_price: dec!(2.00),
            quantity_on_hand: 25,
            expires_on: far_future(),
        };
        service.create_medication(input).await.unwrap();
    }

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?limit=2&offset=1")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let page: Vec<Medication> = json_body(response.into_body()).await;
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|m| names.contains(&m.name)));

    let request = Request::builder()
        .method("GET")
        .uri("/?limit=1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let page: Vec<Medication> = json_body(response.into_body()).await;
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_update_medication_handler_returns_200() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let builder = TestDataBuilder::from_test_name("handler_update_200");

    let input = CreateMedication {
        name: builder.name("medication", "update"),
        unit_price: dec!(6.00),
        quantity_on_hand: 90,
        expires_on: far_future(),
    };
    let created = service.create_medication(input).await.unwrap();

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({"unit_price": 9.75})).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let medication: Medication = json_body(response.into_body()).await;
    assert_eq!(medication.unit_price, dec!(9.75));
    assert_eq!(medication.name, created.name);
    assert_eq!(medication.quantity_on_hand, 90);
}

#[tokio::test]
async fn test_update_medication_handler_rejects_empty_patch() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let builder = TestDataBuilder::from_test_name("handler_update_empty");

    let input = CreateMedication {
        name: builder.name("medication", "noop"),
        unit_price: dec!(6.00),
        quantity_on_hand: 90,
        expires_on: far_future(),
    };
    let created = service.create_medication(input).await.unwrap();

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.id))
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NO_UPDATE_FIELDS");
}

#[tokio::test]
async fn test_delete_medication_handler_returns_medication() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);
    let builder = TestDataBuilder::from_test_name("handler_delete");

    let input = CreateMedication {
        name: builder.name("medication", "delete"),
        unit_price: dec!(12.50),
        quantity_on_hand: 50,
        expires_on: far_future(),
    };
    let created = service.create_medication(input).await.unwrap();

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let medication: Medication = json_body(response.into_body()).await;
    assert_eq!(medication.id, created.id);

    // A second fetch must miss
    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_summary_handler_aggregates() {
    let store = InMemoryInventory::new();
    let service = CatalogService::new(store);

    let rows = [
        ("Périmé", dec!(2.00), 10, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        ("Faible", dec!(3.00), 5, far_future()),
        ("Abondant", dec!(1.00), 50, far_future()),
    ];
    for (name, price, quantity, expires_on) in rows {
        let input = CreateMedication {
            name: name.to_string(),
            unit_price: price,
            quantity_on_hand: quantity,
            expires_on,
        };
        service.create_medication(input).await.unwrap();
    }

    let app = handlers::medications_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/summary")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let summary: CatalogSummary = json_body(response.into_body()).await;
    assert_eq!(summary.total_medications, 3);
    assert_eq!(summary.expired, 1);
    assert_eq!(summary.low_stock, 1);
    assert_eq!(summary.in_stock, 1);
    // Stock value counts every row, expired included
    assert_eq!(summary.total_stock_value, dec!(85.00));
}
