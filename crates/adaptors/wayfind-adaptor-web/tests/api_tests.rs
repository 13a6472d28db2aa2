//! End-to-end tests over the router with in-memory stores and a stub embedder

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wayfind_adaptor_web::{build_router, ApiState};
use wayfind_core::security::TokenIssuer;
use wayfind_core::testing::{InMemoryCatalog, InMemoryUsers, StubEmbedder};

fn test_app(embedder: Arc<StubEmbedder>) -> Router {
    let catalog = Arc::new(InMemoryCatalog::new());
    let users = Arc::new(InMemoryUsers::new(catalog.clone()));
    let state = ApiState::new(
        catalog,
        users,
        embedder,
        TokenIssuer::new("test-secret", 7),
        1.052,
    );
    build_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_place(app: &Router, body: Value) -> Value {
    let response = app.clone().oneshot(post_json("/places/", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_root_is_up() {
    let app = test_app(Arc::new(StubEmbedder::new()));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    let token = register(&app, "anna@example.com", "supersecret").await;
    assert!(!token.is_empty());

    // Duplicate email is rejected
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            json!({ "email": "anna@example.com", "password": "supersecret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Wrong password
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "anna@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct credentials
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "anna@example.com", "password": "supersecret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Profile carries the email local-part as username
    let response = app
        .clone()
        .oneshot(authed("GET", "/users/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["email"], "anna@example.com");
    assert_eq!(profile["username"], "anna");
    assert_eq!(profile["favorites"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(authed("GET", "/users/me", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            json!({ "email": "not-an-email", "password": "supersecret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(post_json(
            "/auth/register",
            json!({ "email": "anna@example.com", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_profile() {
    let app = test_app(Arc::new(StubEmbedder::new()));
    let token = register(&app, "boris@example.com", "oldpassword1").await;

    // Username-only change
    let response = app
        .clone()
        .oneshot(put_json(
            "/users/me/update",
            &token,
            json!({ "username": "boris-the-traveler" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "boris-the-traveler");

    // Password change without the current password
    let response = app
        .clone()
        .oneshot(put_json(
            "/users/me/update",
            &token,
            json!({ "new_password": "newpassword1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Password change with a wrong current password
    let response = app
        .clone()
        .oneshot(put_json(
            "/users/me/update",
            &token,
            json!({ "old_password": "guessing", "new_password": "newpassword1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct flow, then the new password works
    let response = app
        .clone()
        .oneshot(put_json(
            "/users/me/update",
            &token,
            json!({ "old_password": "oldpassword1", "new_password": "newpassword1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "boris@example.com", "password": "newpassword1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_place_embeds_search_context() {
    let embedder = Arc::new(StubEmbedder::new());
    let app = test_app(embedder.clone());

    let place = create_place(
        &app,
        json!({
            "name": "Skuratov Coffee",
            "city": "Omsk",
            "type": "Cafe",
            "description": "Flagship specialty coffee shop",
            "search_context": "coffee, breakfast, laptop-friendly, flat white"
        }),
    )
    .await;

    assert_eq!(place["id"], 1);
    assert_eq!(place["type"], "Cafe");
    // The embedded text is the search context, not the description
    assert_eq!(
        embedder.embedded_texts(),
        vec!["coffee, breakfast, laptop-friendly, flat white"]
    );
}

#[tokio::test]
async fn test_create_place_falls_back_to_description() {
    let embedder = Arc::new(StubEmbedder::new());
    let app = test_app(embedder.clone());

    create_place(
        &app,
        json!({
            "name": "Bird Harbor",
            "city": "Omsk",
            "type": "Nature",
            "description": "Natural park with lakes and migratory birds"
        }),
    )
    .await;

    assert_eq!(
        embedder.embedded_texts(),
        vec!["Natural park with lakes and migratory birds"]
    );
}

#[tokio::test]
async fn test_semantic_search_thresholds_and_orders() {
    // Pin vectors so distances are exact: the espresso bar sits on the
    // query axis, the garden is orthogonal (distance sqrt(2) > 1.052)
    let embedder = Arc::new(
        StubEmbedder::with_dimension(4)
            .pin("cozy coffee shop", vec![1.0, 0.0, 0.0, 0.0])
            .pin("espresso bar downtown", vec![1.0, 0.0, 0.0, 0.0])
            .pin("quiet espresso corner", vec![0.8, 0.6, 0.0, 0.0])
            .pin("trees and flowers", vec![0.0, 1.0, 0.0, 0.0]),
    );
    let app = test_app(embedder);

    for (name, context) in [
        ("Espresso Bar", "espresso bar downtown"),
        ("Quiet Corner", "quiet espresso corner"),
        ("Botanic Garden", "trees and flowers"),
    ] {
        create_place(
            &app,
            json!({
                "name": name,
                "city": "Omsk",
                "type": "Cafe",
                "description": format!("{} description", name),
                "search_context": context
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(post_json(
            "/places/search/ai",
            json!({ "query": "cozy coffee shop", "limit": 10 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    let names: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();

    // Ascending distance, garden thresholded out
    assert_eq!(names, vec!["Espresso Bar", "Quiet Corner"]);
}

#[tokio::test]
async fn test_semantic_search_city_prefilter() {
    let embedder = Arc::new(
        StubEmbedder::with_dimension(4)
            .pin("coffee", vec![1.0, 0.0, 0.0, 0.0])
            .pin("moscow coffee", vec![1.0, 0.0, 0.0, 0.0])
            .pin("omsk coffee", vec![1.0, 0.0, 0.0, 0.0]),
    );
    let app = test_app(embedder);

    create_place(
        &app,
        json!({
            "name": "Moscow Cafe", "city": "Moscow", "type": "Cafe",
            "description": "x", "search_context": "moscow coffee"
        }),
    )
    .await;
    create_place(
        &app,
        json!({
            "name": "Omsk Cafe", "city": "Omsk", "type": "Cafe",
            "description": "x", "search_context": "omsk coffee"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/places/search/ai",
            json!({ "query": "coffee", "city": "Omsk", "limit": 10 }),
        ))
        .await
        .unwrap();
    let results = body_json(response).await;
    let cities: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["city"].as_str().unwrap())
        .collect();
    assert_eq!(cities, vec!["Omsk"]);
}

#[tokio::test]
async fn test_semantic_search_nothing_close_is_empty() {
    let embedder = Arc::new(
        StubEmbedder::with_dimension(4)
            .pin("Седьмое небо", vec![0.0, 0.0, 0.0, 1.0])
            .pin("coffee", vec![1.0, 0.0, 0.0, 0.0])
            .pin("park", vec![0.0, 1.0, 0.0, 0.0]),
    );
    let app = test_app(embedder);

    for (name, context) in [("Cafe", "coffee"), ("Park", "park")] {
        create_place(
            &app,
            json!({
                "name": name, "city": "Omsk", "type": name,
                "description": "x", "search_context": context
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(post_json(
            "/places/search/ai",
            json!({ "query": "Седьмое небо", "city": "Moscow", "limit": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_semantic_search_validation() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    let response = app
        .clone()
        .oneshot(post_json("/places/search/ai", json!({ "query": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(post_json(
            "/places/search/ai",
            json!({ "query": "coffee", "limit": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_embedder_outage_returns_service_error() {
    let app = test_app(Arc::new(StubEmbedder::failing()));

    let response = app
        .oneshot(post_json(
            "/places/search/ai",
            json!({ "query": "coffee" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_filter_search_caps_and_orders_by_id() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    for name in ["First", "Second", "Third"] {
        create_place(
            &app,
            json!({
                "name": name, "city": "Omsk", "type": "Cafe", "description": "x"
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(post_json(
            "/places/search/filters",
            json!({ "city": "Omsk", "limit": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    let ids: Vec<i64> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);

    // A city with no places is an empty result, not an error
    let response = app
        .clone()
        .oneshot(post_json(
            "/places/search/filters",
            json!({ "city": "Novosibirsk" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 0);

    // Empty city fails validation
    let response = app
        .oneshot(post_json("/places/search/filters", json!({ "city": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_filter_search_exact_matches() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    create_place(
        &app,
        json!({
            "name": "Cafe", "city": "Omsk", "type": "Cafe",
            "description": "x", "price": "$$"
        }),
    )
    .await;
    create_place(
        &app,
        json!({
            "name": "Museum", "city": "Omsk", "type": "Museum",
            "description": "x", "price": "$"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/places/search/filters",
            json!({ "city": "Omsk", "type": "Museum" }),
        ))
        .await
        .unwrap();
    let results = body_json(response).await;
    let names: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Museum"]);

    let response = app
        .oneshot(post_json(
            "/places/search/filters",
            json!({ "city": "Omsk", "price": "$$" }),
        ))
        .await
        .unwrap();
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap()[0]["name"], "Cafe");
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let app = test_app(Arc::new(StubEmbedder::new()));

    let place = create_place(
        &app,
        json!({
            "name": "Hermitage", "city": "Saint Petersburg", "type": "Museum",
            "description": "Winter Palace art museum"
        }),
    )
    .await;
    let place_id = place["id"].as_i64().unwrap();

    let token = register(&app, "clara@example.com", "longenough").await;

    // Add, then add again: idempotent
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                &format!("/users/favorites/{}", place_id),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(authed("GET", "/users/me", &token))
        .await
        .unwrap();
    let profile = body_json(response).await;
    let favorites = profile["favorites"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["name"], "Hermitage");

    // Unknown place is a 404
    let response = app
        .clone()
        .oneshot(authed("POST", "/users/favorites/9999", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Remove, then remove again: no-op
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed(
                "DELETE",
                &format!("/users/favorites/{}", place_id),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(authed("GET", "/users/me", &token))
        .await
        .unwrap();
    let profile = body_json(response).await;
    assert_eq!(profile["favorites"].as_array().unwrap().len(), 0);
}
