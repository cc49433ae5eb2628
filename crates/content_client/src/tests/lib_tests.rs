use super::*;
use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode as HttpStatus, routing::get, Json, Router};
use serde_json::{json, Value};
use shared::domain::{ExcursionId, TagId, PRICE_PLACEHOLDER};
use tokio::net::TcpListener;

fn excursion_json() -> Value {
    json!([
        {
            "id": 1,
            "slug": "full-day",
            "title": { "rendered": "Full Day" },
            "excerpt": { "rendered": "<p>Todo el día</p>" },
            "content": { "rendered": "<p>Detalles</p>" },
            "precio": "1,500",
            "categoria_excursion": [5],
            "actividad_excursion": [20],
            "_embedded": {
                "wp:featuredmedia": [{ "source_url": "https://cdn.example/full.webp", "alt_text": "" }]
            }
        },
        {
            "id": 2,
            "slug": "maya-explosion",
            "title": { "rendered": "Maya Explosion" },
            "excerpt": { "rendered": "" },
            "precio": false,
            "categoria_excursion": [],
            "actividad_excursion": [21]
        }
    ])
}

async fn handle_excursions(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if let Some(fields) = query.get("_fields") {
        assert!(fields.contains("precio"));
        return Json(json!([
            { "id": 1, "slug": "full-day", "title": { "rendered": "Full Day" }, "precio": "1,500", "duracion": "8 horas" },
            { "id": 2, "slug": "maya-explosion", "title": { "rendered": "Maya Explosion" }, "precio": false }
        ]));
    }

    let all = excursion_json();
    match query.get("slug") {
        Some(slug) => {
            let matches: Vec<Value> = all
                .as_array()
                .into_iter()
                .flatten()
                .filter(|record| record["slug"] == slug.as_str())
                .cloned()
                .collect();
            Json(Value::Array(matches))
        }
        None => {
            assert_eq!(query.get("per_page").map(String::as_str), Some("100"));
            assert!(query.contains_key("_embed"));
            Json(all)
        }
    }
}

async fn handle_categories() -> Json<Value> {
    Json(json!([
        { "id": 5, "name": "Full Day", "slug": "full-day", "count": 1, "imagen": "https://cdn.example/icon.svg" }
    ]))
}

async fn handle_activities() -> Json<Value> {
    Json(json!([
        { "id": 20, "name": "Rappel", "slug": "rappel", "count": 1, "imagen": null },
        { "id": 21, "name": "Snorkel", "slug": "snorkel", "count": 1 }
    ]))
}

async fn spawn_content_server(prefix: &str) -> anyhow::Result<String> {
    let api = Router::new()
        .route("/wp-json/wp/v2/excursion", get(handle_excursions))
        .route("/wp-json/wp/v2/categoria_excursion", get(handle_categories))
        .route("/wp-json/wp/v2/actividad_excursion", get(handle_activities))
        .route(
            "/wp-json/wp/v2/faq",
            get(|| async { HttpStatus::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/wp-json/maya-adrenaline/v1/settings",
            get(|| async { "<html>maintenance</html>" }),
        );
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}{prefix}"))
}

#[tokio::test]
async fn fetches_and_converts_excursions() {
    let server_url = spawn_content_server("").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let excursions = client.excursions().await.expect("excursions");

    assert_eq!(excursions.len(), 2);
    assert_eq!(excursions[0].id, ExcursionId(1));
    assert!(excursions[0].tags.contains(TagId(5)));
    assert!(excursions[1].tags.contains(TagId(21)));
    assert_eq!(excursions[1].price, None);
    assert_eq!(
        excursions[0]
            .featured_image
            .as_ref()
            .map(|media| media.url.as_str()),
        Some("https://cdn.example/full.webp")
    );
}

#[tokio::test]
async fn looks_up_excursion_by_slug() {
    let server_url = spawn_content_server("").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let found = client
        .excursion_by_slug("maya-explosion")
        .await
        .expect("lookup");
    assert_eq!(found.map(|item| item.id), Some(ExcursionId(2)));

    let missing = client.excursion_by_slug("no-such-trip").await.expect("lookup");
    assert!(missing.is_none());
}

#[tokio::test]
async fn price_listings_use_placeholder_and_duration() {
    let server_url = spawn_content_server("").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let listings = client.price_listings().await.expect("prices");

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].price, "1,500");
    assert_eq!(listings[0].duration, "8 horas");
    assert_eq!(listings[1].price, PRICE_PLACEHOLDER);
}

#[tokio::test]
async fn tags_are_assigned_their_taxonomy() {
    let server_url = spawn_content_server("").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let categories = client.tags(Taxonomy::Category).await.expect("categories");
    let activities = client.tags(Taxonomy::Activity).await.expect("activities");

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].taxonomy, Taxonomy::Category);
    assert_eq!(categories[0].icon.as_deref(), Some("https://cdn.example/icon.svg"));
    assert_eq!(activities.len(), 2);
    assert!(activities
        .iter()
        .all(|tag| tag.taxonomy == Taxonomy::Activity && tag.icon.is_none()));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server_url = spawn_content_server("").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let err = client.faqs().await.expect_err("faq endpoint fails");

    match &err {
        ContentError::Status { endpoint, status } => {
            assert_eq!(endpoint, "/wp-json/wp/v2/faq");
            assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.code(), ErrorCode::Unavailable);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server_url = spawn_content_server("").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let err = client.settings().await.expect_err("settings body is html");

    assert!(matches!(err, ContentError::Decode { .. }));
    assert_eq!(ApiError::from(&err).code, ErrorCode::Malformed);
}

#[tokio::test]
async fn base_url_path_is_kept_when_joining_endpoints() {
    let server_url = spawn_content_server("/cms").await.expect("spawn server");
    let client = ContentClient::new(&server_url).expect("client");

    let categories = client.tags(Taxonomy::Category).await.expect("categories");

    assert_eq!(categories.len(), 1);
    assert!(client.base_url().as_str().ends_with("/cms/"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = ContentClient::new(&format!("http://{addr}")).expect("client");
    let err = client.excursions().await.expect_err("nothing listening");

    assert!(matches!(err, ContentError::Transport { .. }));
    assert_eq!(err.code(), ErrorCode::Unavailable);
}

#[test]
fn rejects_invalid_base_url() {
    let err = ContentClient::new("not a url").expect_err("invalid");
    assert!(matches!(err, ContentError::InvalidBaseUrl { .. }));
    assert_eq!(err.code(), ErrorCode::Internal);
}
