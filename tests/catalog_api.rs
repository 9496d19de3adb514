mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{default_catalog, product, spawn_app};

fn product_ids(body: &Value) -> Vec<String> {
    body["data"]["products"]
        .as_array()
        .expect("products array")
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn thirteen_products_span_two_pages() {
    let catalog = (0..13)
        .map(|i| product(&format!("p{i}"), &format!("Item {i}"), "Plain item", 1000, i))
        .collect();
    let app = spawn_app(catalog);

    let first = app.get("/api/products").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(product_ids(&first.body).len(), 12);
    assert_eq!(first.body["data"]["currentPage"], 1);
    assert_eq!(first.body["data"]["totalPages"], 2);
    assert_eq!(first.body["meta"]["total"], 13);

    let second = app.get("/api/products?page=2").await;
    assert_eq!(product_ids(&second.body), vec!["p12".to_string()]);
    assert_eq!(second.body["data"]["currentPage"], 2);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = spawn_app(default_catalog());

    let resp = app.get("/api/products").await;
    assert_eq!(product_ids(&resp.body), vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn search_without_matches_is_empty_with_zero_pages() {
    let app = spawn_app(default_catalog());

    let resp = app.get("/api/products?q=submarine").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(product_ids(&resp.body).is_empty());
    assert_eq!(resp.body["data"]["totalPages"], 0);
    assert_eq!(resp.body["data"]["searchTerm"], "submarine");
}

#[tokio::test]
async fn search_is_case_insensitive_over_name_and_description() {
    let app = spawn_app(default_catalog());

    let by_description = app.get("/api/products?q=NOISE").await;
    assert_eq!(product_ids(&by_description.body), vec!["p1"]);

    let by_name = app.get("/api/products?q=laptop").await;
    assert_eq!(product_ids(&by_name.body), vec!["p3"]);
    assert_eq!(by_name.body["data"]["totalPages"], 1);
}

#[tokio::test]
async fn blank_search_and_out_of_range_pages() {
    let app = spawn_app(default_catalog());

    let blank = app.get("/api/products?q=&page=0").await;
    assert_eq!(product_ids(&blank.body).len(), 3);
    assert_eq!(blank.body["data"]["currentPage"], 1);
    assert_eq!(blank.body["data"]["searchTerm"], "");

    let beyond = app.get("/api/products?page=5").await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert!(product_ids(&beyond.body).is_empty());
    assert_eq!(beyond.body["data"]["totalPages"], 1);
}

#[tokio::test]
async fn unparsable_pages_fall_back_to_the_first() {
    let app = spawn_app(default_catalog());

    for query in ["page=abc", "page=", "page=1.5", "page=99999999999999999999", "page=-2"] {
        let resp = app.get(&format!("/api/products?{query}")).await;
        assert_eq!(resp.status, StatusCode::OK, "rejected {query}");
        assert_eq!(resp.body["data"]["currentPage"], 1, "{query}");
        assert_eq!(product_ids(&resp.body).len(), 3, "{query}");
    }
}

#[tokio::test]
async fn search_term_is_echoed_as_given() {
    let app = spawn_app(default_catalog());

    let resp = app.get("/api/products?q=%20laptop%20").await;
    assert_eq!(product_ids(&resp.body), vec!["p3"]);
    assert_eq!(resp.body["data"]["searchTerm"], " laptop ");
}

#[tokio::test]
async fn product_detail_and_unknown_ids() {
    let app = spawn_app(default_catalog());

    let found = app.get("/api/products/p2").await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["name"], "Smartphone");

    let missing = app.get("/api/products/nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["data"]["error"], "Not Found");
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let app = spawn_app(default_catalog());

    let resp = app.get("/api/checkout").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["data"]["path"], "/api/checkout");
}
