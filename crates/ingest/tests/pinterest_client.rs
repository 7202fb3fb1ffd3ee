//! Integration tests for `PinterestClient` using wiremock HTTP mocks.

use ingest::PinterestClient;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PinterestClient {
    PinterestClient::with_base_url("test-token", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn list_boards_follows_bookmarks() {
    let server = MockServer::start().await;

    let page1 = serde_json::json!({
        "items": [
            { "id": "b1", "name": "Menswear", "privacy": "PUBLIC" }
        ],
        "bookmark": "next-page"
    });
    let page2 = serde_json::json!({
        "items": [
            { "id": "b2", "name": "Fall fits", "privacy": "SECRET" }
        ],
        "bookmark": null
    });

    Mock::given(method("GET"))
        .and(path("/boards"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("bookmark", "next-page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/boards"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let boards = client.list_boards(None).await.expect("list boards");

    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].id, "b1");
    assert_eq!(boards[1].name, "Fall fits");
}

#[tokio::test]
async fn list_boards_passes_privacy_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards"))
        .and(query_param("privacy", "PUBLIC"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "items": [], "bookmark": null })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let boards = client.list_boards(Some("PUBLIC")).await.expect("list");
    assert!(boards.is_empty());
}

#[tokio::test]
async fn list_pins_respects_limit() {
    let server = MockServer::start().await;

    let pins: Vec<serde_json::Value> = (0..5)
        .map(|i| {
            serde_json::json!({
                "id": format!("pin{i}"),
                "title": "Look",
                "media": {
                    "media_type": "image",
                    "images": {
                        "original": { "url": format!("https://i.pinimg.com/originals/{i}.jpg") }
                    }
                }
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/boards/b1/pins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "items": pins, "bookmark": null })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let pins = client.list_pins("b1", 3).await.expect("list pins");

    assert_eq!(pins.len(), 3);
    assert_eq!(
        pins[0].image_url().as_deref(),
        Some("https://i.pinimg.com/originals/0.jpg")
    );
}

#[tokio::test]
async fn refresh_access_token_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let token =
        PinterestClient::refresh_access_token("app-id", "app-secret", "refresh", &server.uri())
            .await
            .expect("refresh");
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn list_pins_surfaces_auth_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/pins"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.list_pins("b1", 10).await.is_err());
}

#[tokio::test]
async fn list_pins_all_skips_failing_board() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/gone/pins"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/boards/b2/pins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": "pin1",
                    "title": "Look",
                    "media": {
                        "media_type": "image",
                        "images": {
                            "original": { "url": "https://i.pinimg.com/originals/1.jpg" }
                        }
                    }
                }
            ],
            "bookmark": null
        })))
        .mount(&server)
        .await;

    let boards = vec![
        ingest::Board {
            id: "gone".to_string(),
            name: "Deleted board".to_string(),
            description: String::new(),
            privacy: "PUBLIC".to_string(),
        },
        ingest::Board {
            id: "b2".to_string(),
            name: "Menswear".to_string(),
            description: String::new(),
            privacy: "PUBLIC".to_string(),
        },
    ];

    let client = test_client(&server.uri());
    let results = client.list_pins_all(&boards, 10).await;

    // The deleted board is skipped; the one after it is still listed.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0.id, "b2");
    assert_eq!(results[0].1.len(), 1);
}
