//! Integration tests for `RedditClient` using wiremock HTTP mocks.

use ingest::RedditClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> RedditClient {
    RedditClient::with_base_url(30, base_url).expect("client construction should not fail")
}

fn listing_body() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "children": [
                {
                    "data": {
                        "id": "img1",
                        "title": "Fit check",
                        "url": "https://i.redd.it/img1.jpg",
                        "created_utc": 1756200000.0
                    }
                },
                {
                    "data": {
                        "id": "vid1",
                        "title": "A video post",
                        "url": "https://v.redd.it/vid1",
                        "created_utc": 1756200100.0
                    }
                },
                {
                    "data": {
                        "id": "prev1",
                        "title": "Gallery post",
                        "url": "https://www.reddit.com/gallery/prev1",
                        "created_utc": 1756200200.0,
                        "preview": {
                            "images": [
                                {
                                    "source": {
                                        "url": "https://preview.redd.it/prev1.jpg?width=640&amp;s=x"
                                    }
                                }
                            ]
                        }
                    }
                }
            ]
        }
    })
}

#[tokio::test]
async fn fetch_new_keeps_image_posts_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/streetwear/new.json"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client.fetch_new("streetwear", 100).await.expect("fetch");

    // The bare video post is dropped; the gallery post resolves via preview.
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].origin_id, "img1");
    assert_eq!(posts[0].url, "https://i.redd.it/img1.jpg");
    assert_eq!(posts[0].board, "streetwear");
    assert_eq!(
        posts[1].url,
        "https://preview.redd.it/prev1.jpg?width=640&s=x"
    );
}

#[tokio::test]
async fn fetch_new_parses_timestamps() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/malefashionadvice/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .fetch_new("malefashionadvice", 50)
        .await
        .expect("fetch");

    assert_eq!(posts[0].created_at.timestamp(), 1_756_200_000);
}

#[tokio::test]
async fn fetch_new_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/streetwear/new.json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_new("streetwear", 100).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn fetch_new_handles_empty_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/streetwear/new.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {"children": []}})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client.fetch_new("streetwear", 100).await.expect("fetch");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn fetch_new_all_skips_failing_subreddit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/banned/new.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/streetwear/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let subreddits = vec!["banned".to_string(), "streetwear".to_string()];
    let results = client.fetch_new_all(&subreddits, 100).await;

    // The 404 subreddit is skipped; the one after it is still fetched.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, "streetwear");
    assert_eq!(results[0].1.len(), 2);
}

#[tokio::test]
async fn fetch_new_rejects_malformed_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/streetwear/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_new("streetwear", 100).await.unwrap_err();
    assert!(matches!(err, ingest::IngestError::Decode { .. }));
}
