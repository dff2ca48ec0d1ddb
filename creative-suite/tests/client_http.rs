mod support;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creative_suite::types::content::Content;
use creative_suite::{Client, Error};

use support::{image_response, png_bytes, MODEL_PATH};

#[tokio::test]
async fn api_key_header_is_inserted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response(&png_bytes())))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .unwrap();
    client
        .models()
        .generate_content("gemini-2.5-flash-image", vec![Content::text("hi")])
        .await
        .unwrap();
}

#[tokio::test]
async fn api_key_header_respects_custom_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "custom-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key("test-key")
        .header("x-goog-api-key", "custom-key")
        .base_url(server.uri())
        .build()
        .unwrap();
    client
        .models()
        .generate_content("gemini-2.5-flash-image", vec![Content::text("hi")])
        .await
        .unwrap();
}

#[tokio::test]
async fn api_version_override_changes_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/models/custom-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .api_version("v1")
        .build()
        .unwrap();
    client
        .models()
        .generate_content("models/custom-model", vec![Content::text("hi")])
        .await
        .unwrap();
}

#[tokio::test]
async fn timeout_surfaces_as_http_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .timeout(1)
        .build()
        .unwrap();
    let err = client
        .models()
        .generate_content("gemini-2.5-flash-image", vec![Content::text("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpClient { ref source } if source.is_timeout()));
}
