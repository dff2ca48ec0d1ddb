mod support;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creative_suite::{Error, ImagePayload, PosterCategory, PosterRequest};

use support::{build_orchestrator, image_response, mount_image_mock, png_payload, tagged_png, MODEL_PATH};

#[tokio::test]
async fn poster_prompt_carries_provided_fields_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_string_contains("**Organization Name:** Acme"))
        .and(body_string_contains("**Main Topic/Headline:** Sale"))
        .and(body_string_contains("**Director:** Jo"))
        .and(body_string_contains("Grocery Store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response(&tagged_png("poster"))))
        .expect(1)
        .mount(&server)
        .await;

    let request = PosterRequest::new("Acme", "Sale", "Big sale")
        .category(PosterCategory::GroceryStore)
        .director_name("Jo");
    assert!(!request.prompt().contains("Team Members"));

    let image = build_orchestrator(&server)
        .generate_poster(&request)
        .await
        .unwrap();
    assert_eq!(image.index, 1);
    assert_eq!(image.payload.data, tagged_png("poster"));
    assert_eq!(image.file_name(), "ai_generated_image_1.png");
}

#[tokio::test]
async fn required_fields_only_yield_one_text_part_and_one_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_string_contains("Acme"))
        .and(body_string_contains("Sale"))
        .and(body_string_contains("Big discount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response(&tagged_png("acme"))))
        .expect(1)
        .mount(&server)
        .await;

    let request = PosterRequest::new("Acme", "Sale", "Big discount");
    let image = build_orchestrator(&server)
        .generate_poster(&request)
        .await
        .unwrap();
    assert_eq!(image.index, 1);
    assert_eq!(image.payload.data, tagged_png("acme"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 1);
    let prompt = parts[0]["text"].as_str().unwrap();
    for label in [
        "**Subtopic/Tagline:**",
        "**Key Achievements to Highlight:**",
        "**Director:**",
        "**Team Members:**",
    ] {
        assert!(!prompt.contains(label), "unexpected {label}");
    }
}

#[tokio::test]
async fn logo_and_extra_image_precede_the_prompt() {
    let server = MockServer::start().await;
    let logo = png_payload();
    let extra = ImagePayload::new("image/webp", b"RIFF\0\0\0\0WEBPVP8 ".to_vec());
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(&logo.data)}},
                    {"inlineData": {"mimeType": "image/webp", "data": STANDARD.encode(&extra.data)}},
                    {}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response(&tagged_png("p"))))
        .expect(1)
        .mount(&server)
        .await;

    let request = PosterRequest::new("Acme", "Sale", "Big sale")
        .logo(logo)
        .extra_image(extra);
    build_orchestrator(&server)
        .generate_poster(&request)
        .await
        .unwrap();
}

#[tokio::test]
async fn blank_required_field_never_reaches_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = build_orchestrator(&server)
        .generate_poster(&PosterRequest::new("Acme", "Sale", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "description" }));
}

#[tokio::test]
async fn service_error_is_surfaced_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = build_orchestrator(&server)
        .generate_poster(&PosterRequest::new("Acme", "Sale", "Big sale"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::ApiError { status: 403, ref message } if message == "API key not valid")
    );
}

#[tokio::test]
async fn every_category_generates() {
    let server = MockServer::start().await;
    mount_image_mock(&server, &tagged_png("any")).await;
    let orchestrator = build_orchestrator(&server);
    for category in PosterCategory::ALL {
        let request = PosterRequest::new("Acme", "Open day", "Come visit").category(category);
        assert!(request.prompt().contains(&format!("'{category}'")));
        orchestrator.generate_poster(&request).await.unwrap();
    }
}
