#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creative_suite::{Client, GeminiImageGenerator, ImagePayload, Orchestrator};

pub const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

pub fn build_gemini_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn build_orchestrator(server: &MockServer) -> Orchestrator<GeminiImageGenerator> {
    let client = build_gemini_client(&server.uri());
    Orchestrator::new(GeminiImageGenerator::new(&client))
}

pub fn png_bytes() -> Vec<u8> {
    vec![
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ]
}

pub fn png_payload() -> ImagePayload {
    ImagePayload::new("image/png", png_bytes())
}

/// PNG bytes with a distinguishing tail, so responses can be told apart.
pub fn tagged_png(tag: &str) -> Vec<u8> {
    let mut data = png_bytes();
    data.extend_from_slice(tag.as_bytes());
    data
}

pub fn image_response(data: &[u8]) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [
                {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(data)}}
            ]},
            "finishReason": "STOP"
        }]
    })
}

/// Answers every image request with the same PNG.
pub async fn mount_image_mock(server: &MockServer, data: &[u8]) {
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response(data)))
        .mount(server)
        .await;
}
