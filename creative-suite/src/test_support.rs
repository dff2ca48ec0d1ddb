use crate::client::{ApiClient, ClientConfig, ClientInner, HttpOptions};
use crate::error::{Error, Result};
use crate::generator::ImageGenerator;
use crate::media::ImagePayload;
use creative_suite_types::content::Part;
use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
    let backup: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    f();
    for (key, value) in backup {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

pub fn test_client_inner_with_base(base_url: &str, api_version: &str) -> ClientInner {
    let http_options = HttpOptions {
        base_url: Some(base_url.to_string()),
        api_version: Some(api_version.to_string()),
        ..Default::default()
    };
    let config = ClientConfig {
        api_key: "test-key".into(),
        http_options,
    };
    let mut headers = HeaderMap::new();
    headers.insert("x-goog-api-key", HeaderValue::from_static("test-key"));
    let api_client = ApiClient::new(&config);
    ClientInner {
        http: reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap(),
        config,
        api_client,
    }
}

/// PNG signature followed by the start of an IHDR chunk.
pub fn png_bytes() -> Vec<u8> {
    vec![
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ]
}

pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00]
}

pub fn png_payload() -> ImagePayload {
    ImagePayload::new("image/png", png_bytes())
}

/// Generator double: echoes a PNG tagged with the prompt, fails when the
/// prompt contains `fail_on`, and records every call's parts.
#[derive(Default)]
pub struct FakeGenerator {
    pub fail_on: Option<String>,
    pub calls: Mutex<Vec<Vec<Part>>>,
}

impl FakeGenerator {
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<Part>> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn prompt_of(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(Part::text_value)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ImageGenerator for FakeGenerator {
    fn generate(&self, parts: Vec<Part>) -> BoxFuture<'_, Result<ImagePayload>> {
        Box::pin(async move {
            let prompt = prompt_of(&parts);
            self.calls.lock().unwrap().push(parts);
            if let Some(needle) = &self.fail_on {
                if prompt.contains(needle.as_str()) {
                    return Err(Error::ApiError {
                        status: 503,
                        message: "model overloaded".into(),
                    });
                }
            }
            let mut data = png_bytes();
            data.extend_from_slice(prompt.as_bytes());
            Ok(ImagePayload::new("image/png", data))
        })
    }
}
