//! Creative Suite: AI poster and future-child portrait tools over the Gemini image API.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod media;
pub mod models;
pub mod orchestrator;
pub mod poster;
pub mod trial;
pub mod upload;
pub mod view;

#[cfg(test)]
mod test_support;

pub use creative_suite_types as types;

pub use client::{Client, ClientBuilder, HttpOptions};
pub use config::AppConfig;
pub use error::{Error, ErrorCategory, Result};
pub use generator::{GeminiImageGenerator, ImageGenerator};
pub use media::{GeneratedImage, ImagePayload};
pub use orchestrator::Orchestrator;
pub use poster::{PosterCategory, PosterRequest};
pub use trial::{FileStore, KeyValueStore, MemoryStore, TrialGate, TrialState};
pub use view::{Screen, Tool, ViewController};
