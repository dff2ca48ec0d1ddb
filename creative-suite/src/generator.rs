//! The narrow seam between orchestration and the generative image service.

use std::time::Instant;

use creative_suite_types::content::{Content, Part};
use creative_suite_types::models::GenerateContentConfig;
use creative_suite_types::response::GenerateContentResponse;
use futures_util::future::BoxFuture;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::media::ImagePayload;
use crate::models::Models;

/// 默认的图像模型。
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// 图像生成接口：一组有序 parts（图片附件与文本提示）进，一张图片出。
pub trait ImageGenerator: Send + Sync {
    fn generate(&self, parts: Vec<Part>) -> BoxFuture<'_, Result<ImagePayload>>;
}

/// 基于 Gemini `generateContent` 的实现，只请求图像输出。
#[derive(Clone)]
pub struct GeminiImageGenerator {
    models: Models,
    model: String,
}

impl GeminiImageGenerator {
    #[must_use]
    pub fn new(client: &Client) -> Self {
        Self::with_model(client, DEFAULT_IMAGE_MODEL)
    }

    pub fn with_model(client: &Client, model: impl Into<String>) -> Self {
        Self {
            models: client.models(),
            model: model.into(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ImageGenerator for GeminiImageGenerator {
    fn generate(&self, parts: Vec<Part>) -> BoxFuture<'_, Result<ImagePayload>> {
        Box::pin(async move {
            let started = Instant::now();
            let response = self
                .models
                .generate_content_with_config(
                    &self.model,
                    vec![Content::user_parts(parts)],
                    GenerateContentConfig::image_output(),
                )
                .await?;
            let image = extract_image(response)?;
            tracing::debug!(
                model = %self.model,
                mime_type = %image.mime_type,
                bytes = image.size(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "image generated"
            );
            Ok(image)
        })
    }
}

/// 从响应中取出第一张内联图片。
///
/// # Errors
/// - prompt 被拦截或安全终止且无图片：[`Error::ContentBlocked`]
/// - 无候选或无内联数据：[`Error::MissingImage`]
pub fn extract_image(response: GenerateContentResponse) -> Result<ImagePayload> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let message = feedback
                .block_reason_message
                .clone()
                .unwrap_or_else(|| format!("prompt blocked: {reason:?}"));
            return Err(Error::ContentBlocked { message });
        }
    }

    if response.candidates.is_empty() {
        return Err(Error::MissingImage {
            message: "no candidates in response".into(),
        });
    }

    if let Some(blob) = response.first_inline_data() {
        return Ok(ImagePayload::from(blob.clone()));
    }

    match response.finish_reason() {
        Some(reason) if reason.is_safety_block() => Err(Error::ContentBlocked {
            message: format!("generation stopped: {reason:?}"),
        }),
        reason => Err(Error::MissingImage {
            message: match response.text() {
                Some(text) => format!("model replied with text only: {text}"),
                None => format!("no inline image part (finish reason {reason:?})"),
            },
        }),
    }
}
