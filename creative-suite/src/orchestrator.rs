//! Builds image requests and fans them out to the generator.

use std::time::Instant;

use creative_suite_types::content::Part;
use futures_util::future::try_join_all;

use crate::error::Result;
use crate::generator::ImageGenerator;
use crate::media::{GeneratedImage, ImagePayload};
use crate::poster::PosterRequest;

/// 四个固定的孩子肖像 prompt，顺序即结果顺序。
pub const CHILD_PROMPTS: [&str; 4] = [
    "Using the two images of the parents provided, generate a photorealistic image of what their child might look like as a toddler (around 3 years old). The output should be a single, clear portrait of the smiling child.",
    "Using the two images of the parents provided, generate a photorealistic image of what their child might look like at age 5. The output should be a single, clear portrait of the child.",
    "Based on the genetic features of the two parents in the images, create a realistic portrait of their potential child at around 6 years old, looking curious.",
    "Synthesize the features from the two parent images to generate a high-quality, realistic portrait of their potential child at age 4.",
];

/// 图片请求编排器。
#[derive(Debug, Clone)]
pub struct Orchestrator<G> {
    generator: G,
}

impl<G: ImageGenerator> Orchestrator<G> {
    pub const fn new(generator: G) -> Self {
        Self { generator }
    }

    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// 由父母照片并行生成四张孩子肖像。
    ///
    /// 任一请求失败则整批失败，不返回部分结果。
    ///
    /// # Errors
    /// 照片无效时返回 [`crate::Error::MalformedImage`]；否则透传生成错误。
    pub async fn generate_child_images(
        &self,
        father: &ImagePayload,
        mother: &ImagePayload,
    ) -> Result<Vec<GeneratedImage>> {
        father.ensure_well_formed()?;
        mother.ensure_well_formed()?;

        let started = Instant::now();
        tracing::info!(requests = CHILD_PROMPTS.len(), "generating child portraits");

        let father_part = father.to_part();
        let mother_part = mother.to_part();
        let requests = CHILD_PROMPTS.iter().map(|prompt| {
            let parts = vec![father_part.clone(), mother_part.clone(), Part::text(*prompt)];
            self.generator.generate(parts)
        });

        let payloads = try_join_all(requests).await.inspect_err(|err| {
            tracing::warn!(error = %err, "child portrait batch failed");
        })?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "child portraits ready"
        );
        Ok(payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| GeneratedImage::new(payload, i + 1))
            .collect())
    }

    /// 生成一张广告海报。
    ///
    /// # Errors
    /// 表单无效时返回校验错误；否则透传生成错误。
    pub async fn generate_poster(&self, request: &PosterRequest) -> Result<GeneratedImage> {
        request.validate()?;

        let started = Instant::now();
        tracing::info!(
            category = %request.category,
            logo = request.logo.is_some(),
            extra_image = request.extra_image.is_some(),
            "generating poster"
        );

        let payload = self
            .generator
            .generate(request.parts())
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "poster generation failed"))?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "poster ready"
        );
        Ok(GeneratedImage::new(payload, 1))
    }
}
