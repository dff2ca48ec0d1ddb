use serde::{Deserialize, Serialize};

use crate::enums::Modality;

/// 生成配置。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// 期望的输出模态。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<Modality>>,
}

impl GenerationConfig {
    /// 仅请求图像输出的配置。
    #[must_use]
    pub fn image_only() -> Self {
        Self {
            response_modalities: Some(vec![Modality::Image]),
        }
    }
}
