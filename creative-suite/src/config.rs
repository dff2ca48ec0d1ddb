//! Environment-driven application settings for hosts.

use std::path::PathBuf;

use crate::client::Client;
use crate::error::Result;
use crate::generator::DEFAULT_IMAGE_MODEL;

/// 默认的试用状态文件。
pub const DEFAULT_STATE_PATH: &str = ".creative-suite/state.json";

/// 宿主启动所需的配置。
#[derive(Clone)]
pub struct AppConfig {
    pub client: Client,
    pub model: String,
    pub state_path: PathBuf,
}

impl AppConfig {
    /// 从环境变量读取：客户端配置见 [`Client::from_env`]，
    /// 另读 `CREATIVE_SUITE_MODEL` 与 `CREATIVE_SUITE_STATE`。
    ///
    /// # Errors
    /// 缺少 API 密钥或配置无效时返回 [`crate::Error::InvalidConfig`]。
    pub fn from_env() -> Result<Self> {
        let client = Client::from_env()?;
        let model = env_or("CREATIVE_SUITE_MODEL", DEFAULT_IMAGE_MODEL);
        let state_path = PathBuf::from(env_or("CREATIVE_SUITE_STATE", DEFAULT_STATE_PATH));
        Ok(Self {
            client,
            model,
            state_path,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
