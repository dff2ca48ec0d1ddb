//! Error definitions for the suite.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unreadable file {path}: {message}")]
    UnreadableFile { path: String, message: String },

    #[error("Unsupported image: {message}")]
    UnsupportedImage { message: String },

    #[error("Malformed image payload: {message}")]
    MalformedImage { message: String },

    #[error("No image data in response: {message}")]
    MissingImage { message: String },

    #[error("Content blocked: {message}")]
    ContentBlocked { message: String },

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Tools are locked until the trial is unlocked")]
    Locked,

    #[error("The {tool} tool is not open")]
    ToolNotActive { tool: &'static str },

    #[error("No generated image with index {index}")]
    NoSuchImage { index: usize },
}

/// 错误归类，决定向用户呈现的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 输入校验失败，用户修正后可重试。
    Validation,
    /// 外部服务失败，提示“请重试”。
    Service,
    /// 解锁口令错误或处于锁定状态。
    Credential,
    /// 本地文件读写失败（保存图片、持久化状态），换个路径或重试即可。
    Storage,
    /// 启动期配置错误，致命。
    Startup,
}

impl Error {
    /// 错误归类。
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField { .. }
            | Self::FileTooLarge { .. }
            | Self::UnreadableFile { .. }
            | Self::UnsupportedImage { .. }
            | Self::MalformedImage { .. }
            | Self::ToolNotActive { .. }
            | Self::NoSuchImage { .. } => ErrorCategory::Validation,
            Self::HttpClient { .. }
            | Self::ApiError { .. }
            | Self::Parse { .. }
            | Self::Serialization { .. }
            | Self::MissingImage { .. }
            | Self::ContentBlocked { .. } => ErrorCategory::Service,
            Self::IncorrectPassword | Self::Locked => ErrorCategory::Credential,
            Self::Io { .. } => ErrorCategory::Storage,
            Self::InvalidConfig { .. } => ErrorCategory::Startup,
        }
    }

    /// 用户修正输入或重试后是否可能成功。
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.category(), ErrorCategory::Startup)
    }

    /// API 错误对应的 HTTP 状态码。
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::ApiError { status, .. } => http::StatusCode::from_u16(*status).ok(),
            Self::HttpClient { source } => source.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
