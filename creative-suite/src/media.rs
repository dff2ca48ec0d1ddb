//! Image payloads exchanged between uploads, the generator and the views.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use creative_suite_types::content::{Blob, Part};

use crate::error::{Error, Result};

/// 单张上传图片的大小上限（4 MiB）。
pub const MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024;

/// 可接受的图片格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// 由 MIME 类型识别格式（`image/jpg` 视同 JPEG）。
    #[must_use]
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// 按文件头识别格式。
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        None
    }

    /// 按文件名猜测格式。
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        mime_guess::from_path(path)
            .iter()
            .find_map(|mime| Self::from_mime_type(mime.essence_str()))
    }
}

/// 带 MIME 类型的已编码图片。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// 解析 `data:<mime>;base64,<data>` 形式的 data URL。
    ///
    /// # Errors
    /// 前缀、MIME 类型、base64 标记或数据缺失或无效时返回 [`Error::MalformedImage`]。
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let malformed = |message: &str| Error::MalformedImage {
            message: message.to_string(),
        };
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| malformed("missing data: prefix"))?;
        let (header, encoded) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing payload separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| malformed("payload is not base64 encoded"))?;
        if mime_type.is_empty() {
            return Err(malformed("missing MIME type"));
        }
        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|err| malformed(&format!("invalid base64: {err}")))?;
        if data.is_empty() {
            return Err(malformed("empty payload"));
        }
        Ok(Self::new(mime_type, data))
    }

    /// 渲染为 data URL。
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    /// 识别出的格式；优先使用文件头。
    #[must_use]
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::sniff(&self.data).or_else(|| ImageFormat::from_mime_type(&self.mime_type))
    }

    /// 校验是否为可发送的编码图片：非空，且 MIME 类型为 `image/*`。
    ///
    /// # Errors
    /// 不满足时返回 [`Error::MalformedImage`]。
    pub fn ensure_well_formed(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(Error::MalformedImage {
                message: "empty image payload".into(),
            });
        }
        let is_image = self
            .mime_type
            .split_once('/')
            .is_some_and(|(kind, sub)| kind.eq_ignore_ascii_case("image") && !sub.is_empty());
        if !is_image {
            return Err(Error::MalformedImage {
                message: format!("expected an image MIME type, got {:?}", self.mime_type),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 转为请求中的内联数据 Part。
    #[must_use]
    pub fn to_part(&self) -> Part {
        Part::inline_data(self.data.clone(), self.mime_type.clone())
    }
}

impl From<Blob> for ImagePayload {
    fn from(blob: Blob) -> Self {
        Self::new(blob.mime_type, blob.data)
    }
}

/// 一张生成结果及其展示序号（从 1 开始）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub payload: ImagePayload,
    pub index: usize,
}

impl GeneratedImage {
    #[must_use]
    pub const fn new(payload: ImagePayload, index: usize) -> Self {
        Self { payload, index }
    }

    /// 下载文件名，例如 `ai_generated_image_1.png`。
    #[must_use]
    pub fn file_name(&self) -> String {
        let ext = self
            .payload
            .format()
            .map_or(ImageFormat::Png.extension(), ImageFormat::extension);
        format!("ai_generated_image_{}.{ext}", self.index)
    }

    /// 写入文件。
    ///
    /// # Errors
    /// 写入失败时返回错误。
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path, &self.payload.data).await?;
        Ok(())
    }
}
