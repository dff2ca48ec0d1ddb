//! File input boundary: reads user-selected images under the upload size bound.

use std::path::Path;

use crate::error::{Error, Result};
use crate::media::{ImageFormat, ImagePayload, MAX_UPLOAD_BYTES};

/// 读取本地图片文件。
///
/// 先检查大小再读取内容；格式只认文件头，扩展名仅用于日志核对。
///
/// # Errors
/// - 超过 [`MAX_UPLOAD_BYTES`]：[`Error::FileTooLarge`]
/// - 无法读取：[`Error::UnreadableFile`]
/// - 非 PNG/JPEG/WEBP：[`Error::UnsupportedImage`]
pub async fn load_image(path: impl AsRef<Path>) -> Result<ImagePayload> {
    let path = path.as_ref();
    let unreadable = |err: std::io::Error| Error::UnreadableFile {
        path: path.display().to_string(),
        message: err.to_string(),
    };

    let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(Error::UnreadableFile {
            path: path.display().to_string(),
            message: "not a regular file".into(),
        });
    }
    check_size(metadata.len())?;

    let data = tokio::fs::read(path).await.map_err(unreadable)?;
    // The file may have grown between stat and read.
    check_size(data.len() as u64)?;
    payload_from_bytes(data, ImageFormat::from_path(path))
}

/// 将内存中的图片字节转为载荷（宿主自行读取文件时使用）。
///
/// # Errors
/// 同 [`load_image`]，但不会返回 [`Error::UnreadableFile`]。
pub fn image_from_bytes(data: Vec<u8>, file_name: &str) -> Result<ImagePayload> {
    check_size(data.len() as u64)?;
    payload_from_bytes(data, ImageFormat::from_path(Path::new(file_name)))
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(Error::FileTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

fn payload_from_bytes(data: Vec<u8>, guessed: Option<ImageFormat>) -> Result<ImagePayload> {
    if data.is_empty() {
        return Err(Error::UnsupportedImage {
            message: "file is empty".into(),
        });
    }
    let format = ImageFormat::sniff(&data).ok_or_else(|| Error::UnsupportedImage {
        message: "expected PNG, JPEG or WEBP".into(),
    })?;
    if let Some(named) = guessed.filter(|named| *named != format) {
        tracing::debug!(
            detected = %format.mime_type(),
            named = %named.mime_type(),
            "file extension does not match image header"
        );
    }
    Ok(ImagePayload::new(format.mime_type(), data))
}

/// 一个图片上传位（例如“父亲照片”）。
///
/// 保存当前预览与最近一次的错误提示；每次选择文件都会通过回调
/// 通知新的值（失败时为 `None`）。
#[derive(Debug, Clone)]
pub struct ImageUploader {
    title: String,
    preview: Option<ImagePayload>,
    error: Option<String>,
}

impl ImageUploader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            preview: None,
            error: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// 当前已接受的图片。
    #[must_use]
    pub const fn preview(&self) -> Option<&ImagePayload> {
        self.preview.as_ref()
    }

    /// 最近一次失败的提示文案。
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 选择文件；结果通过 `on_upload` 回传。
    pub async fn select_file<F>(&mut self, path: impl AsRef<Path>, on_upload: F)
    where
        F: FnOnce(Option<ImagePayload>),
    {
        self.error = None;
        let result = load_image(path.as_ref()).await;
        self.apply(result, on_upload);
    }

    /// 直接提供已读取的字节。
    pub fn select_bytes<F>(&mut self, data: Vec<u8>, file_name: &str, on_upload: F)
    where
        F: FnOnce(Option<ImagePayload>),
    {
        self.error = None;
        let result = image_from_bytes(data, file_name);
        self.apply(result, on_upload);
    }

    fn apply<F>(&mut self, result: Result<ImagePayload>, on_upload: F)
    where
        F: FnOnce(Option<ImagePayload>),
    {
        match result {
            Ok(payload) => {
                tracing::debug!(slot = %self.title, bytes = payload.size(), "image accepted");
                self.preview = Some(payload.clone());
                on_upload(Some(payload));
            }
            Err(err) => {
                tracing::info!(slot = %self.title, error = %err, "image rejected");
                self.error = Some(upload_message(&err).to_string());
                self.preview = None;
                on_upload(None);
            }
        }
    }
}

/// 上传失败时给用户的提示。
#[must_use]
pub fn upload_message(err: &Error) -> &'static str {
    match err {
        Error::FileTooLarge { .. } => "File size exceeds 4MB.",
        Error::UnsupportedImage { .. } | Error::MalformedImage { .. } => {
            "Unsupported image type. Use PNG, JPG or WEBP."
        }
        _ => "Could not read file.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png_bytes;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, data: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn load_image_sniffs_format() {
        // The extension lies; the header wins.
        let file = temp_file(".jpg", &png_bytes());
        let payload = load_image(file.path()).await.unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, png_bytes());
    }

    #[tokio::test]
    async fn five_mib_file_is_rejected_without_payload() {
        let file = temp_file(".png", &vec![0u8; 5 * 1024 * 1024]);
        let mut uploader = ImageUploader::new("Father's Photo");
        let mut received: Option<Option<ImagePayload>> = None;
        uploader
            .select_file(file.path(), |value| received = Some(value))
            .await;

        assert_eq!(received, Some(None));
        assert_eq!(uploader.error(), Some("File size exceeds 4MB."));
        assert!(uploader.preview().is_none());

        let err = load_image(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { size, .. } if size == 5 * 1024 * 1024));
    }

    #[tokio::test]
    async fn exactly_four_mib_is_accepted() {
        let mut data = png_bytes();
        data.resize(MAX_UPLOAD_BYTES as usize, 0);
        let file = temp_file(".png", &data);
        assert!(load_image(file.path()).await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let mut uploader = ImageUploader::new("Mother's Photo");
        let mut received = None;
        uploader
            .select_file(dir.path().join("nope.png"), |value| received = Some(value))
            .await;
        assert_eq!(received, Some(None));
        assert_eq!(uploader.error(), Some("Could not read file."));

        let err = load_image(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::UnreadableFile { .. }));
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mut uploader = ImageUploader::new("Logo (Optional)");
        uploader.select_bytes(b"plain text".to_vec(), "notes.txt", |_| {});
        assert_eq!(
            uploader.error(),
            Some("Unsupported image type. Use PNG, JPG or WEBP.")
        );

        let mut received = None;
        uploader.select_bytes(png_bytes(), "logo.png", |value| received = value);
        assert!(uploader.error().is_none());
        assert_eq!(received.unwrap().mime_type, "image/png");
        assert!(uploader.preview().is_some());
    }

    #[test]
    fn extension_alone_does_not_make_an_image() {
        for (data, name) in [
            (b"GIF89a\x01\x00\x01\x00".to_vec(), "photo.png"),
            (b"hello world, not an image".to_vec(), "notes.jpg"),
            (vec![1, 2, 3], "photo.webp"),
            (Vec::new(), "photo.png"),
        ] {
            let err = image_from_bytes(data, name).unwrap_err();
            assert!(matches!(err, Error::UnsupportedImage { .. }), "{name}: {err}");
        }
    }

    #[tokio::test]
    async fn renamed_gif_on_disk_is_rejected() {
        let file = temp_file(".png", b"GIF89a\x01\x00\x01\x00");
        let mut uploader = ImageUploader::new("Father's Photo");
        let mut received = None;
        uploader
            .select_file(file.path(), |value| received = Some(value))
            .await;
        assert_eq!(received, Some(None));
        assert_eq!(
            uploader.error(),
            Some("Unsupported image type. Use PNG, JPG or WEBP.")
        );
        assert!(matches!(
            load_image(file.path()).await.unwrap_err(),
            Error::UnsupportedImage { .. }
        ));
    }
}
