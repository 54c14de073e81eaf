// src/utils/image.rs

//! Profile image loading and `data:` URL encoding.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;
use crate::models::FormError;

/// MIME type for a supported image file extension.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// Encode raw bytes as a base64 `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file and return it as a `data:` URL.
///
/// The size cap is checked against file metadata before the file is read.
pub async fn encode_image(path: &Path, max_bytes: u64) -> Result<String> {
    let mime = mime_for(path)
        .ok_or_else(|| FormError::UnsupportedImage(path.display().to_string()))?;

    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        return Err(FormError::ImageTooLarge {
            size,
            limit: max_bytes,
        }
        .into());
    }

    let bytes = tokio::fs::read(path).await?;
    log::debug!("Encoded {} ({} bytes) as {}", path.display(), bytes.len(), mime);
    Ok(to_data_url(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::AppError;

    fn temp_image(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("me.PNG")), Some("image/png"));
        assert_eq!(mime_for(Path::new("me.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("notes.txt")), None);
        assert_eq!(mime_for(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_encode_small_image() {
        let file = temp_image(".png", b"\x89PNG");
        let url = encode_image(file.path(), 1024).await.unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_oversized_image_rejected() {
        let file = temp_image(".jpg", &[0u8; 64]);
        let err = encode_image(file.path(), 63).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Form(FormError::ImageTooLarge { size: 64, limit: 63 })
        ));
    }

    #[tokio::test]
    async fn test_non_image_rejected() {
        let file = temp_image(".txt", b"hello");
        let err = encode_image(file.path(), 1024).await.unwrap_err();
        assert!(matches!(err, AppError::Form(FormError::UnsupportedImage(_))));
    }
}
