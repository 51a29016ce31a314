//! Photo loading and validation

use std::path::Path;

use image::ImageFormat;

use fuellog_types::{Error, Result};

/// Supported image extensions
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// A photo ready to send
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Check if a path is a supported image file
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a photo, check it decodes, and work out its MIME type
pub fn load_image(path: &Path) -> Result<ImageInput> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if !is_supported_image(path) {
        return Err(Error::InvalidImageFormat(format!(
            "Unsupported image format: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)?;
    let mime_type = mime_for(format).ok_or_else(|| {
        Error::InvalidImageFormat(format!("Unsupported image format: {}", path.display()))
    })?;

    // Make sure the file actually decodes before paying for an API call
    image::load_from_memory_with_format(&bytes, format)?;

    Ok(ImageInput { bytes, mime_type })
}

/// Check a photo without keeping its bytes; returns the MIME type
pub fn validate_image(path: &Path) -> Result<&'static str> {
    Ok(load_image(path)?.mime_type)
}

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("pump.jpg")));
        assert!(is_supported_image(Path::new("pump.JPEG")));
        assert!(is_supported_image(Path::new("odo.png")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("pump")));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_image(Path::new("/definitely/not/here.jpg")),
            Err(Error::FileNotFound(_))
        ));
    }

    #[test]
    fn test_validate_image() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("pump.png");
        image::RgbImage::new(4, 4).save(&photo).unwrap();
        assert_eq!(validate_image(&photo).unwrap(), "image/png");

        // Right extension, wrong content
        let fake = dir.path().join("fake.jpg");
        std::fs::write(&fake, b"not an image").unwrap();
        assert!(validate_image(&fake).is_err());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(ImageFormat::Png), Some("image/png"));
        assert_eq!(mime_for(ImageFormat::Tiff), None);
    }
}
