//! Upload rules for embedded post images.
//!
//! One uniform limit applies to every upload path: the payload must be a
//! jpeg, png, or gif image (jpg is an alias of jpeg) of at most
//! [`IMAGE_MAX_BYTES`]. The byte content decides the format; a declared
//! Content-Type is only an early sanity check.

use mime::Mime;

/// Maximum accepted upload size: 2 MB.
pub const IMAGE_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Image formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Map an `image/*` media type to an accepted format, treating
    /// `image/jpg` as jpeg.
    pub fn from_mime(mime: &Mime) -> Option<Self> {
        if mime.type_() != mime::IMAGE {
            return None;
        }
        match mime.subtype().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detect the format from the payload's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    /// File extension used when storing the image.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

/// Validate a prospective upload and return the detected format.
///
/// Rejections carry user-facing field messages, mirroring the post and
/// comment validation style.
pub fn validate_image(
    content_type: Option<&Mime>,
    bytes: &[u8],
) -> Result<ImageFormat, Vec<String>> {
    let mut errors = Vec::new();

    if bytes.is_empty() {
        errors.push("image is required".to_string());
        return Err(errors);
    }
    if bytes.len() > IMAGE_MAX_BYTES {
        errors.push(format!(
            "image must not exceed {} bytes",
            IMAGE_MAX_BYTES
        ));
    }
    if let Some(mime) = content_type {
        if ImageFormat::from_mime(mime).is_none() {
            errors.push("image must be a jpeg, png, jpg, or gif".to_string());
        }
    }

    match ImageFormat::sniff(bytes) {
        Some(format) if errors.is_empty() => Ok(format),
        Some(_) => Err(errors),
        None => {
            errors.push("image must be a jpeg, png, jpg, or gif".to_string());
            errors.dedup();
            Err(errors)
        }
    }
}
