//! Image loading utilities.
//!
//! Decodes image element sources into premultiplied pixmaps. Sources are
//! `data:` URIs (base64 or percent-encoded) or filesystem paths, optionally
//! prefixed with `file://`.

use std::path::Path;

use tiny_skia::{ColorU8, Pixmap};

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// GIF (first frame only).
    Gif,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "webp" => Self::WebP,
            "gif" => Self::Gif,
            _ => Self::Unknown,
        }
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            "image/gif" => Self::Gif,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }
}

/// Load an image element source: a data URI or a file path.
///
/// # Errors
///
/// Returns an error if the source cannot be read or decoded.
pub fn load_image_source(source: &str) -> RenderResult<Pixmap> {
    let source = source.trim();
    if source.starts_with("data:") {
        load_image_from_data_uri(source)
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        load_image_from_path(Path::new(path))
    }
}

/// Load an image from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_image_from_path(path: &Path) -> RenderResult<Pixmap> {
    let bytes = std::fs::read(path)?;
    let hinted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(ImageFormat::Unknown, ImageFormat::from_extension);
    let detected = ImageFormat::from_magic_bytes(&bytes);
    if hinted != ImageFormat::Unknown && detected != ImageFormat::Unknown && hinted != detected {
        tracing::debug!(
            "{} has a {hinted:?} extension but {detected:?} content",
            path.display()
        );
    }
    load_image_from_bytes(&bytes)
}

/// Decode raw image bytes into a premultiplied pixmap.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<Pixmap> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode {format:?} image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Resource(format!("Invalid image size {width}x{height}")))?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Load an image from a data URI.
///
/// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
///
/// # Errors
///
/// Returns an error if the data URI is malformed or the image cannot be decoded.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<Pixmap> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, encoded_data) = uri_data
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let bytes = if metadata.contains(";base64") {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?
    } else {
        percent_decode(encoded_data)?
    };

    let mime = metadata.split(';').next().unwrap_or_default();
    if !mime.is_empty() && ImageFormat::from_mime(mime) == ImageFormat::Unknown {
        tracing::debug!("Data URI declares unrecognised type {mime}; sniffing content");
    }

    load_image_from_bytes(&bytes)
}

/// Percent-decoding for non-base64 data URIs.
fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = bytes
                .get(i + 1..i + 3)
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}
