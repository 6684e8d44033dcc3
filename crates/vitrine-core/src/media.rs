//! Media ingestion for image and video placement.
//!
//! A picked file is classified, measured and handed to a [`MediaUploader`]
//! which turns it into a source reference. Only once that finishes does a
//! placement ghost exist.

use crate::storage::BoxFuture;
use crate::tools::ToolKind;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// Raster formats accepted for image objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Container formats accepted for video objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoFormat {
    Mp4,
    WebM,
}

impl VideoFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "video/mp4",
            VideoFormat::WebM => "video/webm",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp4" | "m4v" => Some(VideoFormat::Mp4),
            "webm" => Some(VideoFormat::WebM),
            _ => None,
        }
    }

    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // ISO base media: size, then "ftyp"
        if data.len() >= 8 && &data[4..8] == b"ftyp" {
            return Some(VideoFormat::Mp4);
        }
        // EBML header
        if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            return Some(VideoFormat::WebM);
        }
        None
    }
}

/// What a media file turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image(ImageFormat),
    Video(VideoFormat),
}

impl MediaKind {
    /// Classify by content, falling back to the file extension.
    pub fn detect(file: &MediaFile) -> Option<Self> {
        if let Some(format) = ImageFormat::from_magic_bytes(&file.bytes) {
            return Some(MediaKind::Image(format));
        }
        if let Some(format) = VideoFormat::from_magic_bytes(&file.bytes) {
            return Some(MediaKind::Video(format));
        }
        let ext = file.extension()?;
        ImageFormat::from_extension(ext)
            .map(MediaKind::Image)
            .or_else(|| VideoFormat::from_extension(ext).map(MediaKind::Video))
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Video(_))
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaKind::Image(format) => format.mime_type(),
            MediaKind::Video(format) => format.mime_type(),
        }
    }
}

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
    }
}

/// Media ready to become a placement ghost.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMedia {
    pub kind: MediaKind,
    pub source_ref: String,
    /// Natural size in document units.
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported media file: {0}")]
    UnsupportedMedia(String),
    #[error("Expected {expected} but {name} is not one")]
    WrongKind { name: String, expected: &'static str },
    #[error("Unreadable image {name}: {reason}")]
    Unreadable { name: String, reason: String },
    #[error("The {0:?} tool does not take media")]
    NotMediaTool(ToolKind),
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// Turns media bytes into a reference an object can point at.
#[cfg(not(target_arch = "wasm32"))]
pub trait MediaUploader: Send + Sync {
    fn upload<'a>(
        &'a self,
        file: &'a MediaFile,
        kind: MediaKind,
    ) -> BoxFuture<'a, Result<String, UploadError>>;
}

/// Turns media bytes into a reference an object can point at (WASM version).
#[cfg(target_arch = "wasm32")]
pub trait MediaUploader {
    fn upload<'a>(
        &'a self,
        file: &'a MediaFile,
        kind: MediaKind,
    ) -> BoxFuture<'a, Result<String, UploadError>>;
}

/// Embeds media in the document as a base64 `data:` URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineEmbedder;

impl InlineEmbedder {
    pub fn data_url(file: &MediaFile, kind: MediaKind) -> String {
        format!("data:{};base64,{}", kind.mime_type(), STANDARD.encode(&file.bytes))
    }
}

impl MediaUploader for InlineEmbedder {
    fn upload<'a>(
        &'a self,
        file: &'a MediaFile,
        kind: MediaKind,
    ) -> BoxFuture<'a, Result<String, UploadError>> {
        Box::pin(async move { Ok(Self::data_url(file, kind)) })
    }
}

/// Read the pixel size of an image without decoding it.
pub fn image_dimensions(file: &MediaFile) -> Result<Size, UploadError> {
    let unreadable = |reason: String| UploadError::Unreadable {
        name: file.name.clone(),
        reason,
    };
    let (width, height) = image::ImageReader::new(Cursor::new(&file.bytes))
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| unreadable(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(unreadable("zero-sized image".to_string()));
    }
    Ok(Size::new(f64::from(width), f64::from(height)))
}

/// Classify, measure and upload a file for the image or video tool.
///
/// `want_video` selects which tool asked; a mismatching file is rejected.
pub async fn ingest(
    file: &MediaFile,
    want_video: bool,
    video_size: Size,
    uploader: &dyn MediaUploader,
) -> Result<PlacedMedia, UploadError> {
    let kind =
        MediaKind::detect(file).ok_or_else(|| UploadError::UnsupportedMedia(file.name.clone()))?;
    if kind.is_video() != want_video {
        return Err(UploadError::WrongKind {
            name: file.name.clone(),
            expected: if want_video { "a video" } else { "an image" },
        });
    }

    let size = match kind {
        MediaKind::Image(_) => image_dimensions(file)?,
        MediaKind::Video(_) => video_size,
    };
    let source_ref = uploader.upload(file, kind).await?;
    log::info!(
        "Ingested {} ({}, {}x{})",
        file.name,
        kind.mime_type(),
        size.width,
        size.height
    );
    Ok(PlacedMedia {
        kind,
        source_ref,
        width: size.width,
        height: size.height,
    })
}
