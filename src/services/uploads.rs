// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Direct media uploads (video/photo posts) and Facebook text posts.
//!
//! Every file is validated for type and size before anything is sent.

use crate::error::{ClientError, Result};
use crate::services::ApiClient;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Largest accepted video upload (500 MiB).
pub const MAX_VIDEO_BYTES: u64 = 500 * 1024 * 1024;

/// Largest accepted photo upload (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest photo Instagram accepts (8 MiB).
pub const MAX_INSTAGRAM_IMAGE_BYTES: u64 = 8 * 1024 * 1024;

const VIDEO_SUBTYPES: [&str; 6] = ["mp4", "mov", "avi", "quicktime", "x-msvideo", "msvideo"];
const IMAGE_SUBTYPES: [&str; 4] = ["jpg", "jpeg", "png", "gif"];
const IG_IMAGE_SUBTYPES: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
enum MediaSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    source: MediaSource,
}

impl MediaFile {
    /// In-memory file.
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: MediaSource::Bytes(bytes),
        }
    }

    /// File on disk. Only metadata is read here; contents are read at upload.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ClientError::Validation(format!("{}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            file_name,
            size: metadata.len(),
            source: MediaSource::Path(path.to_path_buf()),
        })
    }

    async fn into_part(self) -> Result<Part> {
        let bytes = match self.source {
            MediaSource::Bytes(bytes) => bytes,
            MediaSource::Path(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| ClientError::Validation(format!("{}: {}", path.display(), e)))?,
        };

        Part::bytes(bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| ClientError::Validation(format!("invalid MIME type: {}", e)))
    }
}

fn has_subtype(mime: &str, kind: &str, allowed: &[&str]) -> bool {
    mime.trim()
        .to_ascii_lowercase()
        .strip_prefix(kind)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|sub| allowed.contains(&sub))
}

/// Reject anything that is not an mp4/mov/avi video of at most 500 MiB.
pub fn validate_video(file: &MediaFile) -> Result<()> {
    if !has_subtype(&file.mime_type, "video", &VIDEO_SUBTYPES) {
        return Err(ClientError::Validation(
            "Solo se permiten archivos de video (mp4, mov, avi)".to_string(),
        ));
    }
    if file.size > MAX_VIDEO_BYTES {
        return Err(ClientError::Validation(
            "El video no debe superar los 500MB".to_string(),
        ));
    }
    Ok(())
}

/// Reject anything that is not a jpg/png/gif image of at most 10 MiB.
pub fn validate_image(file: &MediaFile) -> Result<()> {
    if !has_subtype(&file.mime_type, "image", &IMAGE_SUBTYPES) {
        return Err(ClientError::Validation(
            "Solo se permiten imágenes (JPG, PNG, GIF)".to_string(),
        ));
    }
    if file.size > MAX_IMAGE_BYTES {
        return Err(ClientError::Validation(
            "La imagen no debe superar 10MB".to_string(),
        ));
    }
    Ok(())
}

/// Instagram is stricter: jpg/png only, at most 8 MiB.
pub fn validate_instagram_image(file: &MediaFile) -> Result<()> {
    if !has_subtype(&file.mime_type, "image", &IG_IMAGE_SUBTYPES) {
        return Err(ClientError::Validation(
            "Solo se permiten imágenes JPG o PNG".to_string(),
        ));
    }
    if file.size > MAX_INSTAGRAM_IMAGE_BYTES {
        return Err(ClientError::Validation(
            "La imagen no debe superar 8MB".to_string(),
        ));
    }
    Ok(())
}

fn require_text(text: &str, message: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ClientError::Validation(message.to_string()));
    }
    Ok(())
}

/// Client for direct uploads.
#[derive(Clone)]
pub struct UploadService {
    api: ApiClient,
}

impl UploadService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload a video to TikTok with a caption.
    pub async fn publish_tiktok_video(&self, video: MediaFile, caption: &str) -> Result<Value> {
        validate_video(&video)?;
        require_text(caption, "Escribe una descripción para el video")?;

        tracing::info!(file = %video.file_name, size = video.size, "Uploading TikTok video");
        let form = Form::new()
            .part("video", video.into_part().await?)
            .text("caption", caption.to_string());

        self.api
            .post_multipart("/posts/tiktok/video", form)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "TikTok video upload failed"))
    }

    /// Upload a photo to the linked Facebook page.
    pub async fn publish_facebook_photo(&self, photo: MediaFile, message: &str) -> Result<Value> {
        require_text(message, "Debes escribir un mensaje")?;
        validate_image(&photo)?;

        tracing::info!(file = %photo.file_name, size = photo.size, "Uploading Facebook photo");
        let form = Form::new()
            .text("message", message.to_string())
            .part("photo", photo.into_part().await?);

        self.api
            .post_multipart("/facebook/photo", form)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Facebook photo upload failed"))
    }

    /// Upload a photo to the linked Instagram account.
    pub async fn publish_instagram_photo(&self, photo: MediaFile, caption: &str) -> Result<Value> {
        require_text(caption, "Debes escribir una descripción")?;
        validate_instagram_image(&photo)?;

        tracing::info!(file = %photo.file_name, size = photo.size, "Uploading Instagram photo");
        let form = Form::new()
            .text("caption", caption.to_string())
            .part("photo", photo.into_part().await?);

        self.api
            .post_multipart("/instagram/photo", form)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Instagram photo upload failed"))
    }

    /// Publish a text post (optionally with a link) to Facebook.
    pub async fn publish_facebook_post(&self, message: &str, link: Option<&str>) -> Result<Value> {
        require_text(message, "Por favor, escribe un mensaje para publicar")?;

        let mut body = json!({ "message": message });
        if let Some(link) = link.filter(|l| !l.trim().is_empty()) {
            body["link"] = json!(link);
        }

        self.api
            .post_json("/posts/facebook", &body)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Facebook post failed"))
    }
}
