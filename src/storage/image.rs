use bytes::Bytes;
use error_stack::Result;
use sha2::{Digest, Sha256};

use super::{Storage, StorageError};

/// Directory every post image is stored under.
pub const IMAGE_DIR: &str = "posts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Detects the image format from the first bytes of a file.
    #[must_use]
    pub fn sniff(content: &[u8]) -> Option<Self> {
        if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if content.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if content.len() >= 12 && &content[..4] == b"RIFF" && &content[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// Strips directories from an uploaded file name and replaces
/// anything outside of `[A-Za-z0-9._-]` with `_`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Saves an uploaded image under [`IMAGE_DIR`] and returns its
/// storage name.
///
/// The sanitized upload name is kept when it is free. Otherwise
/// a short hash of the content is appended to the file stem, then
/// a counter. Names are claimed with [`Storage::create_new`] so
/// concurrent uploads never end up sharing a file.
#[tracing::instrument(skip(storage, content), name = "storage.store_image")]
pub async fn store_image(
    storage: &dyn Storage,
    file_name: &str,
    kind: ImageKind,
    content: Bytes,
) -> Result<String, StorageError> {
    let mut file_name = sanitize_file_name(file_name);
    if !file_name.contains('.') {
        file_name = format!("{file_name}.{}", kind.extension());
    }

    let (stem, extension) = file_name
        .rsplit_once('.')
        .map_or((file_name.as_str(), ""), |(stem, ext)| (stem, ext));

    let hash = hex::encode(Sha256::digest(&content));
    let mut attempt = 0usize;
    loop {
        let candidate = match attempt {
            0 => format!("{IMAGE_DIR}/{file_name}"),
            1 => format!("{IMAGE_DIR}/{stem}_{}.{extension}", &hash[..7]),
            n => format!("{IMAGE_DIR}/{stem}_{}_{n}.{extension}", &hash[..7]),
        };

        match storage.create_new(&candidate, content.clone()).await {
            Ok(()) => return Ok(candidate),
            Err(report) if matches!(report.current_context(), StorageError::AlreadyExists) => {
                attempt += 1;
            }
            Err(report) => return Err(report),
        }
    }
}
