use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Media {
    /// Directory where uploaded images are kept.
    #[serde(default = "Media::default_root")]
    pub root: PathBuf,
    /// Largest accepted request body for forms with files.
    #[serde(default = "Media::default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for Media {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            max_upload_bytes: Self::default_max_upload_bytes(),
        }
    }
}

impl Media {
    const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

    fn default_root() -> PathBuf {
        PathBuf::from("media")
    }

    const fn default_max_upload_bytes() -> usize {
        Self::DEFAULT_MAX_UPLOAD_BYTES
    }
}
