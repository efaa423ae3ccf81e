//! Image bucket. Uploads land under a generated file id and are served back
//! from `/media/{file_id}`, which is the URL embedded in records.

use super::{config::MAX_UPLOAD_BYTES, db_ops::StoreResult, errors::StoreError};
use async_trait::async_trait;
use regex::Regex;
use std::{io::ErrorKind, path::PathBuf, sync::OnceLock};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.split(';').next()?.trim() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Identify the format from the file's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// An image that passed boundary checks and may be handed to a bucket.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// The declared content type (if any) must agree with the bytes.
    pub fn new(
        declared: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, &'static str> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err("Image is larger than 10 MB");
        }
        let Some(kind) = ImageKind::sniff(&bytes) else {
            return Err("Image must be a JPEG, PNG or WebP file");
        };
        if let Some(declared) = declared {
            if ImageKind::from_content_type(declared) != Some(kind) {
                return Err("Image content does not match its file type");
            }
        }
        Ok(Self { kind, bytes })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredAsset {
    pub file_id: String,
    pub url: String,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> StoreResult<StoredAsset>;
    async fn delete(&self, file_id: &str) -> StoreResult<()>;
    async fn open(
        &self,
        file_id: &str,
    ) -> StoreResult<Option<(ImageKind, Vec<u8>)>>;
    /// The file id behind one of our view URLs; `None` for anything else,
    /// such as images hosted elsewhere.
    fn file_id_for_url(&self, url: &str) -> Option<String>;
}

fn file_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{32}\.(jpg|png|webp)$").expect("valid regex")
    })
}

pub fn is_valid_file_id(file_id: &str) -> bool {
    file_id_pattern().is_match(file_id)
}

pub fn new_file_id(kind: ImageKind) -> String {
    format!("{}.{}", uuid::Uuid::new_v4().simple(), kind.extension())
}

fn kind_of(file_id: &str) -> Option<ImageKind> {
    ImageKind::from_extension(file_id.rsplit('.').next()?)
}

/// Bucket backed by a local directory.
pub struct LocalBucket {
    dir: PathBuf,
    /// e.g. `https://real.example.com/media`
    base_url: String,
}

impl LocalBucket {
    pub fn new(dir: PathBuf, site_url: &str) -> Self {
        Self {
            dir,
            base_url: format!("{site_url}/media"),
        }
    }
}

#[async_trait]
impl AssetStore for LocalBucket {
    async fn upload(&self, image: ImageUpload) -> StoreResult<StoredAsset> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_id = new_file_id(image.kind);
        tokio::fs::write(self.dir.join(&file_id), &image.bytes).await?;
        tracing::info!(%file_id, bytes = image.bytes.len(), "stored image");

        Ok(StoredAsset {
            url: format!("{}/{}", self.base_url, file_id),
            file_id,
        })
    }

    async fn delete(&self, file_id: &str) -> StoreResult<()> {
        if !is_valid_file_id(file_id) {
            return Err(StoreError::NotFound);
        }
        match tokio::fs::remove_file(self.dir.join(file_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn open(
        &self,
        file_id: &str,
    ) -> StoreResult<Option<(ImageKind, Vec<u8>)>> {
        let Some(kind) = kind_of(file_id).filter(|_| is_valid_file_id(file_id))
        else {
            return Ok(None);
        };
        match tokio::fs::read(self.dir.join(file_id)).await {
            Ok(bytes) => Ok(Some((kind, bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn file_id_for_url(&self, url: &str) -> Option<String> {
        let file_id = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        is_valid_file_id(file_id).then(|| file_id.to_string())
    }
}
