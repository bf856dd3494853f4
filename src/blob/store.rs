//! Audio blobs and the object URLs that reference them.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// An in-memory audio payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    bytes: Vec<u8>,
    mime_type: String,
}

impl AudioBlob {
    /// Create a blob. Returns `None` for an empty payload.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }

        Some(Self {
            bytes,
            mime_type: mime_type.into(),
        })
    }

    /// Concatenate captured chunks into a single blob.
    ///
    /// Returns `None` when the chunks carry no bytes at all.
    pub fn from_chunks(chunks: &[Vec<u8>], mime_type: &str) -> Option<Self> {
        let bytes: Vec<u8> = chunks.concat();
        Self::new(bytes, mime_type)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty blobs cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A file the user picked as the reference sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub blob: AudioBlob,
    pub filename: String,
}

impl UploadedFile {
    /// Read a reference sample from disk.
    ///
    /// Returns `Ok(None)` if the file exists but is empty.
    pub fn open(path: &Path) -> std::io::Result<Option<Self>> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reference.audio")
            .to_string();

        let mime_type = mime_guess::from_path(path).first_or_octet_stream();

        Ok(AudioBlob::new(bytes, mime_type.essence_str()).map(|blob| Self { blob, filename }))
    }
}

/// A temporary local reference to a blob, usable as a player source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out object URLs and keeps the referenced blobs alive until revoked.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    next_id: u64,
    live: HashMap<ObjectUrl, AudioBlob>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return a fresh URL for it.
    pub fn create(&mut self, blob: &AudioBlob) -> ObjectUrl {
        self.next_id += 1;
        let url = ObjectUrl(format!("blob:timbre/{}", self.next_id));
        self.live.insert(url.clone(), blob.clone());
        log::trace!("created object url {url} ({} bytes)", blob.len());
        url
    }

    /// Look up the blob behind a live URL.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<&AudioBlob> {
        self.live.get(url)
    }

    /// Release a URL. Returns false if it was already revoked.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        let removed = self.live.remove(url).is_some();
        if removed {
            log::trace!("revoked object url {url}");
        }
        removed
    }

    /// Number of URLs currently alive.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
