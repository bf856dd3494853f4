//! In-memory audio blobs and object URLs for playback and export.

mod store;

pub use store::{AudioBlob, ObjectUrl, ObjectUrlRegistry, UploadedFile};
