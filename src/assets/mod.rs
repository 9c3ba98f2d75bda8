//! Loading of on-disk assets: textures, OBJ models and shader sources.
//!
//! Everything here is CPU-only and returns plain data; turning it into GPU objects is the
//! renderer's job.

pub mod obj;
pub mod texture;

use std::path::PathBuf;

/// Errors raised while loading assets from disk.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The image decoder rejected the file.
    #[error("failed to decode image {path}: {source}")]
    Image {
        /// File that failed.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
    /// The image has a channel count other than 3 or 4.
    #[error("unsupported texture channel count {0}, expected 3 or 4")]
    UnsupportedChannels(u8),
    /// An OBJ statement could not be parsed.
    #[error("OBJ parse error on line {line}: {message}")]
    Obj {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }
}
