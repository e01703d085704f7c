use std::path::PathBuf;
use thiserror::Error;

/// Result alias for the extraction core.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures the pipeline can hit. Every one of them is fatal to the run:
/// this is a single-pass batch job with no partial output and no resumption.
#[derive(Debug, Error)]
pub enum Error {
    /// Tile index whose size is not a whole number of records.
    #[error(
        "tile index {}: {len} bytes is not a multiple of the {record}-byte record size",
        .path.display()
    )]
    Format {
        path: PathBuf,
        len: u64,
        record: u64,
    },

    /// Corrupt cycle payload, or an index/payload mismatch while slicing.
    #[error("cycle payload {}: {msg}", .path.display())]
    Decode { path: PathBuf, msg: String },

    /// Filesystem failure, annotated with the path involved.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An extraction task failed; wraps the underlying error.
    #[error("tile {tile_id}: {source}")]
    Task {
        tile_id: u32,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Error::Decode {
            path: path.into(),
            msg: msg.into(),
        }
    }

    pub(crate) fn task(tile_id: u32, source: Error) -> Self {
        Error::Task {
            tile_id,
            source: Box::new(source),
        }
    }
}
