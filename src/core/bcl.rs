use crate::core::bci::TileEntry;
use crate::core::error::{Error, Result};
use crate::core::io::open_gzip_reader;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Bytes ahead of the body: a little-endian read count the sequencer wrote
/// for its own bookkeeping. Logged, never validated.
pub const HEADER_SIZE: usize = 4;

/// One cycle's decompressed base calls, held whole for the run's duration.
/// Every tile slices its own window out of the body; nothing mutates it.
pub struct CyclePayload {
    path: PathBuf,
    data: Vec<u8>,
}

impl CyclePayload {
    /// Decompresses one `NNNN.bcl.bgzf`/`.bcl.gz` file into memory. `threads`
    /// only drives the block-gzip decompressor; plain gzip ignores it.
    pub fn load(path: &Path, threads: usize) -> Result<Self> {
        let mut reader = open_gzip_reader(path, threads)?;
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::decode(path, format!("gzip decompression failed: {e}")))?;
        if data.len() < HEADER_SIZE {
            return Err(Error::decode(
                path,
                format!(
                    "payload is {} bytes, shorter than the {HEADER_SIZE}-byte header",
                    data.len()
                ),
            ));
        }
        let declared = LittleEndian::read_u32(&data[..HEADER_SIZE]);
        debug!(
            "loaded {}: {} body bytes, header declares {declared} reads",
            path.display(),
            data.len() - HEADER_SIZE
        );
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn body(&self) -> &[u8] {
        &self.data[HEADER_SIZE..]
    }

    /// One tile's window into the body: exactly `read_count` bytes starting
    /// at the tile's offset. A window past the body end means the index and
    /// this payload disagree, which the run cannot recover from.
    pub fn slice(&self, tile: &TileEntry) -> Result<&[u8]> {
        let body = self.body();
        let start = tile.byte_offset as usize;
        let end = start + tile.read_count as usize;
        if end > body.len() {
            return Err(Error::decode(
                &self.path,
                format!(
                    "tile {} spans bytes {start}..{end} but the body holds {}",
                    tile.tile_id,
                    body.len()
                ),
            ));
        }
        Ok(&body[start..end])
    }
}

/// Resolves one cycle's on-disk file. NextSeq lanes ship `NNNN.bcl.bgzf`;
/// older runs use `NNNN.bcl.gz`.
pub fn find_cycle_file(lane_dir: &Path, cycle: u32) -> Result<PathBuf> {
    let bgzf = lane_dir.join(format!("{cycle:04}.bcl.bgzf"));
    if bgzf.is_file() {
        return Ok(bgzf);
    }
    let gz = lane_dir.join(format!("{cycle:04}.bcl.gz"));
    if gz.is_file() {
        return Ok(gz);
    }
    Err(Error::io(
        bgzf,
        std::io::Error::from(std::io::ErrorKind::NotFound),
    ))
}
