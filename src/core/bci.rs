use crate::core::error::{Error, Result};
use crate::core::io::MmapSource;
use byteorder::{ByteOrder, LittleEndian};
use std::path::Path;

/// One record of the per-lane tile index: `uint32 tile_id` then
/// `uint32 read_count`, little-endian, no padding between records.
pub const RECORD_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileEntry {
    pub tile_id: u32,
    pub read_count: u32,
    /// Prefix sum of `read_count` over all preceding entries, starting at 0.
    /// Doubles as the tile's byte offset into every cycle body.
    pub byte_offset: u64,
}

/// Decodes `s_<lane>.bci` into tile entries in file order.
///
/// The only validation is the record-size check: a file that is not a whole
/// number of records is corrupt and must not be floor-divided into "valid"
/// tiles. Duplicate tile ids pass through untouched.
pub fn parse(path: &Path) -> Result<Vec<TileEntry>> {
    let source = MmapSource::open(path)?;
    let data = source.bytes();
    if data.len() % RECORD_SIZE != 0 {
        return Err(Error::Format {
            path: path.to_path_buf(),
            len: data.len() as u64,
            record: RECORD_SIZE as u64,
        });
    }

    let mut tiles = Vec::with_capacity(data.len() / RECORD_SIZE);
    let mut offset = 0u64;
    for record in data.chunks_exact(RECORD_SIZE) {
        let tile_id = LittleEndian::read_u32(&record[0..4]);
        let read_count = LittleEndian::read_u32(&record[4..8]);
        tiles.push(TileEntry {
            tile_id,
            read_count,
            byte_offset: offset,
        });
        offset += u64::from(read_count);
    }
    Ok(tiles)
}

pub fn total_reads(tiles: &[TileEntry]) -> u64 {
    tiles.iter().map(|t| u64::from(t.read_count)).sum()
}
