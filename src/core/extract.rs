use crate::core::bci::TileEntry;
use log::debug;

/// Two-bit base decode table plus the substitute symbol for no-call bytes.
/// Passed into extraction explicitly rather than living as a process-wide
/// constant.
#[derive(Clone, Copy, Debug)]
pub struct BaseTable {
    pub symbols: [u8; 4],
    pub no_call: u8,
}

impl Default for BaseTable {
    fn default() -> Self {
        Self {
            symbols: *b"ACGT",
            no_call: b'N',
        }
    }
}

impl BaseTable {
    /// Decodes one raw base-call byte. Zero is the no-call sentinel; any
    /// other value selects a symbol by its low two bits.
    #[inline]
    pub fn decode(self, raw: u8) -> u8 {
        if raw == 0 {
            self.no_call
        } else {
            self.symbols[(raw & 0b11) as usize]
        }
    }
}

/// One tile's view of every loaded cycle, in cycle order. Slice `c` holds
/// the tile's calls for cycle `c`; each one is `read_count` bytes long.
pub struct TileSlices<'a> {
    pub entry: TileEntry,
    pub cycles: Vec<&'a [u8]>,
}

impl TileSlices<'_> {
    /// Decodes the tile into one sequence per read, in read order. A no-call
    /// byte becomes the substitute symbol at that cycle position; the read
    /// keeps its full cycle-count length either way.
    pub fn extract(&self, table: BaseTable) -> Vec<Vec<u8>> {
        debug!(
            "[{}] extracting {} reads over {} cycles",
            self.entry.tile_id,
            self.entry.read_count,
            self.cycles.len()
        );
        let reads = self.entry.read_count as usize;
        let mut seqs = Vec::with_capacity(reads);
        for i in 0..reads {
            let mut seq = Vec::with_capacity(self.cycles.len());
            for cycle in &self.cycles {
                seq.push(table.decode(cycle[i]));
            }
            seqs.push(seq);
        }
        seqs
    }
}
