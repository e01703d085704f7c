use std::collections::HashMap;

#[derive(Clone, Copy, Debug)]
struct Tally {
    rank: usize,
    count: u64,
}

/// Census of distinct index sequences. Each key remembers the order it was
/// first seen so the report can emit rows deterministically without sorting
/// by count.
#[derive(Debug, Default)]
pub struct SequenceCounts {
    seqs: HashMap<Vec<u8>, Tally>,
}

impl SequenceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one batch of extracted reads into the census.
    pub fn load(&mut self, batch: Vec<Vec<u8>>) {
        for seq in batch {
            let rank = self.seqs.len();
            self.seqs
                .entry(seq)
                .or_insert(Tally { rank, count: 0 })
                .count += 1;
        }
    }

    /// Number of distinct sequences.
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    /// Sum of all counts, i.e. the number of reads folded in.
    pub fn total(&self) -> u64 {
        self.seqs.values().map(|t| t.count).sum()
    }

    /// `(sequence, count)` rows in first-seen order.
    pub fn rows(&self) -> Vec<(&[u8], u64)> {
        let mut rows: Vec<_> = self
            .seqs
            .iter()
            .map(|(seq, t)| (t.rank, seq.as_slice(), t.count))
            .collect();
        rows.sort_unstable_by_key(|&(rank, _, _)| rank);
        rows.into_iter().map(|(_, seq, count)| (seq, count)).collect()
    }
}
