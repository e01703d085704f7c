use crate::core::counts::SequenceCounts;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one line per distinct sequence in first-seen order: the first
/// eight symbols, a literal `+`, the rest, a tab, and the count. The 8/rest
/// split mirrors two concatenated index reads; sequences shorter than eight
/// symbols get an empty remainder.
pub fn write(path: &Path, counts: &SequenceCounts) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("create {} failed", path.display()))?,
    );
    for (seq, count) in counts.rows() {
        let split = seq.len().min(8);
        writeln!(
            w,
            "{}+{}\t{}",
            String::from_utf8_lossy(&seq[..split]),
            String::from_utf8_lossy(&seq[split..]),
            count
        )?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census(seqs: &[&str]) -> SequenceCounts {
        let mut counts = SequenceCounts::new();
        counts.load(seqs.iter().map(|s| s.as_bytes().to_vec()).collect());
        counts
    }

    #[test]
    fn rows_split_after_the_eighth_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        let counts = census(&["ACGTACGTTT", "ACGTACGTTT", "GGGGGGGGAA"]);

        write(&path, &counts).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "ACGTACGT+TT\t2\nGGGGGGGG+AA\t1\n");
    }

    #[test]
    fn short_sequences_get_an_empty_remainder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        let counts = census(&["AC", "GT"]);

        write(&path, &counts).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "AC+\t1\nGT+\t1\n");
    }

    #[test]
    fn each_line_round_trips_to_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        let counts = census(&["AAAAAAAACC", "TTTTTTTTGG", "AAAAAAAACC"]);

        write(&path, &counts).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        for ((seq, count), line) in counts.rows().iter().zip(text.lines()) {
            let (cells, n) = line.split_once('\t').unwrap();
            let (first8, rest) = cells.split_once('+').unwrap();
            let mut joined = first8.as_bytes().to_vec();
            joined.extend_from_slice(rest.as_bytes());
            assert_eq!(&joined, seq);
            assert_eq!(n.parse::<u64>().unwrap(), *count);
        }
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("index.txt");
        assert!(write(&path, &census(&["ACGT"])).is_err());
    }
}
