use crate::core::bci::{self, TileEntry};
use crate::core::bcl::{self, CyclePayload};
use crate::core::counts::SequenceCounts;
use crate::core::error::{Error, Result};
use crate::core::extract::{BaseTable, TileSlices};
use crossbeam_channel as channel;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_WORKERS: usize = 16;

pub struct RunConfig {
    pub lane_dir: PathBuf,
    pub lane: u32,
    pub start_cycle: u32,
    pub cycle_length: u32,
    pub workers: usize,
    pub base_table: BaseTable,
}

/// Runs the census over one lane: parse the tile index, materialize every
/// requested cycle, extract tiles on a bounded worker pool, and fold results
/// into the count table as they complete. The first failing tile aborts the
/// run; dropping the channels makes the remaining workers exit on their next
/// send.
pub fn run(cfg: RunConfig) -> Result<SequenceCounts> {
    let index_path = cfg.lane_dir.join(format!("s_{}.bci", cfg.lane));
    let tiles = bci::parse(&index_path)?;
    info!(
        "{}: {} tiles, {} reads",
        index_path.display(),
        tiles.len(),
        bci::total_reads(&tiles)
    );

    let t_load = Instant::now();
    let mut payloads = Vec::with_capacity(cfg.cycle_length as usize);
    for cycle in cfg.start_cycle..cfg.start_cycle.saturating_add(cfg.cycle_length) {
        let path = bcl::find_cycle_file(&cfg.lane_dir, cycle)?;
        info!("loading {}", path.display());
        payloads.push(CyclePayload::load(&path, cfg.workers)?);
    }
    debug!(
        "{} cycles loaded in {}",
        payloads.len(),
        fmt_dur(t_load.elapsed())
    );

    let payloads = Arc::new(payloads);
    let workers = cfg.workers.min(tiles.len()).max(1);
    let (tile_tx, tile_rx) = channel::unbounded::<TileEntry>();
    let (result_tx, result_rx) = channel::unbounded::<(u32, Vec<Vec<u8>>)>();
    let (err_tx, err_rx) = channel::bounded::<Error>(1);

    // The whole queue is staged before any worker starts; workers drain it
    // and exit when it runs dry.
    for entry in &tiles {
        let _ = tile_tx.send(*entry);
    }
    drop(tile_tx);

    let t_extract = Instant::now();
    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let tile_rx = tile_rx.clone();
        let result_tx = result_tx.clone();
        let err_tx = err_tx.clone();
        let payloads = Arc::clone(&payloads);
        let table = cfg.base_table;
        handles.push(thread::spawn(move || {
            for entry in tile_rx.iter() {
                match extract_tile(&payloads, entry, table) {
                    Ok(seqs) => {
                        if result_tx.send((entry.tile_id, seqs)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = err_tx.send(e);
                        break;
                    }
                }
            }
        }));
    }
    drop(tile_rx);
    drop(result_tx);
    drop(err_tx);

    let mut counts = SequenceCounts::new();
    let mut collected = 0usize;
    let mut err_open = true;
    while collected < tiles.len() {
        if err_open {
            channel::select! {
                recv(err_rx) -> err => {
                    match err {
                        Ok(err) => return Err(err),
                        // Disconnected: every worker has exited cleanly, so
                        // any remaining results sit buffered in the channel.
                        Err(_) => err_open = false,
                    }
                }
                recv(result_rx) -> msg => {
                    match msg {
                        Ok((tile_id, seqs)) => {
                            debug!("[{tile_id}] {} reads in", seqs.len());
                            counts.load(seqs);
                            collected += 1;
                        }
                        // Workers are gone with tiles outstanding; the one
                        // that bailed left its error in the channel.
                        Err(_) => match err_rx.try_recv() {
                            Ok(err) => return Err(err),
                            Err(_) => unreachable!("worker exited without a result or an error"),
                        },
                    }
                }
            }
        } else {
            let Ok((tile_id, seqs)) = result_rx.recv() else {
                unreachable!("worker exited without a result or an error");
            };
            debug!("[{tile_id}] {} reads in", seqs.len());
            counts.load(seqs);
            collected += 1;
        }
    }

    for handle in handles {
        let _ = handle.join();
    }
    debug!(
        "extracted {} tiles in {}",
        tiles.len(),
        fmt_dur(t_extract.elapsed())
    );
    info!(
        "{} reads tallied, {} distinct sequences",
        counts.total(),
        counts.len()
    );
    Ok(counts)
}

fn extract_tile(
    payloads: &[CyclePayload],
    entry: TileEntry,
    table: BaseTable,
) -> Result<Vec<Vec<u8>>> {
    let mut cycles = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let slice = payload
            .slice(&entry)
            .map_err(|e| Error::task(entry.tile_id, e))?;
        cycles.push(slice);
    }
    let tile = TileSlices { entry, cycles };
    Ok(tile.extract(table))
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
