// src/scrape/scrape.rs
use std::{
    thread, time::Duration,
    sync::{ mpsc, atomic::{ AtomicUsize, Ordering }}
};

use tracing::{info, warn};

use crate::{
    config::Config,
    core::Fetch,
    data::{FirmRecord, FirmStub},
    progress::Progress,
    specs::FirmDetailParser,
};

/// Fetch and parse every stub's detail page on a bounded pool of
/// `cfg.scrape.workers` threads.
///
/// Records come back in completion order, not stub order. A stub whose page
/// can't be fetched is logged and dropped; it never stops the batch.
pub fn collect_firms<F: Fetch + ?Sized>(
    stubs: &[FirmStub],
    fetcher: &F,
    cfg: &Config,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<FirmRecord> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(stubs.len());
    }

    let parser = FirmDetailParser::new(fetcher, cfg);
    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<(usize, Option<FirmRecord>)>();

    let workers = cfg.scrape.workers.min(stubs.len()).max(1);
    let pause = Duration::from_millis(cfg.scrape.pause_ms);
    info!(workers, firms = stubs.len(), "fetching firm pages");

    let mut results = Vec::with_capacity(stubs.len());

    thread::scope(|scope| {
        // Spawn workers
        for _ in 0..workers {
            let tx = res_tx.clone();
            let parser = &parser;
            let counter = &counter;

            scope.spawn(move || {
                loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    if i >= stubs.len() {
                        break;
                    }
                    let record = parser.extract(&stubs[i]);
                    if tx.send((i, record)).is_err() {
                        break;
                    }
                    if !pause.is_zero() {
                        thread::sleep(pause); // be polite
                    }
                }
            });
        }
        drop(res_tx); // this thread is the sole receiver now

        // Aggregate as units complete; ends once every worker has exited
        for (i, record) in res_rx {
            let firm = stubs[i].firm_name.as_str();
            match record {
                Some(rec) => {
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(firm);
                    }
                    results.push(rec);
                }
                None => {
                    warn!(firm, url = %stubs[i].firm_url, "detail page unavailable; firm skipped");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(firm);
                    }
                }
            }
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(collected = results.len(), queued = stubs.len(), "firm pages done");
    results
}
