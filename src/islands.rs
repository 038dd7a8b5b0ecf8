use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use log::info;

use crate::chromosome::Chromosome;
use crate::error::{Error, Result};
use crate::ga::{self, Island, Migrant, MigrationHook, NoMigration};
use crate::model::{Design, PositionField};
use crate::weights::PairWeights;

/// Everything needed to run one island, shared read-only across worker threads via
/// `Arc` so no copies of the Design/field/weights are taken per thread.
struct Shared {
    design: Design,
    field: PositionField,
    weights: PairWeights,
    comp_order: Vec<String>,
}

/// A migration hook wired into a ring: sends this island's best individual out on
/// `outbound` and drains every migrant waiting on `inbound`, without ever blocking.
struct RingMigration {
    outbound: Sender<Migrant>,
    inbound: Receiver<Migrant>,
}

impl MigrationHook for RingMigration {
    fn migrate(&mut self, _generation: u32, best: &Migrant) -> Vec<Migrant> {
        // An unbounded channel's send only fails once the receiver is gone; there is
        // nothing useful to do but skip exporting this round.
        let _ = self.outbound.send(best.clone());

        let mut incoming = Vec::new();
        while let Ok(migrant) = self.inbound.try_recv() {
            incoming.push(migrant);
        }
        incoming
    }
}

/// Parameters shared by every island plus the ring topology configuration.
#[derive(Copy, Clone, Debug)]
pub struct CoordinatorParams {
    pub islands: usize,
    pub migration_interval: u32,
    pub base_seed: u64,
    pub ga: ga::Params,
}

/// Run the island-model GA. With `islands == 1` this degenerates to a single GA run
/// with migration disabled. Otherwise spawns `islands` OS threads wired in a
/// unidirectional ring and joins all of them before returning the globally
/// lowest-scoring chromosome.
///
/// `cancel`, when set, is polled by every worker once per generation; a worker that
/// observes it set returns its current best at the next generation boundary instead of
/// running the remaining generations.
pub fn run(
    design: &Design,
    field: &PositionField,
    weights: &PairWeights,
    comp_order: &[String],
    params: CoordinatorParams,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<(Chromosome, f64)> {
    if params.islands == 1 {
        let mut island = Island::new(design, field, weights, comp_order, params.ga, params.base_seed);
        return Ok(run_with_cancellation(&mut island, 0, &mut NoMigration, cancel));
    }

    let shared = Arc::new(Shared {
        design: design.clone(),
        field: field.clone(),
        weights: weights.clone(),
        comp_order: comp_order.to_vec(),
    });

    // Ring topology: island i's outbound channel is Q[i]; its inbound channel is
    // Q[(i - 1) mod islands].
    let mut senders = Vec::with_capacity(params.islands);
    let mut receivers: Vec<Option<Receiver<Migrant>>> = Vec::with_capacity(params.islands);
    for _ in 0..params.islands {
        let (tx, rx) = mpsc::channel();
        senders.push(tx);
        receivers.push(Some(rx));
    }

    let mut handles = Vec::with_capacity(params.islands);
    for i in 0..params.islands {
        let shared = Arc::clone(&shared);
        let outbound = senders[i].clone();
        let inbound = receivers[(i + params.islands - 1) % params.islands]
            .take()
            .expect("each island's inbound channel is claimed exactly once");
        let seed = params.base_seed + 100 * i as u64;
        let ga_params = params.ga;
        let migration_interval = params.migration_interval;
        let cancel = cancel.clone();

        handles.push(
            thread::Builder::new()
                .name(format!("island-{}", i))
                .spawn(move || -> (Chromosome, f64) {
                    let mut island = Island::new(
                        &shared.design,
                        &shared.field,
                        &shared.weights,
                        &shared.comp_order,
                        ga_params,
                        seed,
                    );
                    let mut hook = RingMigration { outbound, inbound };
                    info!("island {} started (seed={})", i, seed);
                    let result =
                        run_with_cancellation(&mut island, migration_interval, &mut hook, cancel);
                    info!("island {} finished, best score={:.6}", i, result.1);
                    result
                })
                .expect("spawning an island worker thread"),
        );
    }

    // Dropping our copy of each sender (kept only to clone per-island above) lets a
    // ring's last receiver observe disconnection instead of hanging if a peer panics.
    drop(senders);

    let mut results = Vec::with_capacity(params.islands);
    for (i, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(result) => results.push(result),
            Err(_) => return Err(Error::WorkerFailure(format!("island {} panicked", i))),
        }
    }

    results
        .into_iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .ok_or_else(|| Error::WorkerFailure("no islands produced a result".into()))
}

/// Run generations one at a time so a cancellation flag can be observed at every
/// generation boundary, rather than handing the whole `generations` count to
/// `Island::run` in one call.
fn run_with_cancellation(
    island: &mut Island,
    migration_interval: u32,
    hook: &mut dyn MigrationHook,
    cancel: Option<Arc<AtomicBool>>,
) -> (Chromosome, f64) {
    for generation in 1..=island.generations() {
        if let Some(flag) = &cancel {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }
        island.step(generation, migration_interval, hook);
    }

    (island.best_chromosome(), island.best_score())
}
