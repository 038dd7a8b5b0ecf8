use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::chromosome::decode;
use crate::error::{Error, Result};
use crate::field::resolve_field;
use crate::ga;
use crate::islands::{self, CoordinatorParams};
use crate::model::{Design, Placement};
use crate::objective::{self, Metrics};
use crate::sequential;
use crate::weights::build_pair_weights;

fn default_nx() -> usize {
    16
}
fn default_ny() -> usize {
    10
}
fn default_seed() -> u64 {
    0
}
fn default_w_pair() -> f64 {
    1.0
}
fn default_w_longest() -> f64 {
    0.3
}
fn default_pop_size() -> usize {
    120
}
fn default_generations() -> u32 {
    400
}
fn default_mut_rate() -> f64 {
    0.2
}
fn default_elite() -> usize {
    2
}
fn default_islands() -> usize {
    4
}
fn default_migration_interval() -> u32 {
    20
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct SequentialOptions {
    #[serde(default = "default_nx")]
    pub nx: usize,
    #[serde(default = "default_ny")]
    pub ny: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_w_pair")]
    pub w_pair: f64,
    #[serde(default = "default_w_longest")]
    pub w_longest: f64,
}

impl Default for SequentialOptions {
    fn default() -> Self {
        SequentialOptions {
            nx: default_nx(),
            ny: default_ny(),
            seed: default_seed(),
            w_pair: default_w_pair(),
            w_longest: default_w_longest(),
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct GAOptions {
    #[serde(default = "default_nx")]
    pub nx: usize,
    #[serde(default = "default_ny")]
    pub ny: usize,
    #[serde(default = "default_pop_size")]
    pub pop_size: usize,
    #[serde(default = "default_generations")]
    pub generations: u32,
    #[serde(default = "default_mut_rate")]
    pub mut_rate: f64,
    #[serde(default = "default_elite")]
    pub elite: usize,
    #[serde(default = "default_islands")]
    pub islands: usize,
    #[serde(default = "default_migration_interval")]
    pub migration_interval: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_w_pair")]
    pub w_pair: f64,
    #[serde(default = "default_w_longest")]
    pub w_longest: f64,
}

impl Default for GAOptions {
    fn default() -> Self {
        GAOptions {
            nx: default_nx(),
            ny: default_ny(),
            pop_size: default_pop_size(),
            generations: default_generations(),
            mut_rate: default_mut_rate(),
            elite: default_elite(),
            islands: default_islands(),
            migration_interval: default_migration_interval(),
            seed: default_seed(),
            w_pair: default_w_pair(),
            w_longest: default_w_longest(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveResponse {
    pub placement: Placement,
    pub metrics: Metrics,
}

/// Validate a Design up front so neither solver ever has to handle a malformed input:
/// duplicate component names, Net/Link references to unknown components, non-positive
/// board dimensions, and the zero-component case are all rejected here as
/// `InvalidDesign`/`EmptyProblem`.
fn validate(design: &Design) -> Result<()> {
    if design.board.width <= 0.0 || design.board.height <= 0.0 {
        return Err(Error::InvalidDesign(
            "board width and height must both be positive".into(),
        ));
    }

    if design.components.is_empty() {
        return Err(Error::EmptyProblem);
    }

    let mut names = HashSet::with_capacity(design.components.len());
    for component in &design.components {
        if component.name.is_empty() {
            return Err(Error::InvalidDesign("component name must not be empty".into()));
        }
        if !names.insert(component.name.as_str()) {
            return Err(Error::InvalidDesign(format!(
                "duplicate component name {:?}",
                component.name
            )));
        }
    }

    for net in &design.nets {
        for node in &net.nodes {
            if !names.contains(node.as_str()) {
                return Err(Error::InvalidDesign(format!(
                    "net {:?} references unknown component {:?}",
                    net.name, node
                )));
            }
        }
    }

    for link in &design.links {
        if !names.contains(link.a.as_str()) || !names.contains(link.b.as_str()) {
            return Err(Error::InvalidDesign(format!(
                "link references unknown component ({:?}, {:?})",
                link.a, link.b
            )));
        }
    }

    Ok(())
}

/// Run the deterministic greedy sequential placer end to end: resolve the field,
/// place, evaluate the objective.
pub fn solve_sequential(design: &Design, options: SequentialOptions) -> Result<SolveResponse> {
    validate(design)?;
    info!(
        "solve_sequential: {} components, w_pair={} w_longest={}",
        design.component_count(),
        options.w_pair,
        options.w_longest
    );

    let (placement, field) = sequential::solve(design, options.nx, options.ny)?;
    let _ = field; // field is only needed to drive placement; metrics read `design` + `placement`.
    let weights = build_pair_weights(design);
    let metrics = objective::evaluate(design, &placement, &weights, options.w_pair, options.w_longest);

    Ok(SolveResponse { placement, metrics })
}

/// Run the island-model GA end to end: resolve the field, fix `comp_order`, run the
/// coordinator, decode the winning chromosome, evaluate the objective.
pub fn solve_ga(design: &Design, options: GAOptions) -> Result<SolveResponse> {
    solve_ga_cancellable(design, options, None)
}

/// Same as [`solve_ga`] but accepting a cancellation flag every worker polls once per
/// generation.
pub fn solve_ga_cancellable(
    design: &Design,
    options: GAOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<SolveResponse> {
    validate(design)?;
    info!(
        "solve_ga: {} components, islands={} pop_size={} generations={}",
        design.component_count(),
        options.islands,
        options.pop_size,
        options.generations
    );

    let field = resolve_field(design, options.nx, options.ny)?;
    let weights = build_pair_weights(design);
    let comp_order = design.comp_order();

    let coordinator_params = CoordinatorParams {
        islands: options.islands.max(1),
        migration_interval: options.migration_interval,
        base_seed: options.seed,
        ga: ga::Params {
            pop_size: options.pop_size,
            generations: options.generations,
            mut_rate: options.mut_rate,
            elite: options.elite,
            w_pair: options.w_pair,
            w_longest: options.w_longest,
        },
    };

    let (chromosome, _score) = islands::run(
        design,
        &field,
        &weights,
        &comp_order,
        coordinator_params,
        cancel,
    )?;

    let placement = decode(&chromosome, &comp_order, &field);
    let metrics = objective::evaluate(design, &placement, &weights, options.w_pair, options.w_longest);

    Ok(SolveResponse { placement, metrics })
}
