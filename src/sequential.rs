use log::info;

use crate::error::Result;
use crate::field::resolve_field;
use crate::model::{Design, Placement, Position, PositionField};
use crate::weights::{all_weighted_degrees, build_pair_weights, PairWeights};

/// Weighted-degree-ordered greedy insertion: place the most-connected components first,
/// each at the free position minimizing its incremental cost against what's already
/// placed. Deterministic given the same Design and field; ignores any seed.
pub fn place(design: &Design, field: &PositionField) -> Placement {
    let weights = build_pair_weights(design);
    let order = ordering(design, &weights);

    let mut free: Vec<(usize, &Position)> = field.iter().enumerate().collect();
    let mut placed: Placement = Placement::new();

    for name in &order {
        let (slot, _) = free
            .iter()
            .enumerate()
            .min_by(|(_, (_, a)), (_, (_, b))| {
                let cost_a = incremental_cost(&weights, name, a, &placed);
                let cost_b = incremental_cost(&weights, name, b, &placed);
                cost_a
                    .partial_cmp(&cost_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("field is non-empty for every remaining component");

        let (_, position) = free.remove(slot);
        placed.insert(name.clone(), *position);
    }

    placed
}

/// Components ordered by weighted degree descending, ties broken by identifier
/// lexicographic ascending. Order is fixed up front so ties resolve the same way on
/// every run (required for invariant 7, sequential determinism).
fn ordering(design: &Design, weights: &PairWeights) -> Vec<String> {
    let names = design.comp_order();
    let degrees = all_weighted_degrees(weights, &names);

    let mut order = names;
    order.sort_by(|a, b| {
        degrees[b]
            .cmp(&degrees[a])
            .then_with(|| a.cmp(b))
    });
    order
}

/// Additional pair_sum contribution from placing `name` at `candidate`, given what is
/// already in `placed`.
fn incremental_cost(
    weights: &PairWeights,
    name: &str,
    candidate: &Position,
    placed: &Placement,
) -> f64 {
    let mut total = 0.0;
    for ((a, b), w) in weights {
        if *w == 0 {
            continue;
        }
        let other = if a == name {
            Some(b)
        } else if b == name {
            Some(a)
        } else {
            None
        };
        if let Some(other) = other {
            if let Some(other_pos) = placed.get(other) {
                total += f64::from(*w) * candidate.euclid(other_pos);
            }
        }
    }
    total
}

/// Resolve the field and run the greedy placer in one call, the shape the Solver Facade
/// invokes directly.
pub fn solve(design: &Design, nx: usize, ny: usize) -> Result<(Placement, PositionField)> {
    let field = resolve_field(design, nx, ny)?;
    info!(
        "sequential placer: {} components, {} candidate positions",
        design.component_count(),
        field.len()
    );
    let placement = place(design, &field);
    Ok((placement, field))
}
