use serde::{Deserialize, Serialize};

use crate::model::{Design, Placement};
use crate::weights::PairWeights;

/// Raw and normalized placement cost, plus the scalar score every solver minimizes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub pair_sum: f64,
    pub longest: f64,
    pub pair_norm: f64,
    pub longest_norm: f64,
    pub score: f64,
}

/// Evaluate the placement cost model: a normalized weighted pair-sum plus a normalized
/// longest-interconnect term. Both normalizers degrade to 0, not a division error, when
/// the board diagonal or the total pair weight is 0.
pub fn evaluate(
    design: &Design,
    placement: &Placement,
    weights: &PairWeights,
    w_pair: f64,
    w_longest: f64,
) -> Metrics {
    let diag = design.board.diagonal();
    let sum_w: f64 = if weights.is_empty() {
        1.0
    } else {
        weights.values().map(|w| f64::from(*w)).sum()
    };

    let mut pair_sum = 0.0;
    let mut longest = 0.0;
    for ((a, b), w) in weights {
        if *w == 0 {
            continue;
        }
        if let (Some(pa), Some(pb)) = (placement.get(a), placement.get(b)) {
            let dist = pa.euclid(pb);
            pair_sum += f64::from(*w) * dist;
            if dist > longest {
                longest = dist;
            }
        }
    }

    let pair_norm = if diag > 0.0 {
        pair_sum / (diag * sum_w.max(1.0))
    } else {
        0.0
    };
    let longest_norm = if diag > 0.0 { longest / diag } else { 0.0 };
    let score = w_pair * pair_norm + w_longest * longest_norm;

    Metrics {
        pair_sum,
        longest,
        pair_norm,
        longest_norm,
        score,
    }
}
