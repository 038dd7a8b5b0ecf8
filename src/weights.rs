use std::collections::HashMap;

use crate::model::Design;

/// Unordered pair of component identifiers, canonicalized lexicographically so
/// `(a, b)` and `(b, a)` always hash to the same key.
pub type PairKey = (String, String);

/// Symmetric multiplicity map built once per solve and shared read-only by every
/// downstream consumer (sequential placer, GA fitness, objective evaluator).
pub type PairWeights = HashMap<PairKey, u32>;

fn canonical_pair(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn add_weight(weights: &mut PairWeights, a: &str, b: &str, amount: u32) {
    if a == b {
        return;
    }
    *weights.entry(canonical_pair(a, b)).or_insert(0) += amount;
}

/// Every unordered pair within a net's node list contributes +1. Nets with fewer than
/// two nodes are a no-op.
fn add_net(weights: &mut PairWeights, nodes: &[String]) {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            add_weight(weights, &nodes[i], &nodes[j], 1);
        }
    }
}

/// Build the symmetric pair-weight map from a Design's nets and links. Undefined or
/// missing component identifiers are tolerated here: they simply never match a placed
/// component later on.
pub fn build_pair_weights(design: &Design) -> PairWeights {
    let mut weights = PairWeights::new();

    for net in &design.nets {
        add_net(&mut weights, &net.nodes);
    }

    for link in &design.links {
        let count = link.count.max(1) as u32;
        add_weight(&mut weights, &link.a, &link.b, count);
    }

    weights
}

/// Weighted degree of a component: the sum of pair weights over every pair involving it.
pub fn weighted_degree(weights: &PairWeights, name: &str) -> u32 {
    weights
        .iter()
        .filter(|((a, b), _)| a == name || b == name)
        .map(|(_, w)| *w)
        .sum()
}

/// Weighted degree of every component in `names`, computed in one pass over `weights`
/// rather than one scan per component.
pub fn all_weighted_degrees(weights: &PairWeights, names: &[String]) -> HashMap<String, u32> {
    let mut degrees: HashMap<String, u32> = names.iter().map(|n| (n.clone(), 0)).collect();
    for ((a, b), w) in weights {
        if let Some(d) = degrees.get_mut(a) {
            *d += w;
        }
        if let Some(d) = degrees.get_mut(b) {
            *d += w;
        }
    }
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Board, Link, Net};

    fn design(nets: Vec<Net>, links: Vec<Link>) -> Design {
        Design {
            board: Board {
                width: 100.0,
                height: 100.0,
                grid: 1.0,
                margin: 5.0,
            },
            components: Vec::new(),
            nets,
            links,
            field: None,
        }
    }

    #[test]
    fn net_expansion_adds_all_pairs() {
        let nets = vec![Net {
            name: "BUS".into(),
            nodes: vec!["X".into(), "Y".into(), "Z".into()],
        }];
        let weights = build_pair_weights(&design(nets, Vec::new()));

        assert_eq!(weights.len(), 3);
        assert_eq!(weights[&("X".to_string(), "Y".to_string())], 1);
        assert_eq!(weights[&("X".to_string(), "Z".to_string())], 1);
        assert_eq!(weights[&("Y".to_string(), "Z".to_string())], 1);
    }

    #[test]
    fn net_and_link_multiplicities_aggregate() {
        let nets = vec![Net {
            name: "N".into(),
            nodes: vec!["A".into(), "B".into()],
        }];
        let links = vec![Link {
            a: "A".into(),
            b: "B".into(),
            count: 3,
        }];
        let weights = build_pair_weights(&design(nets, links));

        assert_eq!(weights[&("A".to_string(), "B".to_string())], 4);
    }

    #[test]
    fn non_positive_count_becomes_one() {
        let links = vec![Link {
            a: "A".into(),
            b: "B".into(),
            count: 0,
        }];
        let weights = build_pair_weights(&design(Vec::new(), links));
        assert_eq!(weights[&("A".to_string(), "B".to_string())], 1);
    }

    #[test]
    fn net_with_single_node_is_a_no_op() {
        let nets = vec![Net {
            name: "lonely".into(),
            nodes: vec!["A".into()],
        }];
        let weights = build_pair_weights(&design(nets, Vec::new()));
        assert!(weights.is_empty());
    }

    #[test]
    fn pair_key_is_canonicalized() {
        let links = vec![Link {
            a: "B".into(),
            b: "A".into(),
            count: 1,
        }];
        let weights = build_pair_weights(&design(Vec::new(), links));
        assert!(weights.contains_key(&("A".to_string(), "B".to_string())));
        assert!(!weights.contains_key(&("B".to_string(), "A".to_string())));
    }
}
