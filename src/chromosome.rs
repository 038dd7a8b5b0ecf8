use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Placement, PositionField};

/// Sentinel for an empty chromosome slot. Gene values in `[0, K)` identify a component
/// by its index into `comp_order`.
pub const VACANT: i64 = -1;

/// Fixed-length vector of length M; each cell holds a component index in `[0, K)` or
/// `VACANT`. A flat vector with a vacancy sentinel, rather than a permutation, so M can
/// exceed K and uniform crossover stays meaningful without a decoder discontinuity.
pub type Chromosome = Vec<i64>;

/// Build a random chromosome: K distinct position slots (sampled without replacement)
/// hold component ids `0..K` in order; the remaining `M - K` slots are vacant.
pub fn init(m: usize, k: usize, rng: &mut impl Rng) -> Chromosome {
    let mut genes = vec![VACANT; m];
    let mut slots: Vec<usize> = (0..m).collect();
    slots.shuffle(rng);
    for (comp_id, &slot) in slots.iter().take(k).enumerate() {
        genes[slot] = comp_id as i64;
    }
    genes
}

/// Decode a chromosome into a Placement: `comp_order[gene(i)] -> field[i]` for every
/// non-vacant slot `i`.
pub fn decode(chromosome: &Chromosome, comp_order: &[String], field: &PositionField) -> Placement {
    let mut placement = Placement::new();
    for (slot, &gene) in chromosome.iter().enumerate() {
        if gene >= 0 {
            let name = comp_order[gene as usize].clone();
            placement.insert(name, field[slot]);
        }
    }
    placement
}

/// Restore the "each component id in `[0, K)` appears exactly once" invariant:
/// non-integer/out-of-range genes and duplicates become vacant, then missing ids are
/// written into randomly chosen vacant slots. Total by construction; cannot fail.
pub fn repair(chromosome: &mut Chromosome, k: usize, rng: &mut impl Rng) {
    let mut seen = vec![false; k];

    for gene in chromosome.iter_mut() {
        let valid = *gene >= 0 && (*gene as usize) < k;
        if !valid {
            *gene = VACANT;
            continue;
        }
        let id = *gene as usize;
        if seen[id] {
            *gene = VACANT;
        } else {
            seen[id] = true;
        }
    }

    let missing: Vec<i64> = (0..k as i64).filter(|&id| !seen[id as usize]).collect();
    let mut empties: Vec<usize> = chromosome
        .iter()
        .enumerate()
        .filter(|(_, &g)| g == VACANT)
        .map(|(i, _)| i)
        .collect();
    empties.shuffle(rng);

    for (id, slot) in missing.into_iter().zip(empties.into_iter()) {
        chromosome[slot] = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(m: usize) -> PositionField {
        (0..m).map(|i| Position::new(i as f64, 0.0)).collect()
    }

    fn comp_order(k: usize) -> Vec<String> {
        (0..k).map(|i| format!("C{}", i)).collect()
    }

    #[test]
    fn init_then_repair_covers_every_component_exactly_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let (m, k) = (10, 4);
        let mut chromosome = init(m, k, &mut rng);
        repair(&mut chromosome, k, &mut rng);

        let mut seen = vec![0u32; k];
        let mut vacant = 0;
        for &gene in &chromosome {
            if gene == VACANT {
                vacant += 1;
            } else {
                seen[gene as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
        assert_eq!(vacant, m - k);
    }

    #[test]
    fn repair_removes_duplicates_and_fills_missing() {
        let mut rng = StdRng::seed_from_u64(3);
        // 0 appears twice, 2 is missing entirely, 1 out of range.
        let mut chromosome: Chromosome = vec![0, 0, 99, VACANT, VACANT];
        repair(&mut chromosome, 3, &mut rng);

        let mut seen = vec![0u32; 3];
        for &gene in &chromosome {
            if gene != VACANT {
                seen[gene as usize] += 1;
            }
        }
        assert_eq!(seen, vec![1, 1, 1]);
    }

    #[test]
    fn decode_reads_gene_to_field_mapping() {
        let chromosome: Chromosome = vec![VACANT, 1, VACANT, 0];
        let placement = decode(&chromosome, &comp_order(2), &field(4));
        assert_eq!(placement["C1"], Position::new(1.0, 0.0));
        assert_eq!(placement["C0"], Position::new(3.0, 0.0));
        assert_eq!(placement.len(), 2);
    }

    #[test]
    fn decode_of_init_round_trips_through_placement() {
        let mut rng = StdRng::seed_from_u64(11);
        let (m, k) = (6, 6);
        let mut chromosome = init(m, k, &mut rng);
        repair(&mut chromosome, k, &mut rng);
        let names = comp_order(k);
        let positions = field(m);

        let placement = decode(&chromosome, &names, &positions);
        assert_eq!(placement.len(), k);
        for name in &names {
            assert!(placement.contains_key(name));
        }
    }
}
