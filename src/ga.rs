use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::chromosome::{self, Chromosome};
use crate::model::{Design, Placement, PositionField};
use crate::objective;
use crate::weights::PairWeights;

#[derive(Copy, Clone, Debug)]
pub struct Params {
    pub pop_size: usize,
    pub generations: u32,
    pub mut_rate: f64,
    pub elite: usize,
    pub w_pair: f64,
    pub w_longest: f64,
}

/// A migrant sent or received at a migration point: the chromosome plus its
/// already-computed score, so the receiving island can slot it in without
/// re-evaluating.
#[derive(Clone)]
pub struct Migrant {
    pub chromosome: Chromosome,
    pub score: f64,
}

/// Pluggable migration hook so the generation loop stays agnostic to whether it runs
/// standalone (island coordinator with `islands == 1`) or wired into a ring.
pub trait MigrationHook {
    /// Called at every migration boundary with this island's current best individual.
    /// Returns every migrant that has arrived from upstream since the last call.
    fn migrate(&mut self, generation: u32, best: &Migrant) -> Vec<Migrant>;
}

/// No-op hook for a standalone run (island coordinator with `islands == 1`).
pub struct NoMigration;

impl MigrationHook for NoMigration {
    fn migrate(&mut self, _generation: u32, _best: &Migrant) -> Vec<Migrant> {
        Vec::new()
    }
}

struct Individual {
    chromosome: Chromosome,
    score: f64,
}

/// One island's population: tournament selection, uniform crossover, swap mutation,
/// elitism, run for a fixed number of generations. Deterministic given (seed, inputs)
/// when migration is disabled.
pub struct Island<'a> {
    design: &'a Design,
    field: &'a PositionField,
    weights: &'a PairWeights,
    comp_order: &'a [String],
    params: Params,
    m: usize,
    k: usize,
    rng: StdRng,
    population: Vec<Individual>,
}

impl<'a> Island<'a> {
    pub fn new(
        design: &'a Design,
        field: &'a PositionField,
        weights: &'a PairWeights,
        comp_order: &'a [String],
        params: Params,
        seed: u64,
    ) -> Self {
        let m = field.len();
        let k = comp_order.len();
        let rng = StdRng::seed_from_u64(seed);

        let mut island = Island {
            design,
            field,
            weights,
            comp_order,
            params,
            m,
            k,
            rng,
            population: Vec::with_capacity(params.pop_size),
        };

        let population = (0..params.pop_size)
            .map(|_| island.random_individual())
            .collect();
        island.population = population;
        island.sort_population();
        island
    }

    fn random_individual(&mut self) -> Individual {
        let mut chromosome = chromosome::init(self.m, self.k, &mut self.rng);
        chromosome::repair(&mut chromosome, self.k, &mut self.rng);
        let score = self.fitness(&chromosome);
        Individual { chromosome, score }
    }

    fn fitness(&self, chromosome: &Chromosome) -> f64 {
        let placement: Placement = chromosome::decode(chromosome, self.comp_order, self.field);
        objective::evaluate(
            self.design,
            &placement,
            self.weights,
            self.params.w_pair,
            self.params.w_longest,
        )
        .score
    }

    fn sort_population(&mut self) {
        self.population
            .sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap());
    }

    fn tournament(&mut self) -> usize {
        let pop_size = self.population.len();
        let sample_size = 3.min(pop_size);
        let idxs = rand::seq::index::sample(&mut self.rng, pop_size, sample_size);
        idxs.iter()
            .min_by(|&a, &b| {
                self.population[a]
                    .score
                    .partial_cmp(&self.population[b].score)
                    .unwrap()
            })
            .unwrap()
    }

    fn crossover(&mut self, p1: &[i64], p2: &[i64]) -> (Chromosome, Chromosome) {
        let mut c1 = Vec::with_capacity(self.m);
        let mut c2 = Vec::with_capacity(self.m);
        for i in 0..self.m {
            if self.rng.gen_bool(0.5) {
                c1.push(p2[i]);
                c2.push(p1[i]);
            } else {
                c1.push(p1[i]);
                c2.push(p2[i]);
            }
        }
        (c1, c2)
    }

    fn mutate(&mut self, chromosome: &mut [i64]) {
        if self.m < 2 {
            return;
        }
        if self.rng.gen_bool(self.params.mut_rate.clamp(0.0, 1.0)) {
            let i = self.rng.gen_range(0..self.m);
            let mut j = self.rng.gen_range(0..self.m);
            while j == i {
                j = self.rng.gen_range(0..self.m);
            }
            chromosome.swap(i, j);
        }
    }

    fn build_individual(&mut self, mut chromosome: Chromosome) -> Individual {
        chromosome::repair(&mut chromosome, self.k, &mut self.rng);
        let score = self.fitness(&chromosome);
        Individual { chromosome, score }
    }

    /// Run the generation loop for `params.generations` iterations, consulting `hook`
    /// at every migration boundary. Returns the best chromosome found in the final
    /// population (elitism keeps it there; this is not a separate best-so-far
    /// tracker).
    pub fn run(
        &mut self,
        migration_interval: u32,
        hook: &mut dyn MigrationHook,
    ) -> (Chromosome, f64) {
        for generation in 1..=self.params.generations {
            self.step(generation, migration_interval, hook);
        }
        (self.best_chromosome(), self.best_score())
    }

    /// Total number of generations this island is configured to run.
    pub fn generations(&self) -> u32 {
        self.params.generations
    }

    /// Run a single generation (the body of `run`'s loop), numbered `generation` for
    /// logging and for the `generation % migration_interval == 0` migration check.
    /// Exposed so a caller (the island coordinator) can interleave a cancellation
    /// check between generations.
    pub fn step(&mut self, generation: u32, migration_interval: u32, hook: &mut dyn MigrationHook) {
        let mut new_population = Vec::with_capacity(self.params.pop_size);

        for elite in self.population.iter().take(self.params.elite) {
            new_population.push(Individual {
                chromosome: elite.chromosome.clone(),
                score: elite.score,
            });
        }

        while new_population.len() < self.params.pop_size {
            let i1 = self.tournament();
            let i2 = self.tournament();
            let (p1, p2) = (
                self.population[i1].chromosome.clone(),
                self.population[i2].chromosome.clone(),
            );
            let (mut c1, mut c2) = self.crossover(&p1, &p2);
            self.mutate(&mut c1);
            self.mutate(&mut c2);

            new_population.push(self.build_individual(c1));
            if new_population.len() < self.params.pop_size {
                new_population.push(self.build_individual(c2));
            }
        }

        self.population = new_population;
        self.sort_population();

        debug!(
            "generation {}: best={:.6} worst={:.6}",
            generation,
            self.population.first().map(|i| i.score).unwrap_or(0.0),
            self.population.last().map(|i| i.score).unwrap_or(0.0),
        );

        if migration_interval > 0 && generation % migration_interval == 0 {
            self.migrate(generation, hook);
        }
    }

    /// The best chromosome in the current population (elitism keeps it there across
    /// generations; not a separate best-so-far tracker).
    pub fn best_chromosome(&self) -> Chromosome {
        self.population[0].chromosome.clone()
    }

    fn migrate(&mut self, generation: u32, hook: &mut dyn MigrationHook) {
        let best = Migrant {
            chromosome: self.population[0].chromosome.clone(),
            score: self.population[0].score,
        };
        trace!(
            "generation {}: emitting migrant score={:.6}",
            generation,
            best.score
        );

        let incoming = hook.migrate(generation, &best);
        if incoming.is_empty() {
            return;
        }
        trace!(
            "generation {}: accepting {} migrant(s)",
            generation,
            incoming.len()
        );

        for migrant in incoming {
            let worst_idx = self.population.len() - 1;
            self.population[worst_idx] = Individual {
                chromosome: migrant.chromosome,
                score: migrant.score,
            };
            self.sort_population();
        }
    }

    pub fn best_score(&self) -> f64 {
        self.population[0].score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Board, Component, Link};

    fn chain_design(n: usize) -> Design {
        let components: Vec<Component> = (0..n)
            .map(|i| Component {
                name: format!("C{}", i),
                w: 2.0,
                h: 2.0,
                movable: true,
                geometry: None,
            })
            .collect();
        let links: Vec<Link> = (0..n - 1)
            .map(|i| Link {
                a: format!("C{}", i),
                b: format!("C{}", i + 1),
                count: 1,
            })
            .collect();
        Design {
            board: Board {
                width: 100.0,
                height: 20.0,
                grid: 1.0,
                margin: 2.0,
            },
            components,
            nets: Vec::new(),
            links,
            field: None,
        }
    }

    fn ga_params() -> Params {
        Params {
            pop_size: 40,
            generations: 60,
            mut_rate: 0.2,
            elite: 2,
            w_pair: 1.0,
            w_longest: 0.3,
        }
    }

    #[test]
    fn elitism_keeps_best_score_non_increasing() {
        let design = chain_design(6);
        let field = crate::field::generate_grid(&design.board, 16, 10);
        let weights = crate::weights::build_pair_weights(&design);
        let comp_order = design.comp_order();

        let mut island = Island::new(&design, &field, &weights, &comp_order, ga_params(), 42);
        let mut prev = island.best_score();
        for generation in 1..=5 {
            island.step(generation, 0, &mut NoMigration);
            let curr = island.best_score();
            assert!(curr <= prev + 1e-12);
            prev = curr;
        }
    }

    #[test]
    fn single_island_is_deterministic_given_same_seed() {
        let design = chain_design(6);
        let field = crate::field::generate_grid(&design.board, 16, 10);
        let weights = crate::weights::build_pair_weights(&design);
        let comp_order = design.comp_order();

        let mut island1 = Island::new(&design, &field, &weights, &comp_order, ga_params(), 42);
        let (c1, s1) = island1.run(0, &mut NoMigration);

        let mut island2 = Island::new(&design, &field, &weights, &comp_order, ga_params(), 42);
        let (c2, s2) = island2.run(0, &mut NoMigration);

        assert_eq!(c1, c2);
        assert_eq!(s1, s2);
    }
}
