//! Simulation engine for community evolution.
//!
//! Each generation is packed, selected on coverage and mutated. Packing and
//! mutation run in parallel across communities; every community gets its
//! own RNG seeded from the master stream in community order, so a seeded
//! run gives the same result on any number of threads.

use crate::base::{Community, Generation};
use crate::errors::Result;
use crate::evolution::MutationOperator;
use crate::packing::{Coverage, IntervalPacker};
use crate::simulation::configs::{Configuration, InitializationConfig};
use crate::simulation::initialization::{initial_generation, load_seed_generation, CommunityFactory};
use crate::storage::{Progress, Recorder, RecordingStrategy};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Summary of per-community coverage in one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoverageStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl CoverageStats {
    /// Population statistics of `values`; all zero for an empty slice.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

/// What one call to [`Simulation::step`] produced.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Index of the generation that was packed.
    pub generation: usize,
    /// Total coverage of each community, in community order.
    pub coverage: Vec<f64>,
}

impl StepReport {
    pub fn stats(&self) -> CoverageStats {
        CoverageStats::from_values(&self.coverage)
    }
}

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    config: Configuration,
    /// Generation waiting to be packed
    generation: Generation,
    /// Number of generations completed
    index: usize,
    packer: IntervalPacker,
    mutation: MutationOperator,
    /// Generations handed to the recorder as snapshots
    snapshots: RecordingStrategy,
    rng: Xoshiro256PlusPlus,
}

fn master_rng(seed: Option<u64>) -> Xoshiro256PlusPlus {
    match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
    }
}

impl Simulation {
    /// Create a simulation whose first generation comes from the configured
    /// initialization policy.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        let mut rng = master_rng(config.execution.seed);
        let generation = initial_generation(&config, &mut rng)?;
        Self::assemble(config, generation, rng)
    }

    /// Create a simulation starting from an existing generation.
    pub fn from_generation(config: Configuration, generation: Generation) -> Result<Self> {
        config.validate()?;
        let rng = master_rng(config.execution.seed);
        Self::assemble(config, generation, rng)
    }

    fn assemble(config: Configuration, generation: Generation, rng: Xoshiro256PlusPlus) -> Result<Self> {
        let bounds = config.evolution.segment_bounds;
        let mutation = MutationOperator::new(&config.evolution.mutation, bounds.min, bounds.max)?;
        let packer = IntervalPacker::new(config.execution.max_packing_attempts);
        let snapshots = RecordingStrategy::EveryN(config.execution.snapshot_every);

        Ok(Self {
            config,
            generation,
            index: 0,
            packer,
            mutation,
            snapshots,
            rng,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The generation that the next step will pack.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Number of generations completed.
    pub fn generation_index(&self) -> usize {
        self.index
    }

    fn sub_seeds(&mut self, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.rng.random()).collect()
    }

    /// Pack every community of the current generation.
    fn pack_all(&mut self) -> Result<Vec<Coverage>> {
        let seeds = self.sub_seeds(self.generation.len());
        let packer = self.packer;

        self.generation
            .communities()
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(community, &seed)| {
                let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                packer.pack(community, &mut local_rng)
            })
            .collect()
    }

    /// Mutate every community of `next`.
    fn mutate_all(&mut self, next: Generation) -> Result<Generation> {
        let seeds = self.sub_seeds(next.len());
        let mutation = &self.mutation;

        let mutated: Vec<_> = next
            .into_communities()
            .into_par_iter()
            .zip(seeds.into_par_iter())
            .map(|(community, seed)| {
                let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                mutation.mutate_with_stats(&community, &mut local_rng)
            })
            .collect::<Result<_>>()?;

        let culled: usize = mutated.iter().map(|(_, stats)| stats.culled).sum();
        let extinct = mutated.iter().filter(|(c, _)| c.is_empty()).count();
        if extinct > 0 {
            warn!(
                generation = self.index,
                extinct, "Communities culled to extinction"
            );
        }
        debug!(generation = self.index, culled, "Applied mutation");

        Ok(mutated.into_iter().map(|(c, _)| c).collect())
    }

    /// Advance the simulation by one generation.
    ///
    /// Order: snapshot (every `snapshot_every` generations), pack, log
    /// coverage, community selection, individual selection, mutation.
    pub fn step<Rec: Recorder + ?Sized>(&mut self, recorder: &mut Rec) -> Result<StepReport> {
        if self.snapshots.should_record(self.index) {
            recorder.record_generation(self.index, &self.generation)?;
        }

        let outcomes = self.pack_all()?;
        let coverage: Vec<f64> = outcomes.iter().map(Coverage::total).collect();
        recorder.record_coverage(self.index, &coverage)?;

        let exec = &self.config.execution;
        let selected = self.config.evolution.selection.next_generation(
            &self.generation,
            &outcomes,
            exec.number_of_communities,
            exec.size_of_community,
            &mut self.rng,
        )?;
        let next = self.mutate_all(selected)?;

        let report = StepReport {
            generation: self.index,
            coverage,
        };
        let stats = report.stats();
        debug!(
            generation = report.generation,
            mean = stats.mean,
            min = stats.min,
            max = stats.max,
            "Generation complete"
        );

        self.generation = next;
        self.index += 1;
        Ok(report)
    }

    /// Run the configured number of generations.
    pub fn run<Rec: Recorder + ?Sized>(&mut self, recorder: &mut Rec) -> Result<()> {
        self.run_for(self.config.execution.total_generations, recorder)
    }

    /// Run `generations` steps, reporting progress each time the completed
    /// percentage changes.
    pub fn run_for<Rec: Recorder + ?Sized>(&mut self, generations: usize, recorder: &mut Rec) -> Result<()> {
        info!(
            generations,
            communities = self.config.execution.number_of_communities,
            size = self.config.execution.size_of_community,
            attempts = %self.config.execution.max_packing_attempts,
            "Starting simulation"
        );

        let started = Instant::now();
        let mut last_percent = None;
        let mut last_stats = CoverageStats::default();

        for completed in 1..=generations {
            let step_started = Instant::now();
            last_stats = self.step(recorder)?.stats();

            let progress = Progress {
                completed,
                total: generations,
                elapsed: started.elapsed(),
                last_step: step_started.elapsed(),
            };
            let percent = progress.percent();
            if last_percent != Some(percent) || completed == generations {
                recorder.report_progress(&progress);
                last_percent = Some(percent);
            }
        }
        if generations == 0 {
            recorder.report_progress(&Progress {
                completed: 0,
                total: 0,
                elapsed: started.elapsed(),
                last_step: Duration::ZERO,
            });
        }

        info!(
            generations = self.index,
            elapsed_secs = started.elapsed().as_secs_f64(),
            mean_coverage = last_stats.mean,
            "Simulation finished"
        );
        Ok(())
    }
}

/// Pack `trials` independent communities built from the configured
/// initialization and return each one's coverage.
///
/// Imported generations are cycled through in row order.
pub fn coverage_trials(config: &Configuration, trials: usize) -> Result<Vec<f64>> {
    config.validate()?;
    let mut rng = master_rng(config.execution.seed);
    let exec = &config.execution;

    let communities: Vec<Community> = match &config.initialization {
        InitializationConfig::Import { path } => {
            let seed = load_seed_generation(path, exec.number_of_communities)?;
            seed.iter().cycle().take(trials).cloned().collect()
        }
        init => CommunityFactory::new(init, exec.size_of_community)?
            .generate_generation(trials, &mut rng)
            .into_communities(),
    };

    let seeds: Vec<u64> = (0..communities.len()).map(|_| rng.random()).collect();
    let packer = IntervalPacker::new(exec.max_packing_attempts);

    communities
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(community, &seed)| {
            let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            packer.pack(community, &mut local_rng).map(|c| c.total())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationBuilder;
    use crate::storage::NullRecorder;

    fn create_test_simulation() -> Simulation {
        SimulationBuilder::new()
            .communities(6)
            .community_size(20)
            .generations(4)
            .uniform_lengths(0.05, 0.3)
            .max_packing_attempts(200)
            .seed(42)
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Collecting {
        snapshots: Vec<usize>,
        coverage_rows: Vec<Vec<f64>>,
        progress: Vec<Progress>,
    }

    impl Recorder for Collecting {
        fn record_generation(&mut self, index: usize, _generation: &Generation) -> Result<()> {
            self.snapshots.push(index);
            Ok(())
        }

        fn record_coverage(&mut self, _index: usize, coverage: &[f64]) -> Result<()> {
            self.coverage_rows.push(coverage.to_vec());
            Ok(())
        }

        fn report_progress(&mut self, progress: &Progress) {
            self.progress.push(*progress);
        }
    }

    #[test]
    fn test_simulation_new() {
        let sim = create_test_simulation();
        assert_eq!(sim.generation_index(), 0);
        assert_eq!(sim.generation().len(), 6);
        assert!(sim.generation().iter().all(|c| c.len() == 20));
    }

    #[test]
    fn test_simulation_step() {
        let mut sim = create_test_simulation();
        let report = sim.step(&mut NullRecorder).unwrap();

        assert_eq!(report.generation, 0);
        assert_eq!(report.coverage.len(), 6);
        assert!(report.coverage.iter().all(|&c| (0.0..=1.0 + 1e-9).contains(&c)));
        assert_eq!(sim.generation_index(), 1);
        assert_eq!(sim.generation().len(), 6);
    }

    #[test]
    fn test_simulation_run() {
        let mut sim = create_test_simulation();
        let mut recorder = Collecting::default();
        sim.run(&mut recorder).unwrap();

        assert_eq!(sim.generation_index(), 4);
        // Default interval is 25.
        assert_eq!(recorder.snapshots, vec![0]);
        assert_eq!(recorder.coverage_rows.len(), 4);
        assert!(recorder.coverage_rows.iter().all(|row| row.len() == 6));
    }

    #[test]
    fn test_snapshots_follow_configured_interval() {
        let mut sim = SimulationBuilder::new()
            .communities(3)
            .community_size(5)
            .generations(7)
            .snapshot_every(3)
            .max_packing_attempts(100)
            .seed(3)
            .build()
            .unwrap();
        let mut recorder = Collecting::default();
        sim.run(&mut recorder).unwrap();

        assert_eq!(recorder.snapshots, vec![0, 3, 6]);
        assert_eq!(recorder.coverage_rows.len(), 7);
    }

    #[test]
    fn test_empty_run_reports_completion() {
        let mut sim = create_test_simulation();
        let mut recorder = Collecting::default();
        sim.run_for(0, &mut recorder).unwrap();

        assert_eq!(sim.generation_index(), 0);
        assert_eq!(recorder.progress.len(), 1);
        assert_eq!(recorder.progress[0].completed, 0);
        assert_eq!(recorder.progress[0].percent(), 100);
    }

    #[test]
    fn test_progress_reported_on_percent_change() {
        let mut sim = create_test_simulation();
        let mut recorder = Collecting::default();
        sim.run_for(3, &mut recorder).unwrap();

        let completed: Vec<usize> = recorder.progress.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![1, 2, 3]);
        assert_eq!(recorder.progress.last().unwrap().percent(), 100);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = create_test_simulation();
        let mut b = create_test_simulation();
        a.run(&mut NullRecorder).unwrap();
        b.run(&mut NullRecorder).unwrap();
        assert_eq!(a.generation(), b.generation());
    }

    #[test]
    fn test_reproducible_across_thread_counts() {
        let run_with_threads = |threads: usize| {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap();
            pool.install(|| {
                let mut sim = create_test_simulation();
                sim.run(&mut NullRecorder).unwrap();
                sim.generation().clone()
            })
        };
        assert_eq!(run_with_threads(1), run_with_threads(4));
    }

    #[test]
    fn test_without_mutation_values_come_from_seed() {
        let seed = Generation::new(vec![
            Community::from_members(vec![0.1, 0.2, 0.3]),
            Community::from_members(vec![0.05, 0.4]),
        ]);
        let config = SimulationBuilder::new()
            .communities(2)
            .community_size(5)
            .mutation_probability(0.0)
            .seed(3)
            .into_config()
            .unwrap();

        let mut sim = Simulation::from_generation(config, seed).unwrap();
        sim.run_for(3, &mut NullRecorder).unwrap();

        let allowed = [0.1, 0.2, 0.3, 0.05, 0.4];
        for community in sim.generation() {
            assert_eq!(community.len(), 5);
            assert!(community.iter().all(|x| allowed.contains(x)));
        }
    }

    #[test]
    fn test_coverage_stats() {
        let stats = CoverageStats::from_values(&[0.2, 0.4, 0.6]);
        assert!((stats.mean - 0.4).abs() < 1e-12);
        assert_eq!(stats.min, 0.2);
        assert_eq!(stats.max, 0.6);
        assert!((stats.std_dev - (0.08f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(CoverageStats::from_values(&[]), CoverageStats::default());
    }

    #[test]
    fn test_coverage_trials() {
        let config = SimulationBuilder::new()
            .homogeneous(0.5)
            .communities(1)
            .community_size(2)
            .seed(11)
            .into_config()
            .unwrap();
        let values = coverage_trials(&config, 50).unwrap();
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|&v| v == 0.0 || v == 0.5));
    }
}
