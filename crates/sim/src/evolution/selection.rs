//! Community-level and individual-level selection.
//!
//! Selection runs in two independent stages each generation:
//!
//! 1. **Community selection** picks which communities seed the next
//!    generation (with replacement). With community-level selection on, a
//!    community is chosen proportionally to its total coverage; otherwise
//!    uniformly.
//! 2. **Individual selection** refills each chosen community to full size
//!    (with replacement) from a source pool. With individual-level
//!    selection on, the pool is the set of lengths that were placed and
//!    draws are weighted by [`IndividualWeighting`]; otherwise the pool is
//!    the community as it was before packing and draws are uniform.
//!
//! A community that placed nothing still has a pool: its pre-packing
//! members are used instead, so individual selection never starts from an
//! empty list unless the community itself is empty.

use crate::base::{Community, Generation, WeightedSampler};
use crate::errors::{Result, SimError};
use crate::packing::Coverage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Weight given to each placed individual during individual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndividualWeighting {
    /// Uniform over placed lengths; a length placed several times is
    /// proportionally more likely.
    Placement,
    /// Weight equal to the length itself.
    ///
    /// The placed lengths already over-represent long segments in
    /// coverage terms, so weighting by length again counts length twice.
    /// Kept as is because the coverage data under study was produced this
    /// way.
    Coverage,
    /// Weight equal to the squared length.
    Coverage2,
}

impl IndividualWeighting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placement => "placement",
            Self::Coverage => "coverage",
            Self::Coverage2 => "coverage2",
        }
    }

    fn weight(&self, length: f64) -> f64 {
        match self {
            Self::Placement => 1.0,
            Self::Coverage => length,
            Self::Coverage2 => length * length,
        }
    }
}

impl fmt::Display for IndividualWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndividualWeighting {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "placement" => Ok(Self::Placement),
            "coverage" => Ok(Self::Coverage),
            "coverage2" => Ok(Self::Coverage2),
            other => Err(SimError::InvalidConfig(format!(
                "unknown individual selection type '{other}' (expected placement, coverage or coverage2)"
            ))),
        }
    }
}

/// Selection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Weight community survival by total coverage.
    pub community_level: bool,
    /// Draw offspring from placed individuals, weighted by `individual_weighting`.
    pub individual_level: bool,
    pub individual_weighting: IndividualWeighting,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            community_level: true,
            individual_level: true,
            individual_weighting: IndividualWeighting::Placement,
        }
    }
}

impl SelectionConfig {
    /// Short label for the selection regime: `ind`/`drf` for the individual
    /// stage followed by `com`/`drf` for the community stage.
    pub fn regime_label(&self) -> &'static str {
        match (self.individual_level, self.community_level) {
            (true, true) => "indcom",
            (true, false) => "inddrf",
            (false, true) => "drfcom",
            (false, false) => "drfdrf",
        }
    }

    /// Choose `count` community indices (with replacement).
    ///
    /// Falls back to uniform draws when every community has zero coverage.
    ///
    /// # Errors
    /// `InvalidArgument` if `outcomes` is empty while `count > 0`.
    pub fn select_communities<R: Rng + ?Sized>(
        &self,
        outcomes: &[Coverage],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if outcomes.is_empty() {
            return Err(SimError::InvalidArgument(
                "cannot select communities from an empty generation".into(),
            ));
        }

        if self.community_level {
            let weights: Vec<f64> = outcomes.iter().map(Coverage::total).collect();
            if weights.iter().sum::<f64>() > 0.0 {
                let sampler = WeightedSampler::new(&weights)?;
                return Ok((0..count).map(|_| sampler.sample_index(rng)).collect());
            }
            warn!("every community has zero coverage; selecting communities uniformly");
        }

        Ok((0..count)
            .map(|_| rng.random_range(0..outcomes.len()))
            .collect())
    }

    /// Source pool for refilling one chosen community.
    ///
    /// Placed lengths under individual-level selection, unless nothing was
    /// placed; the pre-packing members otherwise.
    pub fn parent_pool<'a>(&self, before: &'a Community, after: &'a Coverage) -> &'a [f64] {
        if self.individual_level && !after.is_empty() {
            after.placed()
        } else {
            before.members()
        }
    }

    /// Draw `size` individuals (with replacement) from `pool`.
    ///
    /// An empty pool yields an empty community.
    pub fn select_individuals<R: Rng + ?Sized>(
        &self,
        pool: &[f64],
        size: usize,
        rng: &mut R,
    ) -> Result<Community> {
        if pool.is_empty() {
            return Ok(Community::default());
        }

        let weighted = self.individual_level
            && self.individual_weighting != IndividualWeighting::Placement;
        if weighted {
            let weights: Vec<f64> = pool
                .iter()
                .map(|&x| self.individual_weighting.weight(x))
                .collect();
            if weights.iter().sum::<f64>() > 0.0 {
                let sampler = WeightedSampler::new(&weights)?;
                return Ok((0..size).map(|_| pool[sampler.sample_index(rng)]).collect());
            }
        }

        Ok((0..size)
            .map(|_| pool[rng.random_range(0..pool.len())])
            .collect())
    }

    /// Run both selection stages and return the unmutated next generation.
    ///
    /// # Errors
    /// `InvalidArgument` if `generation` and `outcomes` differ in length.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        generation: &Generation,
        outcomes: &[Coverage],
        number_of_communities: usize,
        size_of_community: usize,
        rng: &mut R,
    ) -> Result<Generation> {
        if generation.len() != outcomes.len() {
            return Err(SimError::InvalidArgument(format!(
                "{} communities but {} packing outcomes",
                generation.len(),
                outcomes.len()
            )));
        }

        let chosen = self.select_communities(outcomes, number_of_communities, rng)?;
        chosen
            .into_iter()
            .map(|idx| {
                let pool = self.parent_pool(&generation.communities()[idx], &outcomes[idx]);
                self.select_individuals(pool, size_of_community, rng)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn config(community_level: bool, individual_level: bool, w: IndividualWeighting) -> SelectionConfig {
        SelectionConfig {
            community_level,
            individual_level,
            individual_weighting: w,
        }
    }

    #[test]
    fn test_weighting_from_str() {
        assert_eq!("placement".parse::<IndividualWeighting>().unwrap(), IndividualWeighting::Placement);
        assert_eq!("coverage2".parse::<IndividualWeighting>().unwrap(), IndividualWeighting::Coverage2);
        let err = "area".parse::<IndividualWeighting>().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_regime_labels() {
        use IndividualWeighting::Placement;
        assert_eq!(config(true, true, Placement).regime_label(), "indcom");
        assert_eq!(config(false, true, Placement).regime_label(), "inddrf");
        assert_eq!(config(true, false, Placement).regime_label(), "drfcom");
        assert_eq!(config(false, false, Placement).regime_label(), "drfdrf");
    }

    #[test]
    fn test_community_selection_follows_coverage() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let sel = config(true, true, IndividualWeighting::Placement);
        let outcomes = vec![
            Coverage::from_placed(vec![]),
            Coverage::from_placed(vec![0.1, 0.1]),
            Coverage::from_placed(vec![0.3, 0.3]),
        ];

        let picks = sel.select_communities(&outcomes, 40_000, &mut rng).unwrap();
        assert_eq!(picks.len(), 40_000);
        assert!(!picks.contains(&0));

        let twos = picks.iter().filter(|&&i| i == 2).count() as f64 / 40_000.0;
        assert!((twos - 0.75).abs() < 0.02, "got {twos}");
    }

    #[test]
    fn test_community_selection_zero_coverage_falls_back_to_uniform() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let sel = config(true, false, IndividualWeighting::Placement);
        let outcomes = vec![Coverage::default(), Coverage::default()];

        let picks = sel.select_communities(&outcomes, 1000, &mut rng).unwrap();
        assert!(picks.contains(&0));
        assert!(picks.contains(&1));
    }

    #[test]
    fn test_community_selection_drift_ignores_coverage() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let sel = config(false, false, IndividualWeighting::Placement);
        let outcomes = vec![Coverage::default(), Coverage::from_placed(vec![0.9])];

        let picks = sel.select_communities(&outcomes, 1000, &mut rng).unwrap();
        let zeros = picks.iter().filter(|&&i| i == 0).count();
        assert!(zeros > 400 && zeros < 600);
    }

    #[test]
    fn test_empty_outcomes_rejected() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let sel = SelectionConfig::default();
        assert!(sel.select_communities(&[], 3, &mut rng).is_err());
        assert!(sel.select_communities(&[], 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_parent_pool_substitutes_pre_packing_members() {
        let sel = config(true, true, IndividualWeighting::Coverage);
        let before = Community::from_members(vec![0.4, 0.6]);

        let empty = Coverage::default();
        assert_eq!(sel.parent_pool(&before, &empty), &[0.4, 0.6]);

        let placed = Coverage::from_placed(vec![0.4]);
        assert_eq!(sel.parent_pool(&before, &placed), &[0.4]);

        let drift = config(true, false, IndividualWeighting::Coverage);
        assert_eq!(drift.parent_pool(&before, &placed), &[0.4, 0.6]);
    }

    #[test]
    fn test_individual_selection_size_and_membership() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let pool = [0.1, 0.2, 0.3];
        for w in [
            IndividualWeighting::Placement,
            IndividualWeighting::Coverage,
            IndividualWeighting::Coverage2,
        ] {
            let community = config(true, true, w)
                .select_individuals(&pool, 50, &mut rng)
                .unwrap();
            assert_eq!(community.len(), 50);
            assert!(community.iter().all(|x| pool.contains(x)));
        }
    }

    #[test]
    fn test_coverage2_favours_long_segments_more_than_coverage() {
        let pool = [0.1, 0.3];
        let n = 40_000;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(13);
        let linear = config(true, true, IndividualWeighting::Coverage)
            .select_individuals(&pool, n, &mut rng)
            .unwrap();
        let squared = config(true, true, IndividualWeighting::Coverage2)
            .select_individuals(&pool, n, &mut rng)
            .unwrap();

        let frac = |c: &Community| c.iter().filter(|&&x| x == 0.3).count() as f64 / n as f64;
        assert!((frac(&linear) - 0.75).abs() < 0.02);
        assert!((frac(&squared) - 0.9).abs() < 0.02);
    }

    #[test]
    fn test_empty_pool_yields_empty_community() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let community = SelectionConfig::default()
            .select_individuals(&[], 10, &mut rng)
            .unwrap();
        assert!(community.is_empty());
    }

    #[test]
    fn test_next_generation_shape() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
        let generation = Generation::new(vec![
            Community::homogeneous(0.2, 4),
            Community::homogeneous(0.5, 4),
        ]);
        let outcomes = vec![
            Coverage::from_placed(vec![0.2, 0.2, 0.2]),
            Coverage::default(),
        ];

        let next = SelectionConfig::default()
            .next_generation(&generation, &outcomes, 3, 6, &mut rng)
            .unwrap();
        assert_eq!(next.len(), 3);
        // Only the community that placed anything can be chosen.
        for community in &next {
            assert_eq!(community.len(), 6);
            assert!(community.iter().all(|&x| x == 0.2));
        }
    }

    #[test]
    fn test_next_generation_length_mismatch() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
        let generation = Generation::new(vec![Community::homogeneous(0.2, 4)]);
        let result = SelectionConfig::default().next_generation(&generation, &[], 1, 4, &mut rng);
        assert!(matches!(result, Err(SimError::InvalidArgument(_))));
    }
}
