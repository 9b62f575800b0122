//! Random sequential adsorption of a community onto the unit interval.
//!
//! Each attempt draws a start point and a segment length (uniformly from
//! the community's usable lengths) and keeps the segment if it lies
//! entirely inside a free gap. Lengths are types, not tokens: a length
//! can be placed any number of times.
//!
//! With an unbounded attempt budget the packer runs to jamming, with three
//! shortcuts:
//! - start points are drawn from `[0, 1 - min usable length)`;
//! - after every placement, lengths that no longer fit the largest gap
//!   are dropped from the usable set;
//! - once the largest gap can hold at most one more segment, each gap
//!   that still fits something receives exactly one segment chosen with
//!   weight `(gap - length) / gap`, and packing stops.

use crate::base::{choose_weighted, Community};
use crate::errors::{Result, SimError};
use crate::packing::Layout;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of placement attempts per packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BudgetRepr", into = "BudgetRepr")]
pub enum AttemptBudget {
    /// Stop after this many attempts.
    Finite(u64),
    /// Run until no usable length fits any gap.
    Unbounded,
}

impl AttemptBudget {
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    #[inline]
    pub fn allows(&self, attempts: u64) -> bool {
        match self {
            Self::Finite(max) => attempts < *max,
            Self::Unbounded => true,
        }
    }
}

impl fmt::Display for AttemptBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unbounded => write!(f, "inf"),
        }
    }
}

impl FromStr for AttemptBudget {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inf" | "infinite" | "unbounded" => Ok(Self::Unbounded),
            other => other.parse::<u64>().map(Self::Finite).map_err(|_| {
                SimError::InvalidConfig(format!(
                    "max packing attempts must be a non-negative integer or 'inf', got '{s}'"
                ))
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BudgetRepr {
    Count(u64),
    Text(String),
}

impl TryFrom<BudgetRepr> for AttemptBudget {
    type Error = SimError;

    fn try_from(repr: BudgetRepr) -> Result<Self> {
        match repr {
            BudgetRepr::Count(n) => Ok(Self::Finite(n)),
            BudgetRepr::Text(s) => s.parse(),
        }
    }
}

impl From<AttemptBudget> for BudgetRepr {
    fn from(budget: AttemptBudget) -> Self {
        match budget {
            AttemptBudget::Finite(n) => Self::Count(n),
            AttemptBudget::Unbounded => Self::Text("inf".into()),
        }
    }
}

/// Lengths a community managed to place on the interval.
///
/// An empty coverage is a valid result: nothing fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coverage {
    placed: Vec<f64>,
}

impl Coverage {
    pub fn from_placed(placed: Vec<f64>) -> Self {
        Self { placed }
    }

    #[inline]
    pub fn placed(&self) -> &[f64] {
        &self.placed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Total covered length; the community's fitness weight.
    pub fn total(&self) -> f64 {
        self.placed.iter().sum()
    }

    /// The placed lengths as a selection pool.
    pub fn to_community(&self) -> Community {
        Community::from_members(self.placed.clone())
    }
}

/// Full result of one packing run.
#[derive(Debug, Clone)]
pub struct PackingOutcome {
    pub coverage: Coverage,
    /// Segments placed by random attempts. Lengths added by the final-gap
    /// shortcut have no recorded position.
    pub layout: Layout,
    /// Number of random placement attempts made.
    pub attempts: u64,
}

/// Random sequential adsorption engine.
#[derive(Debug, Clone, Copy)]
pub struct IntervalPacker {
    budget: AttemptBudget,
}

impl IntervalPacker {
    pub fn new(budget: AttemptBudget) -> Self {
        Self { budget }
    }

    #[inline]
    pub fn budget(&self) -> AttemptBudget {
        self.budget
    }

    /// Pack `community` and return the lengths that were placed.
    ///
    /// # Errors
    /// `InvalidArgument` if the community has a non-positive or non-finite
    /// length; such a length can never jam the interval.
    pub fn pack<R: Rng + ?Sized>(&self, community: &Community, rng: &mut R) -> Result<Coverage> {
        self.pack_detailed(community, rng).map(|outcome| outcome.coverage)
    }

    /// Pack `community`, also returning the layout and attempt count.
    pub fn pack_detailed<R: Rng + ?Sized>(
        &self,
        community: &Community,
        rng: &mut R,
    ) -> Result<PackingOutcome> {
        let mut layout = Layout::new();
        let mut placed = Vec::new();
        let mut attempts = 0u64;

        let mut usable = community.members().to_vec();
        let Some(mut min_usable) = min_of(&usable) else {
            return Ok(PackingOutcome {
                coverage: Coverage::default(),
                layout,
                attempts,
            });
        };
        if min_usable <= 0.0 || usable.iter().any(|l| !l.is_finite()) {
            return Err(SimError::InvalidArgument(format!(
                "segment lengths must be positive and finite, smallest is {min_usable}"
            )));
        }

        let unbounded = self.budget.is_unbounded();

        while self.budget.allows(attempts) && layout.has_gap_longer_than(min_usable) {
            attempts += 1;

            // Point first, then length.
            let mut start = rng.random::<f64>();
            if unbounded {
                start *= 1.0 - min_usable;
            }
            let length = usable[rng.random_range(0..usable.len())];

            if !layout.insert(start, length) {
                continue;
            }
            placed.push(length);

            if !unbounded {
                continue;
            }

            let max_gap = layout.max_gap();
            usable.retain(|&l| l < max_gap);
            min_usable = match min_of(&usable) {
                Some(m) => m,
                None => break,
            };

            if max_gap < 2.0 * min_usable {
                fill_final_gaps(&layout, &usable, min_usable, &mut placed, rng)?;
                break;
            }
        }

        Ok(PackingOutcome {
            coverage: Coverage::from_placed(placed),
            layout,
            attempts,
        })
    }
}

/// Put one segment into every gap that can still hold one.
///
/// Shorter lengths have more valid start positions inside a gap, hence
/// the `(gap - length) / gap` weight.
fn fill_final_gaps<R: Rng + ?Sized>(
    layout: &Layout,
    usable: &[f64],
    min_usable: f64,
    placed: &mut Vec<f64>,
    rng: &mut R,
) -> Result<()> {
    for &gap in layout.gaps().iter().filter(|&&g| g > min_usable) {
        let candidates: Vec<f64> = usable.iter().copied().filter(|&l| l < gap).collect();
        let weights: Vec<f64> = candidates.iter().map(|&l| (gap - l) / gap).collect();
        placed.push(*choose_weighted(&candidates, &weights, rng)?);
    }
    Ok(())
}

#[inline]
fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}
