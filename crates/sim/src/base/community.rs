//! Communities of segment lengths and the generations that hold them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered collection of trait values (segment lengths).
///
/// Each member is one individual. Reproduction copies values, so a
/// community never shares storage with another one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Community {
    members: Vec<f64>,
}

impl Community {
    /// Create an empty community with room for `capacity` members.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
        }
    }

    /// Create a community from its member values, keeping their order.
    pub fn from_members(members: Vec<f64>) -> Self {
        Self { members }
    }

    /// Create a community where every member has the same length.
    pub fn homogeneous(length: f64, size: usize) -> Self {
        Self {
            members: vec![length; size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn members(&self) -> &[f64] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [f64] {
        &mut self.members
    }

    pub fn into_members(self) -> Vec<f64> {
        self.members
    }

    pub fn push(&mut self, value: f64) {
        self.members.push(value);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.members.iter()
    }

    /// Smallest member value, or `None` for an empty community.
    pub fn min_member(&self) -> Option<f64> {
        self.members.iter().copied().reduce(f64::min)
    }

    /// Sum of all member values.
    pub fn total(&self) -> f64 {
        self.members.iter().sum()
    }

    /// Keep only members inside `[min, max]`, returning how many were removed.
    pub fn retain_within(&mut self, min: f64, max: f64) -> usize {
        let before = self.members.len();
        self.members.retain(|&x| x >= min && x <= max);
        before - self.members.len()
    }
}

impl From<Vec<f64>> for Community {
    fn from(members: Vec<f64>) -> Self {
        Self::from_members(members)
    }
}

impl FromIterator<f64> for Community {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Community {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Renders members as one comma-separated row.
impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// The full population of communities at one time step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation {
    communities: Vec<Community>,
}

impl Generation {
    pub fn new(communities: Vec<Community>) -> Self {
        Self { communities }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn into_communities(self) -> Vec<Community> {
        self.communities
    }

    pub fn get(&self, index: usize) -> Option<&Community> {
        self.communities.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Community> {
        self.communities.iter()
    }

    /// Total number of individuals across all communities.
    pub fn individual_count(&self) -> usize {
        self.communities.iter().map(Community::len).sum()
    }
}

impl FromIterator<Community> for Generation {
    fn from_iter<I: IntoIterator<Item = Community>>(iter: I) -> Self {
        Self {
            communities: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Generation {
    type Item = &'a Community;
    type IntoIter = std::slice::Iter<'a, Community>;

    fn into_iter(self) -> Self::IntoIter {
        self.communities.iter()
    }
}

impl IntoIterator for Generation {
    type Item = Community;
    type IntoIter = std::vec::IntoIter<Community>;

    fn into_iter(self) -> Self::IntoIter {
        self.communities.into_iter()
    }
}
