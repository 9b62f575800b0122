//! Interval packing.
//!
//! A community's segments are placed one at a time at random positions on
//! `[0, 1)` without overlap (random sequential adsorption). The lengths
//! that make it onto the interval are the community's coverage, which
//! feeds selection.

mod layout;
mod packer;

pub use layout::Layout;
pub use packer::{AttemptBudget, Coverage, IntervalPacker, PackingOutcome};
