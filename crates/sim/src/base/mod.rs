//! Base types shared by every stage of the simulation.
//!
//! This module provides the community and generation containers and the
//! weighted sampling primitive used by selection, initialization and
//! packing.

mod community;
pub mod sampling;

pub use community::{Community, Generation};
pub use sampling::{choose_weighted, WeightedSampler};
