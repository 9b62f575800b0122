//! # Simulation Crate
//!
//! The `linepack-sim` crate models communities of line segments competing
//! for space on the unit interval. Each generation every community is packed
//! by random sequential adsorption, communities and individuals are selected
//! by how much of the interval they covered, and the survivors mutate.
//!
//! It includes modules for the community containers, the packing engine,
//! the evolutionary operators, CSV storage and the simulation engine.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod packing;
pub mod prelude;
pub mod simulation;
pub mod storage;

pub use base::{Community, Generation};
