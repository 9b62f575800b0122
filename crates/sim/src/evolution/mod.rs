//! Evolutionary operators applied between packing rounds.
//!
//! - **Selection**: community-level and individual-level resampling driven
//!   by packing coverage
//! - **Mutation**: point mutations of segment lengths with range culling

pub mod mutation;
pub mod selection;

pub use mutation::{MutationConfig, MutationModel, MutationOperator, MutationStats};
pub use selection::{IndividualWeighting, SelectionConfig};
