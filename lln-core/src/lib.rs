//! Law of Large Numbers simulation library.
//!
//! This crate draws independent trials from a finite weighted population and
//! tracks how the relative frequency of each category approaches its
//! theoretical probability:
//! - Validated, immutable populations (`CategorySet`)
//! - Weighted interval sampling with an injected random source (`Sampler`)
//! - Lazy per-trial cumulative frequencies (`FrequencyAccumulator`)
//! - Constant reference probabilities (`TheoreticalModel`)
//! - Seeded runs and multi-seed ensembles
//!
//! Rendering and input widgets live outside this crate; it only produces
//! the sequences a presentation layer draws.

/// Populations, sampling, accumulation and run orchestration.
pub mod model;

/// Parsing and defaults for configuration values.
pub mod config;

/// Errors reported for invalid configurations.
pub mod error;

/// Category file loading.
pub mod io;

pub use config::SimulationConfig;
pub use error::ValidationError;
pub use model::accumulator::{FrequencyAccumulator, FrequencyRecord, RunningCount};
pub use model::category_set::{Category, CategorySet};
pub use model::ensemble::{ConvergenceReport, Ensemble};
pub use model::sampler::Sampler;
pub use model::simulation::{RunReport, Simulation};
pub use model::theoretical::TheoreticalModel;
