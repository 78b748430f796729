//! Top-level module for the sampling-and-accumulation engine.
//!
//! This module provides, leaves first:
//! - The weighted population (`CategorySet`)
//! - Weighted interval sampling (`Sampler`)
//! - Per-trial cumulative frequencies (`FrequencyAccumulator`)
//! - Constant reference probabilities (`TheoreticalModel`)
//! - Seeded runs (`Simulation`) and multi-seed ensembles (`Ensemble`)

/// Immutable weighted population and its cumulative-weight boundaries.
pub mod category_set;

/// Weighted category draws from an injected random source.
///
/// Stateless: the generator is passed to every call.
pub mod sampler;

/// Running counts and the lazy sequence of cumulative frequency records.
pub mod accumulator;

/// Target probabilities `weight / total`.
pub mod theoretical;

/// A validated run: configuration, seed, streaming and batch output.
pub mod simulation;

/// Many independent runs on worker threads, summarized by final deviation.
pub mod ensemble;
