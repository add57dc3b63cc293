//! Shared inputs for the container benchmarks.

pub mod utils;
