//! # Catapult Testkit
//!
//! Test utilities for Catapult size-prefixed containers.
//!
//! This crate provides:
//! - Buffer fixtures for aggregates, finalization proofs and raw record regions
//! - A mock embedded transaction with a variable data tail and its plugin
//! - Property-based test generators using proptest
//! - Fuzz entry points that must never panic
//! - Serializable test vectors
//!
//! ## Usage
//!
//! ```
//! use catapult_container::SizePrefixedEntity;
//! use catapult_testkit::prelude::*;
//!
//! let bytes = aggregate_with_data_sizes(&[1, 2, 3], 2);
//! let aggregate = catapult_model::AggregateTransaction::parse(&bytes).unwrap();
//! assert!(aggregate.is_size_valid(&mock_registry()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod mocks;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::mocks::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use mocks::*;
pub use vectors::*;
