//! # Catapult Model
//!
//! Concrete size-prefixed entity families built on `catapult_container`.
//!
//! This crate provides:
//! - Aggregate transactions with embedded transactions and cosignatures
//! - Finalization proofs with message groups
//! - Builders producing correctly sized and padded bytes
//! - A validating [`EntityReader`] enforcing [`ValidationLimits`]
//!
//! ## Usage
//!
//! ```
//! use catapult_model::aggregate::{
//!     AggregateTransactionBuilder, EmbeddedTransactionBuilder, FixedSizeTransactionPlugin,
//!     TransactionRegistry,
//! };
//! use catapult_model::{EntityReader, EntityType};
//!
//! let transfer = EntityType(0x4154);
//! let embedded = EmbeddedTransactionBuilder::new(transfer)
//!     .body(vec![0; 16])
//!     .build()
//!     .unwrap();
//! let bytes = AggregateTransactionBuilder::new(EntityType(0x4141))
//!     .transaction(embedded.clone())
//!     .transaction(embedded)
//!     .build()
//!     .unwrap();
//!
//! let registry = TransactionRegistry::new().with(FixedSizeTransactionPlugin::new(transfer, 16));
//! let aggregate = EntityReader::default().read_aggregate(&bytes, &registry).unwrap();
//! assert_eq!(aggregate.transactions().iter().count(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
mod config;
mod error;
pub mod finalization;
mod reader;
mod types;

pub use aggregate::{AggregateTransaction, EmbeddedTransaction};
pub use config::ValidationLimits;
pub use error::{ModelError, ModelResult};
pub use finalization::{FinalizationProof, MessageGroup};
pub use reader::EntityReader;
pub use types::{
    Amount, EntityType, FinalizationEpoch, FinalizationPoint, FinalizationRound, Hash256, Height, Key,
    NetworkType, Signature, Timestamp, TreeSignature,
};
