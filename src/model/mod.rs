//! Data model for key signatures.
//!
//! A [`Signature`] is the describer's structured account of one physical
//! key; an [`InventoryCandidate`] pairs a caller-owned key id with its
//! stored signature. Both are immutable inputs to a matching call.

pub mod io;
mod signature;

pub use io::{load_inventory, load_signature, parse_inventory_str, parse_signature_str};
pub use signature::*;
