//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Rich domain types (validated, business-logic-ready)
//! - `wire.rs`: Raw serde structs matching the stream format
//! - `convert.rs`: `TryFrom` conversions with validation
//! - `state.rs`: State containers with update methods (for stream-driven data)

pub mod market;
pub mod price_history;
pub mod tick;
