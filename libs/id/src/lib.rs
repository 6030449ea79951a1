//! # roost-id
//!
//! Typed ID types for the roost task control plane.
//!
//! ## Design Principles
//!
//! - IDs are stable and system-generated; display names are labels
//! - All IDs have a canonical string representation with strict parsing
//! - IDs support roundtrip serialization (parse → format → parse)
//! - IDs are typed so a task ID can never be passed where a node ID belongs
//!
//! ## ID Format
//!
//! All IDs use a prefixed format: `{prefix}_{ulid}`
//!
//! Examples:
//! - `task_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `node_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//!
//! The ULID payload keeps IDs time-ordered, so iterating a map keyed by ID
//! visits entries in creation order.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
