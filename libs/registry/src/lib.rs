//! # roost-registry
//!
//! Persistent task records and the immutable task registry.
//!
//! ## Design Principles
//!
//! - A persistent task is a long-running unit of work tracked centrally and
//!   re-homed on node failure rather than lost
//! - The registry is an immutable snapshot; every mutation goes through a
//!   copy-on-write builder and yields a new registry, leaving old handles valid
//! - Tasks iterate in ascending task-ID order, so a reassignment pass visits
//!   them in the same order on every node
//! - An assignment is replaced wholesale, never patched; each replacement bumps
//!   the task's allocation ID, which executors use as a fencing token
//!
//! The registry carries no behavior of its own. Placement decisions live in
//! `roost-allocator`; this crate only defines the data they operate on.

mod assignment;
mod error;
mod registry;
mod task;

pub use assignment::Assignment;
pub use error::RegistryError;
pub use registry::{TaskRegistry, TaskRegistryBuilder};
pub use task::PersistentTask;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
