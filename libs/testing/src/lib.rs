//! Test policies and cluster-state fixtures shared across crates.
//!
//! The fixtures live in `roost_allocator::fixtures` (behind its `fixtures`
//! feature) so the allocator's own unit tests can use them without a
//! dev-dependency cycle; this crate re-exports them under their original
//! paths for everyone else.

pub use roost_allocator::fixtures::*;
