//! Typed ID definitions for control-plane resources.
//!
//! Each ID type has a unique prefix that identifies the resource type.
//! IDs are ULID-based for sortability and uniqueness.

use crate::define_id;

define_id!(TaskId, "task");
define_id!(NodeId, "node");
