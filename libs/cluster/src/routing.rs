//! Shard routing table.
//!
//! The control plane treats routing data as opaque: few placement decisions
//! depend on it, but a routing change may still unblock a task whose policy
//! consults shard locality, so the table participates in structural change
//! detection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Routing entry for a single index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRouting {
    shard_count: u32,
    version: u64,
}

impl IndexRouting {
    /// A freshly created index with the given shard count.
    pub fn new(shard_count: u32) -> Self {
        Self {
            shard_count,
            version: 0,
        }
    }

    /// Number of shards the index is split into.
    pub fn shard_count(&self) -> u32 {
        self.shard_count
    }

    /// Bumped whenever shard placement for the index changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the entry with its placement version bumped.
    pub fn touched(&self) -> Self {
        Self {
            shard_count: self.shard_count,
            version: self.version + 1,
        }
    }
}

/// The cluster-wide shard routing table, keyed by index name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    indices: BTreeMap<String, IndexRouting>,
}

impl RoutingTable {
    /// An empty routing table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a table with the given index added or replaced.
    pub fn with_index(&self, name: impl Into<String>, routing: IndexRouting) -> Self {
        let mut indices = self.indices.clone();
        indices.insert(name.into(), routing);
        Self { indices }
    }

    /// Returns a table without the given index. Unknown names are a no-op.
    pub fn without_index(&self, name: &str) -> Self {
        let mut indices = self.indices.clone();
        indices.remove(name);
        Self { indices }
    }

    /// Looks up the routing entry for an index.
    pub fn index(&self, name: &str) -> Option<&IndexRouting> {
        self.indices.get(name)
    }

    /// Number of indices in the table.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the table has no indices.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
