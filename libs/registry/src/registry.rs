//! The immutable task registry and its copy-on-write builder.

use std::collections::BTreeMap;

use roost_id::TaskId;
use serde::{Deserialize, Serialize};

use crate::{Assignment, PersistentTask, RegistryError, RegistryResult};

/// An immutable collection of persistent tasks, keyed by task ID.
///
/// One instance lives inside each cluster-state snapshot. Iteration order is
/// ascending task ID, which fixes the order a reassignment pass visits tasks
/// in. Mutations go through [`TaskRegistryBuilder`]; the original registry
/// stays valid and continues to describe the prior snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRegistry {
    last_allocation_id: u64,
    tasks: BTreeMap<TaskId, PersistentTask>,
}

impl TaskRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a builder seeded with this registry's contents.
    pub fn to_builder(&self) -> TaskRegistryBuilder {
        TaskRegistryBuilder {
            last_allocation_id: self.last_allocation_id,
            tasks: self.tasks.clone(),
        }
    }

    /// Starts a builder for a registry built from scratch.
    pub fn builder() -> TaskRegistryBuilder {
        TaskRegistryBuilder {
            last_allocation_id: 0,
            tasks: BTreeMap::new(),
        }
    }

    /// The highest allocation ID handed out so far.
    pub fn last_allocation_id(&self) -> u64 {
        self.last_allocation_id
    }

    /// Looks up a task by ID.
    pub fn get(&self, id: &TaskId) -> Option<&PersistentTask> {
        self.tasks.get(id)
    }

    /// Returns true if a task with this ID exists.
    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of tasks in the registry.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the registry holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates tasks in ascending task-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &PersistentTask> {
        self.tasks.values()
    }

    /// Tasks of the given type matching a predicate, in registry order.
    ///
    /// Placement policies use this to enforce cross-task invariants such as
    /// "at most one assigned task of this type".
    pub fn find_tasks<'a>(
        &'a self,
        task_type: &'a str,
        predicate: impl Fn(&PersistentTask) -> bool + 'a,
    ) -> impl Iterator<Item = &'a PersistentTask> {
        self.tasks
            .values()
            .filter(move |task| task.task_type() == task_type && predicate(task))
    }
}

/// Copy-on-write builder for [`TaskRegistry`].
///
/// Seeded from an existing registry (or empty), mutated in place, then
/// finalized with [`build`](TaskRegistryBuilder::build). The source registry
/// is never touched.
#[derive(Debug, Clone)]
pub struct TaskRegistryBuilder {
    last_allocation_id: u64,
    tasks: BTreeMap<TaskId, PersistentTask>,
}

impl TaskRegistryBuilder {
    /// Inserts a new task with the given initial assignment.
    ///
    /// Fails if a task with this ID already exists.
    pub fn add_task(
        &mut self,
        id: TaskId,
        task_type: impl Into<String>,
        params: serde_json::Value,
        assignment: Assignment,
    ) -> RegistryResult<()> {
        if self.tasks.contains_key(&id) {
            return Err(RegistryError::DuplicateTask(id));
        }
        self.last_allocation_id += 1;
        let task = PersistentTask::new(
            id,
            task_type.into(),
            params,
            self.last_allocation_id,
            assignment,
        );
        self.tasks.insert(id, task);
        Ok(())
    }

    /// Replaces a task's assignment wholesale, bumping its allocation ID.
    ///
    /// Fails if no task with this ID exists.
    pub fn reassign_task(&mut self, id: TaskId, assignment: Assignment) -> RegistryResult<()> {
        let Some(task) = self.tasks.get(&id) else {
            return Err(RegistryError::UnknownTask(id));
        };
        self.last_allocation_id += 1;
        let updated = task.with_assignment(self.last_allocation_id, assignment);
        self.tasks.insert(id, updated);
        Ok(())
    }

    /// Removes a task from the registry.
    ///
    /// Fails if no task with this ID exists. Removal is how completed,
    /// cancelled, and administratively cleaned-up tasks leave the registry.
    pub fn remove_task(&mut self, id: TaskId) -> RegistryResult<()> {
        if self.tasks.remove(&id).is_none() {
            return Err(RegistryError::UnknownTask(id));
        }
        Ok(())
    }

    /// Finalizes the builder into an immutable registry.
    pub fn build(self) -> TaskRegistry {
        TaskRegistry {
            last_allocation_id: self.last_allocation_id,
            tasks: self.tasks,
        }
    }
}
