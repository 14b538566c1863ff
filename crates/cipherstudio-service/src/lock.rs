//! Per-project mutation locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use cipherstudio_core::types::ProjectId;

/// One async mutex per project.
///
/// Every tree mutation and project deletion holds its project's guard for
/// the whole operation, so a create can never interleave with a subtree
/// or project deletion. Reads do not take the lock.
#[derive(Debug, Clone, Default)]
pub struct ProjectLocks {
    locks: Arc<DashMap<ProjectId, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and returns exclusive access to `project_id`'s tree.
    pub async fn acquire(&self, project_id: ProjectId) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(project_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Drops the entry for a deleted project if nobody holds or awaits it.
    pub fn forget(&self, project_id: &ProjectId) {
        self.locks
            .remove_if(project_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }

    /// Number of projects with a lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no project has a lock entry.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_project_is_exclusive() {
        let locks = ProjectLocks::new();
        let project = ProjectId::new();

        let guard = locks.acquire(project).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(project).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_projects_do_not_block() {
        let locks = ProjectLocks::new();
        let _a = locks.acquire(ProjectId::new()).await;
        let _b = locks.acquire(ProjectId::new()).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_forget_keeps_held_entries() {
        let locks = ProjectLocks::new();
        let project = ProjectId::new();

        let guard = locks.acquire(project).await;
        locks.forget(&project);
        assert_eq!(locks.len(), 1);

        drop(guard);
        locks.forget(&project);
        assert!(locks.is_empty());
    }
}
