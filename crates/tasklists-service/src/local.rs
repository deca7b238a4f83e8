use std::sync::Arc;

use tasklists_core::{Board, ListId, Priority, TaskId};
use tasklists_store::ObjectStore;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use crate::{persist, BoardService, ServiceError};

/// A single-user session over a local blob store.
///
/// Owns the `Board` and writes the whole collection back after every
/// successful mutation. The store API is async; calls are driven through an
/// internal current-thread runtime with `block_on()`, so callers are plain
/// synchronous code like the TUI.
pub struct LocalService {
    board: Board,
    store: Arc<dyn ObjectStore>,
    rt: Runtime,
    dirty: bool,
}

impl LocalService {
    /// Load whatever the store holds, starting empty if nothing usable is there.
    pub fn open(store: Arc<dyn ObjectStore>) -> Result<Self, ServiceError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ServiceError::Runtime(e.to_string()))?;
        let collection = rt
            .block_on(persist::load(store.as_ref()))
            .unwrap_or_default();
        info!(lists = collection.len(), "loaded task lists");
        Ok(Self {
            board: Board::from_collection(collection),
            store,
            rt,
            dirty: false,
        })
    }

    fn changed(&mut self, op: &'static str) {
        debug!(op, revision = self.board.revision(), "board changed");
        self.dirty = true;
        if let Err(e) = self.flush() {
            error!(op, "saving task lists failed: {e}");
        }
    }
}

impl BoardService for LocalService {
    fn board(&self) -> &Board {
        &self.board
    }

    fn add_list(&mut self, name: &str) -> Option<ListId> {
        let id = self.board.add_list(name)?;
        self.changed("add_list");
        Some(id)
    }

    fn remove_list(&mut self, list_id: ListId) -> bool {
        let changed = self.board.remove_list(list_id);
        if changed {
            self.changed("remove_list");
        }
        changed
    }

    fn rename_list(&mut self, list_id: ListId, name: &str) -> bool {
        let changed = self.board.rename_list(list_id, name);
        if changed {
            self.changed("rename_list");
        }
        changed
    }

    fn add_task(&mut self, list_id: ListId, title: &str, priority: Priority) -> Option<TaskId> {
        let id = self.board.add_task(list_id, title, priority)?;
        self.changed("add_task");
        Some(id)
    }

    fn toggle_task(&mut self, list_id: ListId, task_id: TaskId) -> bool {
        let changed = self.board.toggle_task(list_id, task_id);
        if changed {
            self.changed("toggle_task");
        }
        changed
    }

    fn remove_task(&mut self, list_id: ListId, task_id: TaskId) -> bool {
        let changed = self.board.remove_task(list_id, task_id);
        if changed {
            self.changed("remove_task");
        }
        changed
    }

    fn clear_done(&mut self, list_id: ListId) -> bool {
        let changed = self.board.clear_done(list_id);
        if changed {
            self.changed("clear_done");
        }
        changed
    }

    fn set_priority(&mut self, list_id: ListId, task_id: TaskId, priority: Priority) -> bool {
        let changed = self.board.set_priority(list_id, task_id, priority);
        if changed {
            self.changed("set_priority");
        }
        changed
    }

    /// True when the last write failed and memory is ahead of storage.
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn flush(&mut self) -> Result<(), ServiceError> {
        // Nothing changed since the last good write; leave storage alone.
        if !self.dirty {
            return Ok(());
        }
        self.rt
            .block_on(persist::save(self.store.as_ref(), self.board.collection()))?;
        self.dirty = false;
        Ok(())
    }
}
