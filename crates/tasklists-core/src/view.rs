//! Display ordering for a list's tasks.
//!
//! Projections are derived on demand and never written back; the stored
//! task order (newest first) is independent of what the user sees.

use std::cmp::Ordering;
use std::fmt;

use crate::board::Board;
use crate::list::{ListId, TaskList};
use crate::task::{Task, TaskId};

/// Priority descending, then pending before done, then newest first.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| a.done.cmp(&b.done))
        .then_with(|| b.id.cmp(&a.id))
}

/// Tasks of `tasks` in display order, borrowed.
pub fn sorted_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| display_order(a, b));
    sorted
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(list: &TaskList) -> Self {
        Self {
            done: list.done_count(),
            total: list.tasks().len(),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// A list as the dashboard shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub id: ListId,
    pub name: String,
    pub tasks: Vec<Task>,
    pub progress: Progress,
}

impl ListView {
    pub fn of(list: &TaskList) -> Self {
        Self {
            id: list.id(),
            name: list.name().to_string(),
            tasks: sorted_tasks(list.tasks()).into_iter().cloned().collect(),
            progress: Progress::of(list),
        }
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }
}

/// Project every list of the board, in collection order.
pub fn project(board: &Board) -> Vec<ListView> {
    board.lists().iter().map(ListView::of).collect()
}

/// Memoised projections, recomputed when the board's revision moves.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    revision: Option<u64>,
    views: Vec<ListView>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the next read will recompute.
    pub fn is_stale(&self, board: &Board) -> bool {
        self.revision != Some(board.revision())
    }

    fn refresh(&mut self, board: &Board) {
        if !self.is_stale(board) {
            return;
        }
        self.views = project(board);
        self.revision = Some(board.revision());
    }

    pub fn views(&mut self, board: &Board) -> &[ListView] {
        self.refresh(board);
        &self.views
    }
}
