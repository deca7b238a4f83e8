use crate::ids::IdGen;
use crate::list::{Collection, ListId, TaskList};
use crate::task::{Priority, Task, TaskId};

/// The authoritative in-memory state: every list and task, plus the id
/// source and a revision counter.
///
/// All operations look entities up by id; a miss is a silent no-op. Each
/// operation reports whether it changed anything, and only changes advance
/// [`Board::revision`]. Creation returns `None` once the id space is used up.
#[derive(Debug, Clone, Default)]
pub struct Board {
    collection: Collection,
    ids: IdGen,
    revision: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a previously persisted collection. New ids start above every id
    /// it already contains.
    pub fn from_collection(collection: Collection) -> Self {
        let ids = IdGen::starting_after(collection.max_id());
        Self {
            collection,
            ids,
            revision: 0,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn lists(&self) -> &[TaskList] {
        self.collection.lists()
    }

    pub fn list(&self, list_id: ListId) -> Option<&TaskList> {
        self.collection.list(list_id)
    }

    pub fn task(&self, list_id: ListId, task_id: TaskId) -> Option<&Task> {
        self.list(list_id)?.task(task_id)
    }

    /// Bumped once per successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // -- Lists --

    pub fn add_list(&mut self, name: &str) -> Option<ListId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.ids.next_id()?;
        self.collection
            .lists
            .insert(0, TaskList::new(id, name.to_string()));
        self.touch();
        Some(id)
    }

    pub fn remove_list(&mut self, list_id: ListId) -> bool {
        let before = self.collection.lists.len();
        self.collection.lists.retain(|l| l.id != list_id);
        let changed = self.collection.lists.len() != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// A blank name keeps the current one.
    pub fn rename_list(&mut self, list_id: ListId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(list) = self.collection.list_mut(list_id) else {
            return false;
        };
        if list.name == name {
            return false;
        }
        list.name = name.to_string();
        self.touch();
        true
    }

    // -- Tasks --

    pub fn add_task(&mut self, list_id: ListId, title: &str, priority: Priority) -> Option<TaskId> {
        let title = title.trim();
        if title.is_empty() || self.collection.list(list_id).is_none() {
            return None;
        }
        let id = self.ids.next_id()?;
        let list = self.collection.list_mut(list_id)?;
        list.tasks
            .insert(0, Task::new(id, title.to_string(), priority));
        self.touch();
        Some(id)
    }

    pub fn toggle_task(&mut self, list_id: ListId, task_id: TaskId) -> bool {
        let Some(task) = self.task_mut(list_id, task_id) else {
            return false;
        };
        task.done = !task.done;
        self.touch();
        true
    }

    pub fn remove_task(&mut self, list_id: ListId, task_id: TaskId) -> bool {
        let Some(list) = self.collection.list_mut(list_id) else {
            return false;
        };
        let before = list.tasks.len();
        list.tasks.retain(|t| t.id != task_id);
        let changed = list.tasks.len() != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// Drop every completed task; the rest keep their relative order.
    pub fn clear_done(&mut self, list_id: ListId) -> bool {
        let Some(list) = self.collection.list_mut(list_id) else {
            return false;
        };
        let before = list.tasks.len();
        list.tasks.retain(|t| !t.done);
        let changed = list.tasks.len() != before;
        if changed {
            self.touch();
        }
        changed
    }

    pub fn set_priority(&mut self, list_id: ListId, task_id: TaskId, priority: Priority) -> bool {
        let Some(task) = self.task_mut(list_id, task_id) else {
            return false;
        };
        if task.priority == priority {
            return false;
        }
        task.priority = priority;
        self.touch();
        true
    }

    fn task_mut(&mut self, list_id: ListId, task_id: TaskId) -> Option<&mut Task> {
        self.collection.list_mut(list_id)?.task_mut(task_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn add_list_prepends_with_trimmed_name() {
        let mut board = Board::new();
        let a = board.add_list("  Work ").unwrap();
        let b = board.add_list("Home").unwrap();
        assert_ne!(a, b);
        let names: Vec<&str> = board.lists().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["Home", "Work"]);
        assert!(board.list(a).unwrap().tasks().is_empty());
        assert_eq!(board.revision(), 2);
    }

    #[test]
    fn blank_list_names_are_ignored() {
        let mut board = Board::new();
        assert_eq!(board.add_list(""), None);
        assert_eq!(board.add_list("   "), None);
        assert!(board.lists().is_empty());
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn every_add_gets_a_unique_id() {
        let mut board = Board::new();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let list = board.add_list(&format!("List {i}")).unwrap();
            assert!(ids.insert(list));
            for j in 0..5 {
                let task = board
                    .add_task(list, &format!("Task {j}"), Priority::Normal)
                    .unwrap();
                assert!(ids.insert(task));
            }
        }
        assert_eq!(board.lists().len(), 50);
        assert!(board.lists().iter().all(|l| l.tasks().len() == 5));
    }

    #[test]
    fn remove_list_discards_its_tasks() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let task = board.add_task(list, "Write report", Priority::High).unwrap();

        assert!(board.remove_list(list));
        assert!(board.lists().is_empty());

        let rev = board.revision();
        assert!(!board.toggle_task(list, task));
        assert!(!board.remove_task(list, task));
        assert!(!board.set_priority(list, task, Priority::Low));
        assert!(!board.clear_done(list));
        assert_eq!(board.add_task(list, "Orphan", Priority::Normal), None);
        assert!(!board.remove_list(list));
        assert_eq!(board.revision(), rev);
    }

    #[test]
    fn rename_keeps_old_name_when_blank() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        assert!(!board.rename_list(list, "   "));
        assert_eq!(board.list(list).unwrap().name(), "Work");

        assert!(board.rename_list(list, " Office "));
        assert_eq!(board.list(list).unwrap().name(), "Office");

        assert!(!board.rename_list(list, "Office"));
        assert!(!board.rename_list(list + 1, "Nope"));
    }

    #[test]
    fn add_task_prepends_and_defaults() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let first = board.add_task(list, "First", Priority::default()).unwrap();
        let second = board.add_task(list, " Second ", Priority::Urgent).unwrap();

        let tasks = board.list(list).unwrap().tasks();
        assert_eq!(tasks[0].id(), second);
        assert_eq!(tasks[0].title(), "Second");
        assert_eq!(tasks[0].priority(), Priority::Urgent);
        assert_eq!(tasks[1].id(), first);
        assert_eq!(tasks[1].priority(), Priority::Normal);
        assert!(!tasks[1].done());
    }

    #[test]
    fn blank_task_title_is_ignored() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let rev = board.revision();
        assert_eq!(board.add_task(list, "", Priority::High), None);
        assert_eq!(board.add_task(list, " \t ", Priority::High), None);
        assert!(board.list(list).unwrap().tasks().is_empty());
        assert_eq!(board.revision(), rev);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let task = board.add_task(list, "Write report", Priority::High).unwrap();
        let original = board.task(list, task).unwrap().clone();

        assert!(board.toggle_task(list, task));
        assert!(board.task(list, task).unwrap().done());
        assert!(board.toggle_task(list, task));
        assert_eq!(board.task(list, task).unwrap(), &original);
    }

    #[test]
    fn tasks_are_scoped_to_their_list() {
        let mut board = Board::new();
        let work = board.add_list("Work").unwrap();
        let home = board.add_list("Home").unwrap();
        let task = board.add_task(work, "Write report", Priority::High).unwrap();

        assert!(!board.toggle_task(home, task));
        assert!(!board.remove_task(home, task));
        assert!(!board.task(work, task).unwrap().done());
    }

    #[test]
    fn clear_done_keeps_pending_order_and_is_idempotent() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let a = board.add_task(list, "a", Priority::Normal).unwrap();
        let b = board.add_task(list, "b", Priority::Normal).unwrap();
        let c = board.add_task(list, "c", Priority::Normal).unwrap();
        let d = board.add_task(list, "d", Priority::Normal).unwrap();
        board.toggle_task(list, b);
        board.toggle_task(list, d);

        assert!(board.clear_done(list));
        let once = board.list(list).unwrap().clone();
        let ids: Vec<TaskId> = once.tasks().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![c, a]);

        let rev = board.revision();
        assert!(!board.clear_done(list));
        assert_eq!(board.list(list).unwrap(), &once);
        assert_eq!(board.revision(), rev);
    }

    #[test]
    fn set_priority_overwrites() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let task = board.add_task(list, "Write report", Priority::Normal).unwrap();
        assert!(board.set_priority(list, task, Priority::Urgent));
        assert_eq!(board.task(list, task).unwrap().priority(), Priority::Urgent);
        assert!(!board.set_priority(list, task, Priority::Urgent));
    }

    #[test]
    fn remove_task_only_touches_match() {
        let mut board = Board::new();
        let list = board.add_list("Work").unwrap();
        let a = board.add_task(list, "a", Priority::Normal).unwrap();
        let b = board.add_task(list, "b", Priority::Normal).unwrap();
        assert!(board.remove_task(list, a));
        assert!(!board.remove_task(list, a));
        let ids: Vec<TaskId> = board.list(list).unwrap().tasks().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn loaded_board_issues_ids_above_existing() {
        let mut seed = Board::new();
        let list = seed.add_list("Work").unwrap();
        seed.add_task(list, "t", Priority::Low).unwrap();
        let max = seed.collection().max_id();

        let mut board = Board::from_collection(seed.collection().clone());
        assert_eq!(board.revision(), 0);
        let next = board.add_list("Next").unwrap();
        assert!(next > max);
    }

    #[test]
    fn exhausted_ids_refuse_new_entities() {
        let mut collection = Collection::new();
        collection
            .lists
            .push(TaskList::new(u64::MAX, "Max".to_string()));
        let mut board = Board::from_collection(collection);

        assert_eq!(board.add_list("A"), None);
        assert_eq!(board.add_task(u64::MAX, "t", Priority::Normal), None);
        assert_eq!(board.lists().len(), 1);
        assert!(board.list(u64::MAX).unwrap().tasks().is_empty());
        assert_eq!(board.revision(), 0);
        assert!(board.collection().validate().is_ok());
    }
}
