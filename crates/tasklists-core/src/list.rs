use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TasklistsError;
use crate::task::{Task, TaskId};

pub type ListId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub(crate) id: ListId,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) tasks: Vec<Task>,
}

impl TaskList {
    pub(crate) fn new(id: ListId, name: String) -> Self {
        Self {
            id,
            name,
            tasks: Vec::new(),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tasks in storage order (newest first), not display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}

/// Root state: every list, newest first.
///
/// Serializes as a bare JSON array of lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub(crate) lists: Vec<TaskList>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn list(&self, list_id: ListId) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub(crate) fn list_mut(&mut self, list_id: ListId) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| l.id == list_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Largest list or task id present, 0 when empty.
    pub fn max_id(&self) -> u64 {
        self.lists
            .iter()
            .flat_map(|l| std::iter::once(l.id).chain(l.tasks.iter().map(|t| t.id)))
            .max()
            .unwrap_or(0)
    }

    /// Checks the invariants a deserialized collection cannot enforce by type:
    /// unique list ids, unique task ids per list, and non-blank names and titles.
    pub fn validate(&self) -> Result<(), TasklistsError> {
        let mut list_ids = HashSet::new();
        for list in &self.lists {
            if !list_ids.insert(list.id) {
                return Err(TasklistsError::DuplicateId {
                    scope: "collection".into(),
                    id: list.id,
                });
            }
            if list.name.trim().is_empty() {
                return Err(TasklistsError::InvalidInput(format!(
                    "list {} has a blank name",
                    list.id
                )));
            }
            let mut task_ids = HashSet::new();
            for task in &list.tasks {
                if !task_ids.insert(task.id) {
                    return Err(TasklistsError::DuplicateId {
                        scope: format!("list {}", list.id),
                        id: task.id,
                    });
                }
                if task.title.trim().is_empty() {
                    return Err(TasklistsError::InvalidInput(format!(
                        "task {} has a blank title",
                        task.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn sample() -> Collection {
        let mut work = TaskList::new(10, "Work".into());
        work.tasks.push(Task::new(12, "Write report".into(), Priority::High));
        work.tasks.push(Task::new(11, "Email".into(), Priority::Low));
        let home = TaskList::new(5, "Home".into());
        Collection {
            lists: vec![work, home],
        }
    }

    #[test]
    fn json_shape_matches_persisted_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], 10);
        assert_eq!(json[0]["name"], "Work");
        assert_eq!(json[0]["tasks"][0]["title"], "Write report");
        assert_eq!(json[0]["tasks"][0]["done"], false);
        assert_eq!(json[0]["tasks"][0]["priority"], "high");
        assert_eq!(json[1]["tasks"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn max_id_covers_lists_and_tasks() {
        assert_eq!(sample().max_id(), 12);
        assert_eq!(Collection::new().max_id(), 0);
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_list_ids() {
        let mut c = sample();
        c.lists[1].id = 10;
        assert!(matches!(
            c.validate(),
            Err(TasklistsError::DuplicateId { id: 10, .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_task_ids() {
        let mut c = sample();
        c.lists[0].tasks[1].id = 12;
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_text() {
        let mut c = sample();
        c.lists[1].name = "  ".into();
        assert!(c.validate().is_err());

        let mut c = sample();
        c.lists[0].tasks[0].title = String::new();
        assert!(c.validate().is_err());
    }

    #[test]
    fn same_task_id_in_different_lists_is_valid() {
        let mut c = sample();
        c.lists[1].tasks.push(Task::new(12, "Dishes".into(), Priority::Normal));
        assert!(c.validate().is_ok());
    }
}
