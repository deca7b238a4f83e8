use std::fmt;

use serde::{Deserialize, Serialize};

pub type TaskId = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Highest rank first.
    pub const ALL: &[Priority] = &[
        Priority::Urgent,
        Priority::High,
        Priority::Normal,
        Priority::Low,
    ];

    /// Sort rank: urgent=3, high=2, normal=1, low=0.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 3,
            Priority::High => 2,
            Priority::Normal => 1,
            Priority::Low => 0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
        }
    }

    /// Next value in `ALL`, wrapping from low back to urgent.
    pub fn cycle(&self) -> Priority {
        match self {
            Priority::Urgent => Priority::High,
            Priority::High => Priority::Normal,
            Priority::Normal => Priority::Low,
            Priority::Low => Priority::Urgent,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) title: String,
    pub(crate) done: bool,
    pub(crate) priority: Priority,
}

impl Task {
    pub(crate) fn new(id: TaskId, title: String, priority: Priority) -> Self {
        Self {
            id,
            title,
            done: false,
            priority,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_total() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
        let ranks: Vec<u8> = Priority::ALL.iter().map(Priority::rank).collect();
        assert_eq!(ranks, vec![3, 2, 1, 0]);
    }

    #[test]
    fn priority_defaults_to_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn priority_serializes_lowercase() {
        let names: Vec<String> = Priority::ALL
            .iter()
            .map(|p| serde_json::to_string(p).unwrap())
            .collect();
        assert_eq!(names, vec!["\"urgent\"", "\"high\"", "\"normal\"", "\"low\""]);
        let err = serde_json::from_str::<Priority>("\"critical\"");
        assert!(err.is_err());
    }

    #[test]
    fn cycle_visits_every_priority() {
        let mut p = Priority::Urgent;
        let mut seen = vec![p];
        for _ in 0..3 {
            p = p.cycle();
            seen.push(p);
        }
        assert_eq!(seen, Priority::ALL.to_vec());
        assert_eq!(p.cycle(), Priority::Urgent);
    }
}
