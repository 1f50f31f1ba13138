use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_STATUS: &str = "Pending";
pub const COMPLETED_STATUS: &str = "Completed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub priority: String,
    /// `yyyy-mm-dd hh:mm`, kept as entered.
    pub deadline: String,
    pub status: String,
    /// Aligned 1:1 with the owning table's columns.
    pub cells: Vec<Cell>,
}

impl Task {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        priority: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority: priority.into(),
            deadline: deadline.into(),
            status: DEFAULT_STATUS.to_string(),
            cells: Vec::new(),
        }
    }

    pub fn fixed_value(&self, field: FixedField) -> String {
        match field {
            FixedField::Id => self.id.to_string(),
            FixedField::Name => self.name.clone(),
            FixedField::Priority => self.priority.clone(),
            FixedField::Deadline => self.deadline.clone(),
            FixedField::Status => self.status.clone(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }

    pub fn priority_rank(&self) -> u8 {
        Priority::from_label(&self.priority).rank()
    }
}

/// Attributes supplied by the caller when creating a record. The id and status
/// are assigned by the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub name: String,
    pub priority: String,
    pub deadline: String,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        priority: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            priority: priority.into(),
            deadline: deadline.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedField {
    Id,
    Name,
    Priority,
    Deadline,
    Status,
}

impl FixedField {
    pub const ALL: [FixedField; 5] = [
        FixedField::Id,
        FixedField::Name,
        FixedField::Priority,
        FixedField::Deadline,
        FixedField::Status,
    ];

    /// Header text used by the CSV layout.
    pub fn header(&self) -> &'static str {
        match self {
            FixedField::Id => "ID",
            FixedField::Name => "Name",
            FixedField::Priority => "Priority",
            FixedField::Deadline => "Deadline",
            FixedField::Status => "Status",
        }
    }

    /// Resolves a fixed attribute by name, case-insensitively.
    ///
    /// `TaskName` is accepted for the name field.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "id" => Some(FixedField::Id),
            "name" | "taskname" | "task name" => Some(FixedField::Name),
            "priority" => Some(FixedField::Priority),
            "deadline" => Some(FixedField::Deadline),
            "status" => Some(FixedField::Status),
            _ => None,
        }
    }
}

impl fmt::Display for FixedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Unknown,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Exact, case-sensitive match; anything else is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Unknown,
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Unknown => 0,
        }
    }
}

impl FromStr for Priority {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Priority::from_label(s))
    }
}
