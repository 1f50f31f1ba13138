use crate::table::{Table, TableError, TableResult};
use crate::task::{FixedField, Task};
use std::cmp::Ordering;

/// Column to sort by: a fixed attribute or a zero-based custom column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Fixed(FixedField),
    Custom(usize),
}

impl SortKey {
    /// `0..=4` pick id, name, priority, deadline, status; `5..` pick custom
    /// column `n - 5`.
    pub fn from_menu_index(index: usize) -> Self {
        match FixedField::ALL.get(index) {
            Some(field) => SortKey::Fixed(*field),
            None => SortKey::Custom(index - FixedField::ALL.len()),
        }
    }

    /// Accepts a fixed field name, a custom column name, or a menu index.
    pub fn parse(selector: &str, table: &Table) -> TableResult<Self> {
        if let Some(field) = FixedField::from_name(selector) {
            return Ok(SortKey::Fixed(field));
        }
        if let Some(index) = table.column_index(selector) {
            return Ok(SortKey::Custom(index));
        }
        selector
            .trim()
            .parse::<usize>()
            .map(SortKey::from_menu_index)
            .map_err(|_| TableError::ColumnNotFound(selector.to_string()))
    }
}

fn compare_fixed(field: FixedField, a: &Task, b: &Task) -> Ordering {
    match field {
        FixedField::Id => a.id.cmp(&b.id),
        FixedField::Name => a.name.cmp(&b.name),
        FixedField::Priority => a.priority.cmp(&b.priority),
        FixedField::Deadline => a.deadline.cmp(&b.deadline),
        FixedField::Status => a.status.cmp(&b.status),
    }
}

/// Stable sort of `tasks` by `key`. Custom columns compare by their cells'
/// native ordering (see [`crate::Cell::compare`]).
pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::Fixed(field) => tasks.sort_by(|a, b| compare_fixed(field, a, b)),
        SortKey::Custom(index) => {
            tasks.sort_by(|a, b| match (a.cells.get(index), b.cells.get(index)) {
                (Some(x), Some(y)) => x.compare(y),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
            })
        }
    }
}

impl Table {
    /// Reorders the records in place. Fails without touching the table when a
    /// custom index is out of range.
    pub fn sort_by(&mut self, key: SortKey) -> TableResult<()> {
        if let SortKey::Custom(index) = key {
            if index >= self.columns().len() {
                return Err(TableError::ColumnNotFound(format!("#{index}")));
            }
        }
        sort_tasks(self.tasks_mut(), key);
        Ok(())
    }
}
