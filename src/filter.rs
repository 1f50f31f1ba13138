use crate::table::{Table, TableError, TableResult};
use crate::task::{FixedField, Task};
use tracing::debug;

/// Narrowing view over a copy of a table's records.
///
/// Each filter pushes the previous working set so it can be undone. The
/// table the session was opened from is never touched.
#[derive(Debug, Clone, Default)]
pub struct FilterSession {
    working_set: Vec<Task>,
    history: Vec<Vec<Task>>,
    column_count: usize,
}

impl FilterSession {
    pub fn new(table: &Table) -> Self {
        Self {
            working_set: table.tasks().to_vec(),
            history: Vec::new(),
            column_count: table.columns().len(),
        }
    }

    /// Keeps the records whose fixed field equals `value`. An empty match is
    /// applied like any other result.
    pub fn apply_fixed_filter(&mut self, field: FixedField, value: &str) -> usize {
        self.narrow(|task| task.fixed_value(field) == value)
    }

    /// Keeps the records whose custom cell at `column_index` renders as `value`.
    pub fn apply_custom_filter(&mut self, column_index: usize, value: &str) -> TableResult<usize> {
        if column_index >= self.column_count {
            return Err(TableError::ColumnNotFound(format!("#{column_index}")));
        }
        Ok(self.narrow(|task| {
            task.cells
                .get(column_index)
                .is_some_and(|cell| cell.render() == value)
        }))
    }

    pub fn undo_filter(&mut self) -> TableResult<()> {
        let previous = self.history.pop().ok_or(TableError::EmptyFilterHistory)?;
        self.working_set = previous;
        Ok(())
    }

    pub fn current_view(&self) -> &[Task] {
        &self.working_set
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    fn narrow<F>(&mut self, keep: F) -> usize
    where
        F: Fn(&Task) -> bool,
    {
        let narrowed: Vec<Task> = self.working_set.iter().filter(|t| keep(*t)).cloned().collect();
        let previous = std::mem::replace(&mut self.working_set, narrowed);
        self.history.push(previous);
        debug!(
            remaining = self.working_set.len(),
            depth = self.history.len(),
            "filter applied"
        );
        self.working_set.len()
    }
}
