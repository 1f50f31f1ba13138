use crate::table::{Table, TableError, TableResult};

/// LIFO store of full table copies.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    snapshots: Vec<Table>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an independent copy of `table`.
    pub fn push(&mut self, table: &Table) {
        self.snapshots.push(table.clone());
    }

    pub(crate) fn push_owned(&mut self, snapshot: Table) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> TableResult<Table> {
        self.snapshots.pop().ok_or(TableError::EmptyUndoStack)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
