use crate::cell::{Cell, ColumnType};
use crate::task::{FixedField, NewTask, Task};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE_NAME: &str = "Smart Task List";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("task {0} not found")]
    TaskNotFound(u32),
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    #[error("expected {expected} custom values, got {found}")]
    SchemaMismatch { expected: usize, found: usize },
    #[error("column '{column}' holds {expected} values, got {found}")]
    CellTypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },
    #[error("invalid value '{value}' for column '{column}': {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },
    #[error("field '{0}' cannot be changed")]
    ImmutableField(FixedField),
    #[error("no previous state to undo")]
    EmptyUndoStack,
    #[error("no filter to undo")]
    EmptyFilterHistory,
    #[error("no task ids left to assign")]
    IdSpaceExhausted,
}

pub type TableResult<T> = Result<T, TableError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Resolved target of a field selector: either a fixed attribute or a
/// custom column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Fixed(FixedField),
    Custom(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDef>,
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME)
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Assembles a table from decoded parts, realigning any record whose cell
    /// count disagrees with the column list. A record holding `u32::MAX`
    /// leaves the id counter exhausted.
    pub(crate) fn from_parts(
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
        mut tasks: Vec<Task>,
    ) -> Self {
        for task in &mut tasks {
            align_cells(task, &columns);
        }
        let next_id = tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self {
            name: name.into(),
            columns,
            tasks,
            next_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Never lowers the counter.
    pub(crate) fn raise_next_id(&mut self, floor: u32) {
        self.next_id = self.next_id.max(floor);
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Fixed attribute names win over custom columns of the same name.
    pub fn resolve_field(&self, selector: &str) -> TableResult<Field> {
        if let Some(fixed) = FixedField::from_name(selector) {
            return Ok(Field::Fixed(fixed));
        }
        self.column_index(selector)
            .map(Field::Custom)
            .ok_or_else(|| TableError::ColumnNotFound(selector.to_string()))
    }

    /// Appends a column, giving each existing record the value at the same
    /// position in `values`.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        values: Vec<Cell>,
    ) -> TableResult<()> {
        let name = name.into();
        if values.len() != self.tasks.len() {
            return Err(TableError::SchemaMismatch {
                expected: self.tasks.len(),
                found: values.len(),
            });
        }
        if let Some(bad) = values.iter().find(|v| v.column_type() != column_type) {
            return Err(TableError::CellTypeMismatch {
                column: name,
                expected: column_type,
                found: bad.column_type(),
            });
        }

        for (task, value) in self.tasks.iter_mut().zip(values) {
            task.cells.push(value);
        }
        self.columns.push(ColumnDef::new(name, column_type));
        Ok(())
    }

    pub fn add_column_with_default(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> TableResult<()> {
        let values = vec![Cell::default_for(column_type); self.tasks.len()];
        self.add_column(name, column_type, values)
    }

    /// Removes the first column called `name` together with its cell in every record.
    pub fn remove_column(&mut self, name: &str) -> TableResult<ColumnDef> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
        for task in &mut self.tasks {
            task.cells.remove(index);
        }
        Ok(self.columns.remove(index))
    }

    /// Creates a record with the next id and status `Pending`.
    pub fn add_task(&mut self, new_task: NewTask, cells: Vec<Cell>) -> TableResult<u32> {
        if cells.len() != self.columns.len() {
            return Err(TableError::SchemaMismatch {
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        for (column, cell) in self.columns.iter().zip(&cells) {
            if cell.column_type() != column.column_type {
                return Err(TableError::CellTypeMismatch {
                    column: column.name.clone(),
                    expected: column.column_type,
                    found: cell.column_type(),
                });
            }
        }

        // `u32::MAX` is never issued, so it can mark an exhausted counter
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(TableError::IdSpaceExhausted)?;
        self.next_id = next_id;
        let mut task = Task::new(id, new_task.name, new_task.priority, new_task.deadline);
        task.cells = cells;
        self.tasks.push(task);
        Ok(id)
    }

    /// Sets one field of one record from text. Custom cells are parsed
    /// according to their column's declared type.
    pub fn update_field(&mut self, id: u32, selector: &str, value: &str) -> TableResult<()> {
        if self.task(id).is_none() {
            return Err(TableError::TaskNotFound(id));
        }
        let field = self.resolve_field(selector)?;
        let new_cell = match field {
            Field::Custom(index) => {
                let column = &self.columns[index];
                Some(
                    Cell::parse(column.column_type, value).map_err(|err| {
                        TableError::InvalidValue {
                            column: column.name.clone(),
                            value: value.to_string(),
                            reason: err.to_string(),
                        }
                    })?,
                )
            }
            Field::Fixed(FixedField::Id) => return Err(TableError::ImmutableField(FixedField::Id)),
            Field::Fixed(_) => None,
        };

        let task = self.task_mut(id).ok_or(TableError::TaskNotFound(id))?;
        match (field, new_cell) {
            (Field::Custom(index), Some(cell)) => task.cells[index].set_value(cell),
            (Field::Fixed(FixedField::Name), _) => task.name = value.to_string(),
            (Field::Fixed(FixedField::Priority), _) => task.priority = value.to_string(),
            (Field::Fixed(FixedField::Deadline), _) => task.deadline = value.to_string(),
            (Field::Fixed(FixedField::Status), _) => task.status = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    pub fn delete_task(&mut self, id: u32) -> TableResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TableError::TaskNotFound(id))?;
        Ok(self.tasks.remove(index))
    }

    /// Drops every record whose status is exactly `Completed`; returns how many went.
    pub fn remove_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.is_completed());
        before - self.tasks.len()
    }

    /// Full, untruncated text of one field.
    pub fn view_field(&self, id: u32, selector: &str) -> TableResult<String> {
        let task = self.task(id).ok_or(TableError::TaskNotFound(id))?;
        match self.resolve_field(selector)? {
            Field::Fixed(fixed) => Ok(task.fixed_value(fixed)),
            Field::Custom(index) => task
                .cells
                .get(index)
                .map(Cell::render)
                .ok_or_else(|| TableError::ColumnNotFound(selector.to_string())),
        }
    }
}

fn align_cells(task: &mut Task, columns: &[ColumnDef]) {
    if task.cells.len() > columns.len() {
        task.cells.truncate(columns.len());
    }
    while task.cells.len() < columns.len() {
        let column_type = columns[task.cells.len()].column_type;
        task.cells.push(Cell::default_for(column_type));
    }
}
