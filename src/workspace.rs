use crate::alerts::{self, AlertReport};
use crate::cell::{Cell, ColumnType};
use crate::config::TableConfig;
use crate::filter::FilterSession;
use crate::history::UndoStack;
use crate::persistence::{self, PersistenceError, PersistenceResult};
use crate::schedule;
use crate::sort::SortKey;
use crate::table::{ColumnDef, Table, TableError, TableResult};
use crate::task::{NewTask, Task};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Session state: the live table, its undo history and the id floor.
///
/// Every mutating call snapshots the table first; the snapshot is kept only
/// if the mutation succeeds.
#[derive(Debug, Clone)]
pub struct Workspace {
    table: Table,
    undo: UndoStack,
    config: TableConfig,
    id_floor: u32,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::with_config(TableConfig::default())
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableConfig) -> Self {
        let table = Table::new(config.name.clone());
        let id_floor = table.next_id();
        Self {
            table,
            undo: UndoStack::new(),
            config,
            id_floor,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn mutate<T, E, F>(&mut self, operation: &str, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut Table) -> Result<T, E>,
    {
        let snapshot = self.table.clone();
        let result = apply(&mut self.table)?;
        self.undo.push_owned(snapshot);
        self.id_floor = self.id_floor.max(self.table.next_id());
        debug!(operation, depth = self.undo.len(), "table mutated");
        Ok(result)
    }

    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        values: Vec<Cell>,
    ) -> TableResult<()> {
        self.mutate("add_column", |t| t.add_column(name, column_type, values))
    }

    pub fn add_column_with_default(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> TableResult<()> {
        self.mutate("add_column", |t| t.add_column_with_default(name, column_type))
    }

    pub fn remove_column(&mut self, name: &str) -> TableResult<ColumnDef> {
        self.mutate("remove_column", |t| t.remove_column(name))
    }

    pub fn add_task(&mut self, new_task: NewTask, cells: Vec<Cell>) -> TableResult<u32> {
        self.mutate("add_task", |t| t.add_task(new_task, cells))
    }

    pub fn update_field(&mut self, id: u32, selector: &str, value: &str) -> TableResult<()> {
        self.mutate("update_field", |t| t.update_field(id, selector, value))
    }

    pub fn delete_task(&mut self, id: u32) -> TableResult<Task> {
        self.mutate("delete_task", |t| t.delete_task(id))
    }

    pub fn sort_by(&mut self, key: SortKey) -> TableResult<()> {
        self.mutate("sort", |t| t.sort_by(key))
    }

    pub fn remove_completed(&mut self) -> usize {
        self.mutate("remove_completed", |t| Ok::<_, TableError>(t.remove_completed()))
            .unwrap_or_default()
    }

    /// Restores the previous table. The id counter never drops below the
    /// highest value seen in this session, so discarded ids are not reissued.
    pub fn undo(&mut self) -> TableResult<()> {
        let mut restored = self.undo.pop()?;
        restored.raise_next_id(self.id_floor);
        self.table = restored;
        debug!(depth = self.undo.len(), next_id = self.table.next_id(), "undo applied");
        Ok(())
    }

    pub fn filter_session(&self) -> FilterSession {
        FilterSession::new(&self.table)
    }

    pub fn schedule_at(&self, now: NaiveDateTime) -> Vec<Task> {
        schedule::schedule(self.table.tasks(), now, self.config.deadline_fallback())
    }

    pub fn schedule(&self) -> Vec<Task> {
        self.schedule_at(Local::now().naive_local())
    }

    pub fn alerts_at(&self, now: NaiveDateTime) -> AlertReport {
        alerts::categorize(
            self.table.tasks(),
            now,
            self.config.deadline_fallback(),
            &self.config.alerts,
        )
    }

    pub fn alerts(&self) -> AlertReport {
        self.alerts_at(Local::now().naive_local())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<PathBuf> {
        persistence::save_table_to_csv(&self.table, path)
    }

    /// Replaces the table with the file's contents. Undoable; a failed load
    /// changes nothing.
    pub fn load_csv<P: AsRef<Path>>(&mut self, path: P) -> PersistenceResult<()> {
        let loaded = persistence::load_table_from_csv(path, &self.config.name)?;
        self.mutate("load_csv", |t| {
            *t = loaded;
            Ok::<_, PersistenceError>(())
        })
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<()> {
        persistence::save_table_to_json(&self.table, path)
    }

    pub fn load_json<P: AsRef<Path>>(&mut self, path: P) -> PersistenceResult<()> {
        let loaded = persistence::load_table_from_json(path)?;
        self.mutate("load_json", |t| {
            *t = loaded;
            Ok::<_, PersistenceError>(())
        })
    }
}
