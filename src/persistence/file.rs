use super::{PersistenceError, PersistenceResult};
use crate::cell::{Cell, ColumnType};
use crate::table::{ColumnDef, Table};
use crate::task::{FixedField, Task};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FIXED_FIELD_COUNT: usize = FixedField::ALL.len();

#[derive(Serialize, Deserialize)]
struct TableSnapshot {
    name: String,
    next_id: u32,
    columns: Vec<ColumnDef>,
    tasks: Vec<Task>,
}

impl TableSnapshot {
    fn from_table(table: &Table) -> Self {
        Self {
            name: table.name().to_string(),
            next_id: table.next_id(),
            columns: table.columns().to_vec(),
            tasks: table.tasks().to_vec(),
        }
    }

    fn into_table(self) -> PersistenceResult<Table> {
        for task in &self.tasks {
            for (column, cell) in self.columns.iter().zip(&task.cells) {
                if cell.column_type() != column.column_type {
                    return Err(PersistenceError::InvalidData(format!(
                        "task {} stores a {} value in {} column '{}'",
                        task.id,
                        cell.column_type(),
                        column.column_type,
                        column.name
                    )));
                }
            }
        }
        let mut table = Table::from_parts(self.name, self.columns, self.tasks);
        table.raise_next_id(self.next_id);
        Ok(table)
    }
}

/// Appends `.csv` unless the path already ends with it.
pub fn csv_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "csv" => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".csv");
            PathBuf::from(name)
        }
    }
}

/// Writes the header and one line per record. Values are written as-is;
/// a comma inside a value shifts every following column on reload.
pub fn write_table_csv<W: Write>(table: &Table, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(writer);

    let header = FixedField::ALL
        .iter()
        .map(|f| f.header())
        .chain(table.columns().iter().map(|c| c.name.as_str()));
    writer.write_record(header)?;

    for task in table.tasks() {
        let mut row: Vec<String> = FixedField::ALL
            .iter()
            .map(|f| task.fixed_value(*f))
            .collect();
        row.extend(task.cells.iter().map(Cell::render));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Rebuilds a table from the CSV layout. Every custom column comes back as
/// text; lines with fewer than five fields, a non-numeric id, or an id at
/// `u32::MAX` are skipped.
pub fn read_table_csv<R: Read>(reader: R, name: &str) -> PersistenceResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(PersistenceError::InvalidData("CSV file has no header".into())),
    };
    let columns: Vec<ColumnDef> = header
        .iter()
        .skip(FIXED_FIELD_COUNT)
        .map(|name| ColumnDef::new(name, ColumnType::Text))
        .collect();

    let mut tasks = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record?;
        let line = index + 2;
        if record.len() < FIXED_FIELD_COUNT {
            warn!(line, fields = record.len(), "skipping short CSV line");
            continue;
        }
        let Ok(id) = record[0].trim().parse::<u32>() else {
            warn!(line, id = &record[0], "skipping CSV line with invalid id");
            continue;
        };
        if id == u32::MAX {
            warn!(line, id, "skipping CSV line with out-of-range id");
            continue;
        }

        let mut task = Task::new(id, &record[1], &record[2], &record[3]);
        task.status = record[4].to_string();
        task.cells = record
            .iter()
            .skip(FIXED_FIELD_COUNT)
            .map(|value| Cell::Text(value.to_string()))
            .collect();
        if task.cells.len() != columns.len() {
            warn!(
                line,
                expected = columns.len(),
                found = task.cells.len(),
                "CSV line does not match header width, realigning"
            );
        }
        tasks.push(task);
    }

    Ok(Table::from_parts(name, columns, tasks))
}

/// Returns the path actually written (with the `.csv` suffix).
pub fn save_table_to_csv<P: AsRef<Path>>(table: &Table, path: P) -> PersistenceResult<PathBuf> {
    let path = csv_path(path);
    let file = File::create(&path)?;
    write_table_csv(table, file)?;
    info!(path = %path.display(), tasks = table.task_count(), "saved table to csv");
    Ok(path)
}

pub fn load_table_from_csv<P: AsRef<Path>>(path: P, name: &str) -> PersistenceResult<Table> {
    let path = csv_path(path);
    if !path.exists() {
        return Err(PersistenceError::FileNotFound(path));
    }
    let file = File::open(&path)?;
    let table = read_table_csv(file, name)?;
    info!(path = %path.display(), tasks = table.task_count(), "loaded table from csv");
    Ok(table)
}

/// Lossless counterpart of the CSV format: column types survive.
pub fn save_table_to_json<P: AsRef<Path>>(table: &Table, path: P) -> PersistenceResult<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &TableSnapshot::from_table(table))?;
    info!(path = %path.as_ref().display(), tasks = table.task_count(), "saved table to json");
    Ok(())
}

pub fn load_table_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PersistenceError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let snapshot: TableSnapshot = serde_json::from_reader(file)?;
    snapshot.into_table()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_suffix_is_appended_once() {
        assert_eq!(csv_path("tasks"), PathBuf::from("tasks.csv"));
        assert_eq!(csv_path("tasks.csv"), PathBuf::from("tasks.csv"));
        assert_eq!(csv_path("tasks.v2"), PathBuf::from("tasks.v2.csv"));
    }

    #[test]
    fn header_only_yields_empty_table() {
        let input = "ID,Name,Priority,Deadline,Status,Notes\n";
        let table = read_table_csv(input.as_bytes(), "t").unwrap();
        assert_eq!(table.columns().len(), 1);
        assert_eq!(table.task_count(), 0);
        assert_eq!(table.next_id(), 1);
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(matches!(
            read_table_csv("".as_bytes(), "t"),
            Err(PersistenceError::InvalidData(_))
        ));
    }

    #[test]
    fn short_and_bad_id_lines_are_skipped() {
        let input = "ID,Name,Priority,Deadline,Status\n\
                     1,A,High,2030-01-01 09:00,Pending\n\
                     2,B,Low\n\
                     x,C,Low,2030-01-01 09:00,Pending\n\
                     7,D,Low,2030-01-01 09:00,Done\n";
        let table = read_table_csv(input.as_bytes(), "t").unwrap();
        let ids: Vec<u32> = table.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 7]);
        assert_eq!(table.next_id(), 8);
    }

    #[test]
    fn out_of_range_id_lines_are_skipped() {
        let input = "ID,Name,Priority,Deadline,Status\n\
                     4294967295,A,High,2030-01-01 09:00,Pending\n\
                     4294967296,B,High,2030-01-01 09:00,Pending\n\
                     3,C,Low,2030-01-01 09:00,Pending\n";
        let table = read_table_csv(input.as_bytes(), "t").unwrap();
        let ids: Vec<u32> = table.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(table.next_id(), 4);
    }

    #[test]
    fn highest_loaded_id_exhausts_the_counter() {
        let input = "ID,Name,Priority,Deadline,Status\n\
                     4294967294,A,High,2030-01-01 09:00,Pending\n";
        let mut table = read_table_csv(input.as_bytes(), "t").unwrap();
        assert_eq!(table.next_id(), u32::MAX);
        assert_eq!(
            table.add_task(crate::task::NewTask::new("B", "Low", "2030-01-01 09:00"), vec![]),
            Err(crate::table::TableError::IdSpaceExhausted)
        );
        assert_eq!(table.task_count(), 1);
    }

    #[test]
    fn encode_renders_typed_cells() {
        let mut table = Table::new("t");
        table.add_column_with_default("Done", ColumnType::Boolean).unwrap();
        table
            .add_task(
                crate::task::NewTask::new("A", "High", "2030-01-01 09:00"),
                vec![Cell::Boolean(true)],
            )
            .unwrap();
        let mut out = Vec::new();
        write_table_csv(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID,Name,Priority,Deadline,Status,Done\n1,A,High,2030-01-01 09:00,Pending,Yes\n"
        );
    }
}
