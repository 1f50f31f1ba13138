pub mod alerts;
pub mod cell;
pub mod config;
pub mod filter;
pub mod history;
pub mod persistence;
pub mod schedule;
pub mod sort;
pub mod table;
pub mod task;
pub mod workspace;

pub use alerts::{Alert, AlertCategory, AlertReport};
pub use cell::{Cell, CellParseError, ColumnType};
pub use config::{AlertThresholds, TableConfig};
pub use filter::FilterSession;
pub use history::UndoStack;
pub use persistence::{
    PersistenceError, load_table_from_csv, load_table_from_json, read_table_csv,
    save_table_to_csv, save_table_to_json, write_table_csv,
};
pub use schedule::{DeadlineParseError, parse_deadline, priority_rank};
pub use sort::SortKey;
pub use table::{ColumnDef, Field, Table, TableError};
pub use task::{FixedField, NewTask, Priority, Task};
pub use workspace::Workspace;
