use serde_json::Error as SerdeJsonError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub mod file;

pub use file::{
    csv_path, load_table_from_csv, load_table_from_json, read_table_csv, save_table_to_csv,
    save_table_to_json, write_table_csv,
};
