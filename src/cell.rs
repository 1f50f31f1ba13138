use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Text,
    Boolean,
    Float,
    Date,
    Link,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::Link => "link",
        }
    }

    /// Menu numbering used by the interactive front end (1-based).
    pub fn from_menu_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(ColumnType::Integer),
            2 => Some(ColumnType::Text),
            3 => Some(ColumnType::Boolean),
            4 => Some(ColumnType::Float),
            5 => Some(ColumnType::Date),
            6 => Some(ColumnType::Link),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(ColumnType::Integer),
            "text" | "string" | "str" => Ok(ColumnType::Text),
            "bool" | "boolean" => Ok(ColumnType::Boolean),
            "float" | "double" | "number" => Ok(ColumnType::Float),
            "date" => Ok(ColumnType::Date),
            "link" | "url" => Ok(ColumnType::Link),
            other => Err(CellParseError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellParseError {
    #[error("unknown column type '{0}'")]
    UnknownType(String),
    #[error("'{value}' is not a valid {expected} value")]
    InvalidValue { expected: ColumnType, value: String },
}

/// One typed value in a custom column.
///
/// The variant is the type tag; rendering and comparison both match on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Float(f64),
    Date(String),
    Link(String),
}

impl Cell {
    /// Zero value of the given type, used when a column is added without explicit values.
    pub fn default_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Integer => Cell::Integer(0),
            ColumnType::Text => Cell::Text(String::new()),
            ColumnType::Boolean => Cell::Boolean(false),
            ColumnType::Float => Cell::Float(0.0),
            ColumnType::Date => Cell::Date(String::new()),
            ColumnType::Link => Cell::Link(String::new()),
        }
    }

    /// Builds a cell of `column_type` from user text.
    pub fn parse(column_type: ColumnType, input: &str) -> Result<Self, CellParseError> {
        let invalid = || CellParseError::InvalidValue {
            expected: column_type,
            value: input.to_string(),
        };
        match column_type {
            ColumnType::Integer => input
                .trim()
                .parse::<i64>()
                .map(Cell::Integer)
                .map_err(|_| invalid()),
            ColumnType::Float => input
                .trim()
                .parse::<f64>()
                .map(Cell::Float)
                .map_err(|_| invalid()),
            ColumnType::Boolean => match input.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "y" => Ok(Cell::Boolean(true)),
                "0" | "false" | "no" | "n" => Ok(Cell::Boolean(false)),
                _ => Err(invalid()),
            },
            ColumnType::Text => Ok(Cell::Text(input.to_string())),
            ColumnType::Date => Ok(Cell::Date(input.to_string())),
            ColumnType::Link => Ok(Cell::Link(input.to_string())),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Cell::Integer(_) => ColumnType::Integer,
            Cell::Text(_) => ColumnType::Text,
            Cell::Boolean(_) => ColumnType::Boolean,
            Cell::Float(_) => ColumnType::Float,
            Cell::Date(_) => ColumnType::Date,
            Cell::Link(_) => ColumnType::Link,
        }
    }

    /// Overwrites tag and payload together.
    pub fn set_value(&mut self, value: Cell) {
        *self = value;
    }

    pub fn render(&self) -> String {
        match self {
            Cell::Integer(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Boolean(true) => "Yes".to_string(),
            Cell::Boolean(false) => "No".to_string(),
            Cell::Text(s) | Cell::Date(s) | Cell::Link(s) => s.clone(),
        }
    }

    /// Orders two cells of the same column.
    ///
    /// Numeric and boolean cells compare by value, text-like cells by their
    /// text. Mixed tags fall back to comparing rendered text.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Integer(a), Cell::Integer(b)) => a.cmp(b),
            (Cell::Float(a), Cell::Float(b)) => a.total_cmp(b),
            (Cell::Boolean(a), Cell::Boolean(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b))
            | (Cell::Date(a), Cell::Date(b))
            | (Cell::Link(a), Cell::Link(b)) => a.cmp(b),
            _ => self.render().cmp(&other.render()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_render_as_yes_no() {
        assert_eq!(Cell::Boolean(true).render(), "Yes");
        assert_eq!(Cell::Boolean(false).render(), "No");
    }

    #[test]
    fn numbers_render_naturally() {
        assert_eq!(Cell::Integer(-42).render(), "-42");
        assert_eq!(Cell::Float(1.5).render(), "1.5");
    }

    #[test]
    fn date_and_link_render_verbatim() {
        assert_eq!(Cell::Date("2030-01-01".into()).render(), "2030-01-01");
        assert_eq!(
            Cell::Link("https://example.com/a?b=c".into()).render(),
            "https://example.com/a?b=c"
        );
    }

    #[test]
    fn parse_respects_declared_type() {
        assert_eq!(Cell::parse(ColumnType::Integer, " 7 ").unwrap(), Cell::Integer(7));
        assert_eq!(Cell::parse(ColumnType::Boolean, "yes").unwrap(), Cell::Boolean(true));
        assert_eq!(Cell::parse(ColumnType::Boolean, "0").unwrap(), Cell::Boolean(false));
        assert!(matches!(
            Cell::parse(ColumnType::Float, "abc"),
            Err(CellParseError::InvalidValue { expected: ColumnType::Float, .. })
        ));
    }

    #[test]
    fn set_value_replaces_tag_and_payload() {
        let mut cell = Cell::Integer(3);
        cell.set_value(Cell::Text("three".into()));
        assert_eq!(cell.column_type(), ColumnType::Text);
        assert_eq!(cell.render(), "three");
    }

    #[test]
    fn compare_uses_native_ordering_for_numbers() {
        // "10" < "9" as text, but not as integers
        assert_eq!(Cell::Integer(9).compare(&Cell::Integer(10)), Ordering::Less);
        assert_eq!(Cell::Float(2.5).compare(&Cell::Float(-1.0)), Ordering::Greater);
        assert_eq!(Cell::Boolean(false).compare(&Cell::Boolean(true)), Ordering::Less);
    }

    #[test]
    fn column_type_parses_aliases() {
        assert_eq!("STRING".parse::<ColumnType>().unwrap(), ColumnType::Text);
        assert_eq!("int".parse::<ColumnType>().unwrap(), ColumnType::Integer);
        assert!("blob".parse::<ColumnType>().is_err());
        assert_eq!(ColumnType::from_menu_code(6), Some(ColumnType::Link));
        assert_eq!(ColumnType::from_menu_code(0), None);
    }
}
