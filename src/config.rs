use crate::persistence::{PersistenceError, PersistenceResult};
use crate::table::DEFAULT_TABLE_NAME;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Seconds added to "now" for a deadline that cannot be parsed.
pub const DEFAULT_DEADLINE_FALLBACK_SECS: i64 = 999_999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub due_today_days: f64,
    pub soon_days: f64,
    pub this_week_days: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            due_today_days: 0.5,
            soon_days: 2.0,
            this_week_days: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub name: String,
    pub deadline_fallback_secs: i64,
    pub alerts: AlertThresholds,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TABLE_NAME.to_string(),
            deadline_fallback_secs: DEFAULT_DEADLINE_FALLBACK_SECS,
            alerts: AlertThresholds::default(),
        }
    }
}

impl TableConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PersistenceError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// The fallback must be a non-negative span chrono can represent.
    pub fn validate(&self) -> PersistenceResult<()> {
        let secs = self.deadline_fallback_secs;
        if secs < 0 || Duration::try_seconds(secs).is_none() {
            return Err(PersistenceError::InvalidData(format!(
                "deadline_fallback_secs {secs} is out of range"
            )));
        }
        Ok(())
    }

    /// Clamped to `Duration::MAX` for values `validate` would reject.
    pub fn deadline_fallback(&self) -> Duration {
        Duration::try_seconds(self.deadline_fallback_secs).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "Chores", "alerts": {{ "soon_days": 3.0 }} }}"#).unwrap();

        let config = TableConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "Chores");
        assert_eq!(config.deadline_fallback_secs, DEFAULT_DEADLINE_FALLBACK_SECS);
        assert_eq!(config.alerts.soon_days, 3.0);
        assert_eq!(config.alerts.due_today_days, 0.5);
    }

    #[test]
    fn out_of_range_fallback_is_rejected() {
        for secs in [i64::MAX, -1] {
            let mut file = NamedTempFile::new().unwrap();
            write!(file, r#"{{ "deadline_fallback_secs": {secs} }}"#).unwrap();
            let err = TableConfig::load(file.path()).unwrap_err();
            assert!(matches!(err, PersistenceError::InvalidData(_)), "{secs}: {err}");
        }
    }

    #[test]
    fn unvalidated_fallback_is_clamped() {
        let config = TableConfig {
            deadline_fallback_secs: i64::MAX,
            ..TableConfig::default()
        };
        assert_eq!(config.deadline_fallback(), Duration::MAX);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TableConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PersistenceError::FileNotFound(_)));
    }
}
