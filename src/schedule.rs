use crate::task::{Priority, Task};
use chrono::{Duration, NaiveDateTime};
use tracing::warn;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to parse deadline '{value}': {source}")]
pub struct DeadlineParseError {
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}

/// High=3, Medium=2, Low=1, anything else 0.
pub fn priority_rank(priority: &str) -> u8 {
    Priority::from_label(priority).rank()
}

pub fn parse_deadline(deadline: &str) -> Result<NaiveDateTime, DeadlineParseError> {
    NaiveDateTime::parse_from_str(deadline.trim(), DEADLINE_FORMAT).map_err(|source| {
        DeadlineParseError {
            value: deadline.to_string(),
            source,
        }
    })
}

/// Parsed deadline, or `now + fallback` with a warning when it does not parse,
/// so a malformed deadline never reads as overdue. Saturates at
/// `NaiveDateTime::MAX`.
pub fn resolve_deadline(deadline: &str, now: NaiveDateTime, fallback: Duration) -> NaiveDateTime {
    match parse_deadline(deadline) {
        Ok(instant) => instant,
        Err(err) => {
            warn!(
                deadline = %deadline,
                error = %err.source,
                "unparseable deadline, treating as far future"
            );
            now.checked_add_signed(fallback).unwrap_or(NaiveDateTime::MAX)
        }
    }
}

/// Execution order: highest priority first, earlier deadline first within a
/// priority. Equal keys keep their table order.
pub fn schedule(tasks: &[Task], now: NaiveDateTime, fallback: Duration) -> Vec<Task> {
    let mut keyed: Vec<(u8, NaiveDateTime, &Task)> = tasks
        .iter()
        .map(|task| {
            (
                task.priority_rank(),
                resolve_deadline(&task.deadline, now, fallback),
                task,
            )
        })
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, task)| task.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        parse_deadline("2025-01-01 00:00").unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<u32> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn rank_matches_labels() {
        assert_eq!(priority_rank("High"), 3);
        assert_eq!(priority_rank("Medium"), 2);
        assert_eq!(priority_rank("Low"), 1);
        assert_eq!(priority_rank(""), 0);
    }

    #[test]
    fn same_priority_earlier_deadline_first() {
        let tasks = vec![
            Task::new(1, "nine", "High", "2025-01-01 09:00"),
            Task::new(2, "eight", "High", "2025-01-01 08:00"),
        ];
        assert_eq!(ids(&schedule(&tasks, now(), Duration::seconds(999_999))), vec![2, 1]);
    }

    #[test]
    fn higher_priority_beats_earlier_deadline() {
        let tasks = vec![
            Task::new(1, "low", "Low", "2025-01-01 01:00"),
            Task::new(2, "unknown", "Someday", "2024-01-01 00:00"),
            Task::new(3, "high", "High", "2025-06-01 00:00"),
            Task::new(4, "medium", "Medium", "2025-03-01 00:00"),
        ];
        assert_eq!(ids(&schedule(&tasks, now(), Duration::seconds(999_999))), vec![3, 4, 1, 2]);
    }

    #[test]
    fn malformed_deadline_sorts_as_far_future() {
        let tasks = vec![
            Task::new(1, "broken", "High", "next tuesday"),
            Task::new(2, "soon", "High", "2025-01-02 00:00"),
        ];
        assert_eq!(ids(&schedule(&tasks, now(), Duration::seconds(999_999))), vec![2, 1]);
    }

    #[test]
    fn resolve_deadline_falls_back() {
        let fallback = Duration::seconds(999_999);
        assert_eq!(resolve_deadline("garbage", now(), fallback), now() + fallback);
        assert!(parse_deadline("2025-13-01 00:00").is_err());
    }

    #[test]
    fn huge_fallback_saturates_instead_of_overflowing() {
        assert_eq!(
            resolve_deadline("garbage", now(), Duration::MAX),
            NaiveDateTime::MAX
        );
        let tasks = vec![
            Task::new(1, "broken", "High", "garbage"),
            Task::new(2, "soon", "High", "2025-01-02 00:00"),
        ];
        assert_eq!(ids(&schedule(&tasks, now(), Duration::MAX)), vec![2, 1]);
    }
}
