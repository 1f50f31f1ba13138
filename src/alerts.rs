use crate::config::AlertThresholds;
use crate::schedule::resolve_deadline;
use crate::task::Task;
use chrono::{Duration, NaiveDateTime};
use std::fmt;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertCategory {
    DueToday,
    DueInOneToTwoDays,
    DueInThreeToSixDays,
    DueInOverAWeek,
}

impl AlertCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AlertCategory::DueToday => "Due Today",
            AlertCategory::DueInOneToTwoDays => "Due in 1-2 Days",
            AlertCategory::DueInThreeToSixDays => "Due in 3-6 Days",
            AlertCategory::DueInOverAWeek => "Due in 1+ Week",
        }
    }

    /// `None` for deadlines already in the past.
    pub fn for_days_left(days_left: f64, thresholds: &AlertThresholds) -> Option<Self> {
        if days_left < 0.0 {
            None
        } else if days_left <= thresholds.due_today_days {
            Some(AlertCategory::DueToday)
        } else if days_left <= thresholds.soon_days {
            Some(AlertCategory::DueInOneToTwoDays)
        } else if days_left <= thresholds.this_week_days {
            Some(AlertCategory::DueInThreeToSixDays)
        } else {
            Some(AlertCategory::DueInOverAWeek)
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub category: AlertCategory,
    pub task_id: u32,
    pub task_name: String,
    pub deadline: String,
    pub days_left: f64,
}

/// Outcome of a categorization pass. `NothingUpcoming` is distinct from an
/// empty list so callers can tell "nothing due" from "no data".
#[derive(Debug, Clone, PartialEq)]
pub enum AlertReport {
    Upcoming(Vec<Alert>),
    NothingUpcoming,
}

impl AlertReport {
    pub fn alerts(&self) -> &[Alert] {
        match self {
            AlertReport::Upcoming(alerts) => alerts,
            AlertReport::NothingUpcoming => &[],
        }
    }
}

/// Buckets records by time left until their deadline. Records are visited in
/// table order; overdue ones are skipped.
pub fn categorize(
    tasks: &[Task],
    now: NaiveDateTime,
    fallback: Duration,
    thresholds: &AlertThresholds,
) -> AlertReport {
    let alerts: Vec<Alert> = tasks
        .iter()
        .filter_map(|task| {
            let due = resolve_deadline(&task.deadline, now, fallback);
            let days_left = (due - now).num_seconds() as f64 / SECONDS_PER_DAY;
            AlertCategory::for_days_left(days_left, thresholds).map(|category| Alert {
                category,
                task_id: task.id,
                task_name: task.name.clone(),
                deadline: task.deadline.clone(),
                days_left,
            })
        })
        .collect();

    if alerts.is_empty() {
        AlertReport::NothingUpcoming
    } else {
        AlertReport::Upcoming(alerts)
    }
}
