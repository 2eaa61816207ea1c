//! Task status derivation.
//!
//! A task's status is a pure projection of its `(due_date, created_date)`
//! pair. It is computed here on every create and every due-date change,
//! never set by a client and never stored stale.

use chrono::{DateTime, Duration, Utc};

/// How far out a due date may lie (relative to creation) and still count
/// as `Due soon`. Compared continuously: 7 days and one second is over.
const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Derived urgency label for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Overdue,
    DueSoon,
    NotUrgent,
}

impl Status {
    /// Canonical label: the exact text persisted in the store and
    /// returned by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Overdue => "Overdue",
            Status::DueSoon => "Due soon",
            Status::NotUrgent => "Not urgent",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the status of a task from its due date and creation date.
///
/// - due before created → `Overdue`
/// - due within 7 days of created (inclusive) → `Due soon`
/// - otherwise → `Not urgent`
///
/// Total function: no side effects, no error cases. Both comparisons are
/// exact `TimeDelta` comparisons, so fractional days behave correctly.
/// Equal dates are `Due soon` (the overdue check is strict); exactly 7
/// days is still `Due soon`; 7 days 12 hours is `Not urgent`. The result
/// depends only on the difference `due_date - created_date`.
pub fn compute_status(due_date: DateTime<Utc>, created_date: DateTime<Utc>) -> Status {
    if due_date < created_date {
        return Status::Overdue;
    }
    if due_date - created_date <= Duration::days(DUE_SOON_WINDOW_DAYS) {
        Status::DueSoon
    } else {
        Status::NotUrgent
    }
}
