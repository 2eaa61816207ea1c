// rest/routes/tasks.rs — Task CRUD routes.
//
// Request bodies use the camelCase field names the web UI sends
// (taskName, taskDescription, taskDueDate); responses are stored rows.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{TaskError, CREATE_FIELDS_REQUIRED, EDIT_FIELDS_REQUIRED};
use crate::store::TaskRow;
use crate::AppContext;

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<TaskRow>>, TaskError> {
    let tasks = ctx.store.list_tasks().await?;
    Ok(Json(tasks))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskRequest {
    pub task_name: Option<String>,
    pub task_description: Option<String>,
    pub task_due_date: Option<String>,
}

pub async fn add_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<AddTaskRequest>,
) -> Result<Json<TaskRow>, TaskError> {
    let name = body.task_name.unwrap_or_default();
    let description = body.task_description.unwrap_or_default();
    let due_raw = body.task_due_date.unwrap_or_default();

    if name.is_empty() || due_raw.is_empty() {
        return Err(TaskError::validation(CREATE_FIELDS_REQUIRED));
    }
    let due_date = parse_due_date(&due_raw)?;

    let task = ctx.store.create_task(&name, &description, due_date).await?;
    Ok(Json(task))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskRequest {
    pub task_name: Option<String>,
    pub task_description: Option<String>,
    pub task_due_date: Option<String>,
}

pub async fn edit_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<EditTaskRequest>,
) -> Result<Json<TaskRow>, TaskError> {
    let name = body.task_name.unwrap_or_default();
    let description = body.task_description.unwrap_or_default();
    let due_raw = body.task_due_date.unwrap_or_default();

    if id.is_empty() || name.is_empty() || due_raw.is_empty() {
        return Err(TaskError::validation(EDIT_FIELDS_REQUIRED));
    }
    let due_date = parse_due_date(&due_raw)?;

    let task = ctx
        .store
        .edit_task(&id, &name, &description, due_date)
        .await?;
    Ok(Json(task))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTasksQuery {
    pub task_name: Option<String>,
}

pub async fn search_tasks(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<SearchTasksQuery>,
) -> Result<Json<Vec<TaskRow>>, TaskError> {
    // Absent or empty taskName matches everything
    let pattern = query.task_name.unwrap_or_default();
    let tasks = ctx.store.search_tasks(&pattern).await?;
    Ok(Json(tasks))
}

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` calendar date
/// (taken as midnight UTC). Anything else is a validation error, not a 500.
fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, TaskError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(TaskError::validation(
        "taskDueDate must be a valid date (YYYY-MM-DD or RFC 3339).",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_due_date("2026-03-01T12:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-01T10:30:00+00:00");
    }

    #[test]
    fn parses_plain_date_as_midnight_utc() {
        let dt = parse_due_date("2026-03-01").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.to_rfc3339(), "2026-03-01T00:00:00+00:00");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(matches!(
            parse_due_date("next tuesday"),
            Err(TaskError::Validation(_))
        ));
        assert!(matches!(
            parse_due_date("2026-13-40"),
            Err(TaskError::Validation(_))
        ));
    }
}
