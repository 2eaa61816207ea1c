// error.rs — request-level error taxonomy.
//
// Every store operation returns `Result<_, TaskError>`; the HTTP layer
// translates the variants to status codes (rest/mod.rs). Startup plumbing
// outside the request path uses plain `anyhow::Result`.

/// Client-facing validation messages, shared by the store's own checks and
/// the HTTP adapter so both surfaces report identically.
pub const CREATE_FIELDS_REQUIRED: &str = "Name and Due Date are required.";
pub const EDIT_FIELDS_REQUIRED: &str = "ID, Name and Due Date are required.";

/// Errors a task operation can surface to its caller.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Missing or malformed client input. Never retried; the message
    /// identifies the offending field(s).
    #[error("{0}")]
    Validation(String),
    /// The referenced task id does not exist.
    #[error("The task was not found.")]
    NotFound,
    /// Connectivity or query failure in the underlying store. The caller
    /// sees a generic message; the cause is logged server-side.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TaskError {
    pub fn validation(message: impl Into<String>) -> Self {
        TaskError::Validation(message.into())
    }
}

impl From<sqlx::Error> for TaskError {
    fn from(err: sqlx::Error) -> Self {
        TaskError::Storage(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_displays_its_message() {
        let err = TaskError::validation(CREATE_FIELDS_REQUIRED);
        assert_eq!(err.to_string(), "Name and Due Date are required.");
    }

    #[test]
    fn not_found_displays_client_message() {
        assert_eq!(TaskError::NotFound.to_string(), "The task was not found.");
    }

    #[test]
    fn sqlx_errors_become_storage() {
        let err: TaskError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, TaskError::Storage(_)));
    }
}
