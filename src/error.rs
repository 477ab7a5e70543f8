use thiserror::Error;

/// Failures a query can surface to its caller.
///
/// Empty result sets are not errors; they come back as a recommendation
/// with an explanatory message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid query: {0}")]
    Validation(String),

    #[error("{table} table is missing required columns: {}", missing.join(", "))]
    Schema {
        table: &'static str,
        missing: Vec<String>,
    },

    #[error("{0}")]
    NotFound(String),
}

impl QueryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
