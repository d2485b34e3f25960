// Error handling framework
// Configuration, validation, connection and persistence failures

use thiserror::Error;

/// Settings could not be turned into a usable configuration
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read env file: {0}")]
    EnvFile(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFieldValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField(field) => Some(field),
            ValidationError::InvalidFieldValue { field, .. } => Some(field),
            ValidationError::InvalidJson(_) => None,
        }
    }
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),
}

impl DatabaseError {
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection(_))
    }
}

/// Failures of the user persistence operation
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Unique constraint violated: {0}")]
    Duplicate(String),

    #[error("Failed to hash credential: {0}")]
    Credential(String),

    #[error("Failed to persist user: {0}")]
    Database(#[source] DatabaseError),
}

impl From<DatabaseError> for PersistenceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateKey(msg) => PersistenceError::Duplicate(msg),
            other => PersistenceError::Database(other),
        }
    }
}

/// API response error type for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let api = ApiError::new("validation_error", err.to_string());
        match err.field() {
            Some(field) => {
                let field = field.to_string();
                api.with_details(serde_json::json!({ "field": field }))
            }
            None => api,
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        let code = if err.is_connection() {
            "connection_error"
        } else {
            "persistence_error"
        };
        ApiError::new(code, "Failed to reach the data store")
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Database(DatabaseError::Connection(_)) => {
                ApiError::new("connection_error", "Failed to reach the data store")
            }
            _ => ApiError::new("persistence_error", "Failed to create user"),
        }
    }
}

// Map sqlx failures onto the taxonomy; pool exhaustion and I/O count as connection errors
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => DatabaseError::Connection(err.to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateKey(db_err.message().to_string()),
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}
