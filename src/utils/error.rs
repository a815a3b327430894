use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Missing required option: --{field}")]
    MissingConfigError { field: String },

    #[error("{message}")]
    UsageError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Error opening CSV file '{path}': {source}")]
    SourceUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading CSV file: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Connection failed: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Error creating table: {message}")]
    TableCreationError { message: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Sink error: {message}")]
    SinkError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Database,
}

impl UploadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UploadError::MissingConfigError { .. }
            | UploadError::UsageError { .. }
            | UploadError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            UploadError::SourceUnreadable { .. } | UploadError::CsvError(_) => ErrorCategory::Source,
            UploadError::ConnectionError(_)
            | UploadError::TableCreationError { .. }
            | UploadError::DatabaseError(_)
            | UploadError::SinkError { .. } => ErrorCategory::Database,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UploadError::MissingConfigError { field } if field == "file" => {
                "Error: Missing CSV file option (--file)".to_string()
            }
            UploadError::SourceUnreadable { path, .. } => {
                format!("Error opening CSV file '{}'", path)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            UploadError::MissingConfigError { .. } => "Pass --file <path>, or run with --help for usage",
            UploadError::UsageError { .. } | UploadError::InvalidConfigValueError { .. } => {
                "Check the option values, or run with --help for usage"
            }
            UploadError::SourceUnreadable { .. } | UploadError::CsvError(_) => {
                "Make sure the file exists and is readable"
            }
            UploadError::ConnectionError(_) => "Check the MySQL host (-h), username (-u) and password (-p)",
            UploadError::TableCreationError { .. } => {
                "Make sure the MySQL user is allowed to create tables in the target database"
            }
            UploadError::DatabaseError(_) | UploadError::SinkError { .. } => {
                "Check the database server logs for details"
            }
        }
    }

    /// Every fatal error terminates the process with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message_matches_cli_wording() {
        let err = UploadError::MissingConfigError {
            field: "file".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "Error: Missing CSV file option (--file)");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_source_unreadable_is_source_category() {
        let err = UploadError::SourceUnreadable {
            path: "missing.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.category(), ErrorCategory::Source);
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_table_creation_error_carries_detail() {
        let err = UploadError::TableCreationError {
            message: "access denied".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Database);
        assert_eq!(err.to_string(), "Error creating table: access denied");
    }
}
