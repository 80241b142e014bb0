use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("No such element: {0}")]
    NoSuchElement(&'static str),

    #[error("Latest log entry is invalid")]
    InvalidLogEntry,

    #[error(
        "Date of new entry ({new}) is not newer than date of last entry ({latest}) - not writing to log"
    )]
    OutOfOrder { latest: NaiveDate, new: NaiveDate },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid formatter configuration: {message}")]
    InvalidFormatter { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Storage,
    Network,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code of the binary. Data failures (Low, High) share the
    /// code that refused or unparsable menus exit with.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Low | Self::High => 1,
            Self::Medium => 2,
            Self::Critical => 3,
        }
    }
}

impl MenuError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_formatter(message: impl Into<String>) -> Self {
        Self::InvalidFormatter {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. }
            | Self::NoSuchElement(_)
            | Self::InvalidLogEntry
            | Self::OutOfOrder { .. } => ErrorCategory::Data,
            Self::IoError(_) | Self::CsvError(_) => ErrorCategory::Storage,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidFormatter { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 日期重複：今天已經寫過了
            Self::OutOfOrder { .. } => ErrorSeverity::Low,
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::InvalidArgument { .. }
            | Self::NoSuchElement(_)
            | Self::InvalidLogEntry
            | Self::CsvError(_) => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidFormatter { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Data => "Check the menu data or repair the top line of the log file",
            ErrorCategory::Storage => "Check that the log file path exists and is writable",
            ErrorCategory::Network => "Check the network connection and the configured endpoints",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_message_names_both_dates() {
        let error = MenuError::OutOfOrder {
            latest: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            new: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        };

        let message = error.to_string();
        assert!(message.contains("2024-03-05"));
        assert!(message.contains("2024-03-04"));
        assert!(message.contains("not writing to log"));
        assert_eq!(error.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_exit_codes() {
        let refused = MenuError::OutOfOrder {
            latest: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            new: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        };
        assert_eq!(refused.severity().exit_code(), 1);
        assert_eq!(MenuError::InvalidLogEntry.severity().exit_code(), 1);
        assert_eq!(
            MenuError::invalid_formatter("x").severity().exit_code(),
            3
        );
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            MenuError::invalid_argument("x").category(),
            ErrorCategory::Data
        );
        assert_eq!(
            MenuError::invalid_formatter("x").category(),
            ErrorCategory::Configuration
        );
        let io = MenuError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.category(), ErrorCategory::Storage);
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }
}
