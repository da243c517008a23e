use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch campaign list: {message}")]
    ListFetch { message: String },

    #[error("Failed to fetch stats for campaign {campaign_id}: {message}")]
    StatFetch { campaign_id: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    /// 將任意錯誤歸屬到指定的 campaign
    pub fn stat_fetch(campaign_id: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SyncError::StatFetch {
            campaign_id: campaign_id.into(),
            message: err.to_string(),
        }
    }

    pub fn list_fetch(err: impl std::fmt::Display) -> Self {
        SyncError::ListFetch {
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ListFetch { .. } | SyncError::StatFetch { .. } => ErrorCategory::Network,
            SyncError::IoError(_) => ErrorCategory::System,
            SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一 campaign 的統計失敗不影響整批
            SyncError::StatFetch { .. } => ErrorSeverity::Low,
            SyncError::ListFetch { .. } => ErrorSeverity::Medium,
            SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => ErrorSeverity::High,
            SyncError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SyncError::ListFetch { .. } => "Error fetching campaigns".to_string(),
            SyncError::StatFetch { campaign_id, .. } => {
                format!("Latest statistics for campaign {} are unavailable", campaign_id)
            }
            SyncError::IoError(e) => format!("File system error: {}", e),
            SyncError::ConfigError { message } => format!("Configuration problem: {}", message),
            SyncError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            SyncError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            SyncError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API URL and token, then run the refresh again",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_fetch_carries_campaign_id() {
        let err = SyncError::stat_fetch("c-42", "connection reset");
        assert_eq!(
            err.to_string(),
            "Failed to fetch stats for campaign c-42: connection reset"
        );
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_list_fetch_is_more_severe_than_stat_fetch() {
        let list = SyncError::list_fetch("HTTP 503");
        let stat = SyncError::stat_fetch("c-1", "HTTP 503");
        assert!(list.severity() > stat.severity());
        assert_eq!(list.user_friendly_message(), "Error fetching campaigns");
    }

    #[test]
    fn test_config_errors_share_category() {
        let missing = SyncError::MissingConfigError {
            field: "api.base_url".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);
        assert_eq!(missing.severity(), ErrorSeverity::High);
    }
}
