#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::console::OutputFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_no_placeholder, validate_non_empty_string, validate_url, Validate,
};

/// 合併命令列與 TOML 後的最終設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub format: OutputFormat,
}

impl ConfigProvider for SyncSettings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }
}

impl Validate for SyncSettings {
    fn validate(&self) -> Result<()> {
        validate_no_placeholder("api_url", &self.api_base_url)?;
        validate_url("api_url", &self.api_base_url)?;
        if let Some(token) = &self.api_token {
            validate_no_placeholder("api_token", token)?;
            validate_non_empty_string("api_token", token)?;
        }
        Ok(())
    }
}
