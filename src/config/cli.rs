use crate::adapters::console::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::config::SyncSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "campaign-sync")]
#[command(about = "Refresh campaign delivery statistics and show the reconciled list")]
pub struct CliConfig {
    #[arg(long, help = "Base URL of the campaign API, e.g. http://localhost:5000/api")]
    pub api_url: Option<String>,

    #[arg(long, help = "Bearer token forwarded to the campaign API")]
    pub api_token: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數優先於 TOML 檔案；只驗證合併後的結果
    pub fn resolve(&self) -> Result<SyncSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };

        let api_base_url = self
            .api_url
            .clone()
            .or_else(|| file.as_ref().map(|f| f.api.base_url.clone()));
        let api_base_url = validate_required_field("api_url", &api_base_url)?.clone();

        let api_token = self
            .api_token
            .clone()
            .or_else(|| file.as_ref().and_then(|f| f.api.token.clone()));

        let format = self
            .format
            .or_else(|| file.as_ref().map(|f| f.output_format()))
            .unwrap_or_default();

        let settings = SyncSettings {
            api_base_url,
            api_token,
            format,
        };
        settings.validate()?;
        Ok(settings)
    }
}
