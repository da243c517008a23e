use campaign_sync::utils::error::ErrorSeverity;
use campaign_sync::utils::logger;
use campaign_sync::{CampaignSync, CliConfig, ConsoleSink, HttpCampaignApi, PassOutcome};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting campaign-sync");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let api = Arc::new(HttpCampaignApi::from_config(&settings));
    let sync = CampaignSync::new(api.clone(), api);
    let sink = ConsoleSink::stdout(settings.format);

    // 第一次 Ctrl-C 視同接收端卸載，第二次直接結束
    let outcome = sync
        .refresh_until(&sink, || async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    match outcome {
        Ok(PassOutcome::Published {
            campaigns,
            failures,
        }) => {
            tracing::info!(
                "✅ Refreshed {} campaigns ({} stat fetches failed)",
                campaigns,
                failures
            );
        }
        Ok(PassOutcome::Abandoned) => {
            tracing::warn!("Refresh abandoned after repeated Ctrl-C");
            std::process::exit(130);
        }
        Ok(outcome) => {
            tracing::warn!("Refresh finished without publishing: {:?}", outcome);
        }
        Err(e) => {
            tracing::error!(
                "❌ Refresh failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
