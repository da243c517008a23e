use crate::core::{
    Campaign, CampaignId, CampaignSource, ConfigProvider, StatsFetcher, StatsSnapshot,
};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};

/// 透過 REST API 取得 campaign 清單與投遞統計
///
/// - `GET {base}/campaigns`
/// - `GET {base}/campaigns/{id}/stats`
///
/// 回應可以是直接的 JSON 內容，或包在 `data` 欄位內。
#[derive(Debug, Clone)]
pub struct HttpCampaignApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCampaignApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        let api = Self::new(config.api_base_url());
        match config.api_token() {
            Some(token) => api.with_token(token),
            None => api,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 在 base URL 後附加 path segment；每個 segment 各自做百分比編碼
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid base URL '{}': {}", self.base_url, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("Base URL '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn campaigns_url(&self) -> std::result::Result<Url, String> {
        self.endpoint(&["campaigns"])
    }

    pub fn stats_url(&self, campaign_id: &CampaignId) -> std::result::Result<Url, String> {
        self.endpoint(&["campaigns", campaign_id.as_str(), "stats"])
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json(&self, url: Url) -> std::result::Result<serde_json::Value, String> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.get(url).send().await.map_err(|e| e.to_string())?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| e.to_string())
    }
}

/// 取出 `data` 包裝內的內容
fn unwrap_envelope(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut obj) if obj.contains_key("data") => obj
            .remove("data")
            .unwrap_or(serde_json::Value::Null),
        other => other,
    }
}

#[async_trait]
impl CampaignSource for HttpCampaignApi {
    async fn get_campaigns(&self) -> Result<Vec<Campaign>> {
        let url = self.campaigns_url().map_err(|e| SyncError::list_fetch(e))?;
        let body = self
            .get_json(url)
            .await
            .map_err(|e| SyncError::list_fetch(e))?;

        serde_json::from_value(unwrap_envelope(body)).map_err(|e| SyncError::list_fetch(e))
    }
}

#[async_trait]
impl StatsFetcher for HttpCampaignApi {
    async fn get_campaign_stats(&self, campaign_id: &CampaignId) -> Result<StatsSnapshot> {
        let url = self
            .stats_url(campaign_id)
            .map_err(|e| SyncError::stat_fetch(campaign_id.as_str(), e))?;
        let body = self
            .get_json(url)
            .await
            .map_err(|e| SyncError::stat_fetch(campaign_id.as_str(), e))?;

        serde_json::from_value(unwrap_envelope(body))
            .map_err(|e| SyncError::stat_fetch(campaign_id.as_str(), e))
    }
}
