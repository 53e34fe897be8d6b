// Panel HTTP client
//
// Wraps `reqwest::Client` with panel URL construction, bearer-token
// auth, and typed error mapping. Responses are decoded from a captured
// body so decode failures keep the raw text for debugging.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::types::{AdminRecord, NodeRecord, RawUsageResponse, UsageScope};

/// HTTP client for the fluxgate panel's management API.
///
/// All methods return decoded payloads; auth and URL mechanics never
/// leak to callers. The client is cheap to clone (`reqwest::Client` is
/// an `Arc` internally).
#[derive(Debug, Clone)]
pub struct PanelClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl PanelClient {
    /// Create a new client for the panel at `base_url`.
    ///
    /// `base_url` should be the panel root (e.g. `https://panel.example.com`);
    /// the `/api/...` prefix is appended per request.
    pub fn new(
        base_url: Url,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// The panel base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(ApiError::Transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ApiError::Authentication {
                message: truncate_body(&body),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    // ── Entity endpoints ─────────────────────────────────────────────

    /// Fetch all proxy nodes, in panel order.
    ///
    /// `GET /api/nodes`
    pub async fn list_nodes(&self) -> Result<Vec<NodeRecord>, ApiError> {
        let url = self.api_url("nodes")?;
        self.get(url).await
    }

    /// Fetch all admin accounts, in panel order.
    ///
    /// `GET /api/admins`
    pub async fn list_admins(&self) -> Result<Vec<AdminRecord>, ApiError> {
        let url = self.api_url("admins")?;
        self.get(url).await
    }

    // ── Usage endpoints ──────────────────────────────────────────────

    /// Fetch raw usage counters grouped by entity.
    ///
    /// `GET /api/usage/{nodes|admins}?start=...&end=...&period=...`
    ///
    /// `start = None` means "no lower bound" and is surfaced as an
    /// omitted `start` parameter. `period` is the bucket width the
    /// backend should align samples to: `"minute"`, `"hour"`, or
    /// `"day"`.
    pub async fn get_usage(
        &self,
        scope: UsageScope,
        start: Option<DateTime<Utc>>,
        end: DateTime<Utc>,
        period: &str,
    ) -> Result<RawUsageResponse, ApiError> {
        let mut url = self.api_url(&format!("usage/{}", scope.path_segment()))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(start) = start {
                pairs.append_pair("start", &start.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
            pairs.append_pair("end", &end.to_rfc3339_opts(SecondsFormat::Secs, true));
            pairs.append_pair("period", period);
        }
        debug!(scope = scope.path_segment(), period, "fetching usage");
        self.get(url).await
    }
}

/// Keep error bodies short enough to show in diagnostics.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_owned()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}...", &body[..cut])
    }
}
