// Async HTTP client for the sensor backend.
//
// Endpoints: /chirpstack/events, /chirpstack/events/stats,
// /chirpstack/devices, /ml/analyze
// Auth: optional bearer token (injected by TransportConfig)

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    AnalysisRequest, AnalysisResponse, DeviceSummaryResponse, EventQuery, EventResponse,
    EventStatsResponse,
};

// ── Error response shape (FastAPI) ───────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the sensor backend.
///
/// Cheap to clone: the inner `reqwest::Client` is reference-counted, so
/// the three concurrent reads of the events page share one pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages TLS and headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment (`http://host/api` + `ml/analyze`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                // 422 validation errors carry a list of objects
                other => other.to_string(),
            });

        Error::Backend {
            status: status.as_u16(),
            detail: detail.unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            }),
        }
    }

    // ── ChirpStack events ────────────────────────────────────────────

    /// `GET /chirpstack/events` with limit and optional device/type filters.
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventResponse>, Error> {
        self.get_with_params("chirpstack/events", &query.to_params())
            .await
    }

    /// `GET /chirpstack/events/stats`, always unfiltered.
    pub async fn get_event_stats(&self) -> Result<EventStatsResponse, Error> {
        self.get("chirpstack/events/stats").await
    }

    /// `GET /chirpstack/devices`, always unfiltered.
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummaryResponse>, Error> {
        self.get("chirpstack/devices").await
    }

    // ── ML analysis ──────────────────────────────────────────────────

    /// `POST /ml/analyze`. The backend runs the model synchronously, so
    /// this can take as long as the transport timeout allows.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, Error> {
        self.post("ml/analyze", request).await
    }
}
