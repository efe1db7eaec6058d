use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid server URL")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.map(str::to_string),
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).context("failed to build API URL")
    }

    /// Attach the session token, if one is configured. Endpoints that work
    /// without a session never call this, so a stale local token cannot
    /// break them.
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.header("X-Token", token),
            None => req,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_empty(&self, req: reqwest::RequestBuilder) -> Result<()> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(())
    }

    pub async fn status(&self) -> Result<(bool, StatusResponse)> {
        let url = self.url("/status")?;
        let response = self.http.get(url).send().await?;
        // Degraded stores still answer with a parseable breakdown, just 503.
        let healthy = response.status().is_success();
        let status: StatusResponse = response.json().await?;
        Ok((healthy, status))
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        let url = self.url("/stats")?;
        self.send_json(self.http.get(url)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<UserResponse> {
        let url = self.url("/users")?;
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.http.post(url).json(&body)).await
    }

    pub async fn connect(&self, email: &str, password: &str) -> Result<ConnectResponse> {
        let url = self.url("/connect")?;
        self.send_json(self.http.get(url).basic_auth(email, Some(password)))
            .await
    }

    pub async fn disconnect(&self) -> Result<()> {
        let url = self.url("/disconnect")?;
        self.send_empty(self.authed(self.http.get(url))).await
    }

    pub async fn whoami(&self) -> Result<UserResponse> {
        let url = self.url("/users/me")?;
        self.send_json(self.authed(self.http.get(url))).await
    }

    pub async fn upload(&self, req: &UploadRequest) -> Result<FileRecord> {
        let url = self.url("/files")?;
        self.send_json(self.authed(self.http.post(url).json(req)))
            .await
    }

    pub async fn show(&self, id: i64) -> Result<FileRecord> {
        let url = self.url(&format!("/files/{id}"))?;
        self.send_json(self.authed(self.http.get(url))).await
    }

    pub async fn list(&self, parent_id: i64, page: i64) -> Result<Vec<FileRecord>> {
        let mut url = self.url("/files")?;
        url.query_pairs_mut()
            .append_pair("parentId", &parent_id.to_string())
            .append_pair("page", &page.to_string());
        self.send_json(self.authed(self.http.get(url))).await
    }

    pub async fn fetch_data(&self, id: i64) -> Result<Vec<u8>> {
        let url = self.url(&format!("/files/{id}/data"))?;
        let response = self.authed(self.http.get(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Render an error response, preferring the server's envelope.
fn api_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    #[derive(Deserialize)]
    struct Envelope {
        code: String,
        message: String,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => {
            anyhow::anyhow!("API error ({}): {} [{}]", status, envelope.message, envelope.code)
        }
        Err(_) => anyhow::anyhow!("API error ({}): {}", status, body),
    }
}

// =============================================================================
// Request/response types (mirrored from server handlers)
// =============================================================================

#[derive(Debug, Serialize)]
struct RegisterRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub parent_id: i64,
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub db: bool,
    pub sessions: bool,
    pub storage: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub users: u64,
    pub files: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_public: bool,
    pub parent_id: i64,
}
