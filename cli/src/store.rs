//! [`DesignStore`] backed by the design service's JSON API.
//!
//! `POST /api/save-design` answers `{ "success": true, "design_id": ... }`;
//! `GET /api/load-design/{id}` answers `{ "success": true, "design": ... }`.
//! Failures carry `{ "success": false, "error": ... }`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use async_trait::async_trait;
use ring_canvas::assets::DesignStore;
use ring_canvas::design::DesignDocument;
use ring_canvas::error::AssetError;
use serde::Deserialize;

pub struct HttpDesignStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDesignStore {
    pub fn new(base_url: &str) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    success: bool,
    design_id: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    #[serde(default)]
    success: bool,
    design: Option<DesignDocument>,
    error: Option<String>,
}

#[async_trait]
impl DesignStore for HttpDesignStore {
    async fn save(&self, design: &DesignDocument) -> Result<String, AssetError> {
        let url = format!("{}/api/save-design", self.base_url);
        let response = self.client.post(url).json(design).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.json::<SaveResponse>().await.map_err(undecodable)?;
        interpret_save(status, body)
    }

    async fn load(&self, design_id: &str) -> Result<DesignDocument, AssetError> {
        let url = format!("{}/api/load-design/{design_id}", self.base_url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.json::<LoadResponse>().await.map_err(undecodable)?;
        interpret_load(status, body)
    }
}

fn interpret_save(status: u16, body: SaveResponse) -> Result<String, AssetError> {
    match body {
        SaveResponse { success: true, design_id: Some(id), .. } => Ok(id),
        SaveResponse { error, .. } => Err(rejected(status, error)),
    }
}

fn interpret_load(status: u16, body: LoadResponse) -> Result<DesignDocument, AssetError> {
    match body {
        LoadResponse { success: true, design: Some(design), .. } => Ok(design),
        LoadResponse { error, .. } => Err(rejected(status, error)),
    }
}

fn rejected(status: u16, error: Option<String>) -> AssetError {
    let message = error.unwrap_or_else(|| "no error message".to_owned());
    AssetError::Rejected(format!("HTTP {status}: {message}"))
}

fn transport_error(error: reqwest::Error) -> AssetError {
    AssetError::Unreachable(error.to_string())
}

fn undecodable(error: reqwest::Error) -> AssetError {
    AssetError::Decode(error.to_string())
}
