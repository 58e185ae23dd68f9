use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    StatusCode,
};
use serde_json::Value;

use crate::{config::WalletConfig, WalletApiError};

/// The single capability the pass repository client needs from the network layer: one
/// authenticated round trip. Keeping this behind a trait lets tests drive the client against a
/// scripted remote store.
#[allow(async_fn_in_trait)]
pub trait PassTransport {
    /// Perform one request against the remote pass store.
    ///
    /// A 404 response maps to [`WalletApiError::NotFound`]. Any other non-2xx response maps to
    /// [`WalletApiError::QueryError`], and network-level failures to
    /// [`WalletApiError::RestResponseError`].
    async fn request(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, WalletApiError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.access_token.reveal()))
            .map_err(|e| WalletApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", bearer);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| WalletApiError::Initialization(e.to_string()))?;
        Ok(Self { client: Arc::new(client) })
    }
}

impl PassTransport for HttpTransport {
    async fn request(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, WalletApiError> {
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| WalletApiError::RestResponseError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("REST query successful. {status}");
            response.json::<Value>().await.map_err(|e| WalletApiError::JsonError(e.to_string()))
        } else if status == StatusCode::NOT_FOUND {
            Err(WalletApiError::NotFound(url.to_string()))
        } else {
            let message = response.text().await.map_err(|e| WalletApiError::RestResponseError(e.to_string()))?;
            Err(WalletApiError::QueryError { status: status.as_u16(), message })
        }
    }
}
