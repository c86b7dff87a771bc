use crate::domain::ports::{Method, RequestExecutor};
use crate::domain::request::PaymentRequest;
use crate::error::{Error, Result};
use crate::interfaces::rest::models::{ApiErrorBody, ResponseEnvelope};
use async_trait::async_trait;
use std::time::Duration;

/// reqwest-backed adapter for the [`RequestExecutor`] port.
///
/// Owns a single pooled client with an explicit timeout. Classification of
/// responses is kept in [`classify_response`] so it can be exercised without
/// a live server.
pub struct HttpRequestExecutor {
    client: reqwest::Client,
}

impl HttpRequestExecutor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Connectivity(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RequestExecutor for HttpRequestExecutor {
    async fn execute(
        &self,
        method: Method,
        url: &str,
        auth_token: &str,
        body: Option<serde_json::Value>,
    ) -> Result<PaymentRequest> {
        let method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        };
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("Client {auth_token}"))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(classify_send_error)?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Connectivity(format!("failed to read response body: {e}")))?;
        classify_response(status, &bytes)
    }
}

fn classify_send_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Connectivity(format!("request timed out: {error}"))
    } else {
        Error::Connectivity(error.to_string())
    }
}

/// Maps a raw `(status, body)` pair onto the transport error taxonomy.
///
/// A 2xx body that fails to parse is a deserialization error; a non-2xx
/// response with a parseable error body becomes an API error built from the
/// first reported entry; any other non-2xx response is a connectivity error
/// carrying the raw status code.
pub fn classify_response(status: u16, body: &[u8]) -> Result<PaymentRequest> {
    if (200..300).contains(&status) {
        let envelope: ResponseEnvelope =
            serde_json::from_slice(body).map_err(|_| Error::Deserialization)?;
        return Ok(envelope.request);
    }

    if let Ok(error_body) = serde_json::from_slice::<ApiErrorBody>(body) {
        if let Some(entry) = error_body.errors.into_iter().next() {
            return Err(Error::Api {
                category: entry.category,
                code: entry.code,
                detail: entry.detail,
                field: entry.field,
            });
        }
    }
    Err(Error::Connectivity(format!("http status {status}")))
}
