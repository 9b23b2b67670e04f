use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use cfgate_core::{config::HttpConfig, HttpRequest, HttpResponse, SolveError, Transport};

/// `Transport` adapter over a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SolveError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| SolveError::Transport(e.to_string()))?;

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SolveError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|target| request.url.join(target).ok());
        let body = response
            .bytes()
            .await
            .map_err(|e| SolveError::BodyRead(e.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
            location,
        })
    }
}

/// Build the client the solve flow expects: redirects stay unfollowed so
/// the challenge exchange (and its Location header) is observable.
pub fn build_client(config: &HttpConfig) -> Result<Client, SolveError> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()
        .map_err(|e| SolveError::Transport(e.to_string()))
}
