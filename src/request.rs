use std::future::Future;

use reqwest::{header::HeaderMap, Client, StatusCode};

use crate::filter::QueryParameters;
use crate::Result;

/// Status and raw body of one tracker request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only a plain 200 counts. Redirects, 429s and 5xx are all failures.
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Something that can answer a tracker query.
pub trait Transport {
    fn fetch(&self, params: &QueryParameters) -> impl Future<Output = Result<FetchResponse>>;
}

/// `GET endpoint?params` over reqwest with a fixed header set.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    // Client uses Arc so we can clone cheaply
    client: Client,
    endpoint: String,
    headers: HeaderMap,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, headers: HeaderMap) -> Self {
        Self::with_client(Client::new(), endpoint, headers)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            headers,
        }
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, params: &QueryParameters) -> Result<FetchResponse> {
        let res = self
            .client
            .get(&self.endpoint)
            .headers(self.headers.clone())
            .query(params)
            .send()
            .await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(FetchResponse { status, body })
    }
}
