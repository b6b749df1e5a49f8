//! The remote parse/transform engine.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{
    Operation, PARSE_PATH, ParseRequest, RecordResponse, TRANSFORM_PATH, TransformRequest,
    VERSION_PATH, VersionInfo, decode_response,
};
use crate::config::WorkbenchConfig;
use crate::error::WorkbenchError;

/// Parses logs with rules and transforms the last parsed record.
///
/// The engine keeps the record from the most recent parse; a transform
/// always applies to that record.
pub trait RemoteEngine {
    fn parse(
        &self,
        request: &ParseRequest,
    ) -> impl Future<Output = Result<RecordResponse, WorkbenchError>>;

    fn transform(
        &self,
        request: &TransformRequest,
    ) -> impl Future<Output = Result<RecordResponse, WorkbenchError>>;

    fn version(&self) -> impl Future<Output = Result<VersionInfo, WorkbenchError>>;
}

#[derive(Clone, Debug)]
pub struct HttpRemoteEngine {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteEngine {
    pub fn new(config: &WorkbenchConfig) -> Result<Self, WorkbenchError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(&config.endpoint, client))
    }

    pub fn with_client(endpoint: &str, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        operation: Operation,
    ) -> Result<T, WorkbenchError> {
        let url = format!("{}{path}", self.endpoint);
        tracing::debug!(target: "wp_workbench::remote", %url, %operation, "request");
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let result = decode_response(status, &text, operation);
        if let Err(err) = &result {
            tracing::warn!(target: "wp_workbench::remote", %operation, status, error = %err, "engine call failed");
        }
        result
    }
}

impl RemoteEngine for HttpRemoteEngine {
    async fn parse(&self, request: &ParseRequest) -> Result<RecordResponse, WorkbenchError> {
        self.post(PARSE_PATH, request, Operation::Parse).await
    }

    async fn transform(
        &self,
        request: &TransformRequest,
    ) -> Result<RecordResponse, WorkbenchError> {
        self.post(TRANSFORM_PATH, request, Operation::Transform).await
    }

    async fn version(&self) -> Result<VersionInfo, WorkbenchError> {
        let url = format!("{}{VERSION_PATH}", self.endpoint);
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_response(status, &text, Operation::Version)
    }
}
