//! HTTP transport for the debugger server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::client::error::ClientError;
use crate::client::server::DebuggerServer;
use crate::scenario::Delta;

/// Trace type requested when capturing a vertex test
const VERTEX_TRACE_TYPE: &str = "reg";

/// [`DebuggerServer`] backed by the debugger's HTTP endpoints
#[derive(Clone)]
pub struct HttpDebuggerServer {
    base_url: String,
    client: Client,
}

impl HttpDebuggerServer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and return the body of a successful response
    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, ?query, "Debugger server request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl DebuggerServer for HttpDebuggerServer {
    async fn fetch_scenario(&self, job_id: &str, superstep: i64) -> Result<Delta, ClientError> {
        let text = self
            .get_text(
                "/scenario",
                &[
                    ("jobId", job_id.to_string()),
                    ("superstepId", superstep.to_string()),
                ],
            )
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_supersteps(&self, job_id: &str) -> Result<Vec<i64>, ClientError> {
        let text = self
            .get_text("/supersteps", &[("jobId", job_id.to_string())])
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn capture_vertex_test(
        &self,
        job_id: &str,
        superstep: i64,
        vertex_id: &str,
    ) -> Result<String, ClientError> {
        self.get_text(
            "/test/vertex",
            &[
                ("jobId", job_id.to_string()),
                ("superstepId", superstep.to_string()),
                ("vertexId", vertex_id.to_string()),
                ("traceType", VERTEX_TRACE_TYPE.to_string()),
            ],
        )
        .await
    }

    async fn capture_master_test(
        &self,
        job_id: &str,
        superstep: i64,
    ) -> Result<String, ClientError> {
        self.get_text(
            "/test/master",
            &[
                ("jobId", job_id.to_string()),
                ("superstepId", superstep.to_string()),
            ],
        )
        .await
    }
}
