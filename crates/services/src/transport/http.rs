use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use exam_core::model::{ExamId, SessionBundle, SubmissionPayload, SubmissionReceipt};

use crate::error::TransportError;
use super::ExamTransport;

#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// API root, e.g. `https://exam.example.com/api/v1`.
    pub base_url: String,
    /// Bearer token attached to every request.
    pub token: String,
}

/// `ExamTransport` over HTTP.
#[derive(Clone)]
pub struct HttpExamTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpExamTransport {
    #[must_use]
    pub fn new(config: HttpTransportConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.detail)
                .unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ExamTransport for HttpExamTransport {
    async fn start_exam(&self, exam_id: ExamId) -> Result<SessionBundle, TransportError> {
        let response = self
            .client
            .post(self.url(&format!("/exams/{exam_id}/start")))
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::decode(response).await
    }

    async fn submit_exam(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, TransportError> {
        let response = self
            .client
            .post(self.url("/exams/submit"))
            .bearer_auth(&self.config.token)
            .json(payload)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::decode(response).await
    }
}

// Timeouts get their own variant: the flow must roll the session back to
// InProgress rather than lose it.
fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(err)
    }
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: String,
}
