use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::clients::models::requests::PlanRequest;
use crate::clients::models::responses::PlanResponse;
use crate::config::Config;

const PLAN_ENDPOINT: &str = "/plan";

#[derive(Debug, Error)]
pub enum PlanClientError {
    #[error("plan service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("plan service returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to encode plan request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("plan service returned invalid JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("plan service response has no workout plan")]
    UnrecognizedResponse,
}

#[derive(Clone)]
pub struct PlanClient {
    http: Client,
    endpoint: Url,
}

impl PlanClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base = Url::parse(&config.plan_service_url)?;
        Ok(Self {
            http: Client::builder()
                .timeout(config.plan_service_timeout)
                .build()?,
            endpoint: base.join(PLAN_ENDPOINT)?,
        })
    }

    /// One request, no retry.
    pub async fn request_plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlanClientError> {
        let json_body = serde_json::to_string(request).map_err(PlanClientError::Encode)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            request_body = %json_body,
            "plan_service.request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(PlanClientError::Status { status, body });
        }

        let body = response.text().await?;

        tracing::debug!(response_body = %body, "plan_service.response");

        let value: Value = serde_json::from_str(&body).map_err(PlanClientError::Decode)?;
        PlanResponse::from_value(value).ok_or(PlanClientError::UnrecognizedResponse)
    }
}
