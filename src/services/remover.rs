use crate::config::AppConfig;
use std::sync::Arc;
use thiserror::Error;

/// Failure surfaced by the background-removal collaborator.
///
/// Callers do not distinguish subtypes; everything becomes one
/// "processing failed" response with the underlying message attached.
#[derive(Error, Debug)]
pub enum RemovalError {
    #[error("inference request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("inference service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

/// Boundary to the external background-removal model.
///
/// Takes raw JPG/PNG bytes and returns PNG bytes of the same dimensions
/// with background pixels transparent. Opaque and potentially slow (up to
/// the configured timeout); the surrounding lifecycle logic is tested with
/// a fake implementation.
#[async_trait::async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove_background(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError>;

    /// Check if the remover is available/healthy
    async fn health_check(&self) -> bool;
}

/// Remover backed by an HTTP inference server (e.g. a `rembg` sidecar).
///
/// Docker command to run one:
/// ```bash
/// docker run -d --name rembg -p 7000:7000 danielgatis/rembg s --host 0.0.0.0 --port 7000
/// ```
pub struct HttpRemover {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemover {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.remover_timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.remover_endpoint.clone(),
        }
    }
}

#[async_trait::async_trait]
impl BackgroundRemover for HttpRemover {
    async fn remove_background(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/octet-stream")
            .body(input.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Inference service error {}: {}", status, body);
            return Err(RemovalError::Service {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn health_check(&self) -> bool {
        self.client.get(&self.endpoint).send().await.is_ok()
    }
}

/// Builds the remover from config
pub fn create_remover(config: &AppConfig) -> Arc<dyn BackgroundRemover> {
    tracing::info!(endpoint = %config.remover_endpoint, "Using HTTP background remover");
    Arc::new(HttpRemover::new(config))
}
