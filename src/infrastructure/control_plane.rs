//! Function configuration updates on the compute platform

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::interfaces::ComputeController;
use crate::shared::errors::ComputeError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateFunctionConfiguration {
    memory_size: u32,
}

/// Calls the function configuration endpoint of the control plane
pub struct ControlPlaneClient {
    http_client: Client,
    endpoint: String,
}

impl ControlPlaneClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    fn configuration_url(&self, function_name: &str) -> String {
        format!("{}/2015-03-31/functions/{}/configuration", self.endpoint, function_name)
    }
}

#[async_trait]
impl ComputeController for ControlPlaneClient {
    async fn update_memory_size(&self, function_name: &str, memory_mb: u32) -> Result<(), ComputeError> {
        let url = self.configuration_url(function_name);
        info!(
            "Invoking update_function_configuration with FunctionName={} MemorySize={}",
            function_name, memory_mb
        );

        let response = self
            .http_client
            .put(&url)
            .json(&UpdateFunctionConfiguration { memory_size: memory_mb })
            .send()
            .await
            .map_err(|e| ComputeError::UpdateFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ComputeError::UpdateFailed(format!("{} {}", status, body)));
        }

        info!("Received response: {}", status);
        Ok(())
    }
}

/// Logs reconfiguration requests without acting on them
pub struct LogComputeController;

#[async_trait]
impl ComputeController for LogComputeController {
    async fn update_memory_size(&self, function_name: &str, memory_mb: u32) -> Result<(), ComputeError> {
        warn!(
            "No control plane configured, skipping {} MemorySize={}",
            function_name, memory_mb
        );
        Ok(())
    }
}
