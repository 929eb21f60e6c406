use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::ChatProvider;
use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// Chat-completion client for an Azure OpenAI deployment.
///
/// Talks the OpenAI wire format; the deployment name doubles as the model
/// identifier in the request path.
#[derive(Clone)]
pub struct AzureOpenAiProvider {
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    client: Client,
}

impl AzureOpenAiProvider {
    pub fn new(
        endpoint: String,
        api_key: String,
        deployment: String,
        api_version: String,
    ) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            deployment,
            api_version,
            client: Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint,
            self.deployment,
            urlencoding::encode(&self.api_version)
        )
    }
}

#[async_trait]
impl ChatProvider for AzureOpenAiProvider {
    fn name(&self) -> &str {
        "azure_openai"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let mut body = json!({
            "messages": request.messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "Azure OpenAI chat error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}
