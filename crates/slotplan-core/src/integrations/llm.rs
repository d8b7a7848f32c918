//! LLM completion endpoint -- one-shot prompt to text.
//!
//! Used only by contract generation; the scheduling engine never touches it.

use reqwest::Client;
use serde_json::json;

use crate::integrations::keyring_store;
use crate::integrations::traits::Integration;

const SYSTEM_PROMPT: &str = "You are a precise system.";

pub struct LlmClient {
    api_key: String,
    api_base: String,
    model: String,
}

impl LlmClient {
    /// Load the stored API key from the OS keyring (empty string if absent).
    pub fn new(api_base: &str, model: &str) -> Self {
        let api_key = keyring_store::get("llm_api_key")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Build a client with an explicit API key.
    pub fn with_key(api_base: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Persist a user-provided API key to the OS keyring and update
    /// in-memory state.
    pub fn set_credentials(&mut self, api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("llm_api_key", api_key)?;
        self.api_key = api_key.to_string();
        Ok(())
    }

    /// Run one chat completion and return the assistant text.
    pub fn generate(&self, prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.2,
        });

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .post(format!("{}/chat/completions", self.api_base))
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(format!("LLM API error: HTTP {}", resp.status()).into());
        }

        let data: serde_json::Value = rt.block_on(resp.json())?;
        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("missing completion content in response")?;

        Ok(content.to_string())
    }
}

impl Integration for LlmClient {
    fn name(&self) -> &str {
        "llm"
    }

    fn display_name(&self) -> &str {
        "LLM Endpoint"
    }

    fn is_authenticated(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn authenticate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.api_key.is_empty() {
            return Err("No LLM API key stored. Call set_credentials first.".into());
        }

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .get(format!("{}/models", self.api_base))
                .bearer_auth(&self.api_key)
                .send(),
        )?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("LLM auth check failed: HTTP {}", resp.status()).into())
        }
    }

    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("llm_api_key")?;
        self.api_key.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_extracts_completion_text() {
        let mut server = mockito::Server::new();
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "---\nproject: x\n---\n" } }
            ]
        });
        let m = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "test-model",
                "temperature": 0.2,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();

        let client = LlmClient::with_key(&server.url(), "test-model", "sk-test");
        let text = client.generate("turn this into a contract").unwrap();

        assert!(text.starts_with("---"));
        m.assert();
    }

    #[test]
    fn generate_surfaces_http_errors() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create();

        let client = LlmClient::with_key(&server.url(), "test-model", "sk-test");
        let err = client.generate("prompt").unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
