//! Ollama chat API-based generator.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OllamaConfig;
use crate::error::{Result, TandemError};
use crate::generation::generator::Generator;

/// A chat message in the Ollama wire format.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// Response body of a non-streaming `POST /api/chat`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Generator backed by the chat endpoint of a local Ollama server.
///
/// # Examples
///
/// ```no_run
/// use tandem::config::OllamaConfig;
/// use tandem::generation::generator::Generator;
/// use tandem::generation::ollama_generator::OllamaGenerator;
///
/// # async fn example() -> tandem::error::Result<()> {
/// let generator = OllamaGenerator::new(&OllamaConfig::default())?;
/// let reply = generator.generate("You are terse.", "Say hi.").await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaGenerator {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a generator from the Ollama settings.
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint("/api/chat"),
            model: config.model.clone(),
        })
    }

    fn build_request<'a>(&'a self, system_prompt: &str, user_prompt: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
        }
    }
}

fn parse_response(response_text: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(response_text).map_err(|e| {
        TandemError::generation(format!(
            "Failed to parse Ollama response: {e}. Response text: {response_text}"
        ))
    })?;
    Ok(response.message.content)
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = self.build_request(system_prompt, user_prompt);

        let http_response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TandemError::generation(format!("Ollama API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response.text().await.map_err(|e| {
            TandemError::generation(format!("Failed to read response text: {e}"))
        })?;

        if !status.is_success() {
            return Err(TandemError::generation(format!(
                "Ollama API error (status {status}): {response_text}"
            )));
        }

        let content = parse_response(&response_text)?;
        debug!("Generated {} characters with {}", content.len(), self.model);
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let generator = OllamaGenerator::new(&OllamaConfig::default()).unwrap();
        let json = serde_json::to_value(generator.build_request("sys", "usr")).unwrap();

        assert_eq!(json["model"], "llama3.2:1b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_parse_response() {
        let content = parse_response(
            r#"{"model":"llama3.2:1b","message":{"role":"assistant","content":"Cats sit."},"done":true}"#,
        )
        .unwrap();
        assert_eq!(content, "Cats sit.");

        assert!(matches!(
            parse_response("not json"),
            Err(TandemError::Generation(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let generator = OllamaGenerator::new(&OllamaConfig::default()).unwrap();
        assert_eq!(generator.endpoint, "http://localhost:11434/api/chat");
        assert_eq!(generator.name(), "llama3.2:1b");
    }
}
