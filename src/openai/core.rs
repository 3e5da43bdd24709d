use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::{Error, Result};

/// Bound on a single completion request. A hung provider fails the
/// enclosing operation with `CollaboratorTimeout` instead of hanging
/// the caller.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60 * 2);

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// The LLM collaborator, seen by callers as a pure function from a
/// message transcript to the next assistant reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

fn request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::CollaboratorTimeout(COMPLETION_TIMEOUT)
    } else {
        Error::Collaborator(err.into())
    }
}

/// Fetch the next chat completion from an OpenAI compatible API.
pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Value> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "max_tokens": 500,
        "temperature": 0.7,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(COMPLETION_TIMEOUT)
        .json(&payload)
        .send()
        .await
        .map_err(request_error)?
        .json()
        .await
        .map_err(request_error)?;

    Ok(response)
}

/// OpenAI compatible chat completions client.
pub struct OpenAiCompletions {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletions {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let resp = completion(messages, &self.api_hostname, &self.api_key, &self.model).await?;

        let Some(content) = resp["choices"][0]["message"]["content"].as_str() else {
            return Err(Error::Collaborator(anyhow!(
                "No message received. Resp:\n\n{}",
                resp
            )));
        };

        Ok(content.to_string())
    }
}
