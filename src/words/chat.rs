// Remote word generation through an OpenAI-compatible chat-completions API.
// On native targets the request needs a Tokio runtime (reqwest's transport);
// in the browser it goes through fetch.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{WordPair, WordSupply, fallback_pairs, parse_pairs};
use crate::config::SupplyConfig;
use crate::error::WordSupplyError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Clone)]
pub struct ChatWordSupply {
    http: reqwest::Client,
    api_key: String,
    cfg: SupplyConfig,
}

impl fmt::Debug for ChatWordSupply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWordSupply")
            .field("api_key", &"<redacted>")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl ChatWordSupply {
    pub fn new(cfg: SupplyConfig) -> Result<Self, WordSupplyError> {
        let api_key = cfg
            .api_key()
            .ok_or(WordSupplyError::MissingApiKey)?
            .to_string();
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            cfg,
        })
    }

    pub fn prompt(&self, count: usize) -> String {
        build_prompt(&self.cfg, count)
    }

    /// One request/response round trip. Errors are returned here and turned
    /// into the fallback list by [`WordSupply::supply`].
    pub async fn try_fetch(&self, count: usize) -> Result<Vec<WordPair>, WordSupplyError> {
        let body = ChatRequest {
            model: &self.cfg.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: self.prompt(count),
            }],
            temperature: self.cfg.temperature,
        };
        let resp = self
            .http
            .post(&self.cfg.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WordSupplyError::Status(status.as_u16()));
        }
        let text = resp.text().await?;
        pairs_from_response(&text)
    }
}

impl WordSupply for ChatWordSupply {
    async fn supply(&self, count: usize) -> Vec<WordPair> {
        match self.try_fetch(count).await {
            Ok(pairs) => {
                tracing::debug!(requested = count, received = pairs.len(), "generated words");
                pairs
            }
            Err(err) => {
                tracing::warn!(%err, "word generation failed, using fallback words");
                fallback_pairs()
            }
        }
    }
}

fn build_prompt(cfg: &SupplyConfig, count: usize) -> String {
    format!(
        "Generate {count} random words for a {level} {source} language learning game. \
         They should come strictly in a pair in the format of \"{source}Word:{target}Word\". \
         Provide this in a comma-separated list.",
        level = cfg.level,
        source = cfg.source_language,
        target = cfg.target_language,
    )
}

fn pairs_from_response(body: &str) -> Result<Vec<WordPair>, WordSupplyError> {
    let resp: ChatResponse = serde_json::from_str(body)?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .ok_or(WordSupplyError::NoChoices)?
        .message
        .content;
    let pairs = parse_pairs(&content);
    if pairs.is_empty() {
        return Err(WordSupplyError::NoPairs);
    }
    Ok(pairs)
}
