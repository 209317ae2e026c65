use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ports::{Language, Translator},
    DomainError,
};
use crate::infrastructure::config::TranslationConfig;

/// Google Cloud Translation (v2 REST) client.
pub struct GoogleTranslator {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Result<Self, DomainError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            DomainError::validation(format!("{} is not set", config.api_key_env))
        })?;
        Ok(Self::new(config.endpoint.clone(), api_key))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, DomainError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&TranslateRequest {
                q: text,
                target: target.code(),
                format: "text",
            })
            .send()
            .await
            .map_err(|e| DomainError::external(format!("translation request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::external(format!(
                "translation failed with {status}: {body}"
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("translation response: {e}")))?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| DomainError::external("translation returned no text"))
    }
}
