//! services/api/src/adapters/translate_web.rs
//!
//! This module contains the adapter for the public web translation endpoints.
//! It implements the `TranslationService` port from the `core` crate, asking
//! Google's `translate_a/single` endpoint first and MyMemory second.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};
use vocabulary_core::domain::Translation;
use vocabulary_core::ports::{PortError, PortResult, TranslationService};

const GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";

/// MyMemory returns many matches; only the best few are useful as alternatives.
const MAX_MYMEMORY_ALTERNATIVES: usize = 3;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TranslationService` over plain HTTP.
#[derive(Clone)]
pub struct WebTranslateAdapter {
    client: Client,
    source_language: String,
    target_language: String,
}

impl WebTranslateAdapter {
    /// Creates a new `WebTranslateAdapter` whose requests give up after `timeout`.
    pub fn new(
        source_language: String,
        target_language: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            source_language,
            target_language,
        })
    }

    async fn google(&self, text: &str) -> PortResult<Translation> {
        let data: Value = self
            .client
            .get(GOOGLE_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_language.as_str()),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                PortError::Unexpected(format!("Google translation request failed: {}", e))
            })?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Google translation body invalid: {}", e)))?;

        parse_google(text, &data)
    }

    async fn mymemory(&self, text: &str) -> PortResult<Translation> {
        let langpair = format!("{}|{}", self.source_language, self.target_language);
        let data: Value = self
            .client
            .get(MYMEMORY_URL)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Unexpected(format!("MyMemory request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("MyMemory body invalid: {}", e)))?;

        parse_mymemory(text, &data)
    }
}

//=========================================================================================
// Response Parsing
//=========================================================================================

/// Reads `data[0][0][0]` as the translation and `data[5][0][2][*][0]` as alternatives.
fn parse_google(original: &str, data: &Value) -> PortResult<Translation> {
    let translation = data
        .pointer("/0/0/0")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::Unexpected("Google response had no translation".to_string()))?;

    let alternatives = data
        .pointer("/5/0/2")
        .and_then(Value::as_array)
        .map(|alts| {
            alts.iter()
                .filter_map(|alt| alt.get(0).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Translation {
        original: original.to_string(),
        translation: translation.to_string(),
        alternatives,
    })
}

/// Reads `responseData.translatedText` and the first few `matches[*].translation`.
fn parse_mymemory(original: &str, data: &Value) -> PortResult<Translation> {
    let translation = data
        .pointer("/responseData/translatedText")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::Unexpected("No translation available".to_string()))?;

    let alternatives = data
        .get("matches")
        .and_then(Value::as_array)
        .map(|matches| {
            matches
                .iter()
                .take(MAX_MYMEMORY_ALTERNATIVES)
                .filter_map(|m| m.get("translation").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Translation {
        original: original.to_string(),
        translation: translation.to_string(),
        alternatives,
    })
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for WebTranslateAdapter {
    async fn translate(&self, text: &str) -> PortResult<Translation> {
        match self.google(text).await {
            Ok(translation) => {
                info!("Translated \"{}\" to \"{}\"", text, translation.translation);
                return Ok(translation);
            }
            Err(e) => warn!("Google translation error, falling back to MyMemory: {}", e),
        }
        self.mymemory(text).await
    }
}
