//! services/api/src/adapters/translate_llm.rs
//!
//! This module contains the adapter for LLM-backed translation.
//! It implements the `TranslationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use vocabulary_core::{
    domain::Translation,
    ports::{PortError, PortResult, TranslationService},
};

const MAX_ALTERNATIVES: usize = 3;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TranslationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiTranslateAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    source_language: String,
    target_language: String,
}

impl OpenAiTranslateAdapter {
    /// Creates a new `OpenAiTranslateAdapter`.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: String,
        source_language: String,
        target_language: String,
    ) -> Self {
        Self {
            client,
            model,
            source_language,
            target_language,
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "You translate subtitle words and phrases from the language with ISO code '{}' \
             into the language with ISO code '{}'. Reply with the best translation on the \
             first line. If other common translations exist, put up to {} of them on the \
             following lines, one per line. No numbering, quotes or explanations.",
            self.source_language, self.target_language, MAX_ALTERNATIVES
        )
    }
}

/// First non-empty line is the translation; later distinct lines are alternatives.
fn parse_reply(original: &str, reply: &str) -> PortResult<Translation> {
    let mut lines = reply
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*']).trim())
        .filter(|line| !line.is_empty());

    let translation = lines
        .next()
        .ok_or_else(|| {
            PortError::Unexpected("Translation LLM returned an empty reply.".to_string())
        })?
        .to_string();

    let mut alternatives: Vec<String> = Vec::new();
    for line in lines {
        if alternatives.len() == MAX_ALTERNATIVES {
            break;
        }
        if line != translation && !alternatives.iter().any(|a| a == line) {
            alternatives.push(line.to_string());
        }
    }

    Ok(Translation {
        original: original.to_string(),
        translation,
        alternatives,
    })
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for OpenAiTranslateAdapter {
    async fn translate(&self, text: &str) -> PortResult<Translation> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Translation LLM response contained no text content.".to_string(),
                )
            })?;

        parse_reply(text, &content)
    }
}
