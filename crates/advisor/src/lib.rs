//! Client for the categorizer/advisor collaborator.
//!
//! Talks to Gemini through its OpenAI-compatible chat-completions endpoint.
//! Two roles are exposed: the categorizer maps a free-text transaction note
//! onto a closed set of labels, and the advisor produces a short
//! natural-language tip for a category. Every request carries a bounded
//! timeout; callers decide whether a failure is fatal.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Closed set of category labels. [`Advisor::categorize`] always answers
/// with a member of this set.
pub const CATEGORIES: [&str; 8] = [
    "Food",
    "Shopping",
    "Transport",
    "Bills",
    "Education",
    "Entertainment",
    "Health",
    "Others",
];

/// Catch-all label for model output that matches no known category.
pub const FALLBACK_CATEGORY: &str = "Others";

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("advisor API key not configured: set GEMINI_API or GEMINI_API_KEY")]
    MissingApiKey,
    #[error("advisor request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed advisor response: {0}")]
    BadResponse(String),
}

/// Result of the categorize -> advise workflow for a single note.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Analysis {
    pub note: String,
    pub category: String,
    pub tip: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Clone, Debug)]
pub struct Advisor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl Advisor {
    /// Builds a client from `GEMINI_API` or `GEMINI_API_KEY`.
    ///
    /// Fails with [`AdvisorError::MissingApiKey`] when neither is set, so a
    /// missing key is detectable at startup instead of on the first request.
    pub fn from_env() -> Result<Self, AdvisorError> {
        let api_key = std::env::var("GEMINI_API")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| AdvisorError::MissingApiKey)?;
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Result<Self, AdvisorError> {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Mainly for tests pointing at a stub server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
            model: MODEL.to_string(),
        })
    }

    async fn chat(&self, system_prompt: &str, user_content: &str) -> Result<String, AdvisorError> {
        let endpoint = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
        };

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AdvisorError::BadResponse("no choices in completion".to_string()))?;

        Ok(content.trim().to_string())
    }

    /// Classifies a transaction note into one of [`CATEGORIES`].
    pub async fn categorize(&self, note: &str) -> Result<String, AdvisorError> {
        let system_prompt = format!(
            "You are a brilliant Transaction Classifier. Your task is to \
             Analyze the input text and return ONLY one category name from: \
             {CATEGORIES:?}. Do not add any extra text."
        );
        let raw = self.chat(&system_prompt, note).await?;
        Ok(normalize_category(&raw))
    }

    /// One short, actionable money-saving tip for the category. The note is
    /// passed for extra context but the advice focuses on the category.
    pub async fn advise(&self, category: &str, note: &str) -> Result<String, AdvisorError> {
        let system_prompt = "You are a concise Financial Advisor. You will receive a spending \
                             category and sometimes a user note. Provide ONE short, actionable \
                             money-saving tip for that category. Keep tone friendly and under 2 \
                             sentences.";
        let user_content =
            format!("Category: {category}\nNote: {note}\n\nRespond with just the tip text.");
        self.chat(system_prompt, &user_content).await
    }

    /// One-line tip for the user's dominant spending category, designed for
    /// aggregated summaries rather than single transactions.
    pub async fn spending_tip(
        &self,
        category: &str,
        total_cents: i64,
    ) -> Result<String, AdvisorError> {
        let system_prompt = "You are a concise financial coach. You will receive the user's \
                             highest spending category and total amount. Provide ONE short, \
                             single-sentence money-saving tip focused on that category. Do not \
                             mention other categories; keep it friendly and practical.";
        let user_content = format!(
            "Highest spending category: {category}. Total recent spending in this category: \
             ${:.2}.\nRespond with just the tip text.",
            total_cents as f64 / 100.0
        );
        self.chat(system_prompt, &user_content).await
    }

    /// Orchestrates categorize -> advise for one note.
    pub async fn analyze(&self, note: &str) -> Result<Analysis, AdvisorError> {
        let category = self.categorize(note).await?;
        let tip = self.advise(&category, note).await?;
        tracing::info!("analysis complete for note '{note}': category {category}");
        Ok(Analysis {
            note: note.to_string(),
            category,
            tip,
        })
    }
}

/// Maps free model output onto the closed category set.
///
/// Matching is case-insensitive on the trimmed reply; anything unrecognized
/// falls back to [`FALLBACK_CATEGORY`].
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    for category in CATEGORIES {
        if trimmed.eq_ignore_ascii_case(category) {
            return category.to_string();
        }
    }
    tracing::info!("unexpected category from model '{trimmed}', falling back to {FALLBACK_CATEGORY}");
    FALLBACK_CATEGORY.to_string()
}
