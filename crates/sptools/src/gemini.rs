//! Client for the Gemini `generateContent` endpoint
//!
//! One request type serves both flows: free-form generation for contract
//! code, and structured generation (JSON response schema) for debug
//! reports. A single round trip per call; no retries, no timeouts.

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use sptools_core::extract::{strip_code_fences, SMARTPY_IMPORT};
use sptools_core::report::parse_debug_report;
use sptools_core::types::DebugReport;

/// Model used when neither `--model` nor `GEMINI_MODEL` is set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the hosted generative-language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Sampling parameters for one model call.
#[derive(Debug, Clone, Copy)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

/// Sampling used for contract generation. Low temperature keeps the
/// output close to deterministic for a given description.
pub const GENERATION_SAMPLING: SamplingConfig = SamplingConfig {
    temperature: 0.2,
    top_p: 0.8,
    top_k: 40,
};

/// Sampling used for contract debugging.
pub const DEBUG_SAMPLING: SamplingConfig = SamplingConfig {
    temperature: 0.3,
    top_p: 0.9,
    top_k: 40,
};

/// Gemini configuration from environment variables
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiConfig {
    /// Load configuration from environment variables
    ///
    /// `GEMINI_API_KEY` is required; `GEMINI_MODEL` and `GEMINI_BASE_URL`
    /// fall back to defaults. The credential is looked up on every call,
    /// never cached.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key: std::env::var("GEMINI_API_KEY").map_err(|_| {
                Error::Config("GEMINI_API_KEY environment variable not set".to_string())
            })?,
        })
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>, model: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(model) = model {
            self.model = model;
        }
        self
    }
}

/// Create an authenticated HTTP client with the API key header
fn create_authenticated_client(config: &GeminiConfig) -> Result<reqwest::Client, Error> {
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

    let mut api_key = HeaderValue::from_str(&config.api_key)
        .map_err(|e| Error::Config(f!("Invalid API key value: {e}")))?;
    api_key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("x-goog-api-key", api_key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Service(f!("Failed to build HTTP client: {e}")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// JSON schema the debug call is constrained to.
fn debug_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "explanation": {
                "type": "STRING",
                "description": "A clear, concise explanation of the error, what causes it, and how to fix it. This should be formatted in Markdown."
            },
            "correctedCode": {
                "type": "STRING",
                "description": "The complete, corrected SmartPy contract code, including imports and tests."
            }
        },
        "required": ["explanation", "correctedCode"]
    })
}

/// Thin client over the `models/{model}:generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, Error> {
        let client = create_authenticated_client(&config)?;
        Ok(Self { config, client })
    }

    /// Generate free-form contract code.
    ///
    /// Strips an optional surrounding fence from the output. Output that
    /// does not start with the `import smartpy as sp` marker is logged at
    /// warn level but still returned as-is.
    pub async fn generate(&self, prompt: &str, sampling: SamplingConfig) -> Result<String, Error> {
        let text = self.generate_content(prompt, sampling, None).await?;
        let code = strip_code_fences(&text);

        if !code.starts_with(SMARTPY_IMPORT) {
            log::warn!("Generated code might be malformed. Raw response: {text}");
        }

        Ok(code)
    }

    /// Run the structured debug call and parse the two-field JSON response.
    pub async fn debug(&self, prompt: &str, sampling: SamplingConfig) -> Result<DebugReport, Error> {
        let text = self
            .generate_content(prompt, sampling, Some(debug_response_schema()))
            .await?;

        parse_debug_report(&text).map_err(Error::Format)
    }

    /// One round trip to the generateContent endpoint.
    async fn generate_content(
        &self,
        prompt: &str,
        sampling: SamplingConfig,
        response_schema: Option<serde_json::Value>,
    ) -> Result<String, Error> {
        let url = f!("{}/{}:generateContent", self.config.base_url, self.config.model);

        let structured = response_schema.is_some();
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                top_k: sampling.top_k,
                response_mime_type: structured.then(|| "application/json".to_string()),
                response_schema,
            },
        };

        log::debug!("POST {url} ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Service(f!("Request to Gemini failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(f!("Gemini API returned {status}: {body}")));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(f!("Failed to read Gemini response: {e}")))?;

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| Error::Service("Gemini response contained no candidates".to_string()))
    }
}
