//! NL-to-SQL translation
//!
//! Provides integration with a hosted language model to turn natural-language
//! questions into SQL, memoized through the [`SqlCache`]. The provider is a
//! trait so tests can swap in a mock with canned responses.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::SqlCache;
use crate::config::{DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_MS};
use crate::error::{InsightlineError, Result};

/// Fixed schema description and rule set embedded in every prompt.
const SYSTEM_PROMPT: &str = "\
You are a SQL expert. Convert natural language questions to SQL queries for the following schema:

customers: id, name, email, city, signup_date
products: id, name, category, price, stock
orders: id, customer_id, product_id, quantity, order_date, total
sales: id, order_id, revenue, profit_margin, sales_date

Rules:
- Use only SELECT queries
- Always include LIMIT for large results
- Use proper JOINs when needed
- Return only SQL, no explanations
- Use SQLite syntax";

/// LLM provider trait for different backends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Complete a prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// ── Gemini provider ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

/// Google Gemini provider backed by the Generative Language REST API.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Create a provider for the hosted Gemini API.
    ///
    /// A missing API key is not an error here -- the server should come up
    /// without one -- but every completion call will fail until a key is set.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(DEFAULT_LLM_TIMEOUT_MS))
            .build()
            .map_err(|e| InsightlineError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key,
        })
    }

    /// Override the API base URL (used by tests against a local stub).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| InsightlineError::Llm("Gemini API key not configured".to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "contents": [{"parts": [{"text": prompt}]}],
            }))
            .send()
            .await
            .map_err(|e| InsightlineError::Llm(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightlineError::Llm(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| InsightlineError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        let text = data
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| InsightlineError::Llm("Empty Gemini response".to_string()))?;

        Ok(text)
    }
}

// ── Mock provider ───────────────────────────────────────────────────────

/// Provider returning a fixed response, for tests.
///
/// Counts completion calls so tests can assert the cache short-circuits
/// repeated questions.
pub struct MockProvider {
    response: String,
    calls: AtomicU64,
}

impl MockProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicU64::new(0),
        }
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

// ── Translator ──────────────────────────────────────────────────────────

/// Translates natural-language questions into SQL through the provider,
/// memoizing results in the shared cache.
pub struct SqlGenerator {
    provider: Arc<dyn LlmProvider>,
    cache: Arc<SqlCache>,
}

impl SqlGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, cache: Arc<SqlCache>) -> Self {
        Self { provider, cache }
    }

    /// Translate a question into a SQL string.
    ///
    /// Cache hits are returned unchanged without re-validation. On a miss
    /// the provider is called, markdown code fences are stripped from the
    /// response, and the cleaned SQL is cached. Provider failures propagate
    /// as [`InsightlineError::Llm`] with nothing cached.
    pub async fn generate_sql(&self, question: &str) -> Result<String> {
        let cache_key = format!("sql_cache:{}", question);
        if let Some(sql) = self.cache.get(&cache_key) {
            debug!(question = %question, "SQL cache hit");
            return Ok(sql);
        }

        let prompt = format!("{}\n\nQuestion: {}\nSQL:", SYSTEM_PROMPT, question);
        let response = self.provider.complete(&prompt).await?;
        let sql = strip_code_fences(&response);

        info!(provider = self.provider.name(), sql = %sql, "Generated SQL");
        self.cache.insert(cache_key, sql.clone());
        Ok(sql)
    }
}

/// Remove markdown code-fence decoration the model tends to wrap SQL in.
fn strip_code_fences(response: &str) -> String {
    response
        .trim()
        .replace("```sql", "")
        .replace("```", "")
        .trim()
        .to_string()
}
