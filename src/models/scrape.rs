use crate::status::PollResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a scrape submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Crawler-specific input, e.g. `{"url": "https://example.com"}`
    pub input: Value,

    /// Which scraper to run
    pub crawler_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Log every polled status response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_cache: Option<bool>,
}

impl ScrapeRequest {
    pub fn new(crawler_id: impl Into<String>, input: Value) -> Self {
        Self {
            input,
            crawler_id: crawler_id.into(),
            max_retries: None,
            debug: None,
            omit_cache: None,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_omit_cache(mut self, omit_cache: bool) -> Self {
        self.omit_cache = Some(omit_cache);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }
}

/// Status of a scrape, as returned by `GET /{version}/scrape/{id}`
///
/// The response is kept as the JSON object the API sent. Accessors read the
/// known fields and treat a missing, `null` or mistyped value as absent, so any
/// partial payload decodes and re-serializes to exactly the same object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeResponse {
    fields: Map<String, Value>,
}

impl ScrapeResponse {
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    /// Raw status string; empty when the API sent none
    pub fn status(&self) -> &str {
        self.str_field("status").unwrap_or_default()
    }

    pub fn page_status_code(&self) -> Option<i64> {
        self.int_field("page_status_code")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.str_field("created_at")
    }

    /// Scraper output, if any
    pub fn structured_data(&self) -> Option<&Value> {
        self.get("structured_data")
    }

    /// Moves the scraper output out of the response, `Value::Null` if absent
    pub fn into_structured_data(mut self) -> Value {
        self.fields
            .remove("structured_data")
            .unwrap_or(Value::Null)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.str_field("error_code")
    }

    pub fn error_message(&self) -> Option<&str> {
        self.str_field("error_message")
    }

    /// Any field of the response; `null` counts as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// The response exactly as received
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn int_field(&self, key: &str) -> Option<i64> {
        self.get(key)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
    }
}

impl From<Map<String, Value>> for ScrapeResponse {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl PollResponse for ScrapeResponse {
    fn status(&self) -> &str {
        ScrapeResponse::status(self)
    }

    fn recommended_pull_delay_ms(&self) -> i64 {
        self.int_field("recommended_pull_delay_ms").unwrap_or(0)
    }

    fn error_code(&self) -> Option<&str> {
        ScrapeResponse::error_code(self)
    }

    fn error_message(&self) -> Option<&str> {
        ScrapeResponse::error_message(self)
    }
}
