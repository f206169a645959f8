use super::null_as_default;
use crate::status::PollResponse;
use serde::{Deserialize, Serialize};

/// Output format requested for crawled pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeType {
    /// Raw HTML
    Html,
    /// HTML with boilerplate removed
    Cleaned,
    Markdown,
}

impl ScrapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Cleaned => "cleaned",
            Self::Markdown => "markdown",
        }
    }

    /// Parses the `scrape_type` string reported on a job
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "html" => Some(Self::Html),
            "cleaned" => Some(Self::Cleaned),
            "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Post-processing step attached to a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Upload crawled content to an S3-compatible bucket
    UploadS3(UploadS3Action),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadS3Action {
    pub path: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Body of a crawl submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrawlRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawler_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_limit: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_type: Option<ScrapeType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_regexp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist_regexp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_subdomains: Option<bool>,

    /// Called by the API when the crawl finishes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_scrape_type(mut self, scrape_type: ScrapeType) -> Self {
        self.scrape_type = Some(scrape_type);
        self
    }

    pub fn with_items_limit(mut self, items_limit: u32) -> Self {
        self.items_limit = Some(items_limit);
        self
    }

    pub fn with_webhook_url(mut self, webhook_url: impl Into<String>) -> Self {
        self.webhook_url = Some(webhook_url.into());
        self
    }

    /// Appends an action to run when the crawl completes
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }
}

/// A crawl job, as returned by `GET /v1/job/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub org_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scrape_type: String,
    pub whitelist_regexp: Option<String>,
    pub blacklist_regexp: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_subdomains: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub items_limit: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    pub finished_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    pub webhook_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommended_pull_delay_ms: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub job_items: Vec<JobItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Job {
    /// Looks up an item of this job by id
    pub fn item(&self, item_id: &str) -> Option<&JobItem> {
        self.job_items.iter().find(|item| item.id == item_id)
    }

    /// The job's output format, if the API reported a known one
    pub fn scrape_type(&self) -> Option<ScrapeType> {
        ScrapeType::from_api_str(&self.scrape_type)
    }
}

impl PollResponse for Job {
    fn status(&self) -> &str {
        &self.status
    }

    fn recommended_pull_delay_ms(&self) -> i64 {
        self.recommended_pull_delay_ms
    }

    fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// One crawled page of a job
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_status_code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub title: Option<String>,
    pub last_error: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cost: f64,
    pub referred_url: Option<String>,
    pub raw_content_url: Option<String>,
    pub cleaned_content_url: Option<String>,
    pub markdown_content_url: Option<String>,
}

impl JobItem {
    /// Content URL for the given output format
    pub fn content_url(&self, scrape_type: ScrapeType) -> Option<&str> {
        let url = match scrape_type {
            ScrapeType::Html => &self.raw_content_url,
            ScrapeType::Cleaned => &self.cleaned_content_url,
            ScrapeType::Markdown => &self.markdown_content_url,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}
