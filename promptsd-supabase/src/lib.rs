//! Supabase-backed content source.
//!
//! Reads go through PostgREST with the public anon key, so row-level security
//! on the project still applies.

pub mod query;

use async_trait::async_trait;
use promptsd_core::{ContentItem, ContentQuery, ContentSource, CoreError, SearchQuery, SupabaseConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default timeout for HTTP requests (10 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const SOURCE_NAME: &str = "supabase";

/// Content source reading the `characters` table
pub struct SupabaseSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl SupabaseSource {
    /// Create a source for the configured project.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the project URL or key is unusable, or an
    /// error if the HTTP client cannot be created.
    pub fn new(config: &SupabaseConfig) -> Result<Self, CoreError> {
        let endpoint = query::characters_endpoint(&config.url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("PromptSD/", env!("CARGO_PKG_VERSION")))
            .default_headers(auth_headers(config.anon_key.trim())?)
            .build()?;

        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<ContentItem>, CoreError> {
        debug!("Supabase GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Supabase returned status {}: {}", status, body);
            return Err(CoreError::DataSource {
                source_name: SOURCE_NAME.to_string(),
                reason: format!("Supabase returned status: {status}"),
            });
        }

        let body = response.text().await?;
        let rows: Vec<ContentItem> = serde_json::from_str(&body)?;
        debug!("Supabase returned {} rows", rows.len());
        Ok(rows)
    }
}

fn auth_headers(anon_key: &str) -> Result<HeaderMap, CoreError> {
    let invalid = |_| CoreError::ConfigInvalid {
        message: "supabase.anon_key contains characters not allowed in a header".into(),
    };

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(anon_key).map_err(invalid)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {anon_key}")).map_err(invalid)?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[async_trait]
impl ContentSource for SupabaseSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn list(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, CoreError> {
        self.fetch_rows(query::list_url(&self.endpoint, query)).await
    }

    async fn get(&self, id: &str) -> Result<Option<ContentItem>, CoreError> {
        let rows = self.fetch_rows(query::get_url(&self.endpoint, id)).await?;
        Ok(rows.into_iter().next())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, CoreError> {
        self.fetch_rows(query::search_url(&self.endpoint, query)).await
    }
}
