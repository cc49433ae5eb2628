use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{ContentItem, FaqEntry, PriceListing, SiteSettings, Tag, Taxonomy},
    error::{ApiError, ErrorCode},
    protocol::{ExcursionRecord, FaqRecord, PriceRecord, TermRecord},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod pages;
pub mod reservation;

pub use reqwest::StatusCode;

/// Public address of the content API when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://back.mayaadrenaline.com.mx";
const PAGE_SIZE: &str = "100";
const EXCURSION_PATH: &str = "wp-json/wp/v2/excursion";
const FAQ_PATH: &str = "wp-json/wp/v2/faq";
const SETTINGS_PATH: &str = "wp-json/maya-adrenaline/v1/settings";
const PRICE_FIELDS: &str = "id,title,slug,precio,duracion";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content api url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("content api returned {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },
    #[error("content api request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("content api response from {endpoint} could not be decoded: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

impl ContentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ContentError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
                ErrorCode::NotFound
            }
            ContentError::Status { .. } | ContentError::Transport { .. } => ErrorCode::Unavailable,
            ContentError::Decode { .. } => ErrorCode::Malformed,
            ContentError::InvalidBaseUrl { .. } => ErrorCode::Internal,
        }
    }
}

impl From<&ContentError> for ApiError {
    fn from(value: &ContentError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}

/// Read access to the content the site is built from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn excursions(&self) -> Result<Vec<ContentItem>, ContentError>;
    /// `Ok(None)` when no excursion has this slug.
    async fn excursion_by_slug(&self, slug: &str) -> Result<Option<ContentItem>, ContentError>;
    async fn price_listings(&self) -> Result<Vec<PriceListing>, ContentError>;
    async fn tags(&self, taxonomy: Taxonomy) -> Result<Vec<Tag>, ContentError>;
    async fn faqs(&self) -> Result<Vec<FaqEntry>, ContentError>;
    async fn settings(&self) -> Result<SiteSettings, ContentError>;
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    http: Client,
    base_url: Url,
}

impl ContentClient {
    pub fn new(base_url: &str) -> Result<Self, ContentError> {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> Result<Self, ContentError> {
        let trimmed = base_url.trim();
        // Url::join replaces the last path segment unless the base ends in '/'.
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(&normalized).map_err(|source| ContentError::InvalidBaseUrl {
            url: trimmed.to_string(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ContentError> {
        self.base_url
            .join(path)
            .map_err(|source| ContentError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ContentError> {
        let url = self.endpoint(path)?;
        let endpoint = url.path().to_string();
        debug!(%url, ?query, "fetching content");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ContentError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status { endpoint, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ContentError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| ContentError::Decode { endpoint, source })
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn excursions(&self) -> Result<Vec<ContentItem>, ContentError> {
        let records: Vec<ExcursionRecord> = self
            .get_json(EXCURSION_PATH, &[("_embed", "1"), ("per_page", PAGE_SIZE)])
            .await?;
        Ok(records.into_iter().map(ContentItem::from).collect())
    }

    async fn excursion_by_slug(&self, slug: &str) -> Result<Option<ContentItem>, ContentError> {
        let records: Vec<ExcursionRecord> = self
            .get_json(EXCURSION_PATH, &[("slug", slug), ("_embed", "1")])
            .await?;
        Ok(records.into_iter().next().map(ContentItem::from))
    }

    async fn price_listings(&self) -> Result<Vec<PriceListing>, ContentError> {
        let records: Vec<PriceRecord> = self
            .get_json(
                EXCURSION_PATH,
                &[("per_page", PAGE_SIZE), ("_fields", PRICE_FIELDS)],
            )
            .await?;
        Ok(records.into_iter().map(PriceListing::from).collect())
    }

    async fn tags(&self, taxonomy: Taxonomy) -> Result<Vec<Tag>, ContentError> {
        let path = format!("wp-json/wp/v2/{}", taxonomy.wire_name());
        let records: Vec<TermRecord> = self.get_json(&path, &[("per_page", PAGE_SIZE)]).await?;
        Ok(records
            .into_iter()
            .map(|record| record.into_tag(taxonomy))
            .collect())
    }

    async fn faqs(&self) -> Result<Vec<FaqEntry>, ContentError> {
        let records: Vec<FaqRecord> = self.get_json(FAQ_PATH, &[("per_page", PAGE_SIZE)]).await?;
        Ok(records.into_iter().map(FaqEntry::from).collect())
    }

    async fn settings(&self) -> Result<SiteSettings, ContentError> {
        self.get_json(SETTINGS_PATH, &[]).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
