use async_trait::async_trait;
use governor::{clock::*, middleware::*, state::*, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Method, Request,
};
use serde_derive::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::{FetchError, ReleaseSource};

/// A release as returned by the search endpoint. Every field is optional
/// because search hits are frequently incomplete. Fields of an unexpected
/// type are read as missing.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "artist-credit")]
    #[serde(default)]
    pub artist_credit: Option<serde_json::Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match <serde_json::Value as serde::Deserialize>::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl Release {
    /// Name of the first artist credit, when the credit list is well formed.
    pub fn first_artist(&self) -> Option<&str> {
        self.artist_credit
            .as_ref()?
            .as_array()?
            .first()?
            .get("name")?
            .as_str()
    }

    pub fn mbid(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSearch {
    pub created: Option<String>,
    pub count: Option<i64>,
    pub offset: Option<i64>,
    #[serde(default)]
    pub releases: Vec<Release>,
}

pub fn decode(text: &str) -> Result<ReleaseSearch, FetchError> {
    serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(text)).map_err(|e| {
        FetchError::Decode {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    })
}

pub struct MusicBrainzClient {
    client: reqwest::Client,
    base: url::Url,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl MusicBrainzClient {
    pub fn new(settings: &base::setting::MusicBrainz) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .build()?;
        let per_second = NonZeroU32::new(settings.calls_per_second).unwrap_or(nonzero!(1u32));
        Ok(Self {
            client,
            base: settings.url.clone(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        })
    }

    /// `GET {base}release/?query=date:{date}&fmt=json&limit={limit}`
    pub fn search_url(&self, date: &str, limit: u32) -> Result<url::Url, FetchError> {
        let mut url = self.base.join("release/")?;
        url.query_pairs_mut()
            .append_pair("query", format!("date:{}", date).as_str())
            .append_pair("fmt", "json")
            .append_pair("limit", limit.to_string().as_str());
        Ok(url)
    }
}

#[async_trait]
impl ReleaseSource for MusicBrainzClient {
    async fn search_by_date(&self, date: &str, limit: u32) -> Result<Vec<Release>, FetchError> {
        let url = self.search_url(date, limit)?;
        self.limiter.until_ready().await;
        tracing::debug! {%url, "Searching for releases on MusicBrainz"};
        let res = self.client.execute(Request::new(Method::GET, url)).await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: res.url().clone(),
            });
        }
        let text = res.text().await?;
        let search = decode(text.as_str())?;
        tracing::trace! {%date, count = ?search.count, returned = search.releases.len(), "MusicBrainz search results"};
        Ok(search.releases)
    }
}
