mod payload;

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use thiserror::Error;

pub use payload::{IndexPage, Record, ResourceRef};

#[cfg(test)]
pub(crate) use payload::{decode_index_for_tests, decode_record_for_tests};

pub const DEFAULT_ENDPOINT: &str = "https://pokeapi.co/api/v2/pokemon";

const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

/// The single fetch failure kind. Variants only describe the cause.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The HTTP collaborator the controller pulls records from.
pub trait RecordFetcher {
    /// Fetches one page of a collection index.
    fn fetch_index(&self, url: &str) -> impl Future<Output = Result<IndexPage, FetchError>> + Send;

    /// Resolves a single index entry into a full record.
    fn resolve(
        &self,
        reference: &ResourceRef,
    ) -> impl Future<Output = Result<Record, FetchError>> + Send;
}

/// Resolves every reference, at most `concurrency` at a time.
///
/// The output keeps the order of `refs`. The first failure fails the whole
/// batch and no partial result is returned.
pub async fn resolve_all<F: RecordFetcher>(
    fetcher: &F,
    refs: &[ResourceRef],
    concurrency: usize,
) -> Result<Vec<Record>, FetchError> {
    stream::iter(refs.iter())
        .map(|r| fetcher.resolve(r))
        .buffered(concurrency.max(1))
        .try_collect::<Vec<Record>>()
        .await
}

/// Builds the first locator of a collection, optionally size-limited.
pub fn collection_url(endpoint: &str, limit: Option<usize>) -> Result<String, FetchError> {
    let mut url = reqwest::Url::parse(endpoint.trim()).map_err(|_| FetchError::InvalidUrl {
        url: endpoint.to_string(),
    })?;
    if let Some(limit) = limit {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "limit" && k != "offset")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("offset", "0")
            .append_pair("limit", &limit.to_string());
    }
    Ok(url.to_string())
}

#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub rate: Option<u32>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            proxy: None,
            rate: None,
        }
    }
}

/// `RecordFetcher` backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    progress: ProgressBar,
}

impl HttpFetcher {
    pub fn new(options: &HttpOptions) -> Result<Self, FetchError> {
        let client = build_client(options.proxy.as_deref(), options.timeout_seconds)?;
        let limiter = options
            .rate
            .and_then(NonZeroU32::new)
            .map(|rate| RateLimiter::direct(Quota::per_second(rate)));
        Ok(Self {
            client,
            limiter,
            progress: ProgressBar::hidden(),
        })
    }

    /// Ticks `pb` once per resolved record.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = pb;
        self
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if reqwest::Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }
        if let Some(lim) = self.limiter.as_ref() {
            lim.until_ready().await;
        }
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;
        Ok(body.to_vec())
    }
}

impl RecordFetcher for HttpFetcher {
    async fn fetch_index(&self, url: &str) -> Result<IndexPage, FetchError> {
        let body = self.get_bytes(url).await?;
        payload::decode_index(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    async fn resolve(&self, reference: &ResourceRef) -> Result<Record, FetchError> {
        let body = self.get_bytes(&reference.url).await?;
        let record = payload::decode_record(&body).map_err(|e| FetchError::Decode {
            url: reference.url.clone(),
            source: e,
        })?;
        self.progress.inc(1);
        Ok(record)
    }
}

fn build_client(proxy: Option<&str>, timeout_seconds: u64) -> Result<reqwest::Client, FetchError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let timeout = Duration::from_secs(if timeout_seconds == 0 { 10 } else { timeout_seconds });
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| FetchError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FetchError::HttpClientBuild { source: e })
}
