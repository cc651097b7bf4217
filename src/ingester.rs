use std::time::Duration;

use typed_builder::TypedBuilder;
use url::Url;

use crate::{feed, Config, Error, Post, PostCollection, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads a feed and publishes its entries into a [`PostCollection`].
///
/// ```ignore
/// let ingester = FeedIngester::new(url);
/// let posts = ingester.posts().clone();
/// ingester.refresh().await?;
/// for post in posts.snapshot().iter() {
///     println!("{}", post.title);
/// }
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct FeedIngester {
    url: Url,
    #[builder(default)]
    client: reqwest::Client,
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    #[builder(default)]
    posts: PostCollection,
}

impl FeedIngester {
    pub fn new(url: Url) -> Self {
        Self::builder().url(url).build()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::builder()
            .url(config.feed_url.clone())
            .timeout(config.timeout())
            .build()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The collection [`refresh`](Self::refresh) publishes into
    pub fn posts(&self) -> &PostCollection {
        &self.posts
    }

    /// Download and map the feed without publishing the result
    pub async fn fetch(&self) -> Result<Vec<Post>> {
        let raw_feed = self.fetch_bytes().await?;
        feed::parse_posts(&raw_feed).inspect_err(|e| {
            log::warn!("Failed to parse feed from {}: {e}", self.url);
        })
    }

    /// Download the feed and replace the published posts with its entries.
    ///
    /// When anything fails the previously published posts are left untouched.
    pub async fn refresh(&self) -> Result {
        let posts = self.fetch().await?;
        log::info!("refreshed {} posts from {}", posts.len(), self.url);
        self.posts.replace(posts);
        Ok(())
    }

    /// Read the raw document, bounded by the configured timeout whatever
    /// the url's scheme
    async fn fetch_bytes(&self) -> Result<Vec<u8>> {
        tokio::time::timeout(self.timeout, self.read_source())
            .await
            .map_err(|_| {
                log::warn!("Timed out after {:?} fetching {}", self.timeout, self.url);
                Error::Timeout
            })?
    }

    async fn read_source(&self) -> Result<Vec<u8>> {
        match self.url.scheme() {
            "http" | "https" => self.fetch_reqwest().await,
            "file" => self.fetch_fs().await,
            scheme => {
                log::warn!("bad scheme in url: {}", self.url);
                Err(Error::UnknownScheme(scheme.to_string()))
            }
        }
    }

    async fn fetch_reqwest(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .inspect_err(|e| log::warn!("Error fetching {}: {e}", self.url))?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Error fetching {}: status {status}", self.url);
            return Err(Error::HttpStatus(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .inspect_err(|e| log::warn!("Fetching feed failed to read body: {e}"))?;
        log::debug!("fetched {} bytes from {}", bytes.len(), self.url);
        Ok(bytes.to_vec())
    }

    async fn fetch_fs(&self) -> Result<Vec<u8>> {
        let path = self.url.to_file_path().map_err(|_| {
            log::warn!("cannot convert url to file path: {}", self.url);
            Error::InvalidFileUrl(self.url.clone())
        })?;
        Ok(tokio::fs::read(&path)
            .await
            .inspect_err(|e| log::warn!("Error reading path `{}`: {e}", path.display()))?)
    }
}
