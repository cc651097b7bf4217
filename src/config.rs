use core::fmt;
use std::fmt::Write;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_FEED_URL: &str = "https://devblogs.microsoft.com/dotnet/category/maui/feed/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub feed_url: Url,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn default_feed_url() -> Url {
    Url::parse(DEFAULT_FEED_URL).expect("default feed url is valid")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.report_feed_url(f)?;
        self.report_timeout(f)
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn report_key(&self, key: &str) -> Result<String> {
        let mut s = String::new();
        match key {
            "feed_url" => self.report_feed_url(&mut s)?,
            "timeout_secs" => self.report_timeout(&mut s)?,
            _ => return Err(Error::UnknownKey(key.to_string())),
        }
        Ok(s)
    }

    fn report_feed_url(&self, f: &mut impl Write) -> fmt::Result {
        writeln!(f, "feed_url: {}", self.feed_url)
    }

    fn report_timeout(&self, f: &mut impl Write) -> fmt::Result {
        writeln!(f, "timeout_secs: {}", self.timeout_secs)
    }

    /// Reset a key to its default value
    pub fn delete_key(&mut self, key: &str) -> Result {
        match key {
            "feed_url" => self.feed_url = default_feed_url(),
            "timeout_secs" => self.timeout_secs = DEFAULT_TIMEOUT_SECS,
            _ => return Err(Error::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn update_key(&mut self, key: &str, value: String) -> Result {
        match key {
            "feed_url" => {
                self.feed_url = Url::parse(&value).map_err(|e| {
                    Error::InvalidArgument(format!("`{value}` is not a valid url: {e}"))
                })?;
            }
            "timeout_secs" => {
                self.timeout_secs = value.parse().map_err(|e| {
                    Error::InvalidArgument(format!("`{value}` is not a number of seconds: {e}"))
                })?;
            }
            _ => return Err(Error::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
