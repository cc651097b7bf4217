use std::path::PathBuf;

use url::Url;

mod collection;
mod config;
mod error;
pub mod feed;
mod ingester;
mod post;
pub mod render;
pub mod xml;

pub use collection::PostCollection;
pub use config::{Config, DEFAULT_FEED_URL};
pub use error::Error;
pub use ingester::{FeedIngester, DEFAULT_TIMEOUT};
pub use post::{wrap_content, Post};

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

pub async fn run_read(url: Option<Url>, json: bool, limit: Option<usize>) -> Result {
    let mut config = load_config().await?;
    if let Some(url) = url {
        config.feed_url = url;
    }
    let ingester = FeedIngester::from_config(&config);
    ingester.refresh().await?;
    let snapshot = ingester.posts().snapshot();
    let posts = &snapshot[..limit.unwrap_or(snapshot.len()).min(snapshot.len())];
    if json {
        println!("{}", serde_json::to_string_pretty(posts)?);
    } else {
        print!("{}", render::render_posts(posts)?);
    }
    Ok(())
}

pub async fn run_setup(force: bool, url: Option<Url>) -> Result {
    let path = get_config_path(None);
    if path.exists() && !force {
        return Err(Error::PreviouslySetup);
    }
    let feed_url = match url {
        Some(url) => url,
        None => {
            let input: String = dialoguer::Input::new()
                .with_prompt("Feed URL")
                .default(DEFAULT_FEED_URL.to_string())
                .interact_text()?;
            Url::parse(&input).map_err(|e| {
                Error::InvalidArgument(format!("`{input}` is not a valid url: {e}"))
            })?
        }
    };
    let config = Config {
        feed_url,
        ..Config::default()
    };
    save_config(&config, path).await
}

pub async fn run_config(delete: bool, key: Option<String>, value: Option<String>) -> Result {
    let mut config = load_config().await?;
    let Some(key) = key else {
        print!("{config}");
        return Ok(());
    };
    if delete {
        config.delete_key(&key)?;
    } else if let Some(value) = value {
        config.update_key(&key, value)?;
    } else {
        print!("{}", config.report_key(&key)?);
        return Ok(());
    }
    save_config(&config, None).await
}

/// Read the saved config, falling back to the defaults when none was saved
pub async fn load_config() -> Result<Config> {
    match get_config(None).await {
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no config saved, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}

pub async fn get_config(path: impl Into<Option<PathBuf>>) -> Result<Config> {
    let path = path.into().unwrap_or_else(|| get_config_path(None));
    let toml_str = tokio::fs::read_to_string(&path).await.inspect_err(|e| {
        log::warn!("failed to read config at path `{}`: {e}", path.display());
    })?;
    Ok(toml::from_str(&toml_str).inspect_err(|e| {
        log::warn!("Bad toml in config: {e} \n`{toml_str}`");
    })?)
}

pub async fn save_config(config: &Config, path: impl Into<Option<PathBuf>>) -> Result {
    let path = path.into().unwrap_or_else(|| get_config_path(None));
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let toml_str = toml::to_string_pretty(config)
        .inspect_err(|e| log::warn!("Error serializing toml: {e}\n{config:#?}"))?;
    tokio::fs::write(&path, toml_str).await.inspect_err(|e| {
        log::warn!("Error writing toml to `{}`: {e}", path.display());
    })?;
    Ok(())
}

pub fn get_config_path(base_path: impl Into<Option<PathBuf>>) -> PathBuf {
    base_path
        .into()
        .unwrap_or_else(get_project_dir)
        .join("config.toml")
}

pub fn get_project_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "blogreader", "blogreader")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".blogreader"))
}
