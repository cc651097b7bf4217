use clap::Parser;
use url::Url;

#[derive(Debug, Parser)]
pub enum Args {
    /// Fetch the feed and read its posts
    Read {
        /// Read this feed instead of the configured one
        #[clap(long, short)]
        url: Option<Url>,
        /// Print the posts as json
        #[clap(long, short)]
        json: bool,
        /// Only show the first N posts
        #[clap(long, short)]
        limit: Option<usize>,
    },
    /// Setup the config file
    Setup {
        #[clap(long, short)]
        force: bool,
        /// The feed to read, prompted for when missing
        #[clap(long, short)]
        url: Option<Url>,
    },
    /// Interact with Configuration
    Config {
        /// The provided key will be reset to its default
        #[clap(long, short)]
        #[arg(conflicts_with("value"))]
        delete: bool,
        /// If a value is provided, the key to assign the value to
        /// if no value is provided print the configuration key's value
        #[arg(required_if_eq("delete", "true"))]
        key: Option<String>,
        /// The value to assign to the key
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), blogreader::Error> {
    env_logger::init();
    let args = Args::parse();
    match args {
        Args::Read { url, json, limit } => blogreader::run_read(url, json, limit).await?,
        Args::Setup { force, url } => blogreader::run_setup(force, url).await?,
        Args::Config { delete, key, value } => blogreader::run_config(delete, key, value).await?,
    }
    Ok(())
}
