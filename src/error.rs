use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dialog(#[from] dialoguer::Error),
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    TomlD(#[from] toml::de::Error),
    #[error(transparent)]
    TomlS(#[from] toml::ser::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// The server answered with a non-success status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out")]
    Timeout,
    /// An unknown url scheme was provided, the scheme should be
    /// the associated value
    #[error("Unknown url scheme `{0}`")]
    UnknownScheme(String),
    #[error("Invalid file URL: `{0}`")]
    InvalidFileUrl(Url),
    /// The document parsed as XML but its root element is not a
    /// known syndication format, the root's name is the associated value
    #[error("Unrecognized feed format, root element `{0}`")]
    UnrecognizedFormat(String),
    #[error("Document ended before `{0}` was closed")]
    UnexpectedEof(String),
    #[error("Unknown key: `{0}`")]
    UnknownKey(String),
    #[error("Invalid arguments, {0}")]
    InvalidArgument(String),
    #[error("Previously setup, use --force (-f) to overwrite exiting config")]
    PreviouslySetup,
}

impl Error {
    /// The feed could not be retrieved at all
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Reqwest(_)
                | Self::HttpStatus(_)
                | Self::Timeout
                | Self::Io(_)
                | Self::UnknownScheme(_)
                | Self::InvalidFileUrl(_)
        )
    }

    /// The feed was retrieved but is not a readable syndication document
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Xml(_) | Self::UnrecognizedFormat(_) | Self::UnexpectedEof(_)
        )
    }
}
