#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("sizing error: {0}")]
    Sizing(String),

    #[error("unknown database: {0}")]
    UnknownDatabase(String),

    #[error(transparent)]
    UnsupportedLayout(#[from] scryfall::UnsupportedLayout),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("decklist contains invalid card names")]
    InvalidDecklist,
}

pub type Result<T> = std::result::Result<T, Error>;
