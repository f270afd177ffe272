use thiserror::Error;
use poise::serenity_prelude as serenity;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Discord API error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stats service returned {0}")]
    StatsService(reqwest::StatusCode),

    #[error("Failed to download file. Status code: {0}")]
    Download(reqwest::StatusCode),

    #[error("PUGs queue is not running")]
    QueueClosed,
}

impl From<&str> for BotError {
    fn from(s: &str) -> Self {
        BotError::Config(s.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
