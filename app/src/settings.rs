use poise::serenity_prelude::{ChannelId, Color, UserId};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{BotError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_STATS_URL: &str = "http://localhost:8080";
/// The stats service opens uploaded logs relative to its own working
/// directory, which the bot shares by default.
pub const DEFAULT_UPLOAD_DIR: &str = ".";
pub const DEFAULT_EMBED_COLOR: Color = Color::new(0xFFFFFF);

/// Process-level settings read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub config_path: PathBuf,
    pub stats_url: String,
    pub upload_dir: PathBuf,
    pub owner_id: Option<UserId>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or("DISCORD_TOKEN not set")?;

        let owner_id = match lookup("BOT_OWNER_ID") {
            Some(raw) => Some(parse_user_id(&raw).ok_or_else(|| {
                BotError::Config(format!("BOT_OWNER_ID is not a user id: {raw}"))
            })?),
            None => None,
        };

        Ok(Self {
            token,
            config_path: lookup("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            stats_url: lookup("STATS_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_STATS_URL.to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            owner_id,
        })
    }
}

/// The persisted bot configuration. Field names match the `config.json`
/// layout the bot has always used so existing files keep loading.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Settings {
    #[serde(rename = "allowedUsers", default)]
    pub allowed_users: Vec<UserId>,
    #[serde(
        rename = "logChannelID",
        default,
        deserialize_with = "blank_channel_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub log_channel: Option<ChannelId>,
    #[serde(
        rename = "pugsChannelID",
        default,
        deserialize_with = "blank_channel_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub pugs_channel: Option<ChannelId>,
    #[serde(rename = "embedColor", default, skip_serializing_if = "Option::is_none")]
    pub embed_color: Option<String>,
    #[serde(skip)]
    path: PathBuf,
}

impl Settings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => {
                info!("Found settings at {}", path.display());
                let mut settings: Settings = serde_json::from_str(&raw)?;
                settings.path = path.to_path_buf();
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Creating new settings at {}", path.display());
                let settings = Self::new(path);
                settings.save().await?;
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&self.path, serialized).await?;
        info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    pub fn is_user_allowed(&self, user_id: UserId) -> bool {
        self.allowed_users.contains(&user_id)
    }

    /// Returns `false` when the user was already allow-listed.
    pub fn add_allowed_user(&mut self, user_id: UserId) -> bool {
        if self.is_user_allowed(user_id) {
            return false;
        }
        self.allowed_users.push(user_id);
        true
    }

    pub fn set_log_channel(&mut self, channel_id: ChannelId) {
        self.log_channel = Some(channel_id);
    }

    pub fn set_pugs_channel(&mut self, channel_id: ChannelId) {
        self.pugs_channel = Some(channel_id);
    }

    /// Stores a hex color (with or without a leading `#`). Rejects anything
    /// that does not parse.
    pub fn set_embed_color(&mut self, raw: &str) -> Option<Color> {
        let color = parse_color(raw)?;
        self.embed_color = Some(raw.trim_start_matches('#').to_string());
        Some(color)
    }

    pub fn embed_color(&self) -> Color {
        self.embed_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(DEFAULT_EMBED_COLOR)
    }
}

pub fn parse_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(Color::new)
}

/// Older config files store an unset channel as `""`.
fn blank_channel_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<ChannelId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawChannel {
        Id(ChannelId),
        Text(String),
    }

    match Option::<RawChannel>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawChannel::Id(id)) => Ok(Some(id)),
        Some(RawChannel::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawChannel::Text(text)) => Err(de::Error::custom(format!(
            "invalid channel id: {text}"
        ))),
    }
}

/// Accepts a bare snowflake or a user mention (`<@123>` / `<@!123>`).
pub fn parse_user_id(raw: &str) -> Option<UserId> {
    let digits = raw
        .trim()
        .trim_start_matches('<')
        .trim_start_matches('@')
        .trim_start_matches('!')
        .trim_end_matches('>');
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(UserId::new(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_config(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "showdown-bot-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn parses_mentions_and_bare_ids() {
        assert_eq!(parse_user_id("<@429302329188286495>"), Some(UserId::new(429302329188286495)));
        assert_eq!(parse_user_id("<@!42>"), Some(UserId::new(42)));
        assert_eq!(parse_user_id("42"), Some(UserId::new(42)));
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("someone"), None);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("ff0000"), Some(Color::new(0xff0000)));
        assert_eq!(parse_color("#00ff00"), Some(Color::new(0x00ff00)));
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("fff"), None);
        assert_eq!(parse_color("+12345"), None);
    }

    #[test]
    fn invalid_embed_color_is_not_stored() {
        let mut settings = Settings::default();
        assert!(settings.set_embed_color("zzzzzz").is_none());
        assert!(settings.embed_color.is_none());
        assert_eq!(settings.embed_color(), DEFAULT_EMBED_COLOR);

        assert_eq!(settings.set_embed_color("#123456"), Some(Color::new(0x123456)));
        assert_eq!(settings.embed_color.as_deref(), Some("123456"));
    }

    #[test]
    fn allow_list_has_no_duplicates() {
        let mut settings = Settings::default();
        let user = UserId::new(7);
        assert!(!settings.is_user_allowed(user));
        assert!(settings.add_allowed_user(user));
        assert!(!settings.add_allowed_user(user));
        assert_eq!(settings.allowed_users, vec![user]);
    }

    #[test]
    fn reads_the_existing_config_layout() {
        let raw = r#"{
            "allowedUsers": ["429302329188286495"],
            "logChannelID": "1200000000000000001",
            "pugsChannelID": "1200000000000000002",
            "embedColor": "2f3136"
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert!(settings.is_user_allowed(UserId::new(429302329188286495)));
        assert_eq!(settings.log_channel, Some(ChannelId::new(1200000000000000001)));
        assert_eq!(settings.pugs_channel, Some(ChannelId::new(1200000000000000002)));
        assert_eq!(settings.embed_color(), Color::new(0x2f3136));
    }

    #[test]
    fn blank_channel_ids_read_as_unset() {
        let raw = r#"{
            "allowedUsers": [],
            "logChannelID": "",
            "pugsChannelID": null
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert!(settings.log_channel.is_none());
        assert!(settings.pugs_channel.is_none());

        let bad = r#"{ "allowedUsers": [], "logChannelID": "general" }"#;
        assert!(serde_json::from_str::<Settings>(bad).is_err());
    }

    #[tokio::test]
    async fn missing_file_is_created_and_round_trips() {
        let path = temp_config("roundtrip");

        let mut settings = Settings::load(&path).await.unwrap();
        assert!(path.exists());
        assert!(settings.allowed_users.is_empty());

        settings.add_allowed_user(UserId::new(99));
        settings.set_pugs_channel(ChannelId::new(5));
        settings.save().await.unwrap();

        let reloaded = Settings::load(&path).await.unwrap();
        assert!(reloaded.is_user_allowed(UserId::new(99)));
        assert_eq!(reloaded.pugs_channel, Some(ChannelId::new(5)));
        assert!(reloaded.log_channel.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn config_requires_a_token() {
        let env: HashMap<&str, &str> = HashMap::new();
        assert!(BotConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).is_err());
    }

    #[test]
    fn config_defaults_and_overrides() {
        let mut env = HashMap::from([("DISCORD_TOKEN", "abc")]);
        let config = BotConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.stats_url, DEFAULT_STATS_URL);
        assert_eq!(config.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(config.upload_dir, PathBuf::from("."));
        assert!(config.owner_id.is_none());

        env.insert("STATS_API_URL", "http://stats.internal:9000/");
        env.insert("BOT_OWNER_ID", "429302329188286495");
        let config = BotConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.stats_url, "http://stats.internal:9000");
        assert_eq!(config.owner_id, Some(UserId::new(429302329188286495)));
    }
}
