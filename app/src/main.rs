mod commands;
mod download;
mod error;
mod events;
mod pugs;
mod settings;
mod stats;
mod tasks;

use events::event_handler;
use poise::serenity_prelude as serenity;
use pugs::{PugsHandle, PugsService};
use settings::{BotConfig, Settings};
use stats::StatsClient;
use std::sync::Arc;
use tasks::pugs_queue::PugsQueueTask;
use tasks::TaskManager;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct Data {
    pub settings: Arc<RwLock<Settings>>,
    pub config: Arc<BotConfig>,
    pub pugs: PugsHandle,
    pub stats: StatsClient,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Arc::new(BotConfig::from_env()?);
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let settings = Arc::new(RwLock::new(Settings::load(&config.config_path).await?));
    let stats = StatsClient::new(config.stats_url.clone())?;
    let (pugs, pugs_service) = PugsService::channel();

    let mut task_manager = TaskManager::new();
    task_manager.register_task(PugsQueueTask::new(pugs_service));

    let data = Data {
        settings,
        config: config.clone(),
        pugs,
        stats,
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, _framework| {
            Box::pin(async move {
                // Tasks are started here rather than on Ready so reconnects
                // do not spawn a second queue.
                task_manager.run_all(ctx, data.clone()).await;
                Ok(data)
            })
        })
        .build();

    serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?
        .start()
        .await?;

    Ok(())
}
