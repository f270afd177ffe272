use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use super::TaskHandler;
use crate::pugs::{ChannelAnnouncer, PugsService};
use crate::{Data, Error};

/// Drives the PUGs queue for the lifetime of the bot.
pub struct PugsQueueTask {
    service: Option<PugsService>,
}

impl PugsQueueTask {
    pub fn new(service: PugsService) -> Self {
        Self {
            service: Some(service),
        }
    }
}

#[async_trait]
impl TaskHandler for PugsQueueTask {
    fn name(&self) -> &'static str {
        "pugs_queue"
    }

    async fn run(&mut self, ctx: &serenity::Context, data: Data) -> Result<(), Error> {
        let service = self
            .service
            .take()
            .ok_or("PUGs queue task was already started")?;
        let announcer = ChannelAnnouncer::new(ctx.http.clone(), data.settings.clone());
        service.run(announcer).await;
        Ok(())
    }
}
