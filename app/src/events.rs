use crate::commands::{self, send_embed};
use crate::{Data, Error};
use poise::serenity_prelude::{
    self as serenity, ActivityData, CreateEmbed, CreateEmbedAuthor, OnlineStatus,
};
use tracing::{error, info, warn};

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}!", data_about_bot.user.name);
            ctx.set_presence(
                Some(ActivityData::playing("!pugs join")),
                OnlineStatus::Online,
            );
            check_channels(ctx, data).await;
        }
        serenity::FullEvent::Message { new_message } => {
            if new_message.author.bot {
                return Ok(());
            }
            relay_to_log(ctx, new_message, data).await;
            if let Err(e) = commands::dispatch(ctx, new_message, data).await {
                error!(
                    "Command {:?} from {} failed: {}",
                    new_message.content, new_message.author.name, e
                );
            }
        }
        _ => {}
    }
    Ok(())
}

async fn check_channels(ctx: &serenity::Context, data: &Data) {
    let (log_channel, pugs_channel) = {
        let settings = data.settings.read().await;
        (settings.log_channel, settings.pugs_channel)
    };

    for (label, channel) in [("Log", log_channel), ("PUGs", pugs_channel)] {
        match channel {
            None => warn!("{} channel not configured", label),
            Some(id) => {
                if let Err(e) = id.to_channel(ctx).await {
                    error!("{} channel {} not found: {}", label, id, e);
                }
            }
        }
    }
}

/// Mirrors every human message into the log channel, when one is set.
async fn relay_to_log(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) {
    let (log_channel, color) = {
        let settings = data.settings.read().await;
        (settings.log_channel, settings.embed_color())
    };
    let Some(log_channel) = log_channel else {
        return;
    };

    let mut embed = CreateEmbed::new()
        .title(format!("<#{}>", msg.channel_id))
        .color(color)
        .author(CreateEmbedAuthor::new(&msg.author.name).icon_url(msg.author.face()))
        .timestamp(msg.timestamp);
    if !msg.content.is_empty() {
        embed = embed.description(&msg.content);
    }
    send_embed(ctx, log_channel, embed).await;
}
