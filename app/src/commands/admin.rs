use super::{embed_color, say, send_embed};
use crate::download::{download_file, text_attachment_target};
use crate::settings::parse_user_id;
use crate::stats::{StatsQuery, NO_MESSAGE};
use crate::{Data, Error};
use poise::serenity_prelude::{self as serenity, CreateEmbed, UserId};
use tracing::{error, info, warn};

const NO_PERMISSION: &str = "You don't have permission to perform this action";
const NOT_AUTHORIZED: &str = "You are not authorized to use this command.";

async fn is_allowed(data: &Data, user: UserId) -> bool {
    data.settings.read().await.is_user_allowed(user)
}

/// Replies with `denial` and returns `false` for users not on the allow-list.
async fn require_allowed(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    denial: &str,
) -> bool {
    if is_allowed(data, msg.author.id).await {
        return true;
    }
    warn!("{} ({}) was denied an admin command", msg.author.name, msg.author.id);
    say(ctx, msg.channel_id, denial).await;
    false
}

pub async fn set_log_channel(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NO_PERMISSION).await {
        return Ok(());
    }
    {
        let mut settings = data.settings.write().await;
        settings.set_log_channel(msg.channel_id);
        settings.save().await?;
    }
    info!("Log channel set to {}", msg.channel_id);
    Ok(())
}

pub async fn set_pugs_channel(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NO_PERMISSION).await {
        return Ok(());
    }
    {
        let mut settings = data.settings.write().await;
        settings.set_pugs_channel(msg.channel_id);
        settings.save().await?;
    }
    info!("PUGs channel set to {}", msg.channel_id);
    Ok(())
}

pub async fn set_embed_color(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    color: Option<&str>,
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NO_PERMISSION).await {
        return Ok(());
    }

    let color = {
        let mut settings = data.settings.write().await;
        let color = color.and_then(|raw| settings.set_embed_color(raw));
        if color.is_some() {
            settings.save().await?;
        }
        color
    };

    let Some(color) = color else {
        say(ctx, msg.channel_id, "Usage: !setEmbedColor <Hexcode without #>").await;
        return Ok(());
    };

    let embed = CreateEmbed::new()
        .title("**Title**")
        .color(color)
        .description("You changed the embed color! Good job pookiebear");
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

pub async fn add_admin(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    user: Option<&str>,
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NO_PERMISSION).await {
        return Ok(());
    }
    let Some(user_id) = user.and_then(parse_user_id) else {
        say(ctx, msg.channel_id, "Usage: !addAdmin <@user>").await;
        return Ok(());
    };

    {
        let mut settings = data.settings.write().await;
        if settings.add_allowed_user(user_id) {
            settings.save().await?;
            info!("{} added {} to the allow-list", msg.author.name, user_id);
        }
    }
    say(ctx, msg.channel_id, "Admin has been added").await;
    Ok(())
}

pub async fn create_match(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    args: &[&str],
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NOT_AUTHORIZED).await {
        return Ok(());
    }
    let (Some(&team1), Some(&team2)) = (args.first(), args.get(1)) else {
        say(
            ctx,
            msg.channel_id,
            "Usage: !createMatch <Team1> <Team2> [0 / 1 if GF]",
        )
        .await;
        return Ok(());
    };
    let query = StatsQuery::CreateMatch {
        team1,
        team2,
        grand_finals: args.get(2).copied(),
    };

    match data.stats.fetch_message(query).await {
        Ok(message) => say(ctx, msg.channel_id, message.unwrap_or_else(|| NO_MESSAGE.into())).await,
        Err(e) => {
            error!("Creating match {} vs {} failed: {}", team1, team2, e);
            say(ctx, msg.channel_id, "An error occurred while creating the match.").await;
        }
    }
    Ok(())
}

pub async fn update_leaderboards(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NOT_AUTHORIZED).await {
        return Ok(());
    }
    match data.stats.fetch_message(StatsQuery::UpdateLeaderboards).await {
        Ok(message) => say(ctx, msg.channel_id, message.unwrap_or_else(|| NO_MESSAGE.into())).await,
        Err(e) => {
            error!("Updating leaderboards failed: {}", e);
            say(ctx, msg.channel_id, "An error occured updating the leaderboards.").await;
        }
    }
    Ok(())
}

pub async fn upload_map(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    args: &[&str],
) -> Result<(), Error> {
    if !require_allowed(ctx, msg, data, NOT_AUTHORIZED).await {
        return Ok(());
    }
    let &[match_id, map, winner] = args else {
        say(ctx, msg.channel_id, "Usage: !uploadMap <matchID> <mapName> <winner>").await;
        return Ok(());
    };
    if msg.attachments.is_empty() {
        say(ctx, msg.channel_id, "Please attach a text file.").await;
        return Ok(());
    }

    for attachment in &msg.attachments {
        let Some((path, file_name)) =
            text_attachment_target(&data.config.upload_dir, &attachment.filename)
        else {
            say(ctx, msg.channel_id, "Only text files are allowed.").await;
            continue;
        };

        let result = async {
            download_file(data.stats.http(), &attachment.url, &path).await?;
            data.stats
                .fetch_message(StatsQuery::UploadMap {
                    match_id,
                    map,
                    winner,
                    file_name: &file_name,
                })
                .await
        }
        .await;

        match result {
            Ok(message) => say(ctx, msg.channel_id, message.unwrap_or_else(|| NO_MESSAGE.into())).await,
            Err(e) => {
                error!("Uploading {} for match {} failed: {}", attachment.filename, match_id, e);
                say(ctx, msg.channel_id, "An error occurred while processing the file.").await;
            }
        }
    }
    Ok(())
}
