use super::{embed_color, say, send_embed};
use crate::stats::{StatsQuery, NO_MESSAGE};
use crate::{Data, Error};
use poise::serenity_prelude::{self as serenity, CreateEmbed};
use tracing::error;

const PSTATS_USAGE: &str = "```!pstats usage: <Player Name> [Hero Name]```";
const TSTATS_USAGE: &str = "```!tstats usage: <Team Name> [Map Name] -- Replace spaces with \"_\"```";
const COMPARE_USAGE: &str = "Usage: !compareStats <Player 1> <Player 2>";

/// Names are passed with underscores in place of spaces; show them readable.
pub fn spaced(name: &str) -> String {
    name.replace('_', " ")
}

async fn lookup(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    title: String,
    query: StatsQuery<'_>,
) -> Result<(), Error> {
    let description = match data.stats.fetch_message(query).await {
        Ok(message) => message.unwrap_or_else(|| NO_MESSAGE.to_string()),
        Err(e) => {
            error!("Stats lookup for {} failed: {}", title, e);
            say(ctx, msg.channel_id, "The stats service is unavailable right now.").await;
            return Ok(());
        }
    };

    let embed = CreateEmbed::new()
        .title(title)
        .color(embed_color(data).await)
        .description(description);
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

pub async fn player_stats(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    args: &[&str],
) -> Result<(), Error> {
    let Some(&player) = args.first() else {
        say(ctx, msg.channel_id, PSTATS_USAGE).await;
        return Ok(());
    };
    let hero = args.get(1).copied();
    let title = match hero {
        Some(hero) => format!("{player} on {hero}"),
        None => player.to_string(),
    };
    lookup(ctx, msg, data, title, StatsQuery::Player { player, hero }).await
}

pub async fn team_stats(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    args: &[&str],
) -> Result<(), Error> {
    let Some(&team) = args.first() else {
        say(ctx, msg.channel_id, TSTATS_USAGE).await;
        return Ok(());
    };
    let map = args.get(1).copied();
    let title = match map {
        Some(map) => format!("{} on {}", spaced(team), spaced(map)),
        None => spaced(team),
    };
    lookup(ctx, msg, data, title, StatsQuery::Team { team, map }).await
}

pub async fn compare_stats(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    args: &[&str],
) -> Result<(), Error> {
    let &[first, second] = args else {
        say(ctx, msg.channel_id, COMPARE_USAGE).await;
        return Ok(());
    };

    match data.stats.fetch_message(StatsQuery::Compare { first, second }).await {
        Ok(message) => {
            let body = message.unwrap_or_else(|| NO_MESSAGE.to_string());
            say(ctx, msg.channel_id, format!("```{body}```")).await;
        }
        Err(e) => {
            error!("Comparing {} and {} failed: {}", first, second, e);
            say(ctx, msg.channel_id, "The stats service is unavailable right now.").await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscores_become_spaces() {
        assert_eq!(spaced("Salt_Water_Lords"), "Salt Water Lords");
        assert_eq!(spaced("Ilios"), "Ilios");
    }
}
