use super::{embed_color, send_embed};
use crate::{Data, Error};
use poise::serenity_prelude::{self as serenity, CreateEmbed, CreateEmbedAuthor};
use tracing::warn;

const STATIC_REPLIES: &[(&[&str], &str)] = &[
    (&["rules", "rulebook"], "Insert rulebook"),
    (&["dates", "schedule"], "Insert schedule"),
    (&["standings"], "Insert standings link"),
    (&["signup"], "Insert signup form"),
    (&["report"], "Insert report form"),
    (&["appeal"], "Insert appeal form"),
    (&["staff"], "Insert list of all staff"),
    (&["socials"], "Insert links to all socials"),
    (&["twitch"], "Insert twitch link"),
    (&["twitter"], "Insert twitter link"),
    (&["tiktok"], "Insert tiktok link"),
    (&["youtube"], "Insert youtube link"),
    (&["clip"], "Insert clip submission form"),
    (&["goat"], "```Bendix.```"),
];

const COMMANDS: &str = "Commands:\n\n\
    !help / !commands: Lists all available bot commands\n\
    !pugs help: Lists all available pugs commands\n\
    !comparestats <Player 1 OW Name> <Player 2 OW Name>: Compares two players\n\
    !tstats <Team> (optional: <Map>): Returns team stats -- Spaces replaced by underscore\n\
    !pstats <Player OW Name> (optional: <Hero>): Returns player stats -- Spaces replaced by underscore\n\n\
    !rules / !rulebook\n\
    !dates / !schedule\n\
    !standings\n\
    !report\n\
    !appeal\n\
    !socials\n\n\
    If any questions persist, please feel free to contact our server staff.";

const ADMIN_COMMANDS: &str = "Commands:\n\n\
    !setLogChannel\n\
    !setPugsChannel\n\
    !setEmbedColor <Hexcode without #>\n\
    !updateLeaderboards\n\
    !addAdmin\n\n\
    !createMatch [Team1] [Team2] [0 / 1 if GF] -> spits out matchID REPLACE SPACE WITH UNDERSCORE\n\
    !uploadMap [matchID] [Map] [Winner] REPLACE SPACE WITH UNDERSCORE";

/// Fixed text answer for informational commands, matched case-insensitively.
pub fn static_reply(name: &str) -> Option<&'static str> {
    STATIC_REPLIES
        .iter()
        .find(|(names, _)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
        .map(|(_, reply)| *reply)
}

/// Help embeds carry the bot owner as author when one is configured.
async fn owner_embed(ctx: &serenity::Context, data: &Data) -> CreateEmbed {
    let embed = CreateEmbed::new().color(embed_color(data).await);
    let Some(owner_id) = data.config.owner_id else {
        return embed;
    };
    match owner_id.to_user(ctx).await {
        Ok(owner) => embed.author(CreateEmbedAuthor::new(&owner.name).icon_url(owner.face())),
        Err(e) => {
            warn!("Could not fetch bot owner {}: {}", owner_id, e);
            embed
        }
    }
}

pub async fn help(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    let embed = owner_embed(ctx, data)
        .await
        .title("Bot Commands")
        .description(COMMANDS);
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

pub async fn admin_help(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let embed = owner_embed(ctx, data)
        .await
        .title("Admin Commands")
        .description(ADMIN_COMMANDS);
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

pub async fn unknown(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    let embed = owner_embed(ctx, data)
        .await
        .description("Use !help or !commands for a list of commands.");
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_share_a_reply() {
        assert_eq!(static_reply("rules"), Some("Insert rulebook"));
        assert_eq!(static_reply("rulebook"), Some("Insert rulebook"));
        assert_eq!(static_reply("Schedule"), Some("Insert schedule"));
        assert_eq!(static_reply("goat"), Some("```Bendix.```"));
    }

    #[test]
    fn unknown_names_have_no_reply() {
        assert_eq!(static_reply("pugs"), None);
        assert_eq!(static_reply(""), None);
    }
}
