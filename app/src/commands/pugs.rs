use super::{embed_color, say, send_embed};
use crate::pugs::{render, JoinOutcome, ListOutcome, Player, QuitOutcome};
use crate::{Data, Error};
use poise::serenity_prelude::{self as serenity, CreateEmbed};
use tracing::info;

const GUIDE: &str = "!pugs join -> Join Pugs\n\n\
    !pugs quit -> Quit Pugs\n\n\
    !pugs list -> List all currently signed up players\n\n\
    !pugs rules -> Get the format and rules of our PUGs\n\n\
    You are removed from the PUGs list an hour after signing up.\n\n\
    Everyone on the list will be pinged once 10 players sign up.";

const RULES: &str = "- 2 captains have to be picked\n\
    - The captains join the pick room\n\n\
    - The captains decide on sides\n\n\
    - Captain A picks 1 player\n\
    - Captain B picks 1 player\n\
    - Captain A picks 2 players\n\
    - Captain B picks 2 players\n\
    - Captain A picks 2 players\n\
    - Captain B picks 2 players\n\
    - Captain A picks the gamemode\n\
    - Captain B picks a map";

pub async fn help(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    let embed = CreateEmbed::new()
        .title("Saltwater Showdown PUGs Bot Guide")
        .color(embed_color(data).await)
        .description(GUIDE);
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

pub async fn rules(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    let embed = CreateEmbed::new()
        .title("**How to PUG**")
        .color(embed_color(data).await)
        .description(RULES);
    send_embed(ctx, msg.channel_id, embed).await;
    Ok(())
}

pub async fn join(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    let player = Player::new(msg.author.id, msg.author.name.clone());
    let reply = match data.pugs.join(player).await? {
        JoinOutcome::AlreadySignedUp => "You are already signed up for PUGs!",
        JoinOutcome::Joined { position } => {
            info!("{} signed up for PUGs ({} total)", msg.author.name, position);
            "You are now signed up for PUGs!"
        }
        JoinOutcome::Full(_) => {
            info!("{} filled the PUGs roster", msg.author.name);
            "You are now signed up for PUGs!"
        }
    };
    say(ctx, msg.channel_id, reply).await;
    Ok(())
}

pub async fn quit(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    let reply = match data.pugs.quit(msg.author.id).await? {
        QuitOutcome::Removed => "You have been removed from the PUGs list!",
        QuitOutcome::NotSignedUp => "You are not signed up for PUGs!",
    };
    say(ctx, msg.channel_id, reply).await;
    Ok(())
}

pub async fn list(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) -> Result<(), Error> {
    match data.pugs.list().await? {
        ListOutcome::Empty => say(ctx, msg.channel_id, render::EMPTY_ROSTER).await,
        ListOutcome::Players(names) => {
            let embed = CreateEmbed::new()
                .title("PUGs Player List")
                .color(embed_color(data).await)
                .description(render::roster_listing(&names));
            send_embed(ctx, msg.channel_id, embed).await;
        }
    }
    Ok(())
}
