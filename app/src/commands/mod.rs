//! Text command routing. Every message starting with `!` maps to exactly one
//! `Command`; anything that does not match a known command becomes `Unknown`.

pub mod admin;
pub mod info;
pub mod pugs;
pub mod stats;

use crate::{Data, Error};
use poise::serenity_prelude::{self as serenity, CreateEmbed, CreateMessage};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    SetLogChannel,
    SetPugsChannel,
    SetEmbedColor(Option<&'a str>),
    AddAdmin(Option<&'a str>),
    PugsHelp,
    PugsRules,
    PugsJoin,
    PugsQuit,
    PugsList,
    PlayerStats(Vec<&'a str>),
    TeamStats(Vec<&'a str>),
    CompareStats(Vec<&'a str>),
    UploadMap(Vec<&'a str>),
    CreateMatch(Vec<&'a str>),
    UpdateLeaderboards,
    Help,
    AdminHelp,
    Info(&'static str),
    Unknown,
}

impl<'a> Command<'a> {
    pub fn parse(content: &'a str) -> Option<Self> {
        let mut words = content.split_whitespace();
        let name = words.next()?.strip_prefix('!')?;
        let args: Vec<&str> = words.collect();
        let is = |expected: &str| name.eq_ignore_ascii_case(expected);

        let command = if is("setLogChannel") {
            Command::SetLogChannel
        } else if is("setPugsChannel") {
            Command::SetPugsChannel
        } else if is("setEmbedColor") {
            Command::SetEmbedColor(args.first().copied())
        } else if is("addAdmin") {
            Command::AddAdmin(args.first().copied())
        } else if is("pugs") {
            match args.as_slice() {
                [] => Command::PugsHelp,
                [sub] => {
                    let sub = sub.to_ascii_lowercase();
                    match sub.as_str() {
                        "help" => Command::PugsHelp,
                        "rules" => Command::PugsRules,
                        "join" => Command::PugsJoin,
                        "quit" | "leave" => Command::PugsQuit,
                        "list" => Command::PugsList,
                        _ => Command::Unknown,
                    }
                }
                _ => Command::Unknown,
            }
        } else if is("pstats") {
            Command::PlayerStats(args)
        } else if is("tstats") {
            Command::TeamStats(args)
        } else if is("compareStats") {
            Command::CompareStats(args)
        } else if is("uploadMap") {
            Command::UploadMap(args)
        } else if is("createMatch") {
            Command::CreateMatch(args)
        } else if is("updateLeaderboards") {
            Command::UpdateLeaderboards
        } else if !args.is_empty() {
            Command::Unknown
        } else if is("help") || is("commands") {
            Command::Help
        } else if is("admin") {
            Command::AdminHelp
        } else {
            info::static_reply(name).map_or(Command::Unknown, Command::Info)
        };
        Some(command)
    }
}

pub async fn dispatch(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let Some(command) = Command::parse(&msg.content) else {
        return Ok(());
    };
    debug!("{} invoked {:?} in {}", msg.author.name, command, msg.channel_id);

    match command {
        Command::SetLogChannel => admin::set_log_channel(ctx, msg, data).await,
        Command::SetPugsChannel => admin::set_pugs_channel(ctx, msg, data).await,
        Command::SetEmbedColor(color) => admin::set_embed_color(ctx, msg, data, color).await,
        Command::AddAdmin(user) => admin::add_admin(ctx, msg, data, user).await,
        Command::PugsHelp => pugs::help(ctx, msg, data).await,
        Command::PugsRules => pugs::rules(ctx, msg, data).await,
        Command::PugsJoin => pugs::join(ctx, msg, data).await,
        Command::PugsQuit => pugs::quit(ctx, msg, data).await,
        Command::PugsList => pugs::list(ctx, msg, data).await,
        Command::PlayerStats(args) => stats::player_stats(ctx, msg, data, &args).await,
        Command::TeamStats(args) => stats::team_stats(ctx, msg, data, &args).await,
        Command::CompareStats(args) => stats::compare_stats(ctx, msg, data, &args).await,
        Command::UploadMap(args) => admin::upload_map(ctx, msg, data, &args).await,
        Command::CreateMatch(args) => admin::create_match(ctx, msg, data, &args).await,
        Command::UpdateLeaderboards => admin::update_leaderboards(ctx, msg, data).await,
        Command::Help => info::help(ctx, msg, data).await,
        Command::AdminHelp => info::admin_help(ctx, msg, data).await,
        Command::Info(reply) => {
            say(ctx, msg.channel_id, reply).await;
            Ok(())
        }
        Command::Unknown => info::unknown(ctx, msg, data).await,
    }
}

/// Best-effort plain text reply.
pub async fn say(ctx: &serenity::Context, channel: serenity::ChannelId, content: impl Into<String>) {
    if let Err(e) = channel.say(ctx, content).await {
        error!("Failed to send message to {}: {}", channel, e);
    }
}

/// Best-effort embed reply.
pub async fn send_embed(ctx: &serenity::Context, channel: serenity::ChannelId, embed: CreateEmbed) {
    if let Err(e) = channel
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await
    {
        error!("Failed to send embed to {}: {}", channel, e);
    }
}

pub async fn embed_color(data: &Data) -> serenity::Color {
    data.settings.read().await.embed_color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_plain_chat() {
        assert_eq!(Command::parse("hello there"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn pugs_subcommands() {
        assert_eq!(Command::parse("!pugs"), Some(Command::PugsHelp));
        assert_eq!(Command::parse("!pugs help"), Some(Command::PugsHelp));
        assert_eq!(Command::parse("!pugs join"), Some(Command::PugsJoin));
        assert_eq!(Command::parse("!pugs quit"), Some(Command::PugsQuit));
        assert_eq!(Command::parse("!pugs leave"), Some(Command::PugsQuit));
        assert_eq!(Command::parse("!pugs list"), Some(Command::PugsList));
        assert_eq!(Command::parse("!pugs rules"), Some(Command::PugsRules));
        assert_eq!(Command::parse("!pugs join now"), Some(Command::Unknown));
        assert_eq!(Command::parse("!pugs JOIN"), Some(Command::PugsJoin));
        assert_eq!(Command::parse("!PUGS Leave"), Some(Command::PugsQuit));
        assert_eq!(Command::parse("!pugs dance"), Some(Command::Unknown));
    }

    #[test]
    fn admin_commands_take_arguments() {
        assert_eq!(
            Command::parse("!setEmbedColor ff00aa"),
            Some(Command::SetEmbedColor(Some("ff00aa")))
        );
        assert_eq!(Command::parse("!setEmbedColor"), Some(Command::SetEmbedColor(None)));
        assert_eq!(
            Command::parse("!addAdmin <@42>"),
            Some(Command::AddAdmin(Some("<@42>")))
        );
        assert_eq!(Command::parse("!setPugsChannel"), Some(Command::SetPugsChannel));
    }

    #[test]
    fn command_names_ignore_case() {
        assert_eq!(
            Command::parse("!comparestats a b"),
            Some(Command::CompareStats(vec!["a", "b"]))
        );
        assert_eq!(
            Command::parse("!compareStats a b"),
            Some(Command::CompareStats(vec!["a", "b"]))
        );
    }

    #[test]
    fn stats_arguments_are_whitespace_split() {
        assert_eq!(
            Command::parse("!pstats  Bendix   Ana"),
            Some(Command::PlayerStats(vec!["Bendix", "Ana"]))
        );
        assert_eq!(Command::parse("!tstats"), Some(Command::TeamStats(vec![])));
    }

    #[test]
    fn static_and_unknown_commands() {
        assert_eq!(Command::parse("!help"), Some(Command::Help));
        assert_eq!(Command::parse("!commands"), Some(Command::Help));
        assert_eq!(Command::parse("!admin"), Some(Command::AdminHelp));
        assert!(matches!(Command::parse("!rulebook"), Some(Command::Info(_))));
        assert_eq!(Command::parse("!rules"), Command::parse("!rulebook"));
        assert_eq!(Command::parse("!help me"), Some(Command::Unknown));
        assert_eq!(Command::parse("!nonsense"), Some(Command::Unknown));
    }
}
