use super::queue::Player;

pub const EMPTY_ROSTER: &str = "No players are currently signed up for PUGs.";

pub fn start_announcement(roster: &[Player]) -> String {
    let mut content = String::from("**PUGs are starting!**\n\n");
    for player in roster {
        content.push_str(&player.mention());
        content.push('\n');
    }
    content
}

pub fn expiry_announcement(player: &Player) -> String {
    format!("Removed {} from the PUGs list!", player.mention())
}

/// Body of the `!pugs list` embed, one name per line.
pub fn roster_listing(names: &[String]) -> String {
    names.iter().fold(String::new(), |mut acc, name| {
        acc.push_str(name);
        acc.push('\n');
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude::UserId;

    #[test]
    fn start_announcement_mentions_everyone_in_order() {
        let roster = vec![
            Player::new(UserId::new(1), "A"),
            Player::new(UserId::new(2), ""),
        ];
        assert_eq!(
            start_announcement(&roster),
            "**PUGs are starting!**\n\n<@1>\n<@2>\n"
        );
    }

    #[test]
    fn expiry_announcement_uses_mention() {
        let player = Player::new(UserId::new(5), "E");
        assert_eq!(expiry_announcement(&player), "Removed <@5> from the PUGs list!");
    }

    #[test]
    fn listing_never_leaks_placeholders() {
        let names = vec![
            Player::new(UserId::new(1), "undefined").display_name(),
            "B".to_string(),
        ];
        let listing = roster_listing(&names);
        assert_eq!(listing, "<@1>\nB\n");
        assert!(!listing.contains("undefined"));
    }
}
