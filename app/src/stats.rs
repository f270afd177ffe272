use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::BotError;

const API_TIMEOUT: Duration = Duration::from_secs(30);
pub const NO_MESSAGE: &str = "No data message found";

/// One request against the stats service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsQuery<'a> {
    Player {
        player: &'a str,
        hero: Option<&'a str>,
    },
    Team {
        team: &'a str,
        map: Option<&'a str>,
    },
    Compare {
        first: &'a str,
        second: &'a str,
    },
    CreateMatch {
        team1: &'a str,
        team2: &'a str,
        grand_finals: Option<&'a str>,
    },
    UploadMap {
        match_id: &'a str,
        map: &'a str,
        winner: &'a str,
        file_name: &'a str,
    },
    UpdateLeaderboards,
}

impl<'a> StatsQuery<'a> {
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatsQuery::Player { hero: None, .. } => "/pStats",
            StatsQuery::Player { hero: Some(_), .. } => "/hStats",
            StatsQuery::Team { map: None, .. } => "/tStats",
            StatsQuery::Team { map: Some(_), .. } => "/tmStats",
            StatsQuery::Compare { .. } => "/compareStats",
            StatsQuery::CreateMatch { .. } => "/createMatch",
            StatsQuery::UploadMap { .. } => "/uploadMap",
            StatsQuery::UpdateLeaderboards => "/updateLeaderboards",
        }
    }

    pub fn params(&self) -> Vec<(&'static str, &'a str)> {
        match *self {
            StatsQuery::Player { player, hero } => {
                let mut params = vec![("player", player)];
                params.extend(hero.map(|hero| ("hero", hero)));
                params
            }
            StatsQuery::Team { team, map } => {
                let mut params = vec![("team", team)];
                params.extend(map.map(|map| ("map", map)));
                params
            }
            StatsQuery::Compare { first, second } => vec![("player1", first), ("player2", second)],
            StatsQuery::CreateMatch {
                team1,
                team2,
                grand_finals,
            } => {
                let mut params = vec![("team1", team1), ("team2", team2)];
                params.extend(grand_finals.map(|gf| ("grandfinals", gf)));
                params
            }
            StatsQuery::UploadMap {
                match_id,
                map,
                winner,
                file_name,
            } => vec![
                ("matchID", match_id),
                ("winner", winner),
                ("map", map),
                ("fileName", file_name),
            ],
            StatsQuery::UpdateLeaderboards => Vec::new(),
        }
    }

    /// Write operations treat a non-2xx status as a failure; lookups pass
    /// whatever body the service returns straight through.
    pub fn requires_success(&self) -> bool {
        matches!(
            self,
            StatsQuery::CreateMatch { .. }
                | StatsQuery::UploadMap { .. }
                | StatsQuery::UpdateLeaderboards
        )
    }
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: impl Into<String>) -> crate::error::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(API_TIMEOUT).build()?,
            base_url: base_url.into(),
        })
    }

    /// The underlying client, shared with attachment downloads.
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn url_for(&self, query: &StatsQuery<'_>) -> String {
        format!("{}{}", self.base_url, query.endpoint())
    }

    /// Returns the service's `message` field, or `None` when the body has none.
    pub async fn fetch_message(&self, query: StatsQuery<'_>) -> crate::error::Result<Option<String>> {
        let response = self
            .client
            .get(self.url_for(&query))
            .query(&query.params())
            .send()
            .await
            .map_err(BotError::Http)?;

        if query.requires_success() && !response.status().is_success() {
            return Err(BotError::StatsService(response.status()));
        }

        let body: StatsResponse = response.json().await.map_err(BotError::Http)?;
        Ok(body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_lookup_switches_endpoint_on_hero() {
        let overall = StatsQuery::Player {
            player: "Bendix",
            hero: None,
        };
        assert_eq!(overall.endpoint(), "/pStats");
        assert_eq!(overall.params(), vec![("player", "Bendix")]);

        let hero = StatsQuery::Player {
            player: "Bendix",
            hero: Some("Ana"),
        };
        assert_eq!(hero.endpoint(), "/hStats");
        assert_eq!(hero.params(), vec![("player", "Bendix"), ("hero", "Ana")]);
    }

    #[test]
    fn team_lookup_switches_endpoint_on_map() {
        let team = StatsQuery::Team {
            team: "Salt_Lords",
            map: None,
        };
        assert_eq!(team.endpoint(), "/tStats");

        let on_map = StatsQuery::Team {
            team: "Salt_Lords",
            map: Some("King's_Row"),
        };
        assert_eq!(on_map.endpoint(), "/tmStats");
        assert_eq!(
            on_map.params(),
            vec![("team", "Salt_Lords"), ("map", "King's_Row")]
        );
    }

    #[test]
    fn create_match_omits_missing_grand_finals() {
        let query = StatsQuery::CreateMatch {
            team1: "A",
            team2: "B",
            grand_finals: None,
        };
        assert_eq!(query.params(), vec![("team1", "A"), ("team2", "B")]);
        assert!(query.requires_success());
    }

    #[test]
    fn lookups_do_not_require_success() {
        assert!(!StatsQuery::Compare {
            first: "a",
            second: "b"
        }
        .requires_success());
        assert!(StatsQuery::UpdateLeaderboards.requires_success());
        assert!(StatsQuery::UpdateLeaderboards.params().is_empty());
    }

    #[test]
    fn urls_join_base_and_endpoint() {
        let client = StatsClient::new("http://localhost:8080").unwrap();
        let query = StatsQuery::UploadMap {
            match_id: "12",
            map: "Ilios",
            winner: "A",
            file_name: "log",
        };
        assert_eq!(client.url_for(&query), "http://localhost:8080/uploadMap");
        assert_eq!(
            query.params(),
            vec![
                ("matchID", "12"),
                ("winner", "A"),
                ("map", "Ilios"),
                ("fileName", "log")
            ]
        );
    }

    #[test]
    fn response_without_message_decodes() {
        let body: StatsResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(body.message.is_none());
        let body: StatsResponse = serde_json::from_str(r#"{"message":"42 kills"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("42 kills"));
    }
}
