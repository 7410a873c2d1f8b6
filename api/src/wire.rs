//! Serde shapes of the backend's `/schedule` response. client.rs maps them
//! onto the domain types.

use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireDay {
    pub date: String,
    #[serde(default)]
    pub games: Vec<WireGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireGame {
    pub official_date: Option<String>,
    pub game_date: Option<String>, // ISO 8601 start instant
    pub status: Option<WireStatus>,
    pub teams: Option<WireTeams>,
    pub venue: Option<WireVenue>,
    pub double_header: Option<String>, // "Y" | "N" | "S"
    /// Only present when the request asked for odds.
    pub odds: Option<Vec<WireOdds>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireStatus {
    pub detailed_state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeams {
    pub home: Option<WireTeamEntry>,
    pub away: Option<WireTeamEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTeamEntry {
    pub team: Option<WireTeam>,
    pub probable_pitcher: Option<WirePitcher>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub id: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePitcher {
    pub id: Option<u32>,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireVenue {
    pub id: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireOdds {
    pub name: String,
    pub price: f64,
}

/// Error payload the backend sends with non-2xx responses.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireErrorBody {
    pub message: Option<String>,
}
