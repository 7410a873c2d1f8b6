use crate::dates::{DateRange, ParseError, parse_calendar_date};
use crate::wire::{WireDay, WireErrorBody, WireGame, WireOdds, WireTeamEntry};
use crate::{DaySchedule, DoubleHeader, GameRecord, GameStatus, Odds, TeamRef};
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the schedule backend's `/schedule` endpoint.
#[derive(Debug, Clone)]
pub struct ScheduleApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    /// Non-2xx response; `message` is the backend's own error text, if any.
    Api { status: u16, message: Option<String>, url: String },
    Parsing(String, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api { status, message: Some(msg), url } => {
                write!(f, "API error {status} for {url}: {msg}")
            }
            ApiError::Api { status, message: None, url } => write!(f, "API error {status} for {url}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Text for the transient error notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message: Some(msg), .. } => {
                format!("An unexpected error occurred: {msg}")
            }
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

impl ScheduleApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client: Client::builder()
                .user_agent(concat!("mlbgrid/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn schedule_url(&self, range: DateRange, include_odds: bool) -> String {
        format!(
            "{}/schedule?startDate={}&endDate={}&includeOdds={include_odds}",
            self.base_url,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
        )
    }

    /// Fetch every day in `range`. Days come back in the order the backend
    /// sent them; aligning them to the range is the normalizer's job.
    pub async fn fetch_schedule(
        &self,
        range: DateRange,
        include_odds: bool,
    ) -> ApiResult<Vec<DaySchedule>> {
        let url = self.schedule_url(range, include_odds);
        let body = self.get_text(&url).await?;
        let raw: Vec<WireDay> =
            serde_json::from_str(&body).map_err(|e| ApiError::Parsing(e.to_string(), url.clone()))?;
        raw.into_iter()
            .map(map_day)
            .collect::<Result<Vec<_>, ParseError>>()
            .map_err(|e| ApiError::Parsing(e.to_string(), url))
    }

    async fn get_text(&self, url: &str) -> ApiResult<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        if status.is_success() {
            Ok(body)
        } else {
            let message = serde_json::from_str::<WireErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty());
            Err(ApiError::Api { status: status.as_u16(), message, url: url.to_owned() })
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_day(raw: WireDay) -> Result<DaySchedule, ParseError> {
    let date = parse_calendar_date(&raw.date)?;
    let games = raw.games.into_iter().map(|g| map_game(g, date)).collect();
    Ok(DaySchedule { date, games })
}

fn map_game(raw: WireGame, day: NaiveDate) -> GameRecord {
    // officialDate is the day the game counts for; fall back to the
    // enclosing day when it is missing or malformed.
    let date = raw
        .official_date
        .as_deref()
        .and_then(|d| parse_calendar_date(d).ok())
        .unwrap_or(day);

    let start_time = raw
        .game_date
        .as_deref()
        .and_then(|d| chrono::DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let status = raw
        .status
        .and_then(|s| s.detailed_state)
        .map(|s| GameStatus::from_detailed_state(&s))
        .unwrap_or_default();

    let teams = raw.teams.unwrap_or_default();
    let home = map_team(teams.home);
    let away = map_team(teams.away);

    let odds = raw
        .odds
        .filter(|entries| !entries.is_empty())
        .map(|entries| map_odds(&entries, &home.name, &away.name));

    GameRecord {
        date,
        start_time,
        status,
        double_header: DoubleHeader::from_flag(raw.double_header.as_deref()),
        venue: raw.venue.and_then(|v| v.name),
        odds,
        home,
        away,
    }
}

fn map_team(entry: Option<WireTeamEntry>) -> TeamRef {
    let entry = entry.unwrap_or_default();
    let team = entry.team.unwrap_or_default();
    TeamRef {
        id: team.id,
        name: team.name.unwrap_or_default(),
        probable_pitcher: entry
            .probable_pitcher
            .and_then(|p| p.full_name)
            .filter(|n| !n.trim().is_empty()),
    }
}

/// Assign each `{name, price}` entry to the side whose team name it carries.
/// First entry per side wins.
fn map_odds(entries: &[WireOdds], home: &str, away: &str) -> Odds {
    let mut odds = Odds::default();
    for entry in entries {
        let price = entry.price.round() as i32;
        if entry.name == home && odds.home.is_none() {
            odds.home = Some(price);
        } else if entry.name == away && odds.away.is_none() {
            odds.away = Some(price);
        }
    }
    odds
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const WEEK_JSON: &str = r#"[
        {
            "date": "2023-04-03",
            "games": [
                {
                    "officialDate": "2023-04-03",
                    "gameDate": "2023-04-03T23:10:00Z",
                    "status": { "detailedState": "Final" },
                    "teams": {
                        "away": {
                            "team": { "id": 147, "name": "New York Yankees" },
                            "probablePitcher": { "id": 543037, "fullName": "Gerrit Cole" }
                        },
                        "home": { "team": { "id": 111, "name": "Boston Red Sox" } }
                    },
                    "venue": { "id": 3, "name": "Fenway Park" },
                    "doubleHeader": "N",
                    "odds": [
                        { "name": "Boston Red Sox", "price": 120 },
                        { "name": "New York Yankees", "price": -140 }
                    ]
                }
            ]
        },
        { "date": "2023-04-04", "games": [] }
    ]"#;

    fn range() -> DateRange {
        DateRange::parse("2023-04-03;2023-04-04").unwrap()
    }

    #[test]
    fn schedule_url_carries_range_and_odds_flag() {
        let api = ScheduleApi::new("http://localhost:8080/");
        assert_eq!(
            api.schedule_url(range(), true),
            "http://localhost:8080/schedule?startDate=2023-04-03&endDate=2023-04-04&includeOdds=true"
        );
        assert!(api.schedule_url(range(), false).ends_with("includeOdds=false"));
    }

    #[test]
    fn maps_wire_game_to_domain() {
        let raw: Vec<WireDay> = serde_json::from_str(WEEK_JSON).unwrap();
        let days: Vec<DaySchedule> = raw.into_iter().map(map_day).collect::<Result<_, _>>().unwrap();
        assert_eq!(days.len(), 2);
        assert!(days[1].games.is_empty());

        let game = &days[0].games[0];
        assert_eq!(game.home.name, "Boston Red Sox");
        assert_eq!(game.home.id, Some(111));
        assert_eq!(game.away.probable_pitcher.as_deref(), Some("Gerrit Cole"));
        assert_eq!(game.status, GameStatus::Final);
        assert_eq!(game.double_header, DoubleHeader::No);
        assert_eq!(game.venue.as_deref(), Some("Fenway Park"));
        assert_eq!(game.odds, Some(Odds { home: Some(120), away: Some(-140) }));
        assert!(game.start_time.is_some());
    }

    #[test]
    fn odds_entries_match_by_name_not_position() {
        let entries = vec![
            WireOdds { name: "Away Club".into(), price: -105.0 },
            WireOdds { name: "Home Club".into(), price: -115.0 },
            WireOdds { name: "Home Club".into(), price: 999.0 },
        ];
        let odds = map_odds(&entries, "Home Club", "Away Club");
        assert_eq!(odds, Odds { home: Some(-115), away: Some(-105) });
    }

    #[test]
    fn game_without_official_date_uses_enclosing_day() {
        let raw = WireGame { double_header: Some("Y".into()), ..Default::default() };
        let day = parse_calendar_date("2023-07-04").unwrap();
        let game = map_game(raw, day);
        assert_eq!(game.date, day);
        assert_eq!(game.double_header, DoubleHeader::Traditional);
        assert_eq!(game.status, GameStatus::Scheduled);
        assert!(game.odds.is_none());
    }

    #[test]
    fn malformed_day_date_is_a_parse_error() {
        let raw = WireDay { date: "04/03/2023".into(), games: vec![] };
        assert!(map_day(raw).is_err());
    }

    #[test]
    fn user_message_uses_backend_message() {
        let err = ApiError::Api {
            status: 400,
            message: Some("startDate is required".into()),
            url: "u".into(),
        };
        assert_eq!(err.user_message(), "An unexpected error occurred: startDate is required");
        let err = ApiError::Api { status: 502, message: None, url: "u".into() };
        assert_eq!(err.user_message(), "An unexpected error occurred.");
    }

    #[tokio::test]
    async fn fetch_schedule_requests_range_and_decodes_days() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/schedule")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("startDate".into(), "2023-04-03".into()),
                Matcher::UrlEncoded("endDate".into(), "2023-04-04".into()),
                Matcher::UrlEncoded("includeOdds".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(WEEK_JSON)
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url());
        let days = api.fetch_schedule(range(), true).await.unwrap();

        mock.assert_async().await;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].games[0].away.name, "New York Yankees");
    }

    #[tokio::test]
    async fn fetch_schedule_surfaces_backend_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/schedule")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"upstream timeout"}"#)
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url());
        let err = api.fetch_schedule(range(), false).await.unwrap_err();

        match &err {
            ApiError::Api { status, message, .. } => {
                assert_eq!(*status, 500);
                assert_eq!(message.as_deref(), Some("upstream timeout"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(err.user_message(), "An unexpected error occurred: upstream timeout");
    }

    #[tokio::test]
    async fn fetch_schedule_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/schedule")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url());
        let err = api.fetch_schedule(range(), false).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(_, _)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let api = ScheduleApi::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
        let err = api.fetch_schedule(range(), false).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_, _)), "got {err:?}");
        assert_eq!(err.user_message(), "An unexpected error occurred.");
    }
}
