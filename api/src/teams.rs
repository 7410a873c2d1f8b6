/// Known MLB clubs in display order, with the abbreviation shown in the grid.
const MLB_TEAMS: [(&str, &str); 30] = [
    ("Arizona Diamondbacks", "ARI"),
    ("Atlanta Braves", "ATL"),
    ("Baltimore Orioles", "BAL"),
    ("Boston Red Sox", "BOS"),
    ("Chicago Cubs", "CHC"),
    ("Chicago White Sox", "CWS"),
    ("Cincinnati Reds", "CIN"),
    ("Cleveland Guardians", "CLE"),
    ("Colorado Rockies", "COL"),
    ("Detroit Tigers", "DET"),
    ("Houston Astros", "HOU"),
    ("Kansas City Royals", "KC"),
    ("Los Angeles Angels", "LAA"),
    ("Los Angeles Dodgers", "LAD"),
    ("Miami Marlins", "MIA"),
    ("Milwaukee Brewers", "MIL"),
    ("Minnesota Twins", "MIN"),
    ("New York Mets", "NYM"),
    ("New York Yankees", "NYY"),
    ("Oakland Athletics", "OAK"),
    ("Philadelphia Phillies", "PHI"),
    ("Pittsburgh Pirates", "PIT"),
    ("San Diego Padres", "SD"),
    ("San Francisco Giants", "SF"),
    ("Seattle Mariners", "SEA"),
    ("St. Louis Cardinals", "STL"),
    ("Tampa Bay Rays", "TB"),
    ("Texas Rangers", "TEX"),
    ("Toronto Blue Jays", "TOR"),
    ("Washington Nationals", "WSH"),
];

/// Abbreviation for a full team name, or the name itself when it isn't a
/// known club.
pub fn abbreviation(team_name: &str) -> &str {
    MLB_TEAMS
        .iter()
        .find(|(name, _)| *name == team_name)
        .map(|(_, abbrev)| *abbrev)
        .unwrap_or(team_name)
}

/// The ordered set of teams a schedule is normalized against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = std::collections::HashSet::new();
        names.retain(|n| seen.insert(n.clone()));
        Self { names }
    }

    pub fn mlb() -> Self {
        Self::new(MLB_TEAMS.iter().map(|(name, _)| *name))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, team_name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == team_name)
    }

    pub fn contains(&self, team_name: &str) -> bool {
        self.position(team_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::mlb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mlb_roster_has_thirty_unique_clubs() {
        let roster = Roster::mlb();
        assert_eq!(roster.len(), 30);
        assert_eq!(roster.names()[0], "Arizona Diamondbacks");
        assert_eq!(roster.position("Boston Red Sox"), Some(3));
    }

    #[test]
    fn abbreviations_fall_back_to_name() {
        assert_eq!(abbreviation("Boston Red Sox"), "BOS");
        assert_eq!(abbreviation("St. Louis Cardinals"), "STL");
        assert_eq!(abbreviation("Springfield Isotopes"), "Springfield Isotopes");
    }

    #[test]
    fn custom_roster_drops_duplicates_and_keeps_order() {
        let roster = Roster::new(["Cubs", "Mets", "Cubs", "Red Sox"]);
        assert_eq!(roster.names(), ["Cubs", "Mets", "Red Sox"]);
        assert!(!roster.contains("Yankees"));
    }
}
