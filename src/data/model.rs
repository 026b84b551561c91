use std::collections::BTreeSet;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// MatchRecord – one row of the match table
// ---------------------------------------------------------------------------

/// A single match. Columns beyond the modelled ones are ignored at load time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchRecord {
    /// Unique match identifier, referenced by deliveries.
    pub id: i64,
    /// Tournament edition, kept as text (real data mixes `2019` and `2007/08`).
    pub season: String,
    pub team1: String,
    pub team2: String,
    /// Missing in the source data for some venues.
    #[serde(default)]
    pub city: Option<String>,
    pub venue: String,
}

// ---------------------------------------------------------------------------
// DeliveryRecord – one row of the ball-by-ball table
// ---------------------------------------------------------------------------

/// A single bowled ball.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeliveryRecord {
    /// Foreign key into the match table.
    pub match_id: i64,
    pub over: u32,
    pub batter: String,
    pub bowler: String,
    /// Runs credited to the batter off this ball.
    pub batsman_runs: u32,
    /// Runs scored on this ball including extras.
    pub total_runs: u32,
    /// Name of the dismissed player, when the ball took a wicket.
    #[serde(default)]
    pub player_dismissed: Option<String>,
}

// ---------------------------------------------------------------------------
// CricketDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Both tables plus pre-computed selector option lists. Read-only after load;
/// filtering hands out index vectors instead of copying rows.
#[derive(Debug, Clone)]
pub struct CricketDataset {
    pub matches: Vec<MatchRecord>,
    pub deliveries: Vec<DeliveryRecord>,
    /// Sorted unique seasons.
    pub seasons: Vec<String>,
    /// Sorted union of `team1` and `team2`.
    pub teams: Vec<String>,
    /// Sorted unique cities; matches without a city contribute nothing.
    pub cities: Vec<String>,
    /// Sorted unique venues.
    pub venues: Vec<String>,
}

impl CricketDataset {
    /// Build the selector indices from the loaded tables.
    pub fn from_tables(matches: Vec<MatchRecord>, deliveries: Vec<DeliveryRecord>) -> Self {
        let mut seasons: BTreeSet<String> = BTreeSet::new();
        let mut teams: BTreeSet<String> = BTreeSet::new();
        let mut cities: BTreeSet<String> = BTreeSet::new();
        let mut venues: BTreeSet<String> = BTreeSet::new();

        for m in &matches {
            seasons.insert(m.season.clone());
            teams.insert(m.team1.clone());
            teams.insert(m.team2.clone());
            if let Some(city) = &m.city {
                cities.insert(city.clone());
            }
            venues.insert(m.venue.clone());
        }

        CricketDataset {
            matches,
            deliveries,
            seasons: seasons.into_iter().collect(),
            teams: teams.into_iter().collect(),
            cities: cities.into_iter().collect(),
            venues: venues.into_iter().collect(),
        }
    }

    /// Number of matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Number of deliveries.
    pub fn delivery_count(&self) -> usize {
        self.deliveries.len()
    }

    /// Whether the match table is empty.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
