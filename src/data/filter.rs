use std::collections::HashSet;

use super::model::{CricketDataset, MatchRecord};

// ---------------------------------------------------------------------------
// Filter selection: one value per sidebar selector
// ---------------------------------------------------------------------------

/// The active sidebar selection.  `season` is `None` only before a dataset is
/// loaded; for the other three selectors `None` means "All" (no constraint).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub season: Option<String>,
    pub team: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
}

impl FilterSelection {
    /// Season-only selection with every other filter set to "All".
    pub fn for_season(season: &str) -> Self {
        FilterSelection {
            season: Some(season.to_string()),
            ..FilterSelection::default()
        }
    }

    /// Whether a match passes every active predicate.
    ///
    /// A match passes when:
    /// * its season equals the selected season (no season → nothing passes)
    /// * the selected team appears as either `team1` or `team2`
    /// * city and venue match exactly, when set
    fn accepts(&self, m: &MatchRecord) -> bool {
        let Some(season) = &self.season else {
            return false;
        };
        if m.season != *season {
            return false;
        }
        if let Some(team) = &self.team {
            if m.team1 != *team && m.team2 != *team {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if m.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }
        if let Some(venue) = &self.venue {
            if m.venue != *venue {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of matches that pass the current selection.
pub fn filtered_matches(dataset: &CricketDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .matches
        .iter()
        .enumerate()
        .filter(|(_, m)| selection.accepts(m))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of deliveries belonging to the given matches.
pub fn filtered_deliveries(dataset: &CricketDataset, match_indices: &[usize]) -> Vec<usize> {
    let ids: HashSet<i64> = match_indices
        .iter()
        .map(|&i| dataset.matches[i].id)
        .collect();

    dataset
        .deliveries
        .iter()
        .enumerate()
        .filter(|(_, d)| ids.contains(&d.match_id))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DeliveryRecord;

    fn m(id: i64, season: &str, team1: &str, team2: &str, city: Option<&str>, venue: &str) -> MatchRecord {
        MatchRecord {
            id,
            season: season.to_string(),
            team1: team1.to_string(),
            team2: team2.to_string(),
            city: city.map(str::to_string),
            venue: venue.to_string(),
        }
    }

    fn d(match_id: i64, over: u32, batter: &str, bowler: &str, runs: u32) -> DeliveryRecord {
        DeliveryRecord {
            match_id,
            over,
            batter: batter.to_string(),
            bowler: bowler.to_string(),
            batsman_runs: runs,
            total_runs: runs,
            player_dismissed: None,
        }
    }

    fn dataset() -> CricketDataset {
        CricketDataset::from_tables(
            vec![
                m(1, "2019", "Mumbai Indians", "Chennai Super Kings", Some("Mumbai"), "Wankhede Stadium"),
                m(2, "2019", "Delhi Capitals", "Mumbai Indians", Some("Delhi"), "Arun Jaitley Ground"),
                m(3, "2018", "Chennai Super Kings", "Delhi Capitals", None, "M. A. Chidambaram Stadium"),
            ],
            vec![
                d(1, 1, "RG Sharma", "DL Chahar", 4),
                d(2, 1, "SS Iyer", "JJ Bumrah", 1),
                d(3, 1, "MS Dhoni", "K Rabada", 6),
                // Dangling match id: must never survive filtering.
                d(99, 1, "Nobody", "No-one", 2),
            ],
        )
    }

    #[test]
    fn season_is_required() {
        let ds = dataset();
        assert!(filtered_matches(&ds, &FilterSelection::default()).is_empty());
        assert_eq!(filtered_matches(&ds, &FilterSelection::for_season("2019")), vec![0, 1]);
    }

    #[test]
    fn team_matches_either_side() {
        let ds = dataset();
        let mut sel = FilterSelection::for_season("2019");
        sel.team = Some("Mumbai Indians".to_string());
        assert_eq!(filtered_matches(&ds, &sel), vec![0, 1]);

        sel.team = Some("Chennai Super Kings".to_string());
        assert_eq!(filtered_matches(&ds, &sel), vec![0]);
    }

    #[test]
    fn city_and_venue_are_exact() {
        let ds = dataset();
        let mut sel = FilterSelection::for_season("2019");
        sel.city = Some("Delhi".to_string());
        assert_eq!(filtered_matches(&ds, &sel), vec![1]);

        sel.city = None;
        sel.venue = Some("Wankhede Stadium".to_string());
        assert_eq!(filtered_matches(&ds, &sel), vec![0]);
    }

    #[test]
    fn missing_city_never_matches_a_city_filter() {
        let ds = dataset();
        let mut sel = FilterSelection::for_season("2018");
        sel.city = Some("Chennai".to_string());
        assert!(filtered_matches(&ds, &sel).is_empty());
    }

    #[test]
    fn impossible_combination_yields_empty() {
        let ds = dataset();
        let mut sel = FilterSelection::for_season("2018");
        sel.team = Some("Mumbai Indians".to_string());
        assert!(filtered_matches(&ds, &sel).is_empty());
    }

    #[test]
    fn delivery_ids_are_a_subset_of_match_ids() {
        let ds = dataset();
        for season in &ds.seasons {
            let matches = filtered_matches(&ds, &FilterSelection::for_season(season));
            let match_ids: HashSet<i64> = matches.iter().map(|&i| ds.matches[i].id).collect();
            let deliveries = filtered_deliveries(&ds, &matches);
            assert!(deliveries
                .iter()
                .all(|&i| match_ids.contains(&ds.deliveries[i].match_id)));
        }
    }

    #[test]
    fn dangling_delivery_is_dropped() {
        let ds = dataset();
        let all: Vec<usize> = (0..ds.match_count()).collect();
        let deliveries = filtered_deliveries(&ds, &all);
        assert_eq!(deliveries, vec![0, 1, 2]);
    }
}
