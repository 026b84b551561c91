use crate::data::aggregate::{Insights, compute_insights};
use crate::data::filter::{FilterSelection, filtered_deliveries, filtered_matches};
use crate::data::model::{CricketDataset, DeliveryRecord, MatchRecord};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until both tables are in).
    pub dataset: Option<CricketDataset>,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// Indices of matches passing the current selection (cached).
    pub match_indices: Vec<usize>,

    /// Indices of deliveries belonging to those matches (cached).
    pub delivery_indices: Vec<usize>,

    /// Aggregated tables for the current selection; None while no matches pass.
    pub insights: Option<Insights>,

    /// Shown when the filtered match set is empty.
    pub warning: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Match table waiting for its delivery counterpart (or vice versa).
    pending_matches: Option<Vec<MatchRecord>>,
    pending_deliveries: Option<Vec<DeliveryRecord>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            match_indices: Vec::new(),
            delivery_indices: Vec::new(),
            insights: None,
            warning: None,
            status_message: None,
            pending_matches: None,
            pending_deliveries: None,
        }
    }
}

impl AppState {
    /// Ingest a complete dataset: select the first season and recompute.
    pub fn set_dataset(&mut self, dataset: CricketDataset) {
        self.selection = dataset
            .seasons
            .first()
            .map(|s| FilterSelection::for_season(s))
            .unwrap_or_default();
        self.dataset = Some(dataset);
        self.pending_matches = None;
        self.pending_deliveries = None;
        self.status_message = None;
        self.recompute();
    }

    /// Ingest a freshly loaded match table.  Builds the dataset when the
    /// delivery table is already around, otherwise parks the rows.
    pub fn set_matches(&mut self, matches: Vec<MatchRecord>) {
        let deliveries = self
            .dataset
            .take()
            .map(|ds| ds.deliveries)
            .or_else(|| self.pending_deliveries.take());
        match deliveries {
            Some(deliveries) => self.set_dataset(CricketDataset::from_tables(matches, deliveries)),
            None => {
                self.pending_matches = Some(matches);
                self.status_message =
                    Some("Match table loaded — now open the deliveries table.".to_string());
            }
        }
    }

    /// Ingest a freshly loaded delivery table.  Counterpart of [`Self::set_matches`].
    pub fn set_deliveries(&mut self, deliveries: Vec<DeliveryRecord>) {
        let matches = self
            .dataset
            .take()
            .map(|ds| ds.matches)
            .or_else(|| self.pending_matches.take());
        match matches {
            Some(matches) => self.set_dataset(CricketDataset::from_tables(matches, deliveries)),
            None => {
                self.pending_deliveries = Some(deliveries);
                self.status_message =
                    Some("Delivery table loaded — now open the match table.".to_string());
            }
        }
    }

    /// Re-run the filter → aggregate pipeline for the current selection.
    ///
    /// An empty filtered match set halts the pipeline: a warning is recorded
    /// and no aggregation runs.
    pub fn recompute(&mut self) {
        self.warning = None;
        self.insights = None;
        self.match_indices.clear();
        self.delivery_indices.clear();

        let Some(dataset) = &self.dataset else {
            return;
        };

        self.match_indices = filtered_matches(dataset, &self.selection);
        if self.match_indices.is_empty() {
            self.warning = Some("No matches found.".to_string());
            return;
        }

        self.delivery_indices = filtered_deliveries(dataset, &self.match_indices);
        self.insights = Some(compute_insights(
            dataset,
            &self.match_indices,
            &self.delivery_indices,
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: i64, season: &str, team1: &str, team2: &str) -> MatchRecord {
        MatchRecord {
            id,
            season: season.to_string(),
            team1: team1.to_string(),
            team2: team2.to_string(),
            city: Some("Testville".to_string()),
            venue: "Test Oval".to_string(),
        }
    }

    fn d(match_id: i64, runs: u32) -> DeliveryRecord {
        DeliveryRecord {
            match_id,
            over: 1,
            batter: "Batter".to_string(),
            bowler: "Bowler".to_string(),
            batsman_runs: runs,
            total_runs: runs,
            player_dismissed: None,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(CricketDataset::from_tables(
            vec![m(1, "2018", "A", "B"), m(2, "2019", "A", "C"), m(3, "2019", "B", "C")],
            vec![d(1, 4), d(2, 6), d(3, 1)],
        ));
        state
    }

    #[test]
    fn loading_selects_the_first_season() {
        let state = loaded_state();
        assert_eq!(state.selection.season.as_deref(), Some("2018"));
        assert_eq!(state.match_indices, vec![0]);
        assert!(state.warning.is_none());
        assert!(state.insights.is_some());
    }

    #[test]
    fn season_scenario_totals_match_the_tables() {
        let mut state = loaded_state();
        state.selection.season = Some("2019".to_string());
        state.recompute();
        let insights = state.insights.as_ref().unwrap();
        assert_eq!(insights.totals.total_matches, 2);
        assert_eq!(insights.totals.total_runs, 7);
    }

    #[test]
    fn empty_selection_warns_and_skips_aggregation() {
        let mut state = loaded_state();
        state.selection.team = Some("Nonexistent CC".to_string());
        state.recompute();
        assert_eq!(state.warning.as_deref(), Some("No matches found."));
        assert!(state.insights.is_none());
        assert!(state.delivery_indices.is_empty());
    }

    #[test]
    fn tables_can_arrive_in_either_order() {
        let mut state = AppState::default();
        state.set_deliveries(vec![d(1, 4)]);
        assert!(state.dataset.is_none());
        state.set_matches(vec![m(1, "2019", "A", "B")]);
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.match_count(), 1);
        assert_eq!(ds.delivery_count(), 1);
        assert!(state.insights.is_some());
    }

    #[test]
    fn replacing_one_table_keeps_the_other() {
        let mut state = loaded_state();
        state.set_matches(vec![m(9, "2021", "X", "Y")]);
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.match_count(), 1);
        assert_eq!(ds.delivery_count(), 3);
        assert_eq!(state.selection.season.as_deref(), Some("2021"));
    }
}
