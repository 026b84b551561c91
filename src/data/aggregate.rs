use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::CricketDataset;

/// Leaderboard length for the batter and bowler tables.
pub const TOP_N: usize = 10;
/// Overs beyond this are ignored by the run-rate table.
pub const MAX_OVERS: u32 = 20;

// ---------------------------------------------------------------------------
// Output tables
// ---------------------------------------------------------------------------

/// Headline metrics over the filtered selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalsSummary {
    pub total_matches: usize,
    pub total_runs: u64,
    pub total_wickets: u64,
}

/// One row of the top-batsmen table.  Field names double as CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatterTotal {
    pub batter: String,
    pub batsman_runs: u64,
}

/// One row of the top-bowlers table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BowlerWickets {
    pub bowler: String,
    pub wickets: u64,
}

/// One row of the run-rate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverRuns {
    pub over: u32,
    pub total_runs: u64,
}

/// Everything the dashboard shows for one filtered selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub totals: TotalsSummary,
    pub top_batsmen: Vec<BatterTotal>,
    pub top_bowlers: Vec<BowlerWickets>,
    pub run_rate: Vec<OverRuns>,
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Headline metrics: match count, total runs, wickets taken.
pub fn compute_totals(
    dataset: &CricketDataset,
    match_indices: &[usize],
    delivery_indices: &[usize],
) -> TotalsSummary {
    let mut totals = TotalsSummary {
        total_matches: match_indices.len(),
        ..TotalsSummary::default()
    };
    for &i in delivery_indices {
        let d = &dataset.deliveries[i];
        totals.total_runs += d.total_runs as u64;
        if d.player_dismissed.is_some() {
            totals.total_wickets += 1;
        }
    }
    totals
}

/// Per-batter run totals, highest first, at most [`TOP_N`] rows.
///
/// Rows are accumulated in first-appearance order and sorted stably, so equal
/// totals rank by whichever batter faced a ball first.
pub fn top_batsmen(dataset: &CricketDataset, delivery_indices: &[usize]) -> Vec<BatterTotal> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<BatterTotal> = Vec::new();

    for &i in delivery_indices {
        let d = &dataset.deliveries[i];
        let slot = *slots.entry(d.batter.as_str()).or_insert_with(|| {
            rows.push(BatterTotal {
                batter: d.batter.clone(),
                batsman_runs: 0,
            });
            rows.len() - 1
        });
        rows[slot].batsman_runs += d.batsman_runs as u64;
    }

    rows.sort_by(|a, b| b.batsman_runs.cmp(&a.batsman_runs));
    rows.truncate(TOP_N);
    rows
}

/// Per-bowler dismissal counts, highest first, at most [`TOP_N`] rows.
///
/// Every delivery with a dismissed player credits the bowler on record,
/// run-outs included.  That mirrors the source data's attribution and is a
/// deliberate simplification.
pub fn top_bowlers(dataset: &CricketDataset, delivery_indices: &[usize]) -> Vec<BowlerWickets> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<BowlerWickets> = Vec::new();

    for &i in delivery_indices {
        let d = &dataset.deliveries[i];
        if d.player_dismissed.is_none() {
            continue;
        }
        let slot = *slots.entry(d.bowler.as_str()).or_insert_with(|| {
            rows.push(BowlerWickets {
                bowler: d.bowler.clone(),
                wickets: 0,
            });
            rows.len() - 1
        });
        rows[slot].wickets += 1;
    }

    rows.sort_by(|a, b| b.wickets.cmp(&a.wickets));
    rows.truncate(TOP_N);
    rows
}

/// Total runs per over, ascending by over, capped at [`MAX_OVERS`].
pub fn run_rate(dataset: &CricketDataset, delivery_indices: &[usize]) -> Vec<OverRuns> {
    let mut per_over: BTreeMap<u32, u64> = BTreeMap::new();
    for &i in delivery_indices {
        let d = &dataset.deliveries[i];
        if d.over > MAX_OVERS {
            continue;
        }
        *per_over.entry(d.over).or_default() += d.total_runs as u64;
    }
    per_over
        .into_iter()
        .map(|(over, total_runs)| OverRuns { over, total_runs })
        .collect()
}

/// Run every reduction over one filtered selection.
pub fn compute_insights(
    dataset: &CricketDataset,
    match_indices: &[usize],
    delivery_indices: &[usize],
) -> Insights {
    Insights {
        totals: compute_totals(dataset, match_indices, delivery_indices),
        top_batsmen: top_batsmen(dataset, delivery_indices),
        top_bowlers: top_bowlers(dataset, delivery_indices),
        run_rate: run_rate(dataset, delivery_indices),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterSelection, filtered_deliveries, filtered_matches};
    use crate::data::model::{DeliveryRecord, MatchRecord};

    fn m(id: i64, season: &str) -> MatchRecord {
        MatchRecord {
            id,
            season: season.to_string(),
            team1: "Alpha XI".to_string(),
            team2: "Beta XI".to_string(),
            city: Some("Testville".to_string()),
            venue: "Test Oval".to_string(),
        }
    }

    fn d(match_id: i64, over: u32, batter: &str, bowler: &str, runs: u32, out: Option<&str>) -> DeliveryRecord {
        DeliveryRecord {
            match_id,
            over,
            batter: batter.to_string(),
            bowler: bowler.to_string(),
            batsman_runs: runs,
            total_runs: runs,
            player_dismissed: out.map(str::to_string),
        }
    }

    fn dataset() -> CricketDataset {
        CricketDataset::from_tables(
            vec![m(1, "2019"), m(2, "2019"), m(3, "2018")],
            vec![
                d(1, 1, "Kohli", "Starc", 4, None),
                d(1, 1, "Kohli", "Starc", 2, None),
                d(1, 2, "Rahul", "Boult", 6, None),
                d(1, 2, "Rahul", "Boult", 0, Some("Rahul")),
                d(2, 1, "Gill", "Starc", 6, None),
                d(2, 3, "Kohli", "Rashid", 1, Some("Kohli")),
                // Super-over style spillover, excluded from the run-rate cut.
                d(2, 21, "Gill", "Rashid", 6, None),
                d(3, 1, "Dhoni", "Starc", 6, None),
            ],
        )
    }

    fn season_2019(ds: &CricketDataset) -> (Vec<usize>, Vec<usize>) {
        let matches = filtered_matches(ds, &FilterSelection::for_season("2019"));
        let deliveries = filtered_deliveries(ds, &matches);
        (matches, deliveries)
    }

    #[test]
    fn totals_cover_the_whole_filtered_set() {
        let ds = dataset();
        let (matches, deliveries) = season_2019(&ds);
        let totals = compute_totals(&ds, &matches, &deliveries);
        assert_eq!(totals.total_matches, 2);
        // Includes the over-21 delivery: the cut applies to run rate only.
        assert_eq!(totals.total_runs, 25);
        assert_eq!(totals.total_wickets, 2);
    }

    #[test]
    fn batsmen_rank_by_runs_with_first_appearance_tie_break() {
        let ds = dataset();
        let (_, deliveries) = season_2019(&ds);
        let table = top_batsmen(&ds, &deliveries);
        let names: Vec<&str> = table.iter().map(|r| r.batter.as_str()).collect();
        // Gill 6+6, Kohli 4+2+1, Rahul 6+0.
        assert_eq!(names, vec!["Gill", "Kohli", "Rahul"]);
        let runs: Vec<u64> = table.iter().map(|r| r.batsman_runs).collect();
        assert_eq!(runs, vec![12, 7, 6]);
        assert!(runs.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn tied_batsmen_keep_first_appearance_order() {
        let ds = CricketDataset::from_tables(
            vec![m(1, "2019")],
            vec![
                d(1, 1, "First", "X", 3, None),
                d(1, 1, "Second", "X", 3, None),
                d(1, 2, "First", "X", 1, None),
                d(1, 2, "Second", "X", 1, None),
            ],
        );
        let deliveries: Vec<usize> = (0..ds.delivery_count()).collect();
        let table = top_batsmen(&ds, &deliveries);
        assert_eq!(table[0].batter, "First");
        assert_eq!(table[1].batter, "Second");
        assert_eq!(table[0].batsman_runs, table[1].batsman_runs);
    }

    #[test]
    fn top_tables_never_exceed_ten_rows() {
        let deliveries: Vec<DeliveryRecord> = (0..30)
            .map(|i| {
                d(
                    1,
                    1,
                    &format!("Batter {i}"),
                    &format!("Bowler {i}"),
                    i,
                    Some("someone"),
                )
            })
            .collect();
        let ds = CricketDataset::from_tables(vec![m(1, "2019")], deliveries);
        let indices: Vec<usize> = (0..ds.delivery_count()).collect();
        assert_eq!(top_batsmen(&ds, &indices).len(), TOP_N);
        assert_eq!(top_bowlers(&ds, &indices).len(), TOP_N);
    }

    #[test]
    fn small_selections_are_not_padded() {
        let ds = dataset();
        let (_, deliveries) = season_2019(&ds);
        // Only three distinct batters ever bat in 2019 here.
        assert_eq!(top_batsmen(&ds, &deliveries).len(), 3);
    }

    #[test]
    fn bowlers_only_count_dismissal_deliveries() {
        let ds = dataset();
        let (_, deliveries) = season_2019(&ds);
        let table = top_bowlers(&ds, &deliveries);
        let names: Vec<&str> = table.iter().map(|r| r.bowler.as_str()).collect();
        assert_eq!(names, vec!["Boult", "Rashid"]);
        assert!(table.iter().all(|r| r.wickets == 1));
    }

    #[test]
    fn run_rate_is_ascending_unique_and_capped() {
        let ds = dataset();
        let (_, deliveries) = season_2019(&ds);
        let table = run_rate(&ds, &deliveries);
        let overs: Vec<u32> = table.iter().map(|r| r.over).collect();
        assert_eq!(overs, vec![1, 2, 3]);
        assert!(overs.iter().all(|&o| (1..=MAX_OVERS).contains(&o)));
        // Over 1: 4 + 2 + 6 = 12, over 2: 6 + 0, over 3: 1.
        let runs: Vec<u64> = table.iter().map(|r| r.total_runs).collect();
        assert_eq!(runs, vec![12, 6, 1]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let ds = dataset();
        let (matches, deliveries) = season_2019(&ds);
        let first = compute_insights(&ds, &matches, &deliveries);
        let second = compute_insights(&ds, &matches, &deliveries);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_selection_reduces_to_empty_tables() {
        let ds = dataset();
        let insights = compute_insights(&ds, &[], &[]);
        assert_eq!(insights.totals, TotalsSummary::default());
        assert!(insights.top_batsmen.is_empty());
        assert!(insights.top_bowlers.is_empty());
        assert!(insights.run_rate.is_empty());
    }
}
