use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Serialize)]
struct MatchRow {
    id: i64,
    season: String,
    team1: String,
    team2: String,
    city: Option<String>,
    venue: String,
}

#[derive(Serialize)]
struct DeliveryRow {
    match_id: i64,
    over: u32,
    batter: String,
    bowler: String,
    batsman_runs: u32,
    total_runs: u32,
    player_dismissed: Option<String>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

const SEASONS: &[&str] = &["2018", "2019", "2020"];

/// (team, home venue, home city) — one venue deliberately has no city, like
/// the gaps in the real match table.
const TEAMS: &[(&str, &str, Option<&str>)] = &[
    ("Chennai Super Kings", "M. A. Chidambaram Stadium", Some("Chennai")),
    ("Delhi Capitals", "Arun Jaitley Ground", Some("Delhi")),
    ("Kolkata Knight Riders", "Eden Gardens", Some("Kolkata")),
    ("Mumbai Indians", "Wankhede Stadium", Some("Mumbai")),
    ("Punjab Kings", "IS Bindra Stadium", Some("Mohali")),
    ("Rajasthan Royals", "Sawai Mansingh Stadium", Some("Jaipur")),
    ("Royal Challengers Bangalore", "M. Chinnaswamy Stadium", Some("Bengaluru")),
    ("Sunrisers Hyderabad", "Sharjah Cricket Stadium", None),
];

const FIRST_NAMES: &[&str] = &[
    "Arjun", "Rohan", "Kiran", "Dev", "Sanjay", "Vikram", "Anil", "Rahul",
    "Pratik", "Imran", "Suresh", "Manoj", "Harpreet", "Nitin", "Ajay", "Zaheer",
];
const LAST_NAMES: &[&str] = &[
    "Sharma", "Patel", "Singh", "Reddy", "Iyer", "Khan", "Nair", "Kulkarni",
    "Chopra", "Menon", "Verma", "Das", "Gill", "Yadav", "Joshi", "Rao",
];

/// Eleven players per team: slots 0..6 bat, 6..11 bowl.
fn player_name(team_idx: usize, slot: usize) -> String {
    let n = team_idx * 11 + slot;
    format!(
        "{} {}",
        FIRST_NAMES[n % FIRST_NAMES.len()],
        LAST_NAMES[(n / FIRST_NAMES.len()) % LAST_NAMES.len()]
    )
}

fn weighted_runs(rng: &mut SimpleRng) -> u32 {
    match rng.next_f64() {
        r if r < 0.35 => 0,
        r if r < 0.65 => 1,
        r if r < 0.77 => 2,
        r if r < 0.80 => 3,
        r if r < 0.92 => 4,
        _ => 6,
    }
}

fn simulate_innings(
    rng: &mut SimpleRng,
    match_id: i64,
    batting: &[String],
    bowling: &[String],
    deliveries: &mut Vec<DeliveryRow>,
) {
    let mut striker = 0usize;
    let mut non_striker = 1usize;
    let mut next_in = 2usize;

    for over in 1..=20u32 {
        let bowler = &bowling[(over as usize - 1) % bowling.len()];
        for _ball in 0..6 {
            if rng.next_f64() < 0.05 {
                deliveries.push(DeliveryRow {
                    match_id,
                    over,
                    batter: batting[striker].clone(),
                    bowler: bowler.clone(),
                    batsman_runs: 0,
                    total_runs: 0,
                    player_dismissed: Some(batting[striker].clone()),
                });
                if next_in >= batting.len() {
                    // All out.
                    return;
                }
                striker = next_in;
                next_in += 1;
                continue;
            }

            let runs = weighted_runs(rng);
            let extra = if rng.next_f64() < 0.04 { 1 } else { 0 };
            deliveries.push(DeliveryRow {
                match_id,
                over,
                batter: batting[striker].clone(),
                bowler: bowler.clone(),
                batsman_runs: runs,
                total_runs: runs + extra,
                player_dismissed: None,
            });
            if runs % 2 == 1 {
                std::mem::swap(&mut striker, &mut non_striker);
            }
        }
        std::mem::swap(&mut striker, &mut non_striker);
    }
}

fn write_matches_parquet(rows: &[MatchRow]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("season", DataType::Utf8, false),
        Field::new("team1", DataType::Utf8, false),
        Field::new("team2", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, true),
        Field::new("venue", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.id).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.season.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.team1.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.team2.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.city.as_deref()).collect::<Vec<Option<&str>>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.venue.as_str()).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create matches RecordBatch");

    let file = std::fs::File::create("matches.parquet").expect("Failed to create matches.parquet");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn write_deliveries_parquet(rows: &[DeliveryRow]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("match_id", DataType::Int64, false),
        Field::new("over", DataType::Int64, false),
        Field::new("batter", DataType::Utf8, false),
        Field::new("bowler", DataType::Utf8, false),
        Field::new("batsman_runs", DataType::Int64, false),
        Field::new("total_runs", DataType::Int64, false),
        Field::new("player_dismissed", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.match_id).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.over as i64).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.batter.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.bowler.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.batsman_runs as i64).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.total_runs as i64).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| r.player_dismissed.as_deref())
                    .collect::<Vec<Option<&str>>>(),
            )),
        ],
    )
    .expect("Failed to create deliveries RecordBatch");

    let file =
        std::fs::File::create("deliveries.parquet").expect("Failed to create deliveries.parquet");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let also_parquet = std::env::args().any(|a| a == "--parquet");
    let mut rng = SimpleRng::new(42);

    // Eleven-player squads per team.
    let squads: Vec<(Vec<String>, Vec<String>)> = (0..TEAMS.len())
        .map(|t| {
            let batters = (0..6).map(|s| player_name(t, s)).collect();
            let bowlers = (6..11).map(|s| player_name(t, s)).collect();
            (batters, bowlers)
        })
        .collect();

    let mut matches: Vec<MatchRow> = Vec::new();
    let mut deliveries: Vec<DeliveryRow> = Vec::new();
    let mut id: i64 = 0;

    // Single round-robin per season, hosted by the lower-indexed team.
    for season in SEASONS {
        for home in 0..TEAMS.len() {
            for away in (home + 1)..TEAMS.len() {
                id += 1;
                let (team1, venue, city) = TEAMS[home];
                let (team2, _, _) = TEAMS[away];
                matches.push(MatchRow {
                    id,
                    season: season.to_string(),
                    team1: team1.to_string(),
                    team2: team2.to_string(),
                    city: city.map(str::to_string),
                    venue: venue.to_string(),
                });

                let (first, second) = if rng.next_f64() < 0.5 {
                    (home, away)
                } else {
                    (away, home)
                };
                simulate_innings(&mut rng, id, &squads[first].0, &squads[second].1, &mut deliveries);
                simulate_innings(&mut rng, id, &squads[second].0, &squads[first].1, &mut deliveries);
            }
        }
    }

    let mut wtr = csv::Writer::from_path("matches.csv").expect("Failed to create matches.csv");
    for row in &matches {
        wtr.serialize(row).expect("Failed to write match row");
    }
    wtr.flush().expect("Failed to flush matches.csv");

    let mut wtr =
        csv::Writer::from_path("deliveries.csv").expect("Failed to create deliveries.csv");
    for row in &deliveries {
        wtr.serialize(row).expect("Failed to write delivery row");
    }
    wtr.flush().expect("Failed to flush deliveries.csv");

    if also_parquet {
        write_matches_parquet(&matches);
        write_deliveries_parquet(&deliveries);
    }

    println!(
        "Wrote {} matches and {} deliveries to matches.csv / deliveries.csv{}",
        matches.len(),
        deliveries.len(),
        if also_parquet {
            " (and .parquet twins)"
        } else {
            ""
        }
    );
}
