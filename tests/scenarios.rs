use standings_forecast::aggregate::{aggregate_results, meetings};
use standings_forecast::buckets::{BucketTable, ScoreLabel, prob_mapping};
use standings_forecast::league::{Fixture, MATCH_POINTS, MatchResult};
use standings_forecast::predict::{ChanceTier, predict_outcomes};
use standings_forecast::standings::{StandingsEntry, StandingsTable, simulate_standings};

fn season() -> Vec<MatchResult> {
    vec![
        MatchResult::new("Ajax", "Brio", 3, 1),
        MatchResult::new("Brio", "Ajax", 4, 0),
        MatchResult::new("Ajax", "Cobra", 3, 2),
        MatchResult::new("Cobra", "Delta", 1, 3),
        MatchResult::from_score_cell("Delta", "Brio", None),
        MatchResult::new("Brio", "Cobra", 2, 3),
        MatchResult::new("Delta", "Ajax", 0, 4),
    ]
}

#[test]
fn head_to_head_totals_conserve_points() {
    let results = season();
    let agg = aggregate_results(&results);
    let teams = ["Ajax", "Brio", "Cobra", "Delta"];
    for a in teams {
        for b in teams {
            if a == b {
                continue;
            }
            let n = meetings(&results, a, b) as u32;
            let sum = agg.get(a).map_or(0, |t| t.points_against(b))
                + agg.get(b).map_or(0, |t| t.points_against(a));
            assert_eq!(sum, MATCH_POINTS * n, "{a} vs {b}");
        }
    }
}

#[test]
fn every_boundary_maps_to_a_label() {
    for chance in [0.0, 0.25, 0.4, 0.45, 0.55, 0.6, 0.75, 1.0] {
        let award = prob_mapping(chance);
        assert!(ScoreLabel::ALL.contains(&award.label), "chance {chance}");
    }
}

#[test]
fn scenario_a_head_to_head() {
    let agg = aggregate_results(&[MatchResult::new("X", "Y", 3, 2)]);
    assert_eq!(agg["X"].points_against("Y"), 3);
    assert_eq!(agg["Y"].points_against("X"), 2);

    let out = predict_outcomes(&agg, &[Fixture::new("X", "Y")], &BucketTable::default());
    assert_eq!(out[0].label, ScoreLabel::ThreeOne);
    assert_eq!((out[0].home_points, out[0].away_points), (3, 1));
}

#[test]
fn scenario_b_total_points_fallback() {
    let agg = aggregate_results(&[
        MatchResult::new("X", "P", 4, 0),
        MatchResult::new("Q", "X", 0, 4),
        MatchResult::new("Y", "P", 0, 4),
    ]);
    assert_eq!(agg["X"].total_points, 10);
    assert_eq!(agg["Y"].total_points, 0);

    let out = predict_outcomes(&agg, &[Fixture::new("X", "Y")], &BucketTable::default());
    assert_eq!(out[0].tier, ChanceTier::TotalPoints);
    assert_eq!(out[0].label, ScoreLabel::FourNil);
    assert_eq!((out[0].home_points, out[0].away_points), (4, 0));
}

#[test]
fn scenario_c_coin_flip_goes_to_away() {
    let agg = aggregate_results(&[]);
    let out = predict_outcomes(&agg, &[Fixture::new("X", "Y")], &BucketTable::default());
    assert_eq!(out[0].tier, ChanceTier::CoinFlip);
    assert_eq!(out[0].label, ScoreLabel::TwoThree);
    assert_eq!((out[0].home_points, out[0].away_points), (2, 3));
}

#[test]
fn scenario_d_standings_update() {
    let agg = aggregate_results(&[MatchResult::new("X", "Y", 3, 2)]);
    let outcomes = predict_outcomes(&agg, &[Fixture::new("X", "Y")], &BucketTable::default());

    let mut table = StandingsTable::from_entries([StandingsEntry::new("X", 10), StandingsEntry::new("Y", 8)]);
    let (ranked, _) = simulate_standings(&mut table, &outcomes);
    let view: Vec<(&str, u32)> = ranked.iter().map(|e| (e.team.as_str(), e.points)).collect();
    assert_eq!(view, [("X", 13), ("Y", 9)]);
}

#[test]
fn full_season_conserves_and_sorts() {
    let results = season();
    let agg = aggregate_results(&results);
    let fixtures = vec![
        Fixture::new("Ajax", "Delta"),
        Fixture::new("Cobra", "Brio"),
        Fixture::new("Echo", "Ajax"),
        Fixture::new("Delta", "Cobra"),
        Fixture::new("Brio", "Delta"),
    ];
    let outcomes = predict_outcomes(&agg, &fixtures, &BucketTable::default());
    assert_eq!(outcomes.len(), fixtures.len());

    let mut table = StandingsTable::from_entries([
        StandingsEntry::new("Ajax", 14),
        StandingsEntry::new("Brio", 11),
        StandingsEntry::new("Cobra", 6),
        StandingsEntry::new("Delta", 8),
    ]);
    let before = table.total_points();
    let (ranked, report) = simulate_standings(&mut table, &outcomes);

    let known_points: u64 = outcomes
        .iter()
        .flat_map(|o| [(&o.home, o.home_points), (&o.away, o.away_points)])
        .filter(|(team, _)| table.get(team).is_some())
        .map(|(_, p)| u64::from(p))
        .sum();
    let after: u64 = ranked.iter().map(|e| u64::from(e.points)).sum();
    assert_eq!(after, before + known_points);
    assert_eq!(report.points_awarded, known_points);
    assert_eq!(report.unknown_teams, ["Echo"]);
    assert_eq!(ranked.len(), 4);
    assert!(ranked.windows(2).all(|w| w[0].points >= w[1].points));
}
