use scout_similarity::dataset::{PlayerRecord, Population};
use scout_similarity::error::ScoutError;
use scout_similarity::metric_catalog::MetricCatalog;
use scout_similarity::position::PositionGroup;
use scout_similarity::similarity::{SimilarityEngine, SimilarityQuery};

fn three_player_engine() -> SimilarityEngine {
    let catalog = MetricCatalog::new([
        (PositionGroup::Forward, vec!["Goals", "Assists"]),
        (PositionGroup::Goalkeeper, vec!["Saves"]),
    ]);
    let population = Population::new(vec![
        PlayerRecord::new("1", "A", "Striker")
            .with_metric("Goals", 5.0)
            .with_metric("Assists", 2.0),
        PlayerRecord::new("2", "B", "Right Winger")
            .with_metric("Goals", 4.0)
            .with_metric("Assists", 3.0),
        PlayerRecord::new("3", "C", "Goalkeeper").with_metric("Saves", 10.0),
    ]);
    SimilarityEngine::new(population, catalog)
}

fn squad() -> SimilarityEngine {
    let labels = [
        "Centre-Forward",
        "Left Winger",
        "Central Midfield",
        "Defensive Midfield",
        "Centre-Back",
        "Left Back",
        "Goalkeeper",
        "Second Striker",
        "Right Back",
        "Attacking Midfield",
        "Utility",
        "Right Winger",
    ];
    let metrics = MetricCatalog::standard().universal_metrics().to_vec();
    let players = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut p = PlayerRecord::new(i.to_string(), format!("Player {i}"), *label)
                .with_team(format!("Team {}", i % 3))
                .with_age(18 + (i as u32 * 2))
                .with_market_value(&format!("{}m", 5 * (i + 1)));
            for (j, m) in metrics.iter().enumerate() {
                // Leave some holes so absent metrics are exercised.
                if (i + j) % 5 != 0 {
                    p = p.with_metric(m.clone(), ((i * 7 + j * 3) % 11) as f64 * 0.5);
                }
            }
            p
        })
        .collect();
    SimilarityEngine::new(Population::new(players), MetricCatalog::standard().clone())
}

#[test]
fn same_group_peer_ranks_above_keeper() {
    let engine = three_player_engine();
    let rows = engine
        .rank_by_name("A", &SimilarityQuery::top(2))
        .expect("A exists");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "B");
    assert_eq!(rows[1].name, "C");
    assert!(rows[0].similarity > rows[1].similarity);
}

#[test]
fn unknown_player_is_not_found() {
    let engine = three_player_engine();
    let err = engine
        .rank_by_name("Nobody", &SimilarityQuery::default())
        .unwrap_err();
    assert_eq!(err, ScoutError::PlayerNotFound("Nobody".to_string()));
    assert!(matches!(
        engine.rank_by_id("99", &SimilarityQuery::default()),
        Err(ScoutError::PlayerNotFound(_))
    ));
}

#[test]
fn target_never_in_results_and_order_holds() {
    let engine = squad();
    for target in engine.population().players() {
        let rows = engine
            .rank_by_id(&target.id, &SimilarityQuery::top(50))
            .expect("target exists");
        assert_eq!(rows.len(), engine.population().len() - 1);
        assert!(rows.iter().all(|r| r.name != target.name));
        for pair in rows.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        for r in &rows {
            assert!((-1.0..=1.0).contains(&r.similarity));
        }
    }
}

#[test]
fn top_n_caps_results() {
    let engine = squad();
    let rows = engine
        .rank_by_name("Player 0", &SimilarityQuery::top(3))
        .unwrap();
    assert_eq!(rows.len(), 3);
    let none = engine
        .rank_by_name("Player 0", &SimilarityQuery::top(0))
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn tiny_age_bound_gives_empty_result() {
    let engine = squad();
    let query = SimilarityQuery {
        age_max: Some(1),
        ..SimilarityQuery::default()
    };
    let rows = engine.rank_by_name("Player 3", &query).expect("not an error");
    assert!(rows.is_empty());
}

#[test]
fn filters_respect_bounds() {
    let engine = squad();
    let query = SimilarityQuery {
        top_n: 50,
        age_max: Some(26),
        value_max: Some(25_000_000.0),
    };
    let rows = engine.rank_by_name("Player 11", &query).unwrap();
    // Ages 18..=26 are players 0..=4, values 5m..=25m are players 0..=4.
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.age <= 26.0));
}

#[test]
fn players_without_age_drop_out_under_age_filter() {
    let engine = three_player_engine();
    let query = SimilarityQuery {
        age_max: Some(40),
        ..SimilarityQuery::default()
    };
    assert!(engine.rank_by_name("A", &query).unwrap().is_empty());
    let unfiltered = engine.rank_by_name("A", &SimilarityQuery::default()).unwrap();
    assert_eq!(unfiltered.len(), 2);
}

#[test]
fn ties_keep_population_order() {
    let catalog = MetricCatalog::new([(PositionGroup::Forward, vec!["Goals"])]);
    let population = Population::new(vec![
        PlayerRecord::new("1", "First", "Striker").with_metric("Goals", 1.0),
        PlayerRecord::new("2", "Target", "Striker").with_metric("Goals", 9.0),
        PlayerRecord::new("3", "Second", "Striker").with_metric("Goals", 1.0),
        PlayerRecord::new("4", "Third", "Striker").with_metric("Goals", 1.0),
    ]);
    let engine = SimilarityEngine::new(population, catalog);
    let rows = engine.rank_by_name("Target", &SimilarityQuery::default()).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn candidates_from_other_groups_stay_eligible() {
    let engine = three_player_engine();
    let rows = engine.rank_by_name("C", &SimilarityQuery::default()).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"A") && names.contains(&"B"));
}

#[test]
fn zero_vectors_score_zero() {
    let catalog = MetricCatalog::new([(PositionGroup::Goalkeeper, vec!["Saves"])]);
    let population = Population::new(vec![
        PlayerRecord::new("1", "Keeper", "Goalkeeper").with_metric("Saves", 3.0),
        PlayerRecord::new("2", "Other", "Goalkeeper").with_metric("Saves", 3.0),
    ]);
    let engine = SimilarityEngine::new(population, catalog);
    let rows = engine.rank_by_name("Keeper", &SimilarityQuery::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].similarity, 0.0);
}
